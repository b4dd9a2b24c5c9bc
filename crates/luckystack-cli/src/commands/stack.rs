use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use luckystack_core::pipeline::config::{
    CropConfig, FrameSelectionConfig, PipelineConfig, StackConfig, StackMethod,
};
use luckystack_core::pipeline::run_pipeline_reported;
use luckystack_core::stack::sigma_clip::SigmaClipParams;
use tracing::info;

use crate::progress::BarReporter;
use crate::summary::{print_pipeline_summary, print_stack_result};

#[derive(Clone, ValueEnum)]
pub enum StackMethodArg {
    SigmaClip,
    Mean,
    Median,
}

#[derive(Args)]
pub struct StackArgs {
    /// Directory of input frames (PNG, JPEG, TIFF, BMP)
    pub dir: PathBuf,

    /// Pipeline config file (TOML); replaces every option except DIR and --output
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Side of the square cropped around the target, in pixels
    #[arg(long, default_value = "480")]
    pub crop_size: usize,

    /// Stack frames as loaded, without cropping
    #[arg(long, conflicts_with = "crop_size")]
    pub no_crop: bool,

    /// Percentage of best frames to keep (1-100)
    #[arg(long, default_value = "100")]
    pub select: u32,

    /// Stacking method
    #[arg(long, value_enum, default_value = "sigma-clip")]
    pub method: StackMethodArg,

    /// Sigma threshold for sigma-clip stacking
    #[arg(long, default_value = "2.0")]
    pub sigma: f64,

    /// Output file path [default: stacked.png, or the config's output]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

const DEFAULT_OUTPUT: &str = "stacked.png";

pub fn run(args: &StackArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let loaded: PipelineConfig =
            toml::from_str(&contents).context("Invalid pipeline config")?;
        info!(path = %config_path.display(), "Loaded pipeline config");
        apply_path_overrides(loaded, args)
    } else {
        build_config_from_args(args)
    };

    print_pipeline_summary(&config);

    let reporter = Arc::new(BarReporter::new());
    let output = run_pipeline_reported(&config, reporter).with_context(|| {
        format!("Stacking frames from {} failed", config.input.display())
    })?;

    print_stack_result(&output, &config);
    Ok(())
}

/// DIR always names the input; `--output` wins over the file when given.
fn apply_path_overrides(mut config: PipelineConfig, args: &StackArgs) -> PipelineConfig {
    if config.input != args.dir {
        info!(
            config = %config.input.display(),
            arg = %args.dir.display(),
            "Input directory overridden"
        );
        config.input = args.dir.clone();
    }
    if let Some(output) = &args.output {
        info!(output = %output.display(), "Output path overridden");
        config.output = output.clone();
    }
    config
}

fn build_config_from_args(args: &StackArgs) -> PipelineConfig {
    let method = match args.method {
        StackMethodArg::SigmaClip => StackMethod::SigmaClip(SigmaClipParams { sigma: args.sigma }),
        StackMethodArg::Mean => StackMethod::Mean,
        StackMethodArg::Median => StackMethod::Median,
    };
    let crop = (!args.no_crop).then(|| CropConfig {
        size: args.crop_size,
        ..Default::default()
    });

    PipelineConfig {
        input: args.dir.clone(),
        output: args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        crop,
        frame_selection: FrameSelectionConfig {
            select_percentage: (args.select as f32 / 100.0).clamp(0.01, 1.0),
        },
        stacking: StackConfig { method },
        ..Default::default()
    }
}
