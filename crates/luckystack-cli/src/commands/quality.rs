use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use luckystack_core::io::crop::crop_frames;
use luckystack_core::io::image_io::load_frames_from_dir;
use luckystack_core::pipeline::config::CropConfig;
use luckystack_core::quality::{rank_frames, score_frames_with_progress, QualityWeights};

#[derive(Args)]
pub struct QualityArgs {
    /// Directory of input frames
    pub dir: PathBuf,

    /// Show top N frames only
    #[arg(long, default_value = "20")]
    pub top: usize,

    /// Crop around the target before scoring (square side in pixels)
    #[arg(long)]
    pub crop_size: Option<usize>,
}

pub fn run(args: &QualityArgs) -> Result<()> {
    let frames = load_frames_from_dir(&args.dir)
        .with_context(|| format!("Failed to load frames from {}", args.dir.display()))?;
    let frames = match args.crop_size {
        Some(size) => crop_frames(
            frames,
            &CropConfig {
                size,
                ..Default::default()
            },
        )?,
        None => frames,
    };
    let total = frames.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Scoring frames");

    let scored = score_frames_with_progress(frames, &QualityWeights::default(), |done| {
        if done as u64 > pb.position() {
            pb.set_position(done as u64);
        }
    })?;
    pb.finish();

    let ranked = rank_frames(&scored);

    println!("\nTop {} frames by quality (of {}):", args.top.min(total), total);
    println!(
        "{:>5}  {:>8}  {:>10}  {:>10}  {:>8}  {:>10}",
        "Rank", "Frame #", "Contrast", "Sharpness", "SNR", "Score"
    );
    println!("{}", "-".repeat(60));

    for (rank, &pos) in ranked.iter().take(args.top).enumerate() {
        let frame = &scored[pos];
        let score = frame.score();
        println!(
            "{:>5}  {:>8}  {:>10.3}  {:>10.3}  {:>8.3}  {:>10.4}",
            rank + 1,
            frame.index(),
            score.contrast,
            score.sharpness,
            score.snr,
            score.composite
        );
    }

    if let (Some(&best), Some(&worst)) = (ranked.first(), ranked.last()) {
        println!("\nBest score:  {:.4}", scored[best].quality());
        println!("Worst score: {:.4}", scored[worst].quality());
    }

    Ok(())
}
