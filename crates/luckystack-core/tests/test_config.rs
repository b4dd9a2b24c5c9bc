use std::path::PathBuf;

use luckystack_core::pipeline::config::{CropConfig, PipelineConfig, StackMethod};
use luckystack_core::quality::QualityWeights;
use luckystack_core::stack::SigmaClipParams;

#[test]
fn test_default_config() {
    let config = PipelineConfig::default();
    assert_eq!(config.frame_selection.select_percentage, 1.0);
    assert_eq!(config.crop, Some(CropConfig::default()));
    assert_eq!(
        config.quality,
        QualityWeights {
            contrast: 0.2,
            sharpness: 0.5,
            snr: 0.3,
        }
    );
    assert_eq!(
        config.stacking.method,
        StackMethod::SigmaClip(SigmaClipParams { sigma: 2.0 })
    );
}

#[test]
fn test_toml_roundtrip() {
    let config = PipelineConfig {
        input: PathBuf::from("night/saturn"),
        output: PathBuf::from("night/saturn.tiff"),
        crop: None,
        stacking: luckystack_core::pipeline::config::StackConfig {
            method: StackMethod::Median,
        },
        ..Default::default()
    };
    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: PipelineConfig = toml::from_str(&text).unwrap();

    assert_eq!(parsed.input, config.input);
    assert_eq!(parsed.output, config.output);
    assert_eq!(parsed.crop, None);
    assert_eq!(parsed.stacking.method, StackMethod::Median);
    assert_eq!(parsed.quality, config.quality);
}

#[test]
fn test_minimal_toml_fills_defaults() {
    let text = r#"
input = "frames"
output = "out.png"
"#;
    let config: PipelineConfig = toml::from_str(text).unwrap();
    assert_eq!(config.frame_selection.select_percentage, 1.0);
    assert_eq!(config.quality, QualityWeights::default());
    assert_eq!(config.stacking.method, StackMethod::default());
    // An omitted crop section disables cropping.
    assert_eq!(config.crop, None);
}

#[test]
fn test_toml_sections() {
    let text = r#"
input = "frames"
output = "out.png"

[crop]
size = 256
threshold = 0.4

[frame_selection]
select_percentage = 0.25

[quality]
contrast = 0.0
sharpness = 1.0
snr = 0.0

[stacking.method.SigmaClip]
sigma = 3.0
"#;
    let config: PipelineConfig = toml::from_str(text).unwrap();
    assert_eq!(
        config.crop,
        Some(CropConfig {
            size: 256,
            threshold: 0.4,
        })
    );
    assert_eq!(config.frame_selection.select_percentage, 0.25);
    assert_eq!(config.quality.sharpness, 1.0);
    assert_eq!(
        config.stacking.method,
        StackMethod::SigmaClip(SigmaClipParams { sigma: 3.0 })
    );
}

#[test]
fn test_method_display() {
    assert_eq!(StackMethod::Mean.to_string(), "Mean");
    assert_eq!(StackMethod::Median.to_string(), "Median");
    assert_eq!(StackMethod::default().to_string(), "Sigma clip (k=2)");
}
