use console::Style;
use luckystack_core::pipeline::config::{PipelineConfig, StackMethod};
use luckystack_core::pipeline::StackOutput;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_pipeline_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("LuckyStack"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(10)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    match &config.crop {
        Some(crop) => println!(
            "  {:<14}{}",
            s.label.apply_to("Crop"),
            s.value.apply_to(format!(
                "{0}x{0} px around centroid (> {1:.0}% of peak)",
                crop.size,
                crop.threshold * 100.0
            ))
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Crop"),
            s.disabled.apply_to("disabled")
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Frame Selection"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Keep"),
        s.value.apply_to(format!(
            "{:.0}%",
            config.frame_selection.select_percentage * 100.0
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Weights"),
        s.value.apply_to(format!(
            "contrast {} / sharpness {} / snr {}",
            config.quality.contrast, config.quality.sharpness, config.quality.snr
        ))
    );
    println!();

    println!("  {}", s.header.apply_to("Alignment"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Method"),
        s.method.apply_to("Phase correlation (sub-pixel)")
    );
    println!();

    println!("  {}", s.header.apply_to("Stacking"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Method"),
        s.method.apply_to(&config.stacking.method)
    );
    if let StackMethod::SigmaClip(params) = &config.stacking.method {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Sigma"),
            s.value.apply_to(params.sigma)
        );
    }
    println!();
}

pub fn print_stack_result(output: &StackOutput, config: &PipelineConfig) {
    let s = Styles::new();

    let max_shift = output
        .offsets
        .iter()
        .map(|(_, o)| o.dx.hypot(o.dy))
        .fold(0.0f64, f64::max);

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Stacked"),
        s.value.apply_to(format!(
            "{} frames, {}x{}",
            output.composite.frame_count(),
            output.composite.width(),
            output.composite.height()
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Template"),
        s.value.apply_to(format!("frame #{}", output.template_index))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Max shift"),
        s.value.apply_to(format!("{max_shift:.2} px"))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Saved to"),
        s.path.apply_to(config.output.display())
    );
}
