use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use luckystack_core::pipeline::{PipelineStage, ProgressReporter};

const BAR_TEMPLATE: &str = "{msg:24} [{bar:40}] {pos}/{len}";
const SPINNER_TEMPLATE: &str = "{spinner} {msg}";

/// Drives one indicatif bar per pipeline stage. Stages with a known item
/// count get a bar, the rest a spinner.
pub struct BarReporter {
    current: Mutex<Option<ProgressBar>>,
}

impl BarReporter {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.current.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        let pb = match total_items {
            Some(total) => {
                let pb = ProgressBar::new(total as u64);
                if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
                    pb.set_style(style.progress_chars("=> "));
                }
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
                    pb.set_style(style);
                }
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            }
        };
        pb.set_message(stage.to_string());

        if let Ok(mut guard) = self.current.lock() {
            if let Some(previous) = guard.replace(pb) {
                previous.finish();
            }
        }
    }

    fn advance(&self, items_done: usize) {
        // Workers finish out of order; never move the bar backwards.
        self.with_bar(|pb| {
            if items_done as u64 > pb.position() {
                pb.set_position(items_done as u64);
            }
        });
    }

    fn finish_stage(&self) {
        if let Ok(mut guard) = self.current.lock() {
            if let Some(pb) = guard.take() {
                pb.finish();
            }
        }
    }
}
