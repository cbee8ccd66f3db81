use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rmsdpp::engine::progress::{Progress, ProgressCallback};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// Bridges library [`Progress`] events onto an `indicatif` bar on stderr.
///
/// The matrix computation reports one spinner phase wrapping one row task;
/// the handler switches the bar between spinner and bar styles as those
/// events arrive. `ProgressBar` is internally reference-counted and thread
/// safe, so the callback just holds a clone of it.
pub struct CliProgressHandler {
    bar: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        bar.set_style(spinner_style());
        Self { bar }
    }

    /// Returns the callback to hand to a
    /// [`ProgressReporter`](rmsdpp::engine::progress::ProgressReporter).
    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        Box::new(move |event: Progress| match event {
            Progress::PhaseStart { name } => {
                bar.reset();
                bar.set_style(spinner_style());
                bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                bar.set_message(name);
            }
            Progress::PhaseFinish => {
                bar.disable_steady_tick();
                bar.finish_with_message("done");
            }
            Progress::TaskStart { total_steps } => {
                bar.disable_steady_tick();
                bar.set_style(bar_style());
                bar.set_length(total_steps);
                bar.set_position(0);
            }
            Progress::TaskIncrement => bar.inc(1),
            Progress::TaskFinish => {
                if let Some(total) = bar.length() {
                    bar.set_position(total);
                }
            }
            Progress::Message(text) => bar.println(text),
        })
    }

    /// Clears the bar, e.g. before printing results to stdout.
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .expect("spinner template is valid")
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<18} [{bar:40.cyan/blue}] {pos}/{len} rows ({elapsed})")
        .expect("bar template is valid")
        .progress_chars("=>-")
}
