use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use modloc::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0).with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::BatchStart { peptides } => {
                    pb_guard.reset();
                    pb_guard.set_length(peptides);
                    pb_guard.set_position(0);
                    if let Some(style) = Self::bar_style() {
                        pb_guard.set_style(style);
                    }
                    pb_guard.set_message("Localizing");
                }
                Progress::PeptideDone { name, placed } => {
                    pb_guard.set_message(format!("{name} ({placed} placed)"));
                    pb_guard.inc(1);
                }
                Progress::PeptideFailed { name, reason } => {
                    pb_guard.println(format!("  ✗ {name}: {reason}"));
                    pb_guard.inc(1);
                }
                Progress::BatchFinish { succeeded, failed } => {
                    let length = pb_guard.length().unwrap_or(0);
                    if pb_guard.position() < length {
                        pb_guard.set_position(length);
                    }
                    pb_guard.finish_with_message(format!("✓ {succeeded} localized, {failed} failed"));
                }
            }
        })
    }

    fn bar_style() -> Option<ProgressStyle> {
        let style = ProgressStyle::with_template("{msg:<30} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .ok()?
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-");
        Some(style)
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
