//! Progress UI (one bar per transfer) for download runs.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{prefix:>4} {bar:30} {pos:>3}% {msg}";

/// Percent-based progress bars for concurrent transfers.
///
/// When disabled, bars are created hidden so callers need not branch.
pub(crate) struct TransferBars {
    multi: MultiProgress,
    style: ProgressStyle,
}

impl TransferBars {
    pub(crate) fn new(enabled: bool) -> Self {
        let target = if enabled {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        Self {
            multi: MultiProgress::with_draw_target(target),
            style,
        }
    }

    /// Adds a bar labelled with the item id and title.
    pub(crate) fn add(&self, id: &str, title: &str) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new(100));
        bar.set_style(self.style.clone());
        bar.set_prefix(id.to_string());
        bar.set_message(title.to_string());
        bar
    }
}

/// Moves `bar` to a rounded percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn set_percent(bar: &ProgressBar, percent: f64) {
    bar.set_position(percent.clamp(0.0, 100.0).round() as u64);
}
