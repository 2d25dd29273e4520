//! Progress reporting for merge sessions.
//!
//! The session calls [`ProgressObserver::on_progress`] synchronously at fixed
//! checkpoints: before each package (`i / N * 80` percent), then at 90 and
//! 100. Observers only ever see a percentage and a message, never session
//! state.

use std::sync::mpsc::Sender;

/// Percentage reported once all packages are merged, before naming.
pub const FINALIZING_PERCENT: f64 = 90.0;

/// Percentage reported when the merge is complete.
pub const COMPLETE_PERCENT: f64 = 100.0;

/// Share of the progress range spent on per-package work.
pub const PACKAGE_SPAN_PERCENT: f64 = 80.0;

/// Receives merge checkpoints.
pub trait ProgressObserver {
    /// Called with `percent` in `0.0..=100.0` and a short status message.
    fn on_progress(&mut self, percent: f64, message: &str);
}

impl<F: FnMut(f64, &str)> ProgressObserver for F {
    fn on_progress(&mut self, percent: f64, message: &str) {
        self(percent, message);
    }
}

/// Observer that ignores every checkpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _percent: f64, _message: &str) {}
}

/// A checkpoint as an owned value, for channel-based observers.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressEvent {
    pub percent: f64,
    pub message: String,
}

/// Forwards checkpoints over a channel. A disconnected receiver is ignored
/// so a closed UI never stalls the merge.
impl ProgressObserver for Sender<ProgressEvent> {
    fn on_progress(&mut self, percent: f64, message: &str) {
        let _ = self.send(ProgressEvent {
            percent,
            message: message.to_owned(),
        });
    }
}

/// Percent reported before package `index` (zero-based) of `total`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn package_percent(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (index as f64 / total as f64) * PACKAGE_SPAN_PERCENT
}
