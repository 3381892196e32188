//! In-flight transfer state and the event stream handed to callers.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::record::CachedItemRecord;

/// Transient progress tracker for one in-flight acquisition.
///
/// Never persisted. Removed from the index when the transfer completes or
/// fails, at which point progress is undefined again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferState {
    /// Always true while the state is registered.
    pub in_progress: bool,
    /// Percentage in `[0, 100]`; never decreases while in progress.
    pub progress: f64,
}

impl TransferState {
    pub(super) fn started() -> Self {
        Self {
            in_progress: true,
            progress: 0.0,
        }
    }

    /// Raises progress to `percent` if that is an advance.
    ///
    /// Returns the new value when it changed.
    pub(super) fn advance(&mut self, percent: f64) -> Option<f64> {
        let percent = percent.clamp(0.0, 100.0);
        if percent > self.progress {
            self.progress = percent;
            Some(percent)
        } else {
            None
        }
    }
}

/// Computes `written / expected * 100`, clamped to `[0, 100]`.
///
/// Returns `None` when the expected total is unknown or zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_percent(written: u64, expected: Option<u64>) -> Option<f64> {
    let expected = expected.filter(|total| *total > 0)?;
    Some((written as f64 / expected as f64 * 100.0).clamp(0.0, 100.0))
}

/// One observation of an acquisition.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    /// Progress advanced to this percentage. Only emitted for sources with a
    /// known total.
    Progress(f64),
    /// The payload and metadata are committed and the item is cached.
    Completed(CachedItemRecord),
    /// The transfer failed; the item is not cached.
    Failed {
        /// Error description for diagnostics.
        reason: String,
    },
}

impl TransferEvent {
    /// Returns true for `Completed` and `Failed`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}

/// Terminal result of an acquisition.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    /// The item is cached.
    Completed(CachedItemRecord),
    /// The item is not cached.
    Failed {
        /// Error description for diagnostics.
        reason: String,
    },
}

impl TransferOutcome {
    /// Returns true if the item was cached.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Handle to a started acquisition.
///
/// A finite, non-restartable [`Stream`] of [`TransferEvent`]s: zero or more
/// `Progress` events followed by exactly one terminal event. Dropping the
/// handle does not stop the transfer.
#[derive(Debug)]
pub struct TransferHandle {
    id: String,
    events: mpsc::UnboundedReceiver<TransferEvent>,
    task: JoinHandle<()>,
}

impl TransferHandle {
    pub(super) fn new(
        id: String,
        events: mpsc::UnboundedReceiver<TransferEvent>,
        task: JoinHandle<()>,
    ) -> Self {
        Self { id, events, task }
    }

    /// Identifier being transferred.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Drains the remaining events and returns the terminal outcome.
    pub async fn finish(mut self) -> TransferOutcome {
        let mut outcome = None;
        while let Some(event) = self.events.recv().await {
            match event {
                TransferEvent::Progress(_) => {}
                TransferEvent::Completed(record) => {
                    outcome = Some(TransferOutcome::Completed(record));
                }
                TransferEvent::Failed { reason } => {
                    outcome = Some(TransferOutcome::Failed { reason });
                }
            }
        }

        if let Err(join_error) = (&mut self.task).await {
            return TransferOutcome::Failed {
                reason: format!("transfer task aborted: {join_error}"),
            };
        }

        outcome.unwrap_or_else(|| TransferOutcome::Failed {
            reason: "transfer ended without a result".to_string(),
        })
    }
}

impl Stream for TransferHandle {
    type Item = TransferEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_recv(cx)
    }
}
