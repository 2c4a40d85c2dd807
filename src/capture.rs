use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clipboard::{self, ClipboardContent};
use crate::entry::Entry;
use crate::error::{HistoryError, Result};
use crate::storage::HistoryStore;

/// Default auto-save polling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Added,
    Duplicate,
    Empty,
}

/// Store one clipboard read, skipping content already in the history.
pub fn capture_once(
    store: &mut HistoryStore,
    content: Option<ClipboardContent>,
) -> Result<CaptureOutcome> {
    match content {
        None => Ok(CaptureOutcome::Empty),
        Some(ClipboardContent::Text(text)) => {
            let entry = Entry::Text(text);
            if store.is_duplicate(&entry) {
                return Ok(CaptureOutcome::Duplicate);
            }
            store.add(entry)?;
            Ok(CaptureOutcome::Added)
        }
        Some(ClipboardContent::Image(bitmap)) => {
            if store.add_image(&bitmap)? {
                Ok(CaptureOutcome::Added)
            } else {
                Ok(CaptureOutcome::Duplicate)
            }
        }
    }
}

/// Read the system clipboard and store what it holds.
pub fn capture_clipboard(store: &mut HistoryStore) -> Result<CaptureOutcome> {
    let content =
        clipboard::read_clipboard().map_err(|e| HistoryError::Clipboard(format!("{:#}", e)))?;
    capture_once(store, content)
}

/// Poll `source` every `interval` and store new content until `cancel` fires.
/// Failed ticks are logged and the loop carries on.
pub async fn run_auto_save<F>(
    store: &mut HistoryStore,
    interval: Duration,
    cancel: CancellationToken,
    mut source: F,
) -> Result<()>
where
    F: FnMut() -> anyhow::Result<Option<ClipboardContent>>,
{
    info!("auto-save started (every {:?})", interval);
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("auto-save stopped");
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        let content = match source() {
            Ok(content) => content,
            Err(e) => {
                warn!("clipboard read failed: {:#}", e);
                continue;
            }
        };
        match capture_once(store, content) {
            Ok(CaptureOutcome::Added) => info!("captured entry #{}", store.count()),
            Ok(outcome) => debug!("nothing captured ({:?})", outcome),
            Err(e) => warn!("auto-save tick failed: {}", e),
        }
    }
}
