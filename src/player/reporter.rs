//! Progress reporter: a cancellable once-per-second tick source.
//!
//! Each tick is just a channel send; the playback thread does the actual
//! position read, so a tick can never block on the engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use super::events::PlayerCmd;

/// Fixed reporting cadence.
pub(crate) const PROGRESS_PERIOD: Duration = Duration::from_millis(1000);

/// Format a `Duration` as `MM:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Handle to a periodic tick thread bound to one session generation.
///
/// Cancelling means "stop rescheduling": a tick already in flight may still
/// arrive, and the generation check on the playback thread discards it.
pub(crate) struct Reporter {
    cancelled: Arc<AtomicBool>,
}

impl Reporter {
    pub fn spawn(tx: Sender<PlayerCmd>, generation: u64) -> Self {
        Self::spawn_with_period(tx, generation, PROGRESS_PERIOD)
    }

    fn spawn_with_period(tx: Sender<PlayerCmd>, generation: u64, period: Duration) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(period);
                if flag.load(Ordering::Relaxed) {
                    break;
                }
                if tx.send(PlayerCmd::Tick { generation }).is_err() {
                    break;
                }
            }
        });
        Self { cancelled }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        self.cancel();
    }
}
