//! Player command and notification types.

use std::time::Duration;

use crate::engine::{EngineError, EngineSession};

/// Commands handled by the playback thread.
///
/// The public `Player` methods map 1:1 onto the user-intent variants.
/// `Loaded` and `Tick` are internal: they come from the loader thread and
/// the progress reporter.
pub(crate) enum PlayerCmd {
    Play(Option<usize>),
    Toggle,
    Pause,
    Resume,
    Next,
    Prev,
    Seek(Duration),
    Shutdown,
    Loaded {
        generation: u64,
        index: usize,
        result: Result<Box<dyn EngineSession>, EngineError>,
    },
    Tick {
        generation: u64,
    },
}

/// Notifications the playback thread emits for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The catalog is loaded; carries the display titles in playback order.
    CatalogReady(Vec<String>),
    /// A track became current, by user intent or auto-advance.
    TrackChanged {
        index: usize,
        title: String,
        duration: Option<Duration>,
    },
    /// Periodic or seek-initiated position report.
    Progress { position: Duration, text: String },
    /// The playing/paused flag flipped.
    PlayStateChanged(bool),
    /// A failure the user should see, reported once per attempt.
    UserError(String),
}
