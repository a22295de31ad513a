use std::path::PathBuf;
use std::time::Duration;

/// Where a track's audio bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSource {
    /// A file somewhere on disk.
    Path(PathBuf),
    /// A named entry in the compiled-in sample registry.
    Bundled(&'static str),
}

impl TrackSource {
    /// Human-readable form of the source, for logs and status lines.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(p) => p.display().to_string(),
            Self::Bundled(name) => format!("bundled:{name}"),
        }
    }
}

/// An immutable descriptor for one playable track.
#[derive(Debug, Clone)]
pub struct Track {
    pub title: String,
    pub artist: Option<String>,
    pub source: TrackSource,
    pub duration: Option<Duration>,
    pub display: String,
}
