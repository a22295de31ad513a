//! Track catalog: track model, directory scanning and the bundled fallback.
//!
//! The catalog is an ordered `Vec<Track>` built once at startup. Its order
//! is the playback order.

use std::path::Path;

use crate::config::LibrarySettings;

mod bundled;
mod model;
mod scan;

pub use bundled::sample_bytes;
pub use model::{Track, TrackSource};
pub use scan::scan;

/// Build the catalog for `dir`, falling back to the bundled samples when the
/// scan finds nothing playable. An empty directory is not an error.
pub fn load(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let tracks = scan(dir, settings);
    if tracks.is_empty() {
        tracing::info!(dir = %dir.display(), "no playable files found, using bundled samples");
        bundled::tracks()
    } else {
        tracks
    }
}
