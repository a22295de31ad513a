//! Sample audio compiled into the binary.
//!
//! When a scan turns up nothing playable, the catalog falls back to these
//! tones so the whole player stays usable on a machine with no music.

use std::time::Duration;

use super::model::{Track, TrackSource};

struct Sample {
    name: &'static str,
    title: &'static str,
    bytes: &'static [u8],
    duration: Duration,
}

const SAMPLES: &[Sample] = &[
    Sample {
        name: "tone-a4",
        title: "Test Tone (A4)",
        bytes: include_bytes!("../../assets/tone_a4.wav"),
        duration: Duration::from_secs(2),
    },
    Sample {
        name: "tone-e5",
        title: "Test Tone (E5)",
        bytes: include_bytes!("../../assets/tone_e5.wav"),
        duration: Duration::from_secs(3),
    },
];

/// Look up the raw bytes for a bundled sample by registry name.
pub fn sample_bytes(name: &str) -> Option<&'static [u8]> {
    SAMPLES.iter().find(|s| s.name == name).map(|s| s.bytes)
}

/// The fallback catalog built from the sample registry.
pub fn tracks() -> Vec<Track> {
    SAMPLES
        .iter()
        .map(|s| Track {
            title: s.title.to_string(),
            artist: None,
            source: TrackSource::Bundled(s.name),
            duration: Some(s.duration),
            display: s.title.to_string(),
        })
        .collect()
}
