use thiserror::Error;

/// Failures from source validation and the audio engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The source does not exist (missing file or unknown bundled name).
    #[error("source not found: {0}")]
    NotFound(String),

    /// The source exists but cannot be read.
    #[error("cannot read source: {0}")]
    Unreadable(String),

    /// The source exists but holds no bytes.
    #[error("source is empty: {0}")]
    Empty(String),

    /// The decoder rejected the source.
    #[error("cannot decode audio: {0}")]
    Decode(String),

    /// No usable audio output device.
    #[error("audio output unavailable: {0}")]
    Output(String),

    /// A failure during active playback.
    #[error("playback failed: {0}")]
    Runtime(String),
}

impl EngineError {
    /// Short message suitable for the status line.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) | Self::Unreadable(_) => "Cannot access song file".to_string(),
            Self::Empty(_) => "Song file is empty".to_string(),
            Self::Decode(_) => "Error preparing song".to_string(),
            Self::Output(_) => "No audio output available".to_string(),
            Self::Runtime(_) => "Media playback error".to_string(),
        }
    }
}
