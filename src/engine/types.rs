//! Engine seam types: the engine/session traits, session events and the
//! validated media reader handed between them.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::time::Duration;

use super::error::EngineError;

/// Something the active session reports back on its own.
#[derive(Debug)]
pub enum SessionEvent {
    /// The track finished naturally.
    Completed,
    /// Decoding or output failed mid-playback.
    Errored(EngineError),
}

/// A single audio-decode-and-output facility.
///
/// `open` is the whole slow half of starting a track: decoding headers and
/// attaching the source to the output. It runs on the loader thread, never
/// on the playback or UI thread.
pub trait Engine {
    fn open(
        &self,
        media: MediaReader,
        duration_hint: Option<Duration>,
    ) -> Result<Box<dyn EngineSession>, EngineError>;
}

/// One live playback session, bound to exactly one track.
///
/// At most one session exists at a time; the playback thread releases the
/// old one before a replacement is installed.
pub trait EngineSession: Send {
    fn start(&mut self) -> Result<(), EngineError>;

    fn pause(&mut self) -> Result<(), EngineError>;

    /// Seek to `target`, clamped to the track length when it is known.
    /// Returns the position actually applied.
    fn seek_to(&mut self, target: Duration) -> Result<Duration, EngineError>;

    fn position(&mut self) -> Result<Duration, EngineError>;

    fn duration(&self) -> Option<Duration>;

    /// Drain at most one pending completion/error event.
    fn poll_event(&mut self) -> Option<SessionEvent>;

    /// Stop playback and free the output resources. Called exactly once
    /// before the session is dropped; failures are the caller's to log.
    fn release(&mut self) -> Result<(), EngineError>;
}

/// Validated, ready-to-decode audio bytes.
pub enum MediaReader {
    File(BufReader<File>),
    Bundled(Cursor<&'static [u8]>),
}

impl Read for MediaReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File(r) => r.read(buf),
            Self::Bundled(r) => r.read(buf),
        }
    }
}

impl Seek for MediaReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::File(r) => r.seek(pos),
            Self::Bundled(r) => r.seek(pos),
        }
    }
}
