//! Source validation: resolve a `TrackSource` into readable, non-empty
//! media before the engine ever sees it.

use std::fs::File;
use std::io::{BufReader, Cursor, ErrorKind};

use crate::library::{TrackSource, sample_bytes};

use super::error::EngineError;
use super::types::MediaReader;

pub fn read_source(source: &TrackSource) -> Result<MediaReader, EngineError> {
    match source {
        TrackSource::Path(path) => {
            let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
                ErrorKind::NotFound => EngineError::NotFound(source.describe()),
                _ => EngineError::Unreadable(source.describe()),
            })?;
            if !meta.is_file() {
                return Err(EngineError::Unreadable(source.describe()));
            }
            if meta.len() == 0 {
                return Err(EngineError::Empty(source.describe()));
            }
            let file = File::open(path).map_err(|e| match e.kind() {
                ErrorKind::NotFound => EngineError::NotFound(source.describe()),
                _ => EngineError::Unreadable(source.describe()),
            })?;
            Ok(MediaReader::File(BufReader::new(file)))
        }
        TrackSource::Bundled(name) => {
            let bytes =
                sample_bytes(name).ok_or_else(|| EngineError::NotFound(source.describe()))?;
            if bytes.is_empty() {
                return Err(EngineError::Empty(source.describe()));
            }
            Ok(MediaReader::Bundled(Cursor::new(bytes)))
        }
    }
}
