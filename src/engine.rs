//! Audio engine seam: errors, traits and the rodio implementation.
//!
//! The playback code only ever talks to the `Engine`/`EngineSession`
//! traits; tests substitute an in-memory engine behind the same seam.

mod error;
mod rodio;
mod source;
mod types;

pub use self::rodio::RodioEngine;
pub use error::EngineError;
pub use source::read_source;
pub use types::{Engine, EngineSession, MediaReader, SessionEvent};
