//! rodio-backed engine: one `OutputStream` owned by the loader thread and
//! one `Sink` per session.

use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::config::AudioSettings;

use super::error::EngineError;
use super::types::{Engine, EngineSession, MediaReader, SessionEvent};

pub struct RodioEngine {
    stream: OutputStream,
    settings: AudioSettings,
}

impl RodioEngine {
    /// Open the default output device.
    pub fn new(settings: AudioSettings) -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);
        Ok(Self { stream, settings })
    }
}

impl Engine for RodioEngine {
    fn open(
        &self,
        media: MediaReader,
        duration_hint: Option<Duration>,
    ) -> Result<Box<dyn EngineSession>, EngineError> {
        let decoder = Decoder::new(media).map_err(|e| EngineError::Decode(e.to_string()))?;
        let duration = decoder.total_duration().or(duration_hint);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(decoder);
        sink.pause();
        sink.set_volume(self.settings.volume.clamp(0.0, 1.0));

        Ok(Box::new(RodioSession {
            sink,
            duration,
            playing: false,
            finished: false,
        }))
    }
}

struct RodioSession {
    sink: Sink,
    duration: Option<Duration>,
    playing: bool,
    finished: bool,
}

impl EngineSession for RodioSession {
    fn start(&mut self) -> Result<(), EngineError> {
        self.sink.play();
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.sink.pause();
        self.playing = false;
        Ok(())
    }

    fn seek_to(&mut self, target: Duration) -> Result<Duration, EngineError> {
        let target = match self.duration {
            Some(total) => target.min(total),
            None => target,
        };
        self.sink
            .try_seek(target)
            .map_err(|e| EngineError::Runtime(e.to_string()))?;
        Ok(target)
    }

    fn position(&mut self) -> Result<Duration, EngineError> {
        Ok(self.sink.get_pos())
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn poll_event(&mut self) -> Option<SessionEvent> {
        // An empty sink while started means the decoder ran out: natural
        // completion. rodio surfaces no richer runtime errors than this.
        if self.finished || !self.playing {
            return None;
        }
        if self.sink.empty() {
            self.finished = true;
            return Some(SessionEvent::Completed);
        }
        None
    }

    fn release(&mut self) -> Result<(), EngineError> {
        self.finished = true;
        self.sink.stop();
        Ok(())
    }
}
