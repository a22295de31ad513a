//! The playback thread: owns the catalog, the playback state and the single
//! live session, and applies every transition one command at a time.
//!
//! Slow session construction runs on a separate loader thread; results come
//! back tagged with a generation number, and a result whose generation is no
//! longer current is released instead of installed. That keeps two racing
//! play requests from ever producing two live sessions.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::engine::{Engine, EngineError, EngineSession, SessionEvent, read_source};
use crate::library::Track;

use super::events::{PlayerCmd, PlayerEvent};
use super::reporter::{Reporter, format_mmss};
use super::state::PlaybackState;

/// How long the playback thread waits for a command before polling the
/// session for completion/error events.
const POLL_PERIOD: Duration = Duration::from_millis(200);

pub(super) fn spawn_playback_thread(
    catalog: Vec<Track>,
    cmd_tx: Sender<PlayerCmd>,
    cmd_rx: Receiver<PlayerCmd>,
    load_tx: Sender<LoadRequest>,
    events: Sender<PlayerEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut controller = Controller::new(catalog, cmd_tx, load_tx, events);
        controller.announce_catalog();

        loop {
            match cmd_rx.recv_timeout(POLL_PERIOD) {
                Ok(cmd) => {
                    if !controller.handle(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => controller.poll_session(),
                Err(RecvTimeoutError::Disconnected) => {
                    controller.shutdown();
                    break;
                }
            }
        }
    })
}

/// A track handed to the loader thread, tagged with the generation of the
/// play request that asked for it.
pub(super) struct LoadRequest {
    pub generation: u64,
    pub index: usize,
    pub track: Track,
}

/// The loader thread builds the engine once, then serves open requests.
///
/// Building the engine here keeps the audio output device off the UI and
/// playback threads; a failed build answers every request with an output
/// error instead of killing the app.
pub(super) fn spawn_loader_thread<F>(
    engine_factory: F,
    load_rx: Receiver<LoadRequest>,
    cmd_tx: Sender<PlayerCmd>,
) -> JoinHandle<()>
where
    F: FnOnce() -> Result<Box<dyn Engine>, EngineError> + Send + 'static,
{
    thread::spawn(move || {
        let engine = match engine_factory() {
            Ok(e) => Some(e),
            Err(e) => {
                error!(error = %e, "audio engine unavailable");
                None
            }
        };

        for req in load_rx {
            let result = match engine.as_deref() {
                Some(engine) => open_track(engine, &req.track),
                None => Err(EngineError::Output("audio engine unavailable".to_string())),
            };
            let msg = PlayerCmd::Loaded {
                generation: req.generation,
                index: req.index,
                result,
            };
            if cmd_tx.send(msg).is_err() {
                break;
            }
        }
    })
}

/// Validate the track source, then decode it and attach it to the output.
fn open_track(engine: &dyn Engine, track: &Track) -> Result<Box<dyn EngineSession>, EngineError> {
    let media = read_source(&track.source)?;
    engine.open(media, track.duration)
}

struct Controller {
    catalog: Vec<Track>,
    state: PlaybackState,
    session: Option<Box<dyn EngineSession>>,
    generation: u64,
    reporter: Option<Reporter>,
    cmd_tx: Sender<PlayerCmd>,
    load_tx: Sender<LoadRequest>,
    events: Sender<PlayerEvent>,
}

impl Controller {
    fn new(
        catalog: Vec<Track>,
        cmd_tx: Sender<PlayerCmd>,
        load_tx: Sender<LoadRequest>,
        events: Sender<PlayerEvent>,
    ) -> Self {
        let current = if catalog.is_empty() { None } else { Some(0) };
        Self {
            catalog,
            state: PlaybackState {
                current,
                playing: false,
            },
            session: None,
            generation: 0,
            reporter: None,
            cmd_tx,
            load_tx,
            events,
        }
    }

    /// Tell the UI what was loaded and pre-select the first track so the
    /// screen shows a title before anything plays.
    fn announce_catalog(&self) {
        let titles = self.catalog.iter().map(|t| t.display.clone()).collect();
        self.emit(PlayerEvent::CatalogReady(titles));

        if let Some(index) = self.state.current {
            let track = &self.catalog[index];
            self.emit(PlayerEvent::TrackChanged {
                index,
                title: track.display.clone(),
                duration: track.duration,
            });
        }
    }

    /// Apply one command; returns false when the thread should stop.
    fn handle(&mut self, cmd: PlayerCmd) -> bool {
        match cmd {
            PlayerCmd::Play(index) => self.play(index),
            PlayerCmd::Toggle => self.toggle(),
            PlayerCmd::Pause => self.pause(),
            PlayerCmd::Resume => self.resume(),
            PlayerCmd::Next => self.next(),
            PlayerCmd::Prev => self.previous(),
            PlayerCmd::Seek(target) => self.seek(target),
            PlayerCmd::Loaded {
                generation,
                index,
                result,
            } => self.commit_loaded(generation, index, result),
            PlayerCmd::Tick { generation } => self.tick(generation),
            PlayerCmd::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        true
    }

    fn play(&mut self, requested: Option<usize>) {
        if self.catalog.is_empty() {
            self.emit(PlayerEvent::UserError("No songs available".to_string()));
            return;
        }
        let index = match requested {
            Some(i) if i >= self.catalog.len() => {
                warn!(index = i, len = self.catalog.len(), "play request out of range");
                return;
            }
            Some(i) => i,
            None => self.state.current.unwrap_or(0),
        };

        self.teardown_session();

        self.generation += 1;
        self.state.current = Some(index);

        let track = self.catalog[index].clone();
        debug!(
            index,
            source = %track.source.describe(),
            generation = self.generation,
            "loading track"
        );
        self.emit(PlayerEvent::TrackChanged {
            index,
            title: track.display.clone(),
            duration: track.duration,
        });

        let request = LoadRequest {
            generation: self.generation,
            index,
            track,
        };
        if self.load_tx.send(request).is_err() {
            error!("loader thread is gone");
            self.emit(PlayerEvent::UserError("Media playback error".to_string()));
        }
    }

    fn toggle(&mut self) {
        if self.session.is_none() {
            self.play(None);
        } else if self.state.playing {
            self.pause();
        } else {
            self.resume();
        }
    }

    fn pause(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(e) = session.pause() {
            // The public state still reflects the user's intent.
            warn!(error = %e, "engine pause failed");
        }
        self.state.playing = false;
        self.stop_reporter();
        self.emit(PlayerEvent::PlayStateChanged(false));
    }

    fn resume(&mut self) {
        if self.state.playing {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.start() {
            Ok(()) => {
                self.state.playing = true;
                self.reporter = Some(Reporter::spawn(self.cmd_tx.clone(), self.generation));
                self.emit(PlayerEvent::PlayStateChanged(true));
            }
            Err(e) => {
                error!(error = %e, "engine resume failed");
                self.emit(PlayerEvent::UserError(e.user_message()));
            }
        }
    }

    fn next(&mut self) {
        if self.catalog.is_empty() {
            return;
        }
        let n = self.catalog.len();
        let cur = self.state.current.unwrap_or(0);
        self.play(Some((cur + 1) % n));
    }

    fn previous(&mut self) {
        if self.catalog.is_empty() {
            return;
        }
        let n = self.catalog.len();
        let cur = self.state.current.unwrap_or(0);
        self.play(Some((cur + n - 1) % n));
    }

    fn seek(&mut self, target: Duration) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.seek_to(target) {
            Ok(applied) => {
                // Update the display right away instead of waiting for the
                // next reporter tick.
                self.emit(PlayerEvent::Progress {
                    position: applied,
                    text: format_mmss(applied),
                });
            }
            Err(e) => warn!(error = %e, "seek failed"),
        }
    }

    fn commit_loaded(
        &mut self,
        generation: u64,
        index: usize,
        result: Result<Box<dyn EngineSession>, EngineError>,
    ) {
        if generation != self.generation {
            // A newer play request superseded this one while it was being
            // prepared.
            if let Ok(mut session) = result {
                debug!(generation, "releasing superseded session");
                if let Err(e) = session.release() {
                    warn!(error = %e, "failed to release superseded session");
                }
            }
            return;
        }

        match result {
            Ok(mut session) => {
                if let Err(e) = session.start() {
                    error!(index, error = %e, "failed to start playback");
                    if let Err(e) = session.release() {
                        warn!(error = %e, "failed to release session");
                    }
                    self.emit(PlayerEvent::UserError(e.user_message()));
                    return;
                }
                info!(index, "playback started");
                self.session = Some(session);
                self.state.playing = true;
                self.reporter = Some(Reporter::spawn(self.cmd_tx.clone(), self.generation));
                self.emit(PlayerEvent::PlayStateChanged(true));
            }
            Err(e) => {
                error!(index, error = %e, "failed to open track");
                self.emit(PlayerEvent::UserError(e.user_message()));
            }
        }
    }

    fn tick(&mut self, generation: u64) {
        if generation != self.generation || !self.state.playing {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.position() {
            Ok(position) => {
                self.emit(PlayerEvent::Progress {
                    position,
                    text: format_mmss(position),
                });
            }
            Err(e) => debug!(error = %e, "position read failed, skipping tick"),
        }
    }

    /// Check the live session for a completion or error it reported on its
    /// own since the last command.
    fn poll_session(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(event) = session.poll_event() else {
            return;
        };
        match event {
            SessionEvent::Completed => {
                debug!("track completed, advancing");
                self.next();
            }
            SessionEvent::Errored(e) => {
                error!(error = %e, "engine reported a playback error");
                self.teardown_session();
                self.emit(PlayerEvent::UserError(e.user_message()));
            }
        }
    }

    fn teardown_session(&mut self) {
        self.stop_reporter();
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.release() {
                warn!(error = %e, "failed to release session");
            }
        }
        if self.state.playing {
            self.state.playing = false;
            self.emit(PlayerEvent::PlayStateChanged(false));
        }
    }

    fn stop_reporter(&mut self) {
        if let Some(reporter) = self.reporter.take() {
            reporter.cancel();
        }
    }

    fn shutdown(&mut self) {
        debug!("playback thread shutting down");
        self.teardown_session();
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }
}
