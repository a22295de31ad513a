use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::engine::{Engine, EngineError};
use crate::library::Track;

use super::controller::{spawn_loader_thread, spawn_playback_thread};
use super::events::{PlayerCmd, PlayerEvent};

/// Handle to the playback thread.
///
/// Every method is a quick channel send; the playback thread applies them
/// one at a time, so callers never block on the engine.
pub struct Player {
    tx: Sender<PlayerCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Spawn the playback and loader threads for `catalog`.
    ///
    /// `engine_factory` runs once on the loader thread, which keeps the
    /// audio output device off the UI and playback threads.
    pub fn new<F>(catalog: Vec<Track>, events: mpsc::Sender<PlayerEvent>, engine_factory: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn Engine>, EngineError> + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<PlayerCmd>();
        let (load_tx, load_rx) = mpsc::channel();

        spawn_loader_thread(engine_factory, load_rx, cmd_tx.clone());
        let join = spawn_playback_thread(catalog, cmd_tx.clone(), cmd_rx, load_tx, events);

        Self {
            tx: cmd_tx,
            join: Mutex::new(Some(join)),
        }
    }

    /// Play the track at `index`, or the current one when `None`.
    pub fn play(&self, index: Option<usize>) {
        self.send(PlayerCmd::Play(index));
    }

    /// Play when idle, pause when playing, resume when paused.
    pub fn toggle(&self) {
        self.send(PlayerCmd::Toggle);
    }

    pub fn pause(&self) {
        self.send(PlayerCmd::Pause);
    }

    pub fn resume(&self) {
        self.send(PlayerCmd::Resume);
    }

    pub fn next(&self) {
        self.send(PlayerCmd::Next);
    }

    pub fn previous(&self) {
        self.send(PlayerCmd::Prev);
    }

    /// Seek the live session to `target`; ignored when nothing is loaded.
    pub fn seek(&self, target: Duration) {
        self.send(PlayerCmd::Seek(target));
    }

    /// Stop playback, release the session and join the playback thread.
    /// Safe to call more than once.
    pub fn shutdown(&self) {
        self.send(PlayerCmd::Shutdown);
        if let Ok(mut join) = self.join.lock() {
            if let Some(handle) = join.take() {
                let _ = handle.join();
            }
        }
    }

    fn send(&self, cmd: PlayerCmd) {
        let _ = self.tx.send(cmd);
    }
}
