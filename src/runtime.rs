//! Runtime wiring: logging, settings, the player threads, the MPRIS bridge
//! and terminal setup/teardown.

use std::env;
use std::path::Path;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::engine::{Engine, RodioEngine};
use crate::library;
use crate::mpris::{self, ControlCmd};
use crate::player::{Player, PlayerEvent};

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = logging::init();

    let settings = settings::load_settings();

    let dir = env::args().nth(1).unwrap_or_else(|| {
        env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| "Music".to_string())
    });

    let tracks = library::load(Path::new(&dir), &settings.library);
    tracing::info!(dir = %dir, count = tracks.len(), "catalog loaded");

    let (event_tx, event_rx) = mpsc::channel::<PlayerEvent>();
    let audio_settings = settings.audio.clone();
    let player = Player::new(tracks.clone(), event_tx, move || {
        RodioEngine::new(audio_settings).map(|e| Box::new(e) as Box<dyn Engine>)
    });

    let mut app = App::new(tracks);
    app.set_current_dir(dir);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &player,
        &mpris,
        &event_rx,
        &control_rx,
    );

    player.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
