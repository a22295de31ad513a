use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MediaKeyCode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config::Settings;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{Player, PlayerEvent};
use crate::ui;

/// Main terminal event loop: folds in playback notifications, draws the
/// screen, and maps keys and remote intents onto player operations.
/// Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &Settings,
    app: &mut App,
    player: &Player,
    mpris: &MprisHandle,
    event_rx: &Receiver<PlayerEvent>,
    control_rx: &Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_mpris_playing = app.playing;
    let mut last_mpris_index: Option<usize> = None;

    loop {
        // Fold in playback notifications first so the frame reflects them.
        while let Ok(ev) = event_rx.try_recv() {
            app.apply(ev);
        }
        app.expire_status();

        if app.playing != last_mpris_playing || app.now_playing != last_mpris_index {
            mpris.set_playback(app.playing);
            mpris.set_track(app.now_playing.and_then(|i| app.tracks.get(i)));
            last_mpris_playing = app.playing;
            last_mpris_index = app.now_playing;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            match cmd {
                ControlCmd::Quit => return Ok(()),
                ControlCmd::Play => {
                    if !app.playing {
                        player.toggle();
                    }
                }
                ControlCmd::Pause => {
                    if app.playing {
                        player.pause();
                    }
                }
                ControlCmd::PlayPause => player.toggle(),
                ControlCmd::Next => player.next(),
                ControlCmd::Prev => player.previous(),
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(key, settings, app, player) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press; returns true when the app should quit.
fn handle_key(key: KeyEvent, settings: &Settings, app: &mut App, player: &Player) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Char('g') => app.selected = 0,
        KeyCode::Char('G') => {
            if app.has_tracks() {
                app.selected = app.tracks.len() - 1;
            }
        }
        KeyCode::Enter => {
            if app.has_tracks() {
                player.play(Some(app.selected));
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => player.toggle(),
        KeyCode::Char('l') => player.next(),
        KeyCode::Char('h') => player.previous(),
        KeyCode::Char('L') => {
            let step = Duration::from_secs(settings.controls.seek_seconds);
            player.seek(app.position.saturating_add(step));
        }
        KeyCode::Char('H') => {
            let step = Duration::from_secs(settings.controls.seek_seconds);
            player.seek(app.position.saturating_sub(step));
        }
        KeyCode::Media(MediaKeyCode::Play) => player.resume(),
        KeyCode::Media(MediaKeyCode::Pause) => player.pause(),
        KeyCode::Media(MediaKeyCode::PlayPause) => player.toggle(),
        KeyCode::Media(MediaKeyCode::TrackNext) => player.next(),
        KeyCode::Media(MediaKeyCode::TrackPrevious) => player.previous(),
        _ => {}
    }
    false
}
