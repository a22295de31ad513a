use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::engine::{Engine, EngineError, EngineSession, MediaReader, SessionEvent};
use crate::library::{Track, TrackSource};

use super::{Player, PlayerEvent};

/// Shared script and counters for the fake engine.
#[derive(Default)]
struct FakeState {
    opened: usize,
    released: usize,
    started: usize,
    open_delay: Option<Duration>,
    fail_open: bool,
    fail_start: bool,
    fail_pause: bool,
    pending_events: Vec<SessionEvent>,
}

struct FakeEngine {
    state: Arc<Mutex<FakeState>>,
}

impl Engine for FakeEngine {
    fn open(
        &self,
        _media: MediaReader,
        _duration_hint: Option<Duration>,
    ) -> Result<Box<dyn EngineSession>, EngineError> {
        let delay = self.state.lock().unwrap().open_delay;
        if let Some(d) = delay {
            std::thread::sleep(d);
        }
        let mut s = self.state.lock().unwrap();
        if s.fail_open {
            return Err(EngineError::Decode("scripted open failure".to_string()));
        }
        s.opened += 1;
        Ok(Box::new(FakeSession {
            state: self.state.clone(),
            playing: false,
            released: false,
            position: Duration::ZERO,
        }))
    }
}

struct FakeSession {
    state: Arc<Mutex<FakeState>>,
    playing: bool,
    released: bool,
    position: Duration,
}

impl EngineSession for FakeSession {
    fn start(&mut self) -> Result<(), EngineError> {
        let mut s = self.state.lock().unwrap();
        if s.fail_start {
            return Err(EngineError::Runtime("scripted start failure".to_string()));
        }
        s.started += 1;
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.playing = false;
        if self.state.lock().unwrap().fail_pause {
            return Err(EngineError::Runtime("scripted pause failure".to_string()));
        }
        Ok(())
    }

    fn seek_to(&mut self, target: Duration) -> Result<Duration, EngineError> {
        self.position = target;
        Ok(target)
    }

    fn position(&mut self) -> Result<Duration, EngineError> {
        Ok(self.position)
    }

    fn duration(&self) -> Option<Duration> {
        Some(Duration::from_secs(30))
    }

    fn poll_event(&mut self) -> Option<SessionEvent> {
        if !self.playing {
            return None;
        }
        self.state.lock().unwrap().pending_events.pop()
    }

    fn release(&mut self) -> Result<(), EngineError> {
        if !self.released {
            self.released = true;
            self.state.lock().unwrap().released += 1;
        }
        Ok(())
    }
}

fn make_catalog(n: usize) -> Vec<Track> {
    (0..n)
        .map(|i| Track {
            title: format!("Track {i}"),
            artist: None,
            source: TrackSource::Bundled("tone-a4"),
            duration: Some(Duration::from_secs(30)),
            display: format!("Track {i}"),
        })
        .collect()
}

fn start_player(
    catalog: Vec<Track>,
    state: Arc<Mutex<FakeState>>,
) -> (Player, Receiver<PlayerEvent>) {
    let (tx, rx) = mpsc::channel();
    let player = Player::new(catalog, tx, move || {
        Ok(Box::new(FakeEngine { state }) as Box<dyn Engine>)
    });
    (player, rx)
}

fn wait_for(rx: &Receiver<PlayerEvent>, pred: impl Fn(&PlayerEvent) -> bool) -> PlayerEvent {
    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        if let Ok(ev) = rx.recv_timeout(Duration::from_millis(100)) {
            if pred(&ev) {
                return ev;
            }
        }
    }
    panic!("timed out waiting for event");
}

fn drain(rx: &Receiver<PlayerEvent>) -> Vec<PlayerEvent> {
    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    events
}

#[test]
fn catalog_and_first_track_are_announced_on_startup() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let (player, rx) = start_player(make_catalog(3), state);

    let ready = wait_for(&rx, |e| matches!(e, PlayerEvent::CatalogReady(_)));
    let PlayerEvent::CatalogReady(titles) = ready else {
        unreachable!();
    };
    assert_eq!(titles, vec!["Track 0", "Track 1", "Track 2"]);

    wait_for(
        &rx,
        |e| matches!(e, PlayerEvent::TrackChanged { index: 0, .. }),
    );

    player.shutdown();
}

#[test]
fn play_starts_the_selected_track() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let (player, rx) = start_player(make_catalog(3), state.clone());

    player.play(Some(1));
    wait_for(
        &rx,
        |e| matches!(e, PlayerEvent::TrackChanged { index: 1, .. }),
    );
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(true)));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.opened, 1);
        assert_eq!(s.started, 1);
    }
    player.shutdown();
}

#[test]
fn toggle_cycles_playing_paused_playing() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let (player, rx) = start_player(make_catalog(2), state);

    player.toggle();
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(true)));

    player.toggle();
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(false)));

    player.toggle();
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(true)));

    player.shutdown();
}

#[test]
fn next_then_previous_returns_to_the_same_track() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let (player, rx) = start_player(make_catalog(3), state);

    player.play(Some(1));
    wait_for(
        &rx,
        |e| matches!(e, PlayerEvent::TrackChanged { index: 1, .. }),
    );

    player.next();
    wait_for(
        &rx,
        |e| matches!(e, PlayerEvent::TrackChanged { index: 2, .. }),
    );

    player.previous();
    wait_for(
        &rx,
        |e| matches!(e, PlayerEvent::TrackChanged { index: 1, .. }),
    );

    player.shutdown();
}

#[test]
fn next_applied_catalog_length_times_is_the_identity() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let (player, rx) = start_player(make_catalog(3), state);

    player.play(Some(0));
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(true)));

    for expected in [1usize, 2, 0] {
        player.next();
        wait_for(&rx, |e| {
            matches!(e, PlayerEvent::TrackChanged { index, .. } if *index == expected)
        });
    }

    player.shutdown();
}

#[test]
fn completion_of_the_last_track_wraps_to_the_first() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let (player, rx) = start_player(make_catalog(3), state.clone());

    player.play(Some(2));
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(true)));

    state
        .lock()
        .unwrap()
        .pending_events
        .push(SessionEvent::Completed);

    wait_for(
        &rx,
        |e| matches!(e, PlayerEvent::TrackChanged { index: 0, .. }),
    );
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(true)));

    player.shutdown();
}

#[test]
fn seek_reports_the_new_position_without_waiting_for_a_tick() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let (player, rx) = start_player(make_catalog(1), state);

    player.play(None);
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(true)));

    let target = Duration::from_secs(12);
    player.seek(target);
    let progress = wait_for(&rx, |e| {
        matches!(e, PlayerEvent::Progress { position, .. } if *position == target)
    });
    let PlayerEvent::Progress { text, .. } = progress else {
        unreachable!();
    };
    assert_eq!(text, "00:12");

    player.shutdown();
}

#[test]
fn missing_file_reports_one_error_and_leaves_no_session() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let catalog = vec![Track {
        title: "Ghost".to_string(),
        artist: None,
        source: TrackSource::Path("/definitely/not/here.mp3".into()),
        duration: None,
        display: "Ghost".to_string(),
    }];
    let (player, rx) = start_player(catalog, state.clone());

    player.play(None);
    wait_for(&rx, |e| matches!(e, PlayerEvent::UserError(_)));

    std::thread::sleep(Duration::from_millis(300));
    let events = drain(&rx);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, PlayerEvent::PlayStateChanged(true)))
    );
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, PlayerEvent::UserError(_))),
        "error must be reported exactly once"
    );
    assert_eq!(state.lock().unwrap().opened, 0);

    player.shutdown();
}

#[test]
fn racing_play_requests_leave_exactly_one_live_session() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    state.lock().unwrap().open_delay = Some(Duration::from_millis(150));
    let (player, rx) = start_player(make_catalog(2), state.clone());

    // Both toggles land before the first open finishes, so both behave as
    // play requests; the first loaded session must be discarded.
    player.toggle();
    player.toggle();

    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(true)));
    // Give the superseded session time to come back and be released.
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        {
            let s = state.lock().unwrap();
            if s.opened == 2 {
                assert_eq!(s.released, 1);
                assert_eq!(s.started, 1);
                break;
            }
        }
        assert!(Instant::now() < deadline, "second open never finished");
        std::thread::sleep(Duration::from_millis(20));
    }

    player.shutdown();
    assert_eq!(state.lock().unwrap().released, 2);
}

#[test]
fn shutdown_twice_releases_everything_and_stops_ticks() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let (player, rx) = start_player(make_catalog(1), state.clone());

    player.play(None);
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(true)));

    player.shutdown();
    player.shutdown();

    {
        let s = state.lock().unwrap();
        assert_eq!(s.opened, s.released);
    }

    drain(&rx);
    std::thread::sleep(Duration::from_millis(1200));
    assert!(
        !drain(&rx)
            .iter()
            .any(|e| matches!(e, PlayerEvent::Progress { .. }))
    );
}

#[test]
fn empty_catalog_play_reports_no_songs() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let (player, rx) = start_player(Vec::new(), state.clone());

    player.play(None);
    let err = wait_for(&rx, |e| matches!(e, PlayerEvent::UserError(_)));
    assert_eq!(
        err,
        PlayerEvent::UserError("No songs available".to_string())
    );
    assert_eq!(state.lock().unwrap().opened, 0);

    player.shutdown();
}

#[test]
fn out_of_range_play_request_is_ignored() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let (player, rx) = start_player(make_catalog(2), state.clone());

    wait_for(&rx, |e| matches!(e, PlayerEvent::CatalogReady(_)));
    player.play(Some(99));

    std::thread::sleep(Duration::from_millis(300));
    assert_eq!(state.lock().unwrap().opened, 0);
    assert!(
        !drain(&rx)
            .iter()
            .any(|e| matches!(e, PlayerEvent::UserError(_)))
    );

    player.shutdown();
}

#[test]
fn pause_failure_still_reports_paused() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    state.lock().unwrap().fail_pause = true;
    let (player, rx) = start_player(make_catalog(1), state);

    player.play(None);
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(true)));

    player.pause();
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(false)));

    player.shutdown();
}

#[test]
fn resume_failure_reports_error_and_stays_paused() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let (player, rx) = start_player(make_catalog(1), state.clone());

    player.play(None);
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(true)));
    player.pause();
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(false)));

    state.lock().unwrap().fail_start = true;
    player.resume();
    wait_for(&rx, |e| matches!(e, PlayerEvent::UserError(_)));

    std::thread::sleep(Duration::from_millis(200));
    assert!(
        !drain(&rx)
            .iter()
            .any(|e| matches!(e, PlayerEvent::PlayStateChanged(true)))
    );

    player.shutdown();
}

#[test]
fn runtime_error_halts_playback_without_advancing() {
    let state = Arc::new(Mutex::new(FakeState::default()));
    let (player, rx) = start_player(make_catalog(3), state.clone());

    player.play(Some(0));
    wait_for(&rx, |e| matches!(e, PlayerEvent::PlayStateChanged(true)));

    state
        .lock()
        .unwrap()
        .pending_events
        .push(SessionEvent::Errored(EngineError::Runtime(
            "stream died".to_string(),
        )));

    wait_for(&rx, |e| matches!(e, PlayerEvent::UserError(_)));

    std::thread::sleep(Duration::from_millis(300));
    let events = drain(&rx);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, PlayerEvent::TrackChanged { .. })),
        "a runtime error must not auto-advance"
    );
    {
        let s = state.lock().unwrap();
        assert_eq!(s.opened, s.released, "session must be torn down");
    }

    player.shutdown();
}
