// Integration tests for timeline playback and the session around it

use algoscope::player::{
    ManualClock, PlaybackState, Player, PlayerConfig, Scheduler, Speed, Tick, TickMode,
};
use algoscope::recorder::{record, AlgorithmId, Params, RecordConfig};
use algoscope::session::Session;
use algoscope::snapshot::Timeline;
use std::time::Duration;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn bubble_timeline() -> Timeline {
    record(
        AlgorithmId::BubbleSort,
        &AlgorithmId::BubbleSort.default_params(),
        &RecordConfig::default(),
    )
}

fn loaded_player(config: PlayerConfig) -> Player {
    let mut player = Player::new(config);
    player.load(bubble_timeline());
    player
}

fn session(algorithm: AlgorithmId) -> Session<ManualClock> {
    Session::new(
        ManualClock::new(),
        algorithm,
        algorithm.default_params(),
        RecordConfig::default(),
        PlayerConfig::default(),
        Scheduler::default(),
    )
}

#[test]
fn test_load_starts_paused_at_first_snapshot() {
    let player = loaded_player(PlayerConfig::default());
    assert_eq!(player.state(), PlaybackState::Paused);
    assert_eq!(player.position(), 0);
    assert_eq!(player.elapsed(), Duration::ZERO);
    assert!(player.len() > 10);
}

#[test]
fn test_unloaded_player_is_idle() {
    let mut player = Player::new(PlayerConfig::default());
    player.play();
    player.step_forward();
    assert_eq!(player.state(), PlaybackState::Idle);
    assert!(player.current_snapshot().is_none());

    player.load(bubble_timeline());
    assert!(player.unload().is_some());
    assert_eq!(player.state(), PlaybackState::Idle);
}

#[test]
fn test_seek_end_is_idempotent() {
    let mut player = loaded_player(PlayerConfig::default());
    player.seek_end();
    let first = player.current_snapshot().cloned();
    player.seek_end();
    assert_eq!(player.current_snapshot().cloned(), first);
    assert_eq!(player.position(), player.len() - 1);
    assert_eq!(player.state(), PlaybackState::Ended);
}

#[test]
fn test_position_clamps_at_both_ends() {
    let mut player = loaded_player(PlayerConfig::default());
    player.step_back();
    assert_eq!(player.position(), 0);
    assert_eq!(player.state(), PlaybackState::Paused);

    player.seek(usize::MAX);
    assert_eq!(player.position(), player.len() - 1);
    player.step_forward();
    assert_eq!(player.position(), player.len() - 1);
    assert_eq!(player.state(), PlaybackState::Ended);

    player.step_back();
    assert_eq!(player.position(), player.len() - 2);
    assert_eq!(player.state(), PlaybackState::Paused);
}

#[test]
fn test_play_at_end_stays_ended() {
    let mut player = loaded_player(PlayerConfig::default());
    player.seek_end();
    player.play();
    assert_eq!(player.state(), PlaybackState::Ended);
    assert!(!player.is_playing());
}

#[test]
fn test_speed_change_keeps_visible_snapshot() {
    let mut player = loaded_player(PlayerConfig::default());
    player.play();
    player.tick(ms(1000));
    assert_eq!(player.position(), 2);

    player.set_speed(Speed::new(4.0));
    assert_eq!(player.position(), 2);
    assert_eq!(player.step_delay(), ms(100));

    player.tick(ms(100));
    assert_eq!(player.position(), 3);
}

#[test]
fn test_slowing_down_keeps_visible_snapshot() {
    let mut player = loaded_player(PlayerConfig::default());
    player.play();
    player.tick(ms(1300));
    assert_eq!(player.position(), 3);

    player.set_speed(Speed::new(0.5));
    assert_eq!(player.position(), 3);
    player.tick(ms(10));
    assert_eq!(player.position(), 3);
}

#[test]
fn test_pause_freezes_elapsed_time() {
    let mut player = loaded_player(PlayerConfig::default());
    player.play();
    player.tick(ms(500));
    player.pause();
    let frozen = player.elapsed();
    player.tick(ms(5000));
    assert_eq!(player.elapsed(), frozen);
    assert_eq!(player.position(), 1);
    assert_eq!(player.state(), PlaybackState::Paused);
}

#[test]
fn test_fixed_index_mode_advances_one_step_per_delay() {
    let mut player = loaded_player(PlayerConfig {
        mode: TickMode::FixedIndex,
        ..PlayerConfig::default()
    });
    player.play();
    player.tick(ms(399));
    assert_eq!(player.position(), 0);
    player.tick(ms(1));
    assert_eq!(player.position(), 1);
    player.tick(ms(800));
    assert_eq!(player.position(), 3);
}

#[test]
fn test_session_pump_advances_with_the_clock() {
    let mut session = session(AlgorithmId::BubbleSort);
    assert!(!session.is_ticking());
    session.play();
    assert!(session.is_ticking());

    session.clock().advance(ms(10));
    assert!(!session.pump());

    session.clock().advance(ms(390));
    assert!(session.pump());
    assert_eq!(session.player().position(), 1);
}

#[test]
fn test_session_drops_stale_ticks() {
    let mut session = session(AlgorithmId::BubbleSort);
    session.play();
    let stale = session.tick_token().expect("playing session has a token");
    session.pause();
    session.play();
    assert_ne!(session.tick_token(), Some(stale));

    let delivered = session.deliver(Tick {
        dt: ms(2000),
        token: stale,
    });
    assert!(!delivered);
    assert_eq!(session.player().position(), 0);
    assert_eq!(session.player().elapsed(), Duration::ZERO);
}

#[test]
fn test_manual_step_cancels_ticking() {
    let mut session = session(AlgorithmId::BubbleSort);
    session.play();
    session.step_forward();
    assert!(!session.is_ticking());
    assert_eq!(session.player().state(), PlaybackState::Paused);
    assert_eq!(session.player().position(), 1);

    session.clock().advance(ms(5000));
    assert!(!session.pump());
    assert_eq!(session.player().position(), 1);
}

#[test]
fn test_select_replaces_timeline_and_stops_playback() {
    let mut session = session(AlgorithmId::BubbleSort);
    session.set_speed(Speed::new(4.0));
    session.set_tick_mode(TickMode::FixedIndex);
    session.play();
    session.clock().advance(ms(300));
    session.pump();
    assert!(session.player().position() > 0);

    session.select(AlgorithmId::Gcd);
    assert!(!session.is_ticking());
    assert_eq!(session.algorithm(), AlgorithmId::Gcd);
    assert_eq!(session.player().position(), 0);
    assert_eq!(session.player().state(), PlaybackState::Paused);
    assert_eq!(
        session.timeline().map(|t| t.algorithm()),
        Some(AlgorithmId::Gcd)
    );
    assert_eq!(session.player().speed(), Speed::new(4.0));
    assert_eq!(session.player().mode(), TickMode::FixedIndex);
}

#[test]
fn test_ticking_to_the_end_self_cancels() {
    let mut session = session(AlgorithmId::Gcd);
    session.play();
    session.clock().advance(Duration::from_secs(3600));
    assert!(session.pump());
    assert_eq!(session.player().state(), PlaybackState::Ended);
    assert!(!session.is_ticking());
    assert!(session.timeout().is_none());
}

#[test]
fn test_algorithm_cycle_wraps_around() {
    let mut session = session(AlgorithmId::BubbleSort);
    session.previous_algorithm();
    assert_eq!(session.algorithm(), AlgorithmId::ConvexHull);
    session.next_algorithm();
    assert_eq!(session.algorithm(), AlgorithmId::BubbleSort);
}

#[test]
fn test_reseed_only_applies_to_random_inputs() {
    let mut maze = session(AlgorithmId::MazeGeneration);
    let before = maze.timeline().cloned();
    assert!(maze.reseed(1234));
    assert_eq!(
        maze.params(),
        &Params::Maze {
            rows: 6,
            cols: 10,
            seed: 1234
        }
    );
    assert_ne!(maze.timeline().cloned(), before);

    let mut gcd = session(AlgorithmId::Gcd);
    assert!(!gcd.reseed(1234));
    assert_eq!(gcd.params(), &Params::Pair { a: 48, b: 18 });
}

#[test]
fn test_progress_tracks_position() {
    let mut player = loaded_player(PlayerConfig::default());
    assert_eq!(player.progress(), 0.0);
    player.step_forward();
    let early = player.progress();
    assert!(early > 0.0 && early < 1.0);
    player.seek_end();
    assert_eq!(player.progress(), 1.0);
    player.seek(1);
    assert_eq!(player.progress(), early);
}
