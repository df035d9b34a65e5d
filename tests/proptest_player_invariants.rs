//! Property-based tests for the playback state machine.
//!
//! 1. **Clamping**: no sequence of operations moves the position outside
//!    the timeline, and the player is never idle while a timeline is loaded.
//! 2. **Monotonic playback**: while playing, ticks never move backwards.
//! 3. **Speed continuity**: changing speed never changes the visible
//!    snapshot, in either tick mode.
//! 4. **Ended**: the player reports `Ended` exactly when it rests on the
//!    last snapshot after a move.

use algoscope::player::{PlaybackState, Player, PlayerConfig, Speed, TickMode};
use algoscope::recorder::{record, AlgorithmId, Params, RecordConfig};
use proptest::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Op {
    Play,
    Pause,
    StepForward,
    StepBack,
    SeekStart,
    SeekEnd,
    Seek(usize),
    Tick(u64),
    Speed(f64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Play),
        Just(Op::Pause),
        Just(Op::StepForward),
        Just(Op::StepBack),
        Just(Op::SeekStart),
        Just(Op::SeekEnd),
        (0usize..200).prop_map(Op::Seek),
        (0u64..3_000).prop_map(Op::Tick),
        prop::sample::select(Speed::PRESETS.to_vec()).prop_map(Op::Speed),
    ]
}

fn mode() -> impl Strategy<Value = TickMode> {
    prop_oneof![Just(TickMode::ElapsedTime), Just(TickMode::FixedIndex)]
}

fn player(mode: TickMode) -> Player {
    let mut player = Player::new(PlayerConfig {
        mode,
        ..PlayerConfig::default()
    });
    player.load(record(
        AlgorithmId::InsertionSort,
        &Params::Array {
            values: vec![9, 2, 7, 4, 1, 8],
        },
        &RecordConfig::default(),
    ));
    player
}

fn apply(player: &mut Player, op: &Op) {
    match *op {
        Op::Play => player.play(),
        Op::Pause => player.pause(),
        Op::StepForward => player.step_forward(),
        Op::StepBack => player.step_back(),
        Op::SeekStart => player.seek_start(),
        Op::SeekEnd => player.seek_end(),
        Op::Seek(index) => player.seek(index),
        Op::Tick(ms) => player.tick(Duration::from_millis(ms)),
        Op::Speed(factor) => player.set_speed(Speed::new(factor)),
    }
}

proptest! {
    #[test]
    fn position_stays_in_bounds(mode in mode(), ops in prop::collection::vec(op(), 0..64)) {
        let mut player = player(mode);
        let last = player.len() - 1;
        for op in &ops {
            apply(&mut player, op);
            prop_assert!(player.position() <= last, "{:?} moved past the end", op);
            prop_assert_ne!(player.state(), PlaybackState::Idle);
            prop_assert!(player.current_snapshot().is_some());
            if player.state() == PlaybackState::Playing {
                prop_assert!(player.position() < last);
            }
        }
    }
}

proptest! {
    #[test]
    fn manual_moves_end_exactly_at_last(
        mode in mode(),
        ops in prop::collection::vec(op(), 0..32),
        target in 0usize..200,
    ) {
        let mut player = player(mode);
        for op in &ops {
            apply(&mut player, op);
        }
        player.seek(target);
        let at_last = player.position() == player.len() - 1;
        prop_assert_eq!(player.state() == PlaybackState::Ended, at_last);
        prop_assert_eq!(player.state() == PlaybackState::Paused, !at_last);
    }
}

proptest! {
    #[test]
    fn playback_never_moves_backwards(
        mode in mode(),
        ticks in prop::collection::vec(0u64..1_000, 1..64),
    ) {
        let mut player = player(mode);
        player.play();
        let mut previous = player.position();
        for ms in ticks {
            player.tick(Duration::from_millis(ms));
            prop_assert!(player.position() >= previous);
            previous = player.position();
        }
    }
}

proptest! {
    #[test]
    fn speed_change_keeps_position(
        mode in mode(),
        before in 0u64..5_000,
        factor in prop::sample::select(Speed::PRESETS.to_vec()),
    ) {
        let mut player = player(mode);
        player.play();
        player.tick(Duration::from_millis(before));
        let position = player.position();
        player.set_speed(Speed::new(factor));
        prop_assert_eq!(player.position(), position);
        prop_assert_eq!(player.speed(), Speed::new(factor));
    }
}

proptest! {
    #[test]
    fn elapsed_mode_resumes_where_it_paused(
        first in 0u64..2_000,
        paused_for in 0u64..10_000,
        second in 0u64..2_000,
    ) {
        let mut uninterrupted = player(TickMode::ElapsedTime);
        uninterrupted.play();
        uninterrupted.tick(Duration::from_millis(first + second));

        let mut interrupted = player(TickMode::ElapsedTime);
        interrupted.play();
        interrupted.tick(Duration::from_millis(first));
        if interrupted.is_playing() {
            interrupted.pause();
            interrupted.tick(Duration::from_millis(paused_for));
            interrupted.play();
            interrupted.tick(Duration::from_millis(second));
        }

        prop_assert_eq!(interrupted.position(), uninterrupted.position());
    }
}
