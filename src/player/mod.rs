//! Timeline playback
//!
//! [`Player`] is the state machine the presentation layer drives. It owns
//! one [`Timeline`] at a time and exposes exactly one snapshot of it, the
//! one at [`Player::position`]. Position is always a valid index while a
//! timeline is loaded; every out-of-range request is clamped.
//!
//! Automatic playback is driven from outside through [`Player::tick`]; the
//! [`scheduler`] module provides the tick source.

pub mod scheduler;

use crate::snapshot::{Snapshot, Timeline};
use std::fmt;
use std::time::Duration;
use tracing::debug;

pub use scheduler::{Clock, ManualClock, Scheduler, SystemClock, Tick, TickToken};

/// Delay between snapshots at 1x speed
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(400);

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No timeline loaded
    Idle,
    Paused,
    Playing,
    /// Paused on the last snapshot
    Ended,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackState::Idle => "IDLE",
            PlaybackState::Paused => "PAUSED",
            PlaybackState::Playing => "PLAYING",
            PlaybackState::Ended => "END",
        }
    }
}

/// Playback speed multiplier, clamped to `[Speed::MIN, Speed::MAX]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Speed(f64);

impl Speed {
    pub const MIN: f64 = 0.25;
    pub const MAX: f64 = 16.0;
    /// Stops visited by [`Speed::faster`] and [`Speed::slower`]
    pub const PRESETS: [f64; 7] = [0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0];

    pub fn new(factor: f64) -> Self {
        if factor.is_nan() {
            return Speed::default();
        }
        Speed(factor.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Next preset above the current speed
    pub fn faster(self) -> Self {
        Self::PRESETS
            .iter()
            .copied()
            .find(|&p| p > self.0 + f64::EPSILON)
            .map_or(Speed(Self::MAX), Speed)
    }

    /// Next preset below the current speed
    pub fn slower(self) -> Self {
        Self::PRESETS
            .iter()
            .rev()
            .copied()
            .find(|&p| p < self.0 - f64::EPSILON)
            .map_or(Speed(Self::MIN), Speed)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed(1.0)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// How ticks turn into snapshot advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TickMode {
    /// Index is derived from accumulated elapsed time; speed changes and
    /// pause/resume never move the visible snapshot
    #[default]
    ElapsedTime,
    /// Each full step delay advances the index by one; a speed change
    /// restarts the current interval
    FixedIndex,
}

/// Playback preferences, kept across timeline reloads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    pub base_delay: Duration,
    pub speed: Speed,
    pub mode: TickMode,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            base_delay: DEFAULT_BASE_DELAY,
            speed: Speed::default(),
            mode: TickMode::default(),
        }
    }
}

impl PlayerConfig {
    /// `base_delay / speed`, never shorter than a millisecond
    pub fn step_delay(&self) -> Duration {
        self.base_delay
            .div_f64(self.speed.get())
            .max(Duration::from_millis(1))
    }
}

/// Interactive playback over one timeline
#[derive(Debug)]
pub struct Player {
    timeline: Option<Timeline>,
    position: usize,
    state: PlaybackState,
    config: PlayerConfig,
    /// Speed-weighted time played so far; in elapsed mode the position is
    /// `elapsed / step_delay`
    elapsed: Duration,
    /// Time accumulated towards the next advance in fixed-index mode
    interval: Duration,
}

impl Default for Player {
    fn default() -> Self {
        Player::new(PlayerConfig::default())
    }
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        Player {
            timeline: None,
            position: 0,
            state: PlaybackState::Idle,
            config,
            elapsed: Duration::ZERO,
            interval: Duration::ZERO,
        }
    }

    /// Install a timeline, replacing any previous one, paused at the start
    pub fn load(&mut self, timeline: Timeline) {
        debug!(
            algorithm = timeline.algorithm().name(),
            snapshots = timeline.len(),
            "timeline loaded"
        );
        self.timeline = Some(timeline);
        self.position = 0;
        self.elapsed = Duration::ZERO;
        self.interval = Duration::ZERO;
        self.state = PlaybackState::Paused;
    }

    /// Drop the timeline and return to `Idle`
    pub fn unload(&mut self) -> Option<Timeline> {
        self.position = 0;
        self.elapsed = Duration::ZERO;
        self.interval = Duration::ZERO;
        self.state = PlaybackState::Idle;
        self.timeline.take()
    }

    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Idle | PlaybackState::Playing => {}
            PlaybackState::Paused | PlaybackState::Ended => {
                if self.at_end() {
                    self.set_state(PlaybackState::Ended);
                } else {
                    self.interval = Duration::ZERO;
                    self.set_state(PlaybackState::Playing);
                }
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Paused);
        }
    }

    pub fn step_forward(&mut self) {
        self.move_to(self.position.saturating_add(1));
    }

    pub fn step_back(&mut self) {
        self.move_to(self.position.saturating_sub(1));
    }

    pub fn seek_start(&mut self) {
        self.move_to(0);
    }

    pub fn seek_end(&mut self) {
        self.move_to(usize::MAX);
    }

    /// Scrub to an arbitrary index, clamped to the timeline
    pub fn seek(&mut self, index: usize) {
        self.move_to(index);
    }

    /// Advance the clock by `dt`; ignored unless playing
    pub fn tick(&mut self, dt: Duration) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let last = self.last_index();
        let delay = self.step_delay();
        self.elapsed = self.elapsed.saturating_add(dt);
        match self.config.mode {
            TickMode::ElapsedTime => {
                let index = self.elapsed.as_nanos() / delay.as_nanos();
                self.position = usize::try_from(index).unwrap_or(usize::MAX).min(last);
            }
            TickMode::FixedIndex => {
                self.interval = self.interval.saturating_add(dt);
                while self.interval >= delay && self.position < last {
                    self.interval -= delay;
                    self.position += 1;
                }
            }
        }
        if self.position == last {
            self.set_state(PlaybackState::Ended);
        }
    }

    /// Change the speed without moving the visible snapshot
    pub fn set_speed(&mut self, speed: Speed) {
        let old = self.step_delay().as_nanos();
        self.config.speed = speed;
        let new = self.step_delay().as_nanos();
        match self.config.mode {
            TickMode::ElapsedTime => {
                // Keep the whole-step count exact and scale only the
                // fraction into the current step.
                let elapsed = self.elapsed.as_nanos();
                let rescaled = (elapsed / old) * new + (elapsed % old) * new / old;
                self.elapsed = nanos(rescaled);
            }
            TickMode::FixedIndex => self.interval = Duration::ZERO,
        }
        debug!(speed = %speed, "speed changed");
    }

    pub fn set_mode(&mut self, mode: TickMode) {
        self.config.mode = mode;
        self.sync_clock();
    }

    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.timeline.as_ref()?.get(self.position)
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.timeline.as_ref().map_or(0, Timeline::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn speed(&self) -> Speed {
        self.config.speed
    }

    pub fn mode(&self) -> TickMode {
        self.config.mode
    }

    pub fn config(&self) -> PlayerConfig {
        self.config
    }

    pub fn step_delay(&self) -> Duration {
        self.config.step_delay()
    }

    /// Playback clock shown to the user
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Fraction of the timeline already shown, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        match self.len() {
            0 => 0.0,
            1 => 1.0,
            len => self.position as f64 / (len - 1) as f64,
        }
    }

    fn last_index(&self) -> usize {
        self.len().saturating_sub(1)
    }

    fn at_end(&self) -> bool {
        self.position == self.last_index()
    }

    /// Manual move: pause, clamp, then settle on Paused or Ended
    fn move_to(&mut self, index: usize) {
        if self.state == PlaybackState::Idle {
            return;
        }
        self.position = index.min(self.last_index());
        self.sync_clock();
        let state = if self.at_end() {
            PlaybackState::Ended
        } else {
            PlaybackState::Paused
        };
        self.set_state(state);
    }

    /// Realign the clock with a position set by hand
    fn sync_clock(&mut self) {
        let steps = u32::try_from(self.position).unwrap_or(u32::MAX);
        self.elapsed = self.step_delay().saturating_mul(steps);
        self.interval = Duration::ZERO;
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(
                from = self.state.label(),
                to = state.label(),
                position = self.position,
                "playback"
            );
            self.state = state;
        }
    }
}

fn nanos(n: u128) -> Duration {
    let secs = u64::try_from(n / 1_000_000_000).unwrap_or(u64::MAX);
    Duration::new(secs, (n % 1_000_000_000) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::{record, AlgorithmId, Params, RecordConfig};

    fn sorting_player(config: PlayerConfig) -> Player {
        let timeline = record(
            AlgorithmId::BubbleSort,
            &Params::Array {
                values: vec![5, 3, 8, 1],
            },
            &RecordConfig::default(),
        );
        let mut player = Player::new(config);
        player.load(timeline);
        player
    }

    #[test]
    fn speed_is_clamped_and_walks_presets() {
        assert_eq!(Speed::new(100.0).get(), Speed::MAX);
        assert_eq!(Speed::new(0.0).get(), Speed::MIN);
        assert_eq!(Speed::new(f64::NAN), Speed::default());
        assert_eq!(Speed::new(1.0).faster().get(), 2.0);
        assert_eq!(Speed::new(3.0).slower().get(), 2.0);
        assert_eq!(Speed::new(16.0).faster().get(), 16.0);
        assert_eq!(Speed::new(0.25).slower().get(), 0.25);
    }

    #[test]
    fn idle_player_ignores_everything() {
        let mut player = Player::default();
        player.play();
        player.step_forward();
        player.tick(Duration::from_secs(5));
        assert_eq!(player.state(), PlaybackState::Idle);
        assert_eq!(player.position(), 0);
        assert!(player.current_snapshot().is_none());
    }

    #[test]
    fn elapsed_mode_derives_index_from_time() {
        let mut player = sorting_player(PlayerConfig::default());
        player.play();
        player.tick(Duration::from_millis(399));
        assert_eq!(player.position(), 0);
        player.tick(Duration::from_millis(1));
        assert_eq!(player.position(), 1);
        player.tick(Duration::from_millis(850));
        assert_eq!(player.position(), 3);
    }

    #[test]
    fn fixed_mode_restarts_interval_on_speed_change() {
        let mut player = sorting_player(PlayerConfig {
            mode: TickMode::FixedIndex,
            ..PlayerConfig::default()
        });
        player.play();
        player.tick(Duration::from_millis(300));
        player.set_speed(Speed::new(2.0));
        player.tick(Duration::from_millis(150));
        assert_eq!(player.position(), 0);
        player.tick(Duration::from_millis(50));
        assert_eq!(player.position(), 1);
    }

    #[test]
    fn ticking_to_the_end_stops_playback() {
        let mut player = sorting_player(PlayerConfig::default());
        player.play();
        player.tick(Duration::from_secs(3_600));
        assert_eq!(player.position(), player.len() - 1);
        assert_eq!(player.state(), PlaybackState::Ended);
        player.play();
        assert_eq!(player.state(), PlaybackState::Ended);
    }

    #[test]
    fn resume_after_manual_step_continues_from_there() {
        let mut player = sorting_player(PlayerConfig::default());
        player.seek(4);
        player.play();
        player.tick(Duration::from_millis(400));
        assert_eq!(player.position(), 5);
    }
}
