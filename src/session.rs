//! One interactive session: the active algorithm, its player and the tick
//! source driving it
//!
//! Every user intent goes through [`Session`]. Changing the algorithm or its
//! parameters is a single call that cancels the scheduler, records a fresh
//! timeline and installs it paused at the start, so a tick from the previous
//! run can never reach the new timeline. Manual steps and seeks cancel the
//! scheduler before they move the position.

use crate::player::{
    Clock, PlaybackState, Player, PlayerConfig, Scheduler, Speed, SystemClock, Tick, TickMode,
    TickToken,
};
use crate::recorder::{record, AlgorithmId, Params, RecordConfig};
use crate::snapshot::{Snapshot, Timeline};
use std::time::Duration;
use tracing::debug;

pub struct Session<C: Clock = SystemClock> {
    clock: C,
    scheduler: Scheduler,
    player: Player,
    /// Token of the scheduler run currently allowed to tick the player
    token: Option<TickToken>,
    algorithm: AlgorithmId,
    params: Params,
    record_config: RecordConfig,
}

impl<C: Clock> Session<C> {
    pub fn new(
        clock: C,
        algorithm: AlgorithmId,
        params: Params,
        record_config: RecordConfig,
        player_config: PlayerConfig,
        scheduler: Scheduler,
    ) -> Self {
        let mut session = Session {
            clock,
            scheduler,
            player: Player::new(player_config),
            token: None,
            algorithm,
            params,
            record_config,
        };
        session.reload();
        session
    }

    /// Switch algorithm, starting from its sample parameters
    pub fn select(&mut self, algorithm: AlgorithmId) {
        self.select_with(algorithm, algorithm.default_params());
    }

    pub fn select_with(&mut self, algorithm: AlgorithmId, params: Params) {
        self.algorithm = algorithm;
        self.params = params;
        self.reload();
    }

    /// Move to the next algorithm in [`AlgorithmId::ALL`]
    pub fn next_algorithm(&mut self) {
        self.select(self.neighbour(1));
    }

    pub fn previous_algorithm(&mut self) {
        self.select(self.neighbour(AlgorithmId::ALL.len() - 1));
    }

    pub fn set_params(&mut self, params: Params) {
        self.params = params;
        self.reload();
    }

    /// Re-record with a new seed; returns false when the parameters have
    /// no random source
    pub fn reseed(&mut self, seed: u64) -> bool {
        if !self.params.is_random() {
            return false;
        }
        self.params = self.params.reseeded(seed);
        self.reload();
        true
    }

    pub fn play(&mut self) {
        self.player.play();
        if self.player.is_playing() && self.token.is_none() {
            self.token = Some(self.scheduler.start(self.clock.now()));
        }
    }

    pub fn pause(&mut self) {
        self.halt();
        self.player.pause();
    }

    pub fn toggle(&mut self) {
        if self.player.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn step_forward(&mut self) {
        self.halt();
        self.player.step_forward();
    }

    pub fn step_back(&mut self) {
        self.halt();
        self.player.step_back();
    }

    pub fn seek_start(&mut self) {
        self.halt();
        self.player.seek_start();
    }

    pub fn seek_end(&mut self) {
        self.halt();
        self.player.seek_end();
    }

    pub fn seek(&mut self, index: usize) {
        self.halt();
        self.player.seek(index);
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.player.set_speed(speed);
    }

    pub fn faster(&mut self) {
        self.set_speed(self.player.speed().faster());
    }

    pub fn slower(&mut self) {
        self.set_speed(self.player.speed().slower());
    }

    pub fn set_tick_mode(&mut self, mode: TickMode) {
        self.player.set_mode(mode);
    }

    /// Deliver a due tick, if any; returns true when the position moved
    pub fn pump(&mut self) -> bool {
        match self.scheduler.poll(self.clock.now()) {
            Some(tick) => self.deliver(tick),
            None => false,
        }
    }

    /// Apply one tick; stale ticks from a cancelled run are dropped
    pub fn deliver(&mut self, tick: Tick) -> bool {
        if self.token != Some(tick.token) || !self.scheduler.is_current(tick.token) {
            debug!(token = ?tick.token, "discarding stale tick");
            return false;
        }
        let before = self.player.position();
        self.player.tick(tick.dt);
        if self.player.state() != PlaybackState::Playing {
            self.halt();
        }
        self.player.position() != before
    }

    /// How long the event loop may block before the next tick is due
    pub fn timeout(&self) -> Option<Duration> {
        self.scheduler.timeout(self.clock.now())
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.player.timeline()
    }

    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.player.current_snapshot()
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whether a scheduler run is active
    pub fn is_ticking(&self) -> bool {
        self.token.is_some()
    }

    /// Token the next delivered tick must carry
    pub fn tick_token(&self) -> Option<TickToken> {
        self.token
    }

    /// Cancel the scheduler, discard the old timeline, record afresh and
    /// load the result paused at the start
    fn reload(&mut self) {
        self.halt();
        self.player.unload();
        let timeline = record(self.algorithm, &self.params, &self.record_config);
        self.player.load(timeline);
    }

    fn halt(&mut self) {
        self.scheduler.cancel();
        self.token = None;
    }

    fn neighbour(&self, offset: usize) -> AlgorithmId {
        let all = AlgorithmId::ALL;
        let here = all.iter().position(|&a| a == self.algorithm).unwrap_or(0);
        all[(here + offset) % all.len()]
    }
}

impl<C: Clock> Drop for Session<C> {
    fn drop(&mut self) {
        self.halt();
    }
}
