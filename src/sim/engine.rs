//! Round lifecycle around the tick function
//!
//! [`Engine`] owns the round state, the active tuning and the spawn RNG.
//! Callers drive it with `tick` once per frame and read it through
//! [`Engine::state`] or [`Engine::snapshot`]; nothing hands out a mutable
//! reference to the state.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{EndReason, GameEvent, RoundPhase, RoundState};
use super::tick::{TickInput, end_round, tick};
use crate::error::ConfigError;
use crate::renderer::Snapshot;
use crate::tuning::Tuning;

/// Input asserted through the setters, held until the next running tick
#[derive(Debug, Clone, Copy, PartialEq)]
enum Latched {
    Direction(f32),
    Pointer(f32),
}

impl Latched {
    fn apply(self, state: &mut RoundState) {
        match self {
            Latched::Direction(direction) => state.set_direction(direction),
            Latched::Pointer(x) => state.set_pointer_target(x),
        }
    }

    fn same_kind(&self, other: &Latched) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Simulation engine. Generic over the spawn RNG so tests can swap in any
/// seedable source; it is reseeded from `Tuning::seed` on every start.
#[derive(Debug, Clone)]
pub struct Engine<R = Pcg32> {
    tuning: Tuning,
    state: RoundState,
    rng: R,
    /// Setter calls in the order they arrived
    pending: Vec<Latched>,
}

impl<R: Rng + SeedableRng> Engine<R> {
    /// Engine with a validated configuration, waiting for `start`
    pub fn new(tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self {
            state: RoundState::new(&tuning),
            rng: R::seed_from_u64(tuning.seed),
            tuning,
            pending: Vec::new(),
        })
    }

    /// Begin a fresh round with `tuning`. An invalid configuration is refused
    /// and the current round is left untouched.
    pub fn start(&mut self, tuning: Tuning) -> Result<Vec<GameEvent>, ConfigError> {
        if let Err(e) = tuning.validate() {
            log::warn!("Refusing to start round: {}", e);
            return Err(e);
        }
        self.tuning = tuning;
        Ok(self.restart())
    }

    /// Begin a fresh round with the current tuning
    pub fn restart(&mut self) -> Vec<GameEvent> {
        self.state = RoundState::new(&self.tuning);
        self.rng = R::seed_from_u64(self.tuning.seed);
        self.pending.clear();
        self.state.phase = RoundPhase::Running;
        log::info!(
            "Round started (budget {:?}, duration {:?}, seed {})",
            self.tuning.loss_budget,
            self.tuning.duration,
            self.tuning.seed
        );

        let mut events = vec![
            GameEvent::ScoreChanged(0),
            GameEvent::LivesChanged {
                count: self.state.loss_count,
                limit: self.state.loss_limit(),
            },
        ];
        if let Some(seconds_remaining) = self.state.display_seconds() {
            events.push(GameEvent::TimerChanged { seconds_remaining });
        }
        events
    }

    /// Advance one frame. Latched setter input is applied first, then `input`.
    pub fn tick(&mut self, dt: f32, input: &TickInput) -> Vec<GameEvent> {
        if self.state.is_running() {
            for latched in self.pending.drain(..) {
                latched.apply(&mut self.state);
            }
        }
        tick(&mut self.state, &self.tuning, input, dt, &mut self.rng)
    }
}

impl<R> Engine<R> {
    /// Latch the key direction; values outside [-1, 1] are clamped.
    /// Takes effect on the next running tick.
    pub fn set_direction(&mut self, direction: f32) {
        self.latch(Latched::Direction(direction));
    }

    /// Aim the catcher at a pointer position (clamped to the playfield).
    /// Takes effect on the next running tick.
    pub fn set_pointer_target(&mut self, x: f32) {
        self.latch(Latched::Pointer(x));
    }

    fn latch(&mut self, latched: Latched) {
        // At most one of each kind, ordered by latest assertion
        self.pending.retain(|p| !p.same_kind(&latched));
        self.pending.push(latched);
    }

    /// Freeze a running round. Returns `None` if there is nothing to pause.
    pub fn pause(&mut self) -> Option<GameEvent> {
        if !self.state.is_running() {
            log::debug!("pause ignored in phase {:?}", self.state.phase);
            return None;
        }
        self.state.phase = RoundPhase::Paused;
        Some(GameEvent::Paused)
    }

    /// Continue a paused round. Returns `None` if the round is not paused.
    pub fn resume(&mut self) -> Option<GameEvent> {
        if !self.state.is_paused() {
            log::debug!("resume ignored in phase {:?}", self.state.phase);
            return None;
        }
        self.state.phase = RoundPhase::Running;
        Some(GameEvent::Resumed)
    }

    /// Pause if running, resume if paused
    pub fn toggle_pause(&mut self) -> Option<GameEvent> {
        if self.state.is_paused() {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// End an active round from outside
    pub fn stop(&mut self, reason: EndReason) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state.is_running() || self.state.is_paused() {
            end_round(&mut self.state, reason, &mut events);
        }
        events
    }

    /// New playfield dimensions, e.g. after a window resize
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        let resized = Tuning {
            playfield_width: width,
            playfield_height: height,
            ..self.tuning.clone()
        };
        resized.validate()?;
        self.tuning = resized;
        self.state.resize(&self.tuning);
        Ok(())
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Read-only copy for renderers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.state)
    }
}
