//! Round state and core simulation types
//!
//! Everything the simulation mutates lives in [`RoundState`]. Renderers and
//! UI only ever see clones of it or the [`GameEvent`]s a tick produces.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::{LossBudget, Tuning};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Configured but not started
    Ready,
    /// Active gameplay
    Running,
    /// Frozen mid-round
    Paused,
    /// Terminal; only a new start leaves this phase
    Ended(EndReason),
}

/// Why a round finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Lives ran out or the miss limit was reached
    Exhausted,
    /// The round clock hit zero
    TimeUp,
    /// Ended from outside (reset button, view teardown)
    Stopped,
}

/// Why a snowflake left the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    Caught,
    Missed,
}

/// Which input source currently drives the catcher target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlSource {
    #[default]
    Keys,
    Pointer,
}

/// Per-round snowflake handle. Allocated in spawn order, never reused within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnowflakeId(pub u32);

/// A falling snowflake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snowflake {
    pub id: SnowflakeId,
    /// `x` is the horizontal center, `y` the top edge
    pub pos: Vec2,
    pub size: f32,
    /// Base fall speed (px/s), before the difficulty boost
    pub speed: f32,
    /// Horizontal drift amplitude (px/s)
    pub drift: f32,
    /// Drift angular frequency (rad/s)
    pub wobble: f32,
    pub phase: f32,
}

impl Snowflake {
    /// Bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }

    /// Advance one step: fall, drift sideways, stay inside the playfield
    pub fn advance(&mut self, dt: f32, fall_boost: f32, elapsed: f32, playfield_width: f32) {
        self.pos.y += (self.speed + fall_boost) * dt;
        self.pos.x += (elapsed * self.wobble + self.phase).sin() * self.drift * dt;
        self.clamp_x(playfield_width);
    }

    pub fn clamp_x(&mut self, playfield_width: f32) {
        let half = self.size / 2.0;
        self.pos.x = clamp_span(self.pos.x, half, playfield_width - half);
    }
}

/// The player's catcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catcher {
    /// Horizontal center
    pub x: f32,
    /// Fixed vertical position
    pub y: f32,
    pub width: f32,
    /// Where smoothing is heading
    pub target_x: f32,
}

impl Catcher {
    /// Centered catcher for the given playfield
    pub fn centered(tuning: &Tuning) -> Self {
        let x = tuning.playfield_width / 2.0;
        Self {
            x,
            y: tuning.catcher_y(),
            width: tuning.catcher_width(),
            target_x: x,
        }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x - self.half_width()
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.half_width()
    }

    /// Allowed center positions: `[half_width, playfield_width - half_width]`
    pub fn bounds(&self, playfield_width: f32) -> (f32, f32) {
        let half = self.half_width();
        (half, playfield_width - half)
    }

    pub fn clamp_to(&mut self, playfield_width: f32) {
        let (lo, hi) = self.bounds(playfield_width);
        self.x = clamp_span(self.x, lo, hi);
        self.target_x = clamp_span(self.target_x, lo, hi);
    }

    /// Point the catcher at `x`, clamped to the playfield
    pub fn set_target(&mut self, x: f32, playfield_width: f32) {
        let (lo, hi) = self.bounds(playfield_width);
        if x.is_finite() {
            self.target_x = clamp_span(x, lo, hi);
        }
    }

    /// Move toward the target by `blend` of the remaining distance
    pub fn approach(&mut self, blend: f32, playfield_width: f32) {
        self.x += (self.target_x - self.x) * blend.clamp(0.0, 1.0);
        let (lo, hi) = self.bounds(playfield_width);
        self.x = clamp_span(self.x, lo, hi);
    }
}

/// Things the outside world may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    /// Lives remaining or misses so far, against the configured limit
    LivesChanged { count: u32, limit: u32 },
    /// Whole seconds left (rounded up)
    TimerChanged { seconds_remaining: u32 },
    SnowflakeSpawned(Snowflake),
    /// `x`/`y` is where the snowflake was when it left, for catch effects
    SnowflakeRemoved {
        id: SnowflakeId,
        reason: RemovalReason,
        x: f32,
        y: f32,
    },
    RoundEnded { final_score: u64, reason: EndReason },
    Paused,
    Resumed,
}

/// Complete round state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: RoundPhase,
    pub score: u64,
    pub loss_budget: LossBudget,
    /// Lives remaining (`Lives`) or misses accumulated (`Misses`)
    pub loss_count: u32,
    /// Seconds left, `None` for untimed rounds. Never negative.
    pub time_remaining: Option<f32>,
    /// Simulated seconds since start, drives snowflake drift
    pub elapsed: f32,
    /// Seconds until the next spawn
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub difficulty: f32,
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub catcher: Catcher,
    /// Live snowflakes in spawn order
    pub snowflakes: Vec<Snowflake>,
    /// Held key direction in [-1, 1]
    pub direction: f32,
    pub control: ControlSource,
    next_id: u32,
}

impl RoundState {
    /// Fresh state for a round that has not started yet
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: RoundPhase::Ready,
            score: 0,
            loss_budget: tuning.loss_budget,
            loss_count: tuning.loss_budget.initial_count(),
            time_remaining: tuning.duration,
            elapsed: 0.0,
            spawn_timer: tuning.spawn.first_spawn_delay,
            spawn_interval: tuning.spawn.initial_interval,
            difficulty: tuning.difficulty.initial,
            playfield_width: tuning.playfield_width,
            playfield_height: tuning.playfield_height,
            catcher: Catcher::centered(tuning),
            snowflakes: Vec::new(),
            direction: 0.0,
            control: ControlSource::default(),
            next_id: 1,
        }
    }

    /// Allocate the next snowflake id
    pub fn next_snowflake_id(&mut self) -> SnowflakeId {
        let id = SnowflakeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == RoundPhase::Paused
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, RoundPhase::Ended(_))
    }

    pub fn loss_limit(&self) -> u32 {
        self.loss_budget.limit()
    }

    /// No lives left, or the miss limit reached
    pub fn exhausted(&self) -> bool {
        match self.loss_budget {
            LossBudget::Lives(_) => self.loss_count == 0,
            LossBudget::Misses(limit) => self.loss_count >= limit,
        }
    }

    /// Charge one miss against the budget. Returns false once the budget is spent.
    pub fn record_miss(&mut self) -> bool {
        if self.exhausted() {
            return false;
        }
        match self.loss_budget {
            LossBudget::Lives(_) => self.loss_count -= 1,
            LossBudget::Misses(_) => self.loss_count += 1,
        }
        true
    }

    /// Timer as shown to the player: whole seconds, rounded up
    pub fn display_seconds(&self) -> Option<u32> {
        self.time_remaining.map(display_seconds)
    }

    /// Latch the held direction, clamped to [-1, 1]
    pub fn set_direction(&mut self, direction: f32) {
        let direction = if direction.is_finite() {
            direction.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        if direction != self.direction && direction != 0.0 {
            self.control = ControlSource::Keys;
        }
        self.direction = direction;
    }

    pub fn set_pointer_target(&mut self, x: f32) {
        if !x.is_finite() {
            return;
        }
        self.control = ControlSource::Pointer;
        self.catcher.set_target(x, self.playfield_width);
    }

    /// Adopt new playfield dimensions, keeping everything inside them
    pub fn resize(&mut self, tuning: &Tuning) {
        self.playfield_width = tuning.playfield_width;
        self.playfield_height = tuning.playfield_height;
        self.catcher.width = tuning.catcher_width();
        self.catcher.y = tuning.catcher_y();
        self.catcher.clamp_to(self.playfield_width);
        for flake in &mut self.snowflakes {
            flake.clamp_x(self.playfield_width);
        }
    }
}

pub(crate) fn display_seconds(seconds: f32) -> u32 {
    seconds.max(0.0).ceil() as u32
}

/// `value.clamp(lo, hi)` that tolerates `lo > hi` by pinning to the midpoint
pub(crate) fn clamp_span(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        value.clamp(lo, hi)
    }
}
