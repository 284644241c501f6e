//! Data-driven game balance
//!
//! Every number the simulation uses lives in [`Tuning`]. The defaults reproduce
//! the classic three-lives mode; [`Tuning::timed`] is the sixty second,
//! five-miss variant.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the catcher blends toward its target position each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SmoothingPolicy {
    /// Frame-rate independent: `blend = 1 - e^(-rate * dt)`
    Exponential { rate: f32 },
    /// Fixed fraction of the remaining distance per tick
    Linear { blend: f32 },
}

impl SmoothingPolicy {
    /// Fraction of the remaining distance to cover this tick, in [0, 1]
    pub fn blend(&self, dt: f32) -> f32 {
        match *self {
            SmoothingPolicy::Exponential { rate } => 1.0 - (-rate * dt).exp(),
            SmoothingPolicy::Linear { blend } => {
                if dt > 0.0 {
                    blend
                } else {
                    0.0
                }
            }
        }
    }
}

impl Default for SmoothingPolicy {
    fn default() -> Self {
        SmoothingPolicy::Exponential { rate: 12.0 }
    }
}

/// How pointer and keyboard input combine into a catcher target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputMode {
    /// Pointer sets the target, held keys keep nudging it from there
    #[default]
    Additive,
    /// Whichever source was asserted most recently drives the target
    LastAsserted,
}

/// What ends a round besides the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossBudget {
    /// Counts down from the limit; each miss costs one life
    Lives(u32),
    /// Counts up to the limit; each miss adds one
    Misses(u32),
}

impl LossBudget {
    pub fn limit(&self) -> u32 {
        match *self {
            LossBudget::Lives(n) | LossBudget::Misses(n) => n,
        }
    }

    /// Counter value shown at round start
    pub fn initial_count(&self) -> u32 {
        match *self {
            LossBudget::Lives(n) => n,
            LossBudget::Misses(_) => 0,
        }
    }
}

/// Catch band shape. A fixed vertical reach above the catcher, optionally
/// widened by a share of the snowflake's size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatchTolerance {
    /// Pixels above the catcher's y where a snowflake's bottom edge counts as arrived
    pub vertical_reach: f32,
    /// Extra reach (vertical and per horizontal side) per pixel of snowflake size
    pub size_factor: f32,
}

impl Default for CatchTolerance {
    fn default() -> Self {
        Self {
            vertical_reach: 20.0,
            size_factor: 0.0,
        }
    }
}

/// Closed interval used for randomized snowflake attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttrRange {
    pub min: f32,
    pub max: f32,
}

impl AttrRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 || self.max < self.min {
            return Err(ConfigError::AttributeRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Spawn pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Interval at round start (seconds)
    pub initial_interval: f32,
    /// Time until the very first snowflake
    pub first_spawn_delay: f32,
    pub min_interval: f32,
    pub max_interval: f32,
    /// Interval multiplier applied after every spawn
    pub spawn_shrink: f32,
    /// Per-spawn shrinking never goes below this (catches may push further, to `min_interval`)
    pub spawn_floor: f32,
    /// Interval multiplier applied after every catch
    pub catch_shrink: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            initial_interval: 1.1,
            first_spawn_delay: 0.3,
            min_interval: 0.28,
            max_interval: 2.0,
            spawn_shrink: 0.985,
            spawn_floor: 0.35,
            catch_shrink: 0.99,
        }
    }
}

/// Ranges for newly spawned snowflakes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlakeTuning {
    pub size: AttrRange,
    /// Base fall speed (px/s)
    pub speed: AttrRange,
    /// Horizontal drift amplitude (px/s)
    pub drift: AttrRange,
    /// Drift angular frequency (rad/s)
    pub wobble: AttrRange,
    pub phase: AttrRange,
}

impl Default for FlakeTuning {
    fn default() -> Self {
        Self {
            size: AttrRange::new(12.0, 26.0),
            speed: AttrRange::new(70.0, 140.0),
            drift: AttrRange::new(18.0, 36.0),
            wobble: AttrRange::new(0.9, 2.1),
            phase: AttrRange::new(0.0, std::f32::consts::TAU),
        }
    }
}

/// Difficulty ramp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    pub initial: f32,
    /// Growth per simulated second
    pub per_second: f32,
    /// Growth per catch
    pub per_catch: f32,
    pub max: f32,
    /// Extra fall speed (px/s) per unit of difficulty
    pub fall_boost: f32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            initial: 1.0,
            per_second: 0.02,
            per_catch: 0.015,
            max: 3.5,
            fall_boost: 18.0,
        }
    }
}

/// Complete round configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Fixed catcher width; derived from the playfield width when unset
    pub catcher_width: Option<f32>,
    pub loss_budget: LossBudget,
    /// Round length in seconds; `None` plays until the loss budget runs out
    pub duration: Option<f32>,
    /// Upper bound on a single tick's delta (seconds)
    pub max_dt: f32,
    pub smoothing: SmoothingPolicy,
    /// Target speed while a direction key is held (px/s)
    pub keyboard_speed: f32,
    pub input_mode: InputMode,
    pub spawn: SpawnTuning,
    pub flakes: FlakeTuning,
    pub difficulty: DifficultyTuning,
    pub catch_tolerance: CatchTolerance,
    /// Points per caught snowflake
    pub catch_value: u64,
    /// Seed for the spawn RNG, reapplied on every start
    pub seed: u64,
    pub max_high_scores: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: 800.0,
            playfield_height: 600.0,
            catcher_width: None,
            loss_budget: LossBudget::Lives(3),
            duration: None,
            max_dt: 0.05,
            smoothing: SmoothingPolicy::default(),
            keyboard_speed: 420.0,
            input_mode: InputMode::default(),
            spawn: SpawnTuning::default(),
            flakes: FlakeTuning::default(),
            difficulty: DifficultyTuning::default(),
            catch_tolerance: CatchTolerance::default(),
            catch_value: 1,
            seed: 0x5EED_F1A4E,
            max_high_scores: 10,
        }
    }
}

impl Tuning {
    /// Sixty second round, five misses allowed
    pub fn timed() -> Self {
        Self {
            loss_budget: LossBudget::Misses(5),
            duration: Some(60.0),
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Catcher width for the current playfield
    pub fn catcher_width(&self) -> f32 {
        self.catcher_width
            .unwrap_or_else(|| catcher_width_for(self.playfield_width))
    }

    /// Catcher's fixed vertical position
    pub fn catcher_y(&self) -> f32 {
        self.playfield_height * 0.88
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = (self.playfield_width, self.playfield_height);
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return Err(ConfigError::Playfield { width: w, height: h });
        }

        let catcher = self.catcher_width();
        if !catcher.is_finite() || catcher <= 0.0 || catcher > w {
            return Err(ConfigError::CatcherWidth {
                width: catcher,
                playfield_width: w,
            });
        }

        if let Some(d) = self.duration {
            if !d.is_finite() || d <= 0.0 {
                return Err(ConfigError::Duration(d));
            }
        }

        if self.loss_budget.limit() == 0 {
            return Err(ConfigError::LossBudget);
        }

        if !self.max_dt.is_finite() || self.max_dt <= 0.0 {
            return Err(ConfigError::MaxDelta(self.max_dt));
        }

        match self.smoothing {
            SmoothingPolicy::Exponential { rate } if !rate.is_finite() || rate <= 0.0 => {
                return Err(ConfigError::Smoothing(format!("exponential rate {rate}")));
            }
            SmoothingPolicy::Linear { blend } if !(blend > 0.0 && blend <= 1.0) => {
                return Err(ConfigError::Smoothing(format!("linear blend {blend}")));
            }
            _ => {}
        }

        if !(self.keyboard_speed.is_finite() && self.keyboard_speed >= 0.0) {
            return Err(ConfigError::KeyboardSpeed(self.keyboard_speed));
        }

        let spawn = &self.spawn;
        if !(spawn.min_interval > 0.0 && spawn.min_interval <= spawn.max_interval)
            || !spawn.max_interval.is_finite()
        {
            return Err(ConfigError::IntervalBounds {
                min: spawn.min_interval,
                max: spawn.max_interval,
            });
        }
        if !(spawn.min_interval..=spawn.max_interval).contains(&spawn.initial_interval) {
            return Err(ConfigError::InitialInterval {
                value: spawn.initial_interval,
                min: spawn.min_interval,
                max: spawn.max_interval,
            });
        }
        if !(spawn.first_spawn_delay.is_finite() && spawn.first_spawn_delay >= 0.0) {
            return Err(ConfigError::SpawnDelay(spawn.first_spawn_delay));
        }
        if !(spawn.min_interval..=spawn.max_interval).contains(&spawn.spawn_floor) {
            return Err(ConfigError::SpawnFloor {
                value: spawn.spawn_floor,
                min: spawn.min_interval,
                max: spawn.max_interval,
            });
        }
        for factor in [spawn.spawn_shrink, spawn.catch_shrink] {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::ShrinkFactor(factor));
            }
        }

        let flakes = &self.flakes;
        flakes.size.check("size")?;
        flakes.speed.check("speed")?;
        flakes.drift.check("drift")?;
        flakes.wobble.check("wobble")?;
        flakes.phase.check("phase")?;

        let diff = &self.difficulty;
        if !(diff.initial > 0.0 && diff.max >= diff.initial && diff.max.is_finite())
            || diff.per_second < 0.0
            || diff.per_catch < 0.0
            || diff.fall_boost < 0.0
        {
            return Err(ConfigError::Difficulty {
                initial: diff.initial,
                max: diff.max,
            });
        }

        let tol = &self.catch_tolerance;
        if !(tol.vertical_reach.is_finite() && tol.vertical_reach >= 0.0)
            || !(tol.size_factor.is_finite() && tol.size_factor >= 0.0)
        {
            return Err(ConfigError::CatchTolerance);
        }

        Ok(())
    }
}

/// Catcher width scales with the playfield but stays in a comfortable range
pub fn catcher_width_for(playfield_width: f32) -> f32 {
    (playfield_width * 0.14).clamp(96.0, 150.0)
}
