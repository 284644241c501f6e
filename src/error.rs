//! Error types
//!
//! The simulation itself never fails once a round has started. The only
//! fallible surfaces are round configuration and high-score storage.

use thiserror::Error;

/// A rejected round configuration. `Engine::start` refuses to begin a round
/// when `Tuning::validate` returns one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("playfield must be finite and positive, got {width}x{height}")]
    Playfield { width: f32, height: f32 },

    #[error("catcher width {width} does not fit in a playfield {playfield_width} wide")]
    CatcherWidth { width: f32, playfield_width: f32 },

    #[error("round duration must be positive, got {0}")]
    Duration(f32),

    #[error("loss budget must allow at least one life or miss")]
    LossBudget,

    #[error("maximum frame delta must be positive, got {0}")]
    MaxDelta(f32),

    #[error("spawn interval bounds invalid: min {min}, max {max}")]
    IntervalBounds { min: f32, max: f32 },

    #[error("initial spawn interval {value} outside [{min}, {max}]")]
    InitialInterval { value: f32, min: f32, max: f32 },

    #[error("first spawn delay must be finite and non-negative, got {0}")]
    SpawnDelay(f32),

    #[error("spawn floor {value} outside [{min}, {max}]")]
    SpawnFloor { value: f32, min: f32, max: f32 },

    #[error("keyboard speed must be finite and non-negative, got {0}")]
    KeyboardSpeed(f32),

    #[error("spawn shrink factor must be in (0, 1], got {0}")]
    ShrinkFactor(f32),

    #[error("smoothing {0} is out of range")]
    Smoothing(String),

    #[error("{name} range is inverted or negative: [{min}, {max}]")]
    AttributeRange { name: &'static str, min: f32, max: f32 },

    #[error("difficulty settings invalid: initial {initial}, max {max}")]
    Difficulty { initial: f32, max: f32 },

    #[error("catch tolerance must be non-negative")]
    CatchTolerance,

    #[error("could not parse tuning: {0}")]
    Parse(String),
}

/// High-score storage failures. These are logged by the leaderboard and never
/// reach the simulation.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
