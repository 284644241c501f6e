//! Catch Snowflake - a winter arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (catcher, snowflakes, scoring, round end)
//! - `tuning`: Data-driven game balance and round configuration
//! - `platform`: Input, frame timing and storage abstractions
//! - `renderer`: Read-only frame snapshots and the renderer seam
//! - `highscores`: Leaderboard
//! - `session`: Engine plus collaborators with an explicit lifecycle

pub mod error;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, StorageError};
pub use highscores::HighScores;
pub use session::{RoundObserver, Session};
pub use sim::{Engine, GameEvent, TickInput};
pub use tuning::Tuning;
