//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied, clamped frame deltas
//! - Seeded RNG only
//! - Stable snowflake order (by spawn id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod engine;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{is_caught, is_missed};
pub use engine::Engine;
pub use state::{
    Catcher, ControlSource, EndReason, GameEvent, RemovalReason, RoundPhase, RoundState,
    Snowflake, SnowflakeId,
};
pub use tick::{TickInput, tick};
