//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks
//! - Input events
//! - Storage (LocalStorage on web, a JSON file natively)

pub mod input;
pub mod storage;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{Autopilot, InputSource, KeyboardPointer};
pub use storage::{MemoryStore, ScoreStore};
pub use time::{FrameClock, now_ms};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
