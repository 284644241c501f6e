//! Rendering seam
//!
//! The simulation never draws. A [`Renderer`] receives a [`Snapshot`] once per
//! frame (including paused frames) and does whatever the platform needs.

use serde::{Deserialize, Serialize};

use crate::sim::{Catcher, RoundPhase, RoundState, Snowflake};

/// Read-only copy of everything a frame needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: RoundPhase,
    pub score: u64,
    pub loss_count: u32,
    pub loss_limit: u32,
    pub seconds_remaining: Option<u32>,
    pub difficulty: f32,
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub catcher: Catcher,
    pub snowflakes: Vec<Snowflake>,
}

impl Snapshot {
    pub fn of(state: &RoundState) -> Self {
        Self {
            phase: state.phase,
            score: state.score,
            loss_count: state.loss_count,
            loss_limit: state.loss_limit(),
            seconds_remaining: state.display_seconds(),
            difficulty: state.difficulty,
            playfield_width: state.playfield_width,
            playfield_height: state.playfield_height,
            catcher: state.catcher.clone(),
            snowflakes: state.snowflakes.clone(),
        }
    }

    /// Catcher center as a percentage of the playfield width (for CSS positioning)
    pub fn catcher_percent(&self) -> f32 {
        self.catcher.x / self.playfield_width * 100.0
    }
}

/// Draws frames
pub trait Renderer {
    fn draw(&mut self, snapshot: &Snapshot);
}

/// Headless renderer: logs a one-line summary every `every` frames
#[derive(Debug, Clone)]
pub struct LogRenderer {
    every: u32,
    frames: u32,
}

impl LogRenderer {
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
        }
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, snapshot: &Snapshot) {
        self.frames += 1;
        if self.frames % self.every == 0 {
            log::debug!(
                "frame {}: {:?} score={} loss={}/{} flakes={} catcher={:.0}%",
                self.frames,
                snapshot.phase,
                snapshot.score,
                snapshot.loss_count,
                snapshot.loss_limit,
                snapshot.snowflakes.len(),
                snapshot.catcher_percent()
            );
        }
    }
}
