//! Input sources
//!
//! Platform event handlers feed a source; the session asks it for one
//! [`TickInput`] per frame.

use crate::renderer::Snapshot;
use crate::sim::TickInput;

/// Produces the control snapshot for the next tick. Sources may look at the
/// last frame (the autopilot does).
pub trait InputSource {
    fn snapshot(&mut self, frame: &Snapshot) -> TickInput;
}

/// Keyboard and pointer state, fed by platform event handlers
#[derive(Debug, Clone, Default)]
pub struct KeyboardPointer {
    left: bool,
    right: bool,
    pointer_active: bool,
    /// Press or move not yet handed to a tick
    fresh_pointer: Option<f32>,
    start_requested: bool,
}

impl KeyboardPointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press by its `KeyboardEvent.key` name. Returns true if the
    /// key was one the game uses.
    pub fn key_down(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" | "a" | "A" => self.left = true,
            "ArrowRight" | "d" | "D" => self.right = true,
            " " | "Enter" => self.start_requested = true,
            _ => return false,
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" | "a" | "A" => self.left = false,
            "ArrowRight" | "d" | "D" => self.right = false,
            _ => return false,
        }
        true
    }

    /// Pointer pressed inside the playfield at `x`
    pub fn pointer_down(&mut self, x: f32) {
        self.pointer_active = true;
        self.fresh_pointer = Some(x);
    }

    /// Pointer moved; ignored unless pressed
    pub fn pointer_move(&mut self, x: f32) {
        if self.pointer_active {
            self.fresh_pointer = Some(x);
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer_active = false;
    }

    /// -1, 0 or 1 from the held keys
    pub fn direction(&self) -> f32 {
        (if self.right { 1.0 } else { 0.0 }) - (if self.left { 1.0 } else { 0.0 })
    }

    /// Space / Enter since the last call
    pub fn take_start_request(&mut self) -> bool {
        std::mem::take(&mut self.start_requested)
    }
}

impl InputSource for KeyboardPointer {
    /// A pointer position is reported once per press or move, so a held,
    /// motionless pointer does not fight the keys every frame
    fn snapshot(&mut self, _frame: &Snapshot) -> TickInput {
        TickInput::from_keys(self.left, self.right, self.fresh_pointer.take())
    }
}

/// Demo / idle player: steers under the snowflake that will land first
#[derive(Debug, Clone, Default)]
pub struct Autopilot;

impl InputSource for Autopilot {
    fn snapshot(&mut self, frame: &Snapshot) -> TickInput {
        let catcher = &frame.catcher;
        let target = frame
            .snowflakes
            .iter()
            .filter(|f| f.bottom() < catcher.y)
            .max_by(|a, b| {
                a.bottom()
                    .partial_cmp(&b.bottom())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|f| f.pos.x);

        TickInput {
            pointer_x: target,
            direction: Some(0.0),
        }
    }
}
