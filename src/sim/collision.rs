//! Catch and miss detection
//!
//! A snowflake is caught once its bottom edge reaches the catcher band while
//! its center sits over the catcher. It is missed once it has fallen a full
//! size past the bottom of the playfield.

use super::state::{Catcher, Snowflake};
use crate::tuning::CatchTolerance;

/// Whether the snowflake's bottom edge has reached the catcher band
pub fn reached_catcher(flake: &Snowflake, catcher: &Catcher, tol: &CatchTolerance) -> bool {
    let reach = tol.vertical_reach + flake.size * tol.size_factor;
    flake.bottom() >= catcher.y - reach
}

/// Whether the snowflake's center lies over the catcher (plus size tolerance)
pub fn over_catcher(flake: &Snowflake, catcher: &Catcher, tol: &CatchTolerance) -> bool {
    let slack = flake.size * tol.size_factor;
    let x = flake.pos.x;
    x >= catcher.left() - slack && x <= catcher.right() + slack
}

pub fn is_caught(flake: &Snowflake, catcher: &Catcher, tol: &CatchTolerance) -> bool {
    reached_catcher(flake, catcher, tol) && over_catcher(flake, catcher, tol)
}

/// Fallen past the bottom edge of the playfield
pub fn is_missed(flake: &Snowflake, playfield_height: f32) -> bool {
    flake.pos.y > playfield_height + flake.size
}
