//! Per-frame simulation step
//!
//! Core game loop that advances a round by one caller-supplied delta.

use rand::Rng;

use super::collision;
use super::spawn::{interval_after_catch, interval_after_spawn, roll_snowflake};
use super::state::{
    ControlSource, EndReason, GameEvent, RemovalReason, RoundPhase, RoundState, display_seconds,
};
use crate::tuning::{InputMode, Tuning};

/// Input asserted for a single tick. `None` fields leave the latched value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Pointer pressed or moved to x (playfield coordinates) since the last tick
    pub pointer_x: Option<f32>,
    /// Held key direction: -1 left, 0 none, 1 right
    pub direction: Option<f32>,
}

impl TickInput {
    /// Snapshot from raw key and pointer state
    pub fn from_keys(left: bool, right: bool, pointer_x: Option<f32>) -> Self {
        let direction = (if right { 1.0 } else { 0.0 }) - (if left { 1.0 } else { 0.0 });
        Self {
            pointer_x,
            direction: Some(direction),
        }
    }
}

/// Advance the round by `dt` seconds. Does nothing unless the round is running.
pub fn tick<R: Rng>(
    state: &mut RoundState,
    tuning: &Tuning,
    input: &TickInput,
    dt: f32,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.is_running() {
        return events;
    }

    let dt = clamp_dt(dt, tuning.max_dt);
    apply_input(state, input);

    // 1. Catcher
    update_catcher(state, tuning, dt);

    // 2. Spawning
    state.spawn_timer -= dt;
    if state.spawn_timer <= 0.0 {
        let flake = roll_snowflake(state, tuning, rng);
        log::trace!("spawned {:?} at x={:.1}", flake.id, flake.pos.x);
        events.push(GameEvent::SnowflakeSpawned(flake.clone()));
        state.snowflakes.push(flake);
        state.spawn_interval = interval_after_spawn(state.spawn_interval, &tuning.spawn);
        state.spawn_timer = state.spawn_interval;
    }

    // 3. Difficulty creeps up with time
    state.difficulty =
        (state.difficulty + tuning.difficulty.per_second * dt).min(tuning.difficulty.max);

    // 4. Fall and drift
    state.elapsed += dt;
    let fall_boost = tuning.difficulty.fall_boost * state.difficulty;
    let elapsed = state.elapsed;
    let width = state.playfield_width;
    for flake in &mut state.snowflakes {
        flake.advance(dt, fall_boost, elapsed, width);
    }

    // 5 + 6. Catches and misses
    resolve_snowflakes(state, tuning, &mut events);

    // 7. Clock and terminal conditions
    update_timer(state, dt, &mut events);
    if state.exhausted() {
        end_round(state, EndReason::Exhausted, &mut events);
    } else if state.time_remaining == Some(0.0) {
        end_round(state, EndReason::TimeUp, &mut events);
    }

    events
}

/// Stalled frames (tab in background) must not teleport anything
fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(max_dt)
    } else {
        0.0
    }
}

fn apply_input(state: &mut RoundState, input: &TickInput) {
    if let Some(direction) = input.direction {
        state.set_direction(direction);
    }
    if let Some(x) = input.pointer_x {
        state.set_pointer_target(x);
    }
}

fn update_catcher(state: &mut RoundState, tuning: &Tuning, dt: f32) {
    let width = state.playfield_width;
    let keys_drive = match tuning.input_mode {
        InputMode::Additive => true,
        InputMode::LastAsserted => state.control == ControlSource::Keys,
    };

    let mut target = state.catcher.target_x;
    if keys_drive && state.direction != 0.0 {
        target += state.direction * tuning.keyboard_speed * dt;
    }
    state.catcher.set_target(target, width);
    state.catcher.approach(tuning.smoothing.blend(dt), width);
}

fn resolve_snowflakes(state: &mut RoundState, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    let flakes = std::mem::take(&mut state.snowflakes);
    let mut live = Vec::with_capacity(flakes.len());

    for flake in flakes {
        if collision::is_caught(&flake, &state.catcher, &tuning.catch_tolerance) {
            state.score = state.score.saturating_add(tuning.catch_value);
            state.difficulty =
                (state.difficulty + tuning.difficulty.per_catch).min(tuning.difficulty.max);
            state.spawn_interval = interval_after_catch(state.spawn_interval, &tuning.spawn);
            events.push(GameEvent::SnowflakeRemoved {
                id: flake.id,
                reason: RemovalReason::Caught,
                x: flake.pos.x,
                y: flake.pos.y,
            });
            events.push(GameEvent::ScoreChanged(state.score));
        } else if collision::is_missed(&flake, state.playfield_height) {
            events.push(GameEvent::SnowflakeRemoved {
                id: flake.id,
                reason: RemovalReason::Missed,
                x: flake.pos.x,
                y: flake.pos.y,
            });
            if state.record_miss() {
                events.push(GameEvent::LivesChanged {
                    count: state.loss_count,
                    limit: state.loss_limit(),
                });
            }
        } else {
            live.push(flake);
        }
    }

    state.snowflakes = live;
}

fn update_timer(state: &mut RoundState, dt: f32, events: &mut Vec<GameEvent>) {
    let Some(remaining) = state.time_remaining else {
        return;
    };
    let next = (remaining - dt).max(0.0);
    state.time_remaining = Some(next);
    let shown = display_seconds(next);
    if shown != display_seconds(remaining) {
        events.push(GameEvent::TimerChanged {
            seconds_remaining: shown,
        });
    }
}

/// Finalize the round. Snowflakes stay where they are for the last frame.
pub(crate) fn end_round(state: &mut RoundState, reason: EndReason, events: &mut Vec<GameEvent>) {
    state.phase = RoundPhase::Ended(reason);
    log::info!("Round ended ({:?}) with score {}", reason, state.score);
    events.push(GameEvent::RoundEnded {
        final_score: state.score,
        reason,
    });
}
