use std::collections::HashMap;

use catch_snowflake::sim::{EndReason, Engine, GameEvent, RemovalReason, RoundPhase, TickInput};
use catch_snowflake::tuning::{CatchTolerance, InputMode, SmoothingPolicy, Tuning};
use proptest::prelude::*;

prop_compose! {
    fn arb_input()(
        pointer in prop::option::of(-200.0f32..1000.0),
        direction in -2i8..=2,
    ) -> TickInput {
        TickInput {
            pointer_x: pointer,
            direction: Some(direction as f32),
        }
    }
}

prop_compose! {
    fn arb_frames()(
        frames in prop::collection::vec((0.0f32..0.2, arb_input()), 1..600)
    ) -> Vec<(f32, TickInput)> {
        frames
    }
}

prop_compose! {
    fn arb_tuning()(
        seed in any::<u64>(),
        timed in any::<bool>(),
        linear in any::<bool>(),
        last_asserted in any::<bool>(),
        size_factor in 0.0f32..1.0,
    ) -> Tuning {
        let base = if timed { Tuning::timed() } else { Tuning::default() };
        Tuning {
            seed,
            smoothing: if linear {
                SmoothingPolicy::Linear { blend: 0.25 }
            } else {
                SmoothingPolicy::default()
            },
            input_mode: if last_asserted { InputMode::LastAsserted } else { InputMode::Additive },
            catch_tolerance: CatchTolerance { vertical_reach: 20.0, size_factor },
            ..base
        }
    }
}

fn started(tuning: Tuning) -> Engine {
    let mut engine = Engine::new(tuning).expect("valid tuning");
    engine.restart();
    engine
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_catcher_stays_in_bounds(tuning in arb_tuning(), frames in arb_frames()) {
        let mut engine = started(tuning);
        for (dt, input) in &frames {
            engine.tick(*dt, input);
            let state = engine.state();
            let half = state.catcher.half_width();
            prop_assert!(state.catcher.x >= half && state.catcher.x <= state.playfield_width - half,
                "catcher {} outside [{}, {}]", state.catcher.x, half, state.playfield_width - half);
            prop_assert!(state.catcher.target_x >= half && state.catcher.target_x <= state.playfield_width - half);
        }
    }

    #[test]
    fn test_spawn_interval_in_bounds(tuning in arb_tuning(), frames in arb_frames()) {
        let (min, max) = (tuning.spawn.min_interval, tuning.spawn.max_interval);
        let mut engine = started(tuning);
        for (dt, input) in &frames {
            engine.tick(*dt, input);
            let interval = engine.state().spawn_interval;
            prop_assert!(interval >= min && interval <= max, "interval {} outside [{}, {}]", interval, min, max);
        }
    }

    #[test]
    fn test_snowflakes_never_rise(tuning in arb_tuning(), frames in arb_frames()) {
        let mut engine = started(tuning);
        let mut last_y = HashMap::new();
        for (dt, input) in &frames {
            engine.tick(*dt, input);
            for flake in &engine.state().snowflakes {
                if let Some(prev) = last_y.insert(flake.id, flake.pos.y) {
                    prop_assert!(flake.pos.y >= prev, "{:?} rose from {} to {}", flake.id, prev, flake.pos.y);
                }
                let half = flake.size / 2.0;
                prop_assert!(flake.pos.x >= half && flake.pos.x <= engine.state().playfield_width - half);
            }
        }
    }

    #[test]
    fn test_score_counts_catches(tuning in arb_tuning(), frames in arb_frames()) {
        let value = tuning.catch_value;
        let mut engine = started(tuning);
        let mut catches = 0u64;
        for (dt, input) in &frames {
            let before = engine.state().score;
            let events = engine.tick(*dt, input);
            let caught = events
                .iter()
                .filter(|e| matches!(e, GameEvent::SnowflakeRemoved { reason: RemovalReason::Caught, .. }))
                .count() as u64;
            catches += caught;
            prop_assert_eq!(engine.state().score, before + caught * value);
        }
        prop_assert_eq!(engine.state().score, catches * value);
    }

    #[test]
    fn test_budget_bounded_and_exhaustion_ends_round(tuning in arb_tuning(), frames in arb_frames()) {
        let limit = tuning.loss_budget.limit();
        let mut engine = started(tuning);
        for (dt, input) in &frames {
            let events = engine.tick(*dt, input);
            let state = engine.state();
            prop_assert!(state.loss_count <= limit);
            if state.exhausted() {
                prop_assert_eq!(state.phase, RoundPhase::Ended(EndReason::Exhausted));
                let ended_now = events.iter().any(|e| matches!(
                    e,
                    GameEvent::RoundEnded { reason: EndReason::Exhausted, .. }
                ));
                prop_assert!(ended_now);
                break;
            }
        }
    }

    #[test]
    fn test_pause_freezes_state(
        tuning in arb_tuning(),
        frames in arb_frames(),
        paused_frames in arb_frames(),
    ) {
        let mut engine = started(tuning);
        for (dt, input) in &frames {
            engine.tick(*dt, input);
        }
        if engine.pause().is_some() {
            let frozen = engine.state().clone();
            for (dt, input) in &paused_frames {
                if let Some(x) = input.pointer_x {
                    engine.set_pointer_target(x);
                }
                engine.set_direction(input.direction.unwrap_or(0.0));
                prop_assert!(engine.tick(*dt, input).is_empty());
                prop_assert_eq!(engine.state(), &frozen);
            }
        }
    }
}
