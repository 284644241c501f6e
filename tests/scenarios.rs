use catch_snowflake::sim::{
    EndReason, Engine, GameEvent, RemovalReason, RoundPhase, RoundState, Snowflake, TickInput,
    tick,
};
use catch_snowflake::tuning::{LossBudget, Tuning};
use catch_snowflake::ConfigError;
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

const DT: f32 = 1.0 / 60.0;

/// Running round with spawning held off, so only hand-placed snowflakes exist
fn quiet_round(tuning: &Tuning) -> RoundState {
    let mut state = RoundState::new(tuning);
    state.phase = RoundPhase::Running;
    state.spawn_timer = f32::MAX;
    state
}

fn drop_flake(state: &mut RoundState, x: f32) {
    let id = state.next_snowflake_id();
    state.snowflakes.push(Snowflake {
        id,
        pos: Vec2::new(x, -16.0),
        size: 16.0,
        speed: 90.0,
        drift: 0.0,
        wobble: 1.5,
        phase: 0.0,
    });
}

#[test]
fn timed_round_ends_by_whichever_limit_comes_first() {
    let tuning = Tuning::timed();
    let mut engine: Engine = Engine::new(tuning).expect("valid tuning");
    engine.restart();
    // Park the catcher in a corner and never move it
    engine.set_pointer_target(0.0);

    let mut ended = None;
    let mut t = 0.0;
    while t < 61.0 {
        for event in engine.tick(DT, &TickInput::default()) {
            if let GameEvent::RoundEnded { reason, .. } = event {
                ended = Some(reason);
            }
        }
        t += DT;
    }

    let state = engine.state();
    match ended {
        Some(EndReason::Exhausted) => {
            assert_eq!(state.loss_count, 5);
            assert!(state.time_remaining.unwrap_or(0.0) >= 0.0);
        }
        Some(EndReason::TimeUp) => {
            assert!(state.loss_count < 5);
            assert_eq!(state.time_remaining, Some(0.0));
        }
        other => panic!("round did not end properly: {:?}", other),
    }
    assert!(state.is_over());
}

#[test]
fn straight_snowflake_over_catcher_is_caught() {
    let tuning = Tuning::default();
    let mut state = quiet_round(&tuning);
    let mut rng = Pcg32::seed_from_u64(3);
    state.set_pointer_target(100.0);
    state.catcher.x = 100.0;
    drop_flake(&mut state, 100.0);

    let mut removed = Vec::new();
    for _ in 0..600 {
        for event in tick(&mut state, &tuning, &TickInput::default(), DT, &mut rng) {
            if let GameEvent::SnowflakeRemoved { reason, .. } = event {
                removed.push(reason);
            }
        }
        if !removed.is_empty() {
            break;
        }
    }

    assert_eq!(removed, vec![RemovalReason::Caught]);
    assert_eq!(state.score, 1);
    assert!(state.snowflakes.is_empty());
}

#[test]
fn snowflake_with_nobody_underneath_is_missed() {
    let tuning = Tuning::timed();
    let mut state = quiet_round(&tuning);
    let mut rng = Pcg32::seed_from_u64(3);
    state.set_pointer_target(700.0);
    state.catcher.x = 700.0;
    drop_flake(&mut state, 100.0);

    assert_eq!(state.loss_count, 0);
    let mut lives_events = Vec::new();
    for _ in 0..600 {
        for event in tick(&mut state, &tuning, &TickInput::default(), DT, &mut rng) {
            if let GameEvent::LivesChanged { count, limit } = event {
                lives_events.push((count, limit));
            }
        }
        if state.snowflakes.is_empty() {
            break;
        }
    }

    assert_eq!(lives_events, vec![(1, 5)]);
    assert_eq!(state.loss_count, 1);
    assert_eq!(state.score, 0);
}

#[test]
fn last_life_ends_round_on_the_same_tick() {
    let tuning = Tuning {
        loss_budget: LossBudget::Lives(1),
        ..Tuning::default()
    };
    let mut state = quiet_round(&tuning);
    let mut rng = Pcg32::seed_from_u64(3);
    state.set_pointer_target(700.0);
    state.catcher.x = 700.0;
    drop_flake(&mut state, 100.0);

    for _ in 0..600 {
        let events = tick(&mut state, &tuning, &TickInput::default(), DT, &mut rng);
        if events.iter().any(|e| matches!(e, GameEvent::LivesChanged { .. })) {
            assert_eq!(
                events.last(),
                Some(&GameEvent::RoundEnded {
                    final_score: 0,
                    reason: EndReason::Exhausted
                })
            );
            break;
        }
    }
    assert_eq!(state.phase, RoundPhase::Ended(EndReason::Exhausted));
}

#[test]
fn start_twice_resets_identically() {
    let mut engine: Engine = Engine::new(Tuning::default()).expect("valid tuning");

    let first_events = engine.restart();
    let fresh = engine.state().clone();
    let mut first_run = Vec::new();
    for _ in 0..300 {
        first_run.extend(engine.tick(DT, &TickInput::from_keys(false, true, None)));
    }
    assert_ne!(engine.state(), &fresh);

    let second_events = engine.start(Tuning::default()).expect("valid tuning");
    assert_eq!(first_events, second_events);
    assert_eq!(engine.state(), &fresh);

    let mut second_run = Vec::new();
    for _ in 0..300 {
        second_run.extend(engine.tick(DT, &TickInput::from_keys(false, true, None)));
    }
    assert_eq!(first_run, second_run);
}

#[test]
fn invalid_configuration_is_refused_at_start() {
    let mut engine: Engine = Engine::new(Tuning::default()).expect("valid tuning");
    let bad = Tuning {
        duration: Some(0.0),
        ..Tuning::timed()
    };
    assert_eq!(engine.start(bad), Err(ConfigError::Duration(0.0)));
    assert_eq!(engine.state().phase, RoundPhase::Ready);

    assert!(matches!(
        Engine::<Pcg32>::new(Tuning {
            loss_budget: LossBudget::Lives(0),
            ..Tuning::default()
        }),
        Err(ConfigError::LossBudget)
    ));
}
