//! Game session: the engine plus its collaborators
//!
//! A [`Session`] is created when the game view mounts and dropped when it
//! unmounts. It owns the input source, renderer, score store and observers
//! explicitly instead of reaching for process-wide globals.

use crate::error::ConfigError;
use crate::highscores::HighScores;
use crate::platform::input::InputSource;
use crate::platform::storage::ScoreStore;
use crate::platform::time::{FrameClock, now_ms};
use crate::renderer::Renderer;
use crate::sim::{EndReason, Engine, GameEvent, RemovalReason, Snowflake, SnowflakeId};
use crate::tuning::Tuning;

/// Receives round events. Every method defaults to doing nothing.
pub trait RoundObserver {
    fn on_score_changed(&mut self, _score: u64) {}
    fn on_lives_changed(&mut self, _count: u32, _limit: u32) {}
    fn on_timer_changed(&mut self, _seconds_remaining: u32) {}
    fn on_snowflake_spawned(&mut self, _flake: &Snowflake) {}
    fn on_snowflake_removed(&mut self, _id: SnowflakeId, _reason: RemovalReason, _x: f32, _y: f32) {}
    fn on_round_ended(&mut self, _final_score: u64, _reason: EndReason) {}
    fn on_paused(&mut self) {}
    fn on_resumed(&mut self) {}
}

/// Route one event to the matching observer method
pub fn dispatch(observer: &mut dyn RoundObserver, event: &GameEvent) {
    match event {
        GameEvent::ScoreChanged(score) => observer.on_score_changed(*score),
        GameEvent::LivesChanged { count, limit } => observer.on_lives_changed(*count, *limit),
        GameEvent::TimerChanged { seconds_remaining } => {
            observer.on_timer_changed(*seconds_remaining)
        }
        GameEvent::SnowflakeSpawned(flake) => observer.on_snowflake_spawned(flake),
        GameEvent::SnowflakeRemoved { id, reason, x, y } => {
            observer.on_snowflake_removed(*id, *reason, *x, *y)
        }
        GameEvent::RoundEnded {
            final_score,
            reason,
        } => observer.on_round_ended(*final_score, *reason),
        GameEvent::Paused => observer.on_paused(),
        GameEvent::Resumed => observer.on_resumed(),
    }
}

/// How the last round finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub score: u64,
    pub reason: EndReason,
}

pub struct Session<I: InputSource> {
    engine: Engine,
    input: I,
    renderer: Box<dyn Renderer>,
    store: Box<dyn ScoreStore>,
    observers: Vec<Box<dyn RoundObserver>>,
    clock: FrameClock,
    scores: HighScores,
    last_result: Option<RoundResult>,
}

impl<I: InputSource> Session<I> {
    pub fn new(
        tuning: Tuning,
        input: I,
        renderer: Box<dyn Renderer>,
        store: Box<dyn ScoreStore>,
    ) -> Result<Self, ConfigError> {
        let scores = HighScores::load_from(store.as_ref(), tuning.max_high_scores);
        let clock = FrameClock::new(tuning.max_dt);
        Ok(Self {
            engine: Engine::new(tuning)?,
            input,
            renderer,
            store,
            observers: Vec::new(),
            clock,
            scores,
            last_result: None,
        })
    }

    pub fn observe(&mut self, observer: Box<dyn RoundObserver>) {
        self.observers.push(observer);
    }

    /// Start (or restart) a round with the current tuning
    pub fn start(&mut self) {
        let events = self.engine.restart();
        self.begin(events);
    }

    /// Start a round with new tuning; refused if the tuning is invalid
    pub fn start_with(&mut self, tuning: Tuning) -> Result<(), ConfigError> {
        let events = self.engine.start(tuning)?;
        self.clock = FrameClock::new(self.engine.tuning().max_dt);
        self.begin(events);
        Ok(())
    }

    fn begin(&mut self, events: Vec<GameEvent>) {
        self.last_result = None;
        self.clock.reset();
        self.publish(&events);
        self.renderer.draw(&self.engine.snapshot());
    }

    /// One animation frame at `timestamp_ms`
    pub fn frame(&mut self, timestamp_ms: f64) -> Vec<GameEvent> {
        let dt = self.clock.frame(timestamp_ms);
        self.step(dt)
    }

    /// One frame with an explicit delta. Paused or finished rounds still render.
    pub fn step(&mut self, dt: f32) -> Vec<GameEvent> {
        let input = self.input.snapshot(&self.engine.snapshot());
        let events = self.engine.tick(dt, &input);
        self.publish(&events);
        self.renderer.draw(&self.engine.snapshot());
        events
    }

    pub fn pause(&mut self) -> bool {
        let event = self.engine.pause();
        self.publish_one(event)
    }

    pub fn resume(&mut self) -> bool {
        let event = self.engine.resume();
        self.clock.reset();
        self.publish_one(event)
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.engine.state().is_paused() {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// End the current round early (reset button)
    pub fn stop(&mut self) {
        let events = self.engine.stop(EndReason::Stopped);
        self.publish(&events);
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        self.engine.resize(width, height)?;
        self.renderer.draw(&self.engine.snapshot());
        Ok(())
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn last_result(&self) -> Option<RoundResult> {
        self.last_result
    }

    /// Fold a secondary leaderboard into this one and persist the result.
    /// Returns whether anything new made the board.
    pub fn import_scores(&mut self, source: &dyn ScoreStore) -> bool {
        let changed = self.scores.import_from(source);
        if changed {
            self.scores.save_to(self.store.as_mut());
        }
        changed
    }

    /// Whether the finished round earned a leaderboard spot
    pub fn qualifies(&self) -> bool {
        self.last_result
            .map(|r| self.scores.qualifies(r.score))
            .unwrap_or(false)
    }

    /// Record the finished round under `name` and persist the board.
    /// Returns the rank, or None if there was nothing to record.
    pub fn submit_score(&mut self, name: &str) -> Option<usize> {
        let result = self.last_result.take()?;
        let rank = self.scores.add_score(name, result.score, now_ms())?;
        self.scores.save_to(self.store.as_mut());
        Some(rank)
    }

    /// Tear down: end any active round and hand back the leaderboard
    pub fn shutdown(mut self) -> HighScores {
        self.stop();
        log::info!("Session closed");
        self.scores
    }

    fn publish_one(&mut self, event: Option<GameEvent>) -> bool {
        match event {
            Some(event) => {
                self.publish(std::slice::from_ref(&event));
                true
            }
            None => false,
        }
    }

    fn publish(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::RoundEnded {
                final_score,
                reason,
            } = *event
            {
                self.last_result = Some(RoundResult {
                    score: final_score,
                    reason,
                });
            }
            for observer in &mut self.observers {
                dispatch(observer.as_mut(), event);
            }
        }
    }
}
