//! Browser bindings
//!
//! The page owns the DOM; it forwards events here and draws from
//! `snapshot_json`. Events come back as a JSON array after every frame.

use wasm_bindgen::prelude::*;

use super::input::KeyboardPointer;
use super::storage::{LocalStore, MemoryStore, parse_entries};
use crate::renderer::LogRenderer;
use crate::session::Session;
use crate::sim::GameEvent;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger not installed: {}", e).into());
    }
}

#[wasm_bindgen]
pub struct WasmGame {
    session: Session<KeyboardPointer>,
}

#[wasm_bindgen]
impl WasmGame {
    /// `tuning_json` may be empty for the classic mode
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: &str, width: f32, height: f32) -> Result<WasmGame, JsValue> {
        let base = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).map_err(to_js)?
        };
        let tuning = Tuning {
            playfield_width: width,
            playfield_height: height,
            seed: js_sys::Date::now() as u64,
            ..base
        };
        let session = Session::new(
            tuning,
            KeyboardPointer::new(),
            Box::new(LogRenderer::new(600)),
            Box::new(LocalStore),
        )
        .map_err(to_js)?;
        log::info!("Catch Snowflake ready ({}x{})", width, height);
        Ok(Self { session })
    }

    /// New round with a fresh seed, so consecutive rounds differ
    pub fn start(&mut self) {
        let tuning = Tuning {
            seed: js_sys::Date::now() as u64,
            ..self.session.engine().tuning().clone()
        };
        if let Err(e) = self.session.start_with(tuning) {
            log::error!("Could not start round: {}", e);
        }
    }

    /// Advance to `timestamp_ms` (requestAnimationFrame time); returns events as JSON
    pub fn frame(&mut self, timestamp_ms: f64) -> String {
        if self.session.input_mut().take_start_request() && !self.session.engine().is_running()
        {
            self.start();
        }
        events_json(&self.session.frame(timestamp_ms))
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.session.input_mut().key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.session.input_mut().key_up(key)
    }

    pub fn pointer_down(&mut self, x: f32) {
        self.session.input_mut().pointer_down(x);
    }

    pub fn pointer_move(&mut self, x: f32) {
        self.session.input_mut().pointer_move(x);
    }

    pub fn pointer_up(&mut self) {
        self.session.input_mut().pointer_up();
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.session.toggle_pause()
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        self.session.resize(width, height).map_err(to_js)
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.session.engine().snapshot()).unwrap_or_default()
    }

    pub fn qualifies(&self) -> bool {
        self.session.qualifies()
    }

    /// Returns the 1-based rank, or 0 if nothing was recorded
    pub fn submit_score(&mut self, name: &str) -> usize {
        self.session.submit_score(name).unwrap_or(0)
    }

    /// Merge a bundled leaderboard (JSON array) into the saved one
    pub fn import_high_scores(&mut self, json: &str) -> Result<bool, JsValue> {
        let entries = parse_entries(json).map_err(to_js)?;
        Ok(self.session.import_scores(&MemoryStore::with_entries(entries)))
    }

    /// 1-based rank of the first entry with `score`, or 0 if none
    pub fn rank_of(&self, score: u64) -> usize {
        self.session.high_scores().rank_of(score).unwrap_or(0)
    }

    pub fn high_scores_json(&self) -> String {
        serde_json::to_string(&self.session.high_scores().entries).unwrap_or_default()
    }
}

fn events_json(events: &[GameEvent]) -> String {
    serde_json::to_string(events).unwrap_or_else(|e| {
        log::error!("Could not serialize events: {}", e);
        "[]".to_string()
    })
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
