//! Frame timing

/// Turns animation-frame timestamps (ms) into clamped simulation deltas (s)
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Delta since the previous frame. The first frame after a reset yields 0.
    pub fn frame(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(timestamp_ms);
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }

    /// Forget the previous frame (round start, resume)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Wall-clock time in ms since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::new(0.05);
        assert_eq!(clock.frame(1000.0), 0.0);
        assert!((clock.frame(1016.0) - 0.016).abs() < 1e-6);
        // Tab was in the background for a minute
        assert_eq!(clock.frame(61016.0), 0.05);
        // Timestamps going backwards never produce a negative delta
        assert_eq!(clock.frame(60000.0), 0.0);

        clock.reset();
        assert_eq!(clock.frame(90000.0), 0.0);
    }
}
