/// Frame delta filter.
/// Turns the raw render-loop delta into the delta a tick should use:
/// rejects garbage and caps long stalls (tab switches, debugger pauses).
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Largest delta handed to a tick.
    max_dt: f32,
    /// Total simulated time in seconds.
    elapsed: f64,
    /// Accepted frames so far.
    frames: u64,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            max_dt,
            elapsed: 0.0,
            frames: 0,
        }
    }

    /// Filter one frame delta. Returns `None` when the frame should be
    /// skipped, otherwise the (possibly clamped) delta to simulate.
    pub fn advance(&mut self, frame_dt: f32) -> Option<f32> {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            log::warn!("skipping frame with invalid delta {frame_dt}");
            return None;
        }
        let dt = if frame_dt > self.max_dt {
            log::debug!("clamping frame delta {frame_dt} to {}", self.max_dt);
            self.max_dt
        } else {
            frame_dt
        };
        self.elapsed += dt as f64;
        self.frames += 1;
        Some(dt)
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }

    /// Simulated seconds since construction.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
