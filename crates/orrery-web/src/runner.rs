use orrery_engine::catalog;
use orrery_engine::{
    BodyDesc, FrameClock, InputEvent, InputQueue, ProtocolLayout, SimConfig, Simulation,
};

use crate::narrative::{NarrativeCache, PlanetReport};

/// Owns the simulation and everything the browser reads from it.
///
/// The wasm exports in `lib.rs` keep one of these in a `thread_local!`,
/// because wasm-bindgen cannot export the engine types directly.
pub struct SimRunner {
    sim: Simulation,
    input: InputQueue,
    clock: FrameClock,
    layout: ProtocolLayout,
    /// Flat frame buffer read by JS through `frame_ptr`.
    frame_buffer: Vec<f32>,
    reports: NarrativeCache,
}

impl SimRunner {
    pub fn new(config: SimConfig, bodies: &[BodyDesc]) -> Self {
        let config = config.sanitized();
        let clock = FrameClock::new(config.max_frame_dt);
        let sim = Simulation::from_descs(config, bodies);
        let layout = ProtocolLayout::for_simulation(&sim);
        let mut frame_buffer = vec![0.0; layout.buffer_total_floats];
        layout.pack_static(&sim, &mut frame_buffer);
        layout.pack_frame(&sim, &mut frame_buffer);

        Self {
            sim,
            input: InputQueue::new(),
            clock,
            layout,
            frame_buffer,
            reports: NarrativeCache::new(),
        }
    }

    /// Build from optional JSON config and body list. Malformed JSON is
    /// logged and replaced by the defaults.
    pub fn from_json(config_json: Option<&str>, bodies_json: Option<&str>) -> Self {
        let config = match config_json {
            Some(json) => SimConfig::from_json(json).unwrap_or_else(|e| {
                log::warn!("config: {e}, using defaults");
                SimConfig::default()
            }),
            None => SimConfig::default(),
        };
        let bodies = match bodies_json {
            Some(json) => BodyDesc::list_from_json(json).unwrap_or_else(|e| {
                log::warn!("bodies: {e}, using built-in catalog");
                catalog::default_bodies()
            }),
            None => catalog::default_bodies(),
        };
        Self::new(config, &bodies)
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: apply queued input, tick, repack the frame buffer.
    /// Returns false when the frame was skipped. Input stays queued until a
    /// frame is accepted, so the header never lags the applied state.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(dt) = self.clock.advance(dt) else {
            return false;
        };
        for event in self.input.drain() {
            self.sim.apply_input(event);
        }
        if !self.sim.tick(dt) {
            return false;
        }
        self.layout.pack_frame(&self.sim, &mut self.frame_buffer)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    // ---- Frame buffer accessors ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame_buffer.as_ptr()
    }

    pub fn frame_len(&self) -> u32 {
        self.frame_buffer.len() as u32
    }

    pub fn frame(&self) -> &[f32] {
        &self.frame_buffer
    }

    // ---- Body metadata ----

    pub fn body_count(&self) -> u32 {
        self.sim.bodies().len() as u32
    }

    pub fn body_name(&self, idx: usize) -> Option<&str> {
        self.sim.body(idx).map(|b| b.name.as_str())
    }

    /// Orbit ring for drawing, flattened xyz.
    pub fn orbit_path(&self, idx: usize, segments: usize) -> Vec<f32> {
        self.sim
            .body(idx)
            .map(|b| {
                b.orbit_path(segments)
                    .into_iter()
                    .flat_map(|p| p.to_array())
                    .collect()
            })
            .unwrap_or_default()
    }

    // ---- Narrative ----

    pub fn store_report(&mut self, name: &str, json: &str) -> bool {
        match self.reports.insert_json(name, json) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("report for {name}: {e}");
                false
            }
        }
    }

    pub fn report(&self, name: &str) -> PlanetReport {
        self.reports.report_for(name)
    }

    pub fn selected_report(&self) -> Option<PlanetReport> {
        self.sim.selected_body().map(|b| self.report(&b.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::bridge::protocol::{HEADER_FRAME_COUNTER, HEADER_SELECTED, HEADER_SCANNING};

    #[test]
    fn tick_applies_input_then_packs() {
        let mut runner = SimRunner::from_json(None, None);
        runner.push_input(InputEvent::Select { index: Some(3) });
        runner.push_input(InputEvent::Scanning { active: true });
        assert!(runner.tick(1.0 / 60.0));
        assert_eq!(runner.frame()[HEADER_SELECTED], 3.0);
        assert_eq!(runner.frame()[HEADER_SCANNING], 1.0);
        assert_eq!(runner.frame()[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(runner.frame_len() as usize, runner.layout().buffer_total_floats);
    }

    #[test]
    fn bad_frames_are_skipped() {
        let mut runner = SimRunner::from_json(None, None);
        assert!(!runner.tick(0.0));
        assert!(!runner.tick(f32::NAN));
        assert_eq!(runner.simulation().frame(), 0);
        assert!(runner.tick(3.0));
        assert_eq!(runner.simulation().frame(), 1);
    }

    #[test]
    fn input_waits_for_an_accepted_frame() {
        let mut runner = SimRunner::from_json(None, None);
        runner.push_input(InputEvent::Select { index: Some(5) });
        runner.push_input(InputEvent::Scanning { active: true });
        assert!(!runner.tick(f32::NAN));
        assert_eq!(runner.simulation().selected(), Some(2));
        assert!(!runner.simulation().scanning());
        assert_eq!(runner.frame()[HEADER_SELECTED], 2.0);
        assert_eq!(runner.frame()[HEADER_SCANNING], 0.0);

        assert!(runner.tick(1.0 / 60.0));
        assert_eq!(runner.simulation().selected(), Some(5));
        assert_eq!(runner.frame()[HEADER_SELECTED], 5.0);
        assert_eq!(runner.frame()[HEADER_SCANNING], 1.0);
    }

    #[test]
    fn bad_json_falls_back_to_defaults() {
        let runner = SimRunner::from_json(Some("{"), Some("[1, 2]"));
        assert_eq!(runner.body_count(), 8);
        assert_eq!(runner.simulation().config(), &SimConfig::default());
    }

    #[test]
    fn custom_bodies_and_config() {
        let bodies = r##"[{ "name": "Solo", "color": "#FFFFFF", "radiusScale": 1, "distance": 40, "speed": 0.02 }]"##;
        let runner = SimRunner::from_json(Some(r#"{ "belt_count": 10, "initial_selection": 0 }"#), Some(bodies));
        assert_eq!(runner.body_count(), 1);
        assert_eq!(runner.body_name(0), Some("Solo"));
        assert_eq!(runner.layout().belt_count, 10);
        assert_eq!(runner.orbit_path(0, 16).len(), 17 * 3);
        assert!(runner.orbit_path(5, 16).is_empty());
    }

    #[test]
    fn reports_for_selected_body() {
        let mut runner = SimRunner::from_json(None, None);
        assert!(runner.selected_report().is_some());
        assert!(!runner.store_report("Earth", "not json"));
    }
}
