pub mod narrative;
pub mod runner;

pub use narrative::{NarrativeCache, PlanetReport};
pub use runner::SimRunner;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use orrery_engine::InputEvent;

thread_local! {
    static RUNNER: RefCell<Option<SimRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut SimRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Simulation not initialized. Call orrery_init() first.");
        f(runner)
    })
}

/// Negative indices from JS mean "none".
fn index_arg(index: i32) -> Option<usize> {
    usize::try_from(index).ok()
}

/// Build the simulation. Both arguments are optional JSON: a partial
/// `SimConfig` and an array of body descriptions.
#[wasm_bindgen]
pub fn orrery_init(config_json: Option<String>, bodies_json: Option<String>) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = SimRunner::from_json(config_json.as_deref(), bodies_json.as_deref());
    let bodies = runner.body_count();

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });

    log::info!("orrery: initialized with {bodies} bodies");
}

#[wasm_bindgen]
pub fn orrery_tick(dt: f32) -> bool {
    with_runner(|r| r.tick(dt))
}

#[wasm_bindgen]
pub fn orrery_select(index: i32) {
    with_runner(|r| r.push_input(InputEvent::Select { index: index_arg(index) }));
}

#[wasm_bindgen]
pub fn orrery_hover(index: i32) {
    with_runner(|r| r.push_input(InputEvent::Hover { index: index_arg(index) }));
}

#[wasm_bindgen]
pub fn orrery_set_scanning(active: bool) {
    with_runner(|r| r.push_input(InputEvent::Scanning { active }));
}

// ---- Frame buffer ----

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const f32 {
    with_runner(|r| r.frame_ptr())
}

#[wasm_bindgen]
pub fn get_frame_len() -> u32 {
    with_runner(|r| r.frame_len())
}

/// Copy of the frame buffer, for hosts without shared memory access.
#[wasm_bindgen]
pub fn get_frame_snapshot() -> js_sys::Float32Array {
    with_runner(|r| js_sys::Float32Array::from(r.frame()))
}

// ---- Layout accessors ----

#[wasm_bindgen]
pub fn get_body_data_offset() -> u32 {
    with_runner(|r| r.layout().body_data_offset as u32)
}

#[wasm_bindgen]
pub fn get_flare_data_offset() -> u32 {
    with_runner(|r| r.layout().flare_data_offset as u32)
}

#[wasm_bindgen]
pub fn get_debris_data_offset() -> u32 {
    with_runner(|r| r.layout().debris_data_offset as u32)
}

#[wasm_bindgen]
pub fn get_belt_data_offset() -> u32 {
    with_runner(|r| r.layout().belt_data_offset as u32)
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.layout().buffer_total_floats as u32)
}

// ---- Bodies ----

#[wasm_bindgen]
pub fn get_body_count() -> u32 {
    with_runner(|r| r.body_count())
}

#[wasm_bindgen]
pub fn get_body_names() -> js_sys::Array {
    with_runner(|r| {
        (0..r.body_count() as usize)
            .filter_map(|i| r.body_name(i))
            .map(JsValue::from_str)
            .collect()
    })
}

#[wasm_bindgen]
pub fn get_orbit_path(index: u32, segments: u32) -> js_sys::Float32Array {
    with_runner(|r| js_sys::Float32Array::from(r.orbit_path(index as usize, segments as usize).as_slice()))
}

// ---- Narrative ----

/// Cache a report from the text service. Returns false on malformed JSON.
#[wasm_bindgen]
pub fn orrery_store_report(name: &str, json: &str) -> bool {
    with_runner(|r| r.store_report(name, json))
}

/// Report for `name` as JSON: cached, built-in or placeholder.
#[wasm_bindgen]
pub fn get_report_json(name: &str) -> String {
    with_runner(|r| {
        r.report(name).to_json().unwrap_or_else(|e| {
            log::warn!("report for {name}: {e}");
            String::new()
        })
    })
}
