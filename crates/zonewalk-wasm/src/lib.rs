//! Browser bridge. The renderer owns the canvas, buttons and frame timer;
//! everything it reads crosses as serde-serialized JS objects.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use zonewalk_core::config::{LayoutParams, SessionConfig};
use zonewalk_core::generator::{generate_layout, layout_rng, Layout};
use zonewalk_core::session::Session;

/// Parse a session config; an empty string means all defaults.
fn parse_session_config(config_json: &str) -> Result<SessionConfig, String> {
    if config_json.trim().is_empty() {
        return Ok(SessionConfig::default());
    }
    SessionConfig::from_json(config_json).map_err(|e| format!("Invalid config: {e}"))
}

fn layout_from_json(params_json: &str) -> Result<Layout, String> {
    let params: LayoutParams = if params_json.trim().is_empty() {
        LayoutParams::default()
    } else {
        serde_json::from_str(params_json).map_err(|e| format!("Invalid params: {e}"))?
    };
    generate_layout(&params, &mut layout_rng(params.seed)).map_err(|e| format!("Invalid params: {e}"))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Generate a single layout from the given parameters JSON.
#[wasm_bindgen(js_name = generateLayout)]
pub fn generate_layout_js(params_json: &str) -> Result<JsValue, JsValue> {
    let layout = layout_from_json(params_json).map_err(|e| JsValue::from_str(&e))?;
    to_js(&layout)
}

/// A live session: one map plus the two agents the page animates.
#[wasm_bindgen]
pub struct WasmSession {
    inner: Session,
}

#[wasm_bindgen]
impl WasmSession {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmSession, JsValue> {
        let config = parse_session_config(config_json).map_err(|e| JsValue::from_str(&e))?;
        let inner = Session::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmSession { inner })
    }

    pub fn regenerate(&mut self) {
        self.inner.regenerate();
    }

    /// Returns the chosen start cell.
    #[wasm_bindgen(js_name = startHillClimb)]
    pub fn start_hill_climb(&mut self) -> Result<JsValue, JsValue> {
        let start = self.inner.start_hill_climb();
        to_js(&start)
    }

    /// `temperature` of `undefined` uses the configured initial temperature.
    #[wasm_bindgen(js_name = startAnnealing)]
    pub fn start_annealing(&mut self, temperature: Option<f64>) -> Result<JsValue, JsValue> {
        let start = self
            .inner
            .start_annealing(temperature)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&start)
    }

    /// Tick outcome, or `undefined` when no hill climber is running.
    #[wasm_bindgen(js_name = tickHillClimb)]
    pub fn tick_hill_climb(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.tick_hill_climb())
    }

    /// Tick outcome, or `undefined` when no annealer is running.
    #[wasm_bindgen(js_name = tickAnnealing)]
    pub fn tick_annealing(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.tick_annealing())
    }

    #[wasm_bindgen(js_name = stopHillClimb)]
    pub fn stop_hill_climb(&mut self) {
        self.inner.stop_hill_climb();
    }

    #[wasm_bindgen(js_name = stopAnnealing)]
    pub fn stop_annealing(&mut self) {
        self.inner.stop_annealing();
    }

    pub fn layout(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.layout())
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_means_defaults() {
        assert_eq!(parse_session_config("  ").unwrap(), SessionConfig::default());
    }

    #[test]
    fn bad_config_reports_reason() {
        let err = parse_session_config(r#"{"layout": {"rows": 3}}"#).unwrap_err();
        assert!(err.starts_with("Invalid config:"), "{err}");
        assert!(parse_session_config("{not json").is_err());
    }

    #[test]
    fn seeded_layout_json_is_reproducible() {
        let a = layout_from_json(r#"{"seed": 12}"#).unwrap();
        let b = layout_from_json(r#"{"seed": 12}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.grid.rows(), 30);
    }
}
