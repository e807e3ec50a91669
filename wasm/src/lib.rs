//! WebAssembly module for the Farm Records Platform
//!
//! Provides client-side computation for:
//! - Yield forecasts from a planting form, before it is saved
//! - Seasonal suitability of a planting month
//! - Planting density from a spacing string

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Forecast a planting. Both arguments and the result are JSON.
///
/// `planting_json` is a `PlantingRecord`, `baseline_json` a `CropBaseline`.
#[wasm_bindgen]
pub fn compute_yield_forecast(planting_json: &str, baseline_json: &str) -> Result<String, JsValue> {
    let planting: PlantingRecord = serde_json::from_str(planting_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid planting JSON: {}", e)))?;
    let baseline: CropBaseline = serde_json::from_str(baseline_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid baseline JSON: {}", e)))?;

    let forecast = shared::compute_forecast(&planting, &baseline);

    serde_json::to_string(&forecast)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize forecast: {}", e)))
}

/// Suitability multiplier (1.0, 0.9 or 0.8) for planting in `month` (1-12)
#[wasm_bindgen]
pub fn season_suitability(ideal_seasons: &str, month: u32) -> f64 {
    shared::season_factor(ideal_seasons, month)
}

/// Suitability of the current browser month
#[wasm_bindgen]
pub fn season_suitability_now(ideal_seasons: &str) -> f64 {
    let month = js_sys::Date::new_0().get_month() + 1;
    season_suitability(ideal_seasons, month)
}

/// Plants per hectare for a spacing such as `"20x20 cm"`
#[wasm_bindgen]
pub fn spacing_density(spacing: &str) -> Option<f64> {
    shared::parse_spacing(spacing).and_then(|s| shared::plants_per_hectare(&s))
}

/// Form-level check of planting inputs; returns an error message or `None`
#[wasm_bindgen]
pub fn validate_planting_form(area_ha: f64, spacing: Option<String>) -> Option<String> {
    if let Err(msg) = validate_planting_area(area_ha) {
        return Some(msg.to_string());
    }
    match spacing.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => validate_spacing(s).err().map(str::to_string),
        _ => None,
    }
}
