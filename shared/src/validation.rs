//! Validation utilities for planting and crop catalog input
//!
//! The forecasting engine itself never rejects input; these checks run at the
//! edges where records are created.

use crate::forecast::{parse_spacing, suitable_months};
use crate::models::CropBaseline;

// ============================================================================
// Planting Validations
// ============================================================================

/// Validate planted area in hectares is positive and finite
pub fn validate_planting_area(area_hectares: f64) -> Result<(), &'static str> {
    if !area_hectares.is_finite() {
        return Err("Area must be a number");
    }
    if area_hectares <= 0.0 {
        return Err("Area must be greater than 0 hectares");
    }
    Ok(())
}

/// Validate an optional seed or fertilizer quantity
pub fn validate_input_quantity(quantity: Option<f64>) -> Result<(), &'static str> {
    match quantity {
        Some(q) if !q.is_finite() => Err("Quantity must be a number"),
        Some(q) if q < 0.0 => Err("Quantity cannot be negative"),
        _ => Ok(()),
    }
}

/// Validate spacing text such as "20x20 cm" or "10x10 m"
pub fn validate_spacing(spacing: &str) -> Result<(), &'static str> {
    match parse_spacing(spacing) {
        Some(s) if s.row_m > 0.0 && s.hill_m > 0.0 => Ok(()),
        Some(_) => Err("Spacing dimensions must be greater than 0"),
        None => Err("Spacing must look like '20x20 cm' or '10x10 m'"),
    }
}

// ============================================================================
// Crop Catalog Validations
// ============================================================================

/// Validate an ideal-seasons string names at least one month, e.g. "Jan-Mar, Jul-Sep"
pub fn validate_ideal_seasons(ideal_seasons: &str) -> Result<(), &'static str> {
    if ideal_seasons.trim().is_empty() {
        return Err("Ideal seasons cannot be empty");
    }
    if suitable_months(ideal_seasons).is_empty() {
        return Err("Ideal seasons must use month ranges like 'Jan-Mar, Jul-Sep'");
    }
    Ok(())
}

/// Validate baseline rates are non-negative and each range has min <= max
pub fn validate_baseline_ranges(baseline: &CropBaseline) -> Result<(), &'static str> {
    let ranges = [
        (baseline.seed_rate_min_kg, baseline.seed_rate_max_kg),
        (baseline.fert_sacks_min, baseline.fert_sacks_max),
        (baseline.yield_min_tonnes_per_ha, baseline.yield_max_tonnes_per_ha),
    ];

    for (min, max) in ranges {
        if !min.is_finite() || !max.is_finite() {
            return Err("Baseline values must be numbers");
        }
        if min < 0.0 || max < 0.0 {
            return Err("Baseline values cannot be negative");
        }
    }
    if ranges.iter().any(|(min, max)| min > max) {
        return Err("Baseline minimum cannot exceed maximum");
    }

    if baseline.days_to_harvest_min < 0 || baseline.days_to_harvest_max < 0 {
        return Err("Days to harvest cannot be negative");
    }
    if baseline.days_to_harvest_min > baseline.days_to_harvest_max {
        return Err("Days to harvest minimum cannot exceed maximum");
    }
    Ok(())
}

/// Validate a crop name (1-100 characters, not blank)
pub fn validate_crop_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Crop name cannot be empty");
    }
    if trimmed.chars().count() > 100 {
        return Err("Crop name must be at most 100 characters");
    }
    Ok(())
}
