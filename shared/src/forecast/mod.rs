//! Yield forecasting engine
//!
//! A deterministic, rules-based estimate of the yield range and harvest window
//! for a planting. The per-hectare baseline yield of a crop is scaled by three
//! multipliers:
//! - seasonal suitability of the planting month
//! - seed and fertilizer application against the recommended rates
//! - planting density, for crops listed in a [`DensityTable`]
//!
//! Every function here is pure. Malformed or missing inputs degrade to neutral
//! factors instead of failing.

mod inputs;
mod population;
mod season;
mod spacing;

use chrono::{Datelike, Days, NaiveDate};

use crate::models::{CropBaseline, ForecastResult, PlantingRecord};

pub use inputs::{
    efficiency_factor, input_factors, InputFactors, FERTILIZER_FACTOR_BOUNDS, SEED_FACTOR_BOUNDS,
};
pub use population::{population_factor, DensityProfile, DensityTable, POPULATION_FACTOR_BOUNDS};
pub use season::{
    season_factor, suitable_months, IN_SEASON_FACTOR, OFF_SEASON_FACTOR, SHOULDER_FACTOR,
};
pub use spacing::{parse_spacing, plants_per_hectare, SQUARE_METERS_PER_HECTARE};

/// Smallest planted area used in calculations
pub const MIN_AREA_HECTARES: f64 = 1e-6;

/// Sanity band for the product of all multipliers
pub const COMBINED_FACTOR_BOUNDS: (f64, f64) = (0.5, 1.3);

/// Note attached to forecasts for crops without a yield baseline
pub const MISSING_BASELINE_NOTE: &str = "Missing baseline yields for this crop.";

const KG_PER_TONNE: f64 = 1000.0;

/// Forecast a planting using the default density table
pub fn compute_forecast(planting: &PlantingRecord, baseline: &CropBaseline) -> ForecastResult {
    compute_forecast_with(planting, baseline, &DensityTable::default())
}

/// Forecast a planting against a crop baseline.
///
/// Returns a zero forecast with a diagnostic note when the crop has no yield
/// baseline; this is a valid result, not an error.
pub fn compute_forecast_with(
    planting: &PlantingRecord,
    baseline: &CropBaseline,
    density_table: &DensityTable,
) -> ForecastResult {
    let area = planting.area_hectares.max(MIN_AREA_HECTARES);

    if !baseline.has_yield_baseline() {
        return ForecastResult::without_baseline(MISSING_BASELINE_NOTE);
    }

    let season = season_factor(&baseline.ideal_seasons, planting.date.month());
    let inputs = input_factors(planting, baseline, area);
    let input = inputs.combined();
    let population = population_factor(
        &planting.crop_name,
        planting.spacing.as_deref(),
        density_table,
    );

    let (lower, upper) = COMBINED_FACTOR_BOUNDS;
    let combined = (season * input * population).clamp(lower, upper);

    let per_ha_min = baseline.yield_min_tonnes_per_ha * KG_PER_TONNE * combined;
    let per_ha_max = baseline.yield_max_tonnes_per_ha * KG_PER_TONNE * combined;
    let yield_min_kg = per_ha_min * area;
    let yield_max_kg = per_ha_max * area;

    let notes = format!(
        "season={:.2}, seed×fert={:.2} (seed={:.2}, fert={:.2}), pop={:.2}, area={}ha, combined={:.2}",
        season,
        input,
        inputs.seed,
        inputs.fertilizer,
        population,
        format_area(area),
        combined
    );

    ForecastResult {
        yield_min_kg,
        yield_max_kg,
        expected_yield_kg: (yield_min_kg + yield_max_kg) / 2.0,
        season_factor: season,
        input_factor: input,
        population_factor: population,
        seed_factor: inputs.seed,
        fertilizer_factor: inputs.fertilizer,
        combined_factor: combined,
        harvest_start: offset_date(planting.date, baseline.days_to_harvest_min),
        harvest_end: offset_date(planting.date, baseline.days_to_harvest_max),
        notes,
    }
}

/// `date` plus a day count, treating negative counts as zero and saturating
/// at the last representable date
fn offset_date(date: NaiveDate, days: i32) -> Option<NaiveDate> {
    Some(
        date.checked_add_days(Days::new(days.max(0) as u64))
            .unwrap_or(NaiveDate::MAX),
    )
}

/// Shortest round-trip rendering of an area: `1.0`, `2.5`, `1e-06`, `1e+16`
fn format_area(area: f64) -> String {
    let repr = format!("{:?}", area);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}
