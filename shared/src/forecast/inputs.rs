//! Input-application efficiency factors

use crate::models::{CropBaseline, PlantingRecord};

/// Clamp bounds for the seed efficiency factor
pub const SEED_FACTOR_BOUNDS: (f64, f64) = (0.70, 1.15);
/// Clamp bounds for the fertilizer efficiency factor
pub const FERTILIZER_FACTOR_BOUNDS: (f64, f64) = (0.60, 1.20);

const MIN_MIDPOINT: f64 = 1e-6;

/// Seed and fertilizer multipliers for a planting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputFactors {
    pub seed: f64,
    pub fertilizer: f64,
}

impl InputFactors {
    pub const NEUTRAL: InputFactors = InputFactors {
        seed: 1.0,
        fertilizer: 1.0,
    };

    /// Seed factor times fertilizer factor, unclamped
    pub fn combined(&self) -> f64 {
        self.seed * self.fertilizer
    }
}

impl Default for InputFactors {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Compare applied seed and fertilizer per hectare against the crop's
/// recommended midpoints. `area_hectares` must already be positive.
pub fn input_factors(
    planting: &PlantingRecord,
    baseline: &CropBaseline,
    area_hectares: f64,
) -> InputFactors {
    InputFactors {
        seed: efficiency_factor(
            planting.seed_quantity_kg,
            area_hectares,
            (baseline.seed_rate_min_kg, baseline.seed_rate_max_kg),
            SEED_FACTOR_BOUNDS,
        ),
        fertilizer: efficiency_factor(
            planting.fertilizer_sacks,
            area_hectares,
            (baseline.fert_sacks_min, baseline.fert_sacks_max),
            FERTILIZER_FACTOR_BOUNDS,
        ),
    }
}

/// Ratio of applied-per-hectare to the recommended midpoint, clamped.
///
/// Neutral (1.0) unless the recommended maximum and the applied quantity are
/// both positive. A zero recommendation range compares the quantity to itself.
pub fn efficiency_factor(
    applied_total: Option<f64>,
    area_hectares: f64,
    (recommended_min, recommended_max): (f64, f64),
    (lower, upper): (f64, f64),
) -> f64 {
    let applied = match applied_total {
        Some(q) if q > 0.0 && recommended_max > 0.0 => q,
        _ => return 1.0,
    };

    let per_hectare = applied / area_hectares;
    let range_sum = recommended_min + recommended_max;
    let midpoint = if range_sum > 0.0 {
        range_sum / 2.0
    } else {
        per_hectare
    };

    (per_hectare / midpoint.max(MIN_MIDPOINT)).clamp(lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rice() -> CropBaseline {
        CropBaseline::new("Rice", "Jun-Nov, Dec-Apr")
            .with_seed_rate(40.0, 60.0)
            .with_fertilizer(4.0, 6.0)
            .with_yield(4.0, 6.0)
    }

    fn planting(area: f64) -> PlantingRecord {
        PlantingRecord::new("Rice", NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(), area)
    }

    #[test]
    fn test_missing_quantities_are_neutral() {
        let factors = input_factors(&planting(1.0), &rice(), 1.0);
        assert_eq!(factors, InputFactors::NEUTRAL);
        assert_eq!(factors.combined(), 1.0);
    }

    #[test]
    fn test_at_midpoint_is_neutral() {
        let record = planting(2.0).with_seed_quantity(100.0).with_fertilizer_sacks(10.0);
        let factors = input_factors(&record, &rice(), 2.0);
        assert!((factors.seed - 1.0).abs() < 1e-12);
        assert!((factors.fertilizer - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_under_application_clamps_low() {
        let record = planting(1.0).with_seed_quantity(5.0).with_fertilizer_sacks(0.5);
        let factors = input_factors(&record, &rice(), 1.0);
        assert_eq!(factors.seed, 0.70);
        assert_eq!(factors.fertilizer, 0.60);
    }

    #[test]
    fn test_over_application_clamps_high() {
        let record = planting(1.0).with_seed_quantity(500.0).with_fertilizer_sacks(50.0);
        let factors = input_factors(&record, &rice(), 1.0);
        assert_eq!(factors.seed, 1.15);
        assert_eq!(factors.fertilizer, 1.20);
        assert!((factors.combined() - 1.38).abs() < 1e-12);
    }

    #[test]
    fn test_partial_ratio() {
        // 45 kg/ha against a 50 kg/ha midpoint
        let record = planting(1.0).with_seed_quantity(45.0);
        let factors = input_factors(&record, &rice(), 1.0);
        assert!((factors.seed - 0.9).abs() < 1e-12);
        assert_eq!(factors.fertilizer, 1.0);
    }

    #[test]
    fn test_not_applicable_rate_is_neutral() {
        let mango = CropBaseline::new("Mango", "Dec-Apr").with_fertilizer(1.0, 2.0);
        let record = planting(1.0).with_seed_quantity(30.0);
        let factors = input_factors(&record, &mango, 1.0);
        assert_eq!(factors.seed, 1.0);
    }

    #[test]
    fn test_non_positive_quantities_are_neutral() {
        let record = planting(1.0).with_seed_quantity(0.0).with_fertilizer_sacks(-3.0);
        assert_eq!(input_factors(&record, &rice(), 1.0), InputFactors::NEUTRAL);
    }

    #[test]
    fn test_zero_min_with_positive_max_uses_half_max() {
        let factor = efficiency_factor(Some(10.0), 1.0, (0.0, 20.0), SEED_FACTOR_BOUNDS);
        assert!((factor - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_range_does_not_panic() {
        let factor = efficiency_factor(Some(10.0), 1.0, (-50.0, 20.0), FERTILIZER_FACTOR_BOUNDS);
        assert_eq!(factor, 1.0);

        let factor = efficiency_factor(Some(10.0), 1.0, (30.0, 5.0), FERTILIZER_FACTOR_BOUNDS);
        assert!(factor >= 0.60 && factor <= 1.20);
    }
}
