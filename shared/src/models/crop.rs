//! Crop catalog models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A crop in the catalog, with its per-hectare agronomy baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crop {
    pub id: Uuid,
    pub description: String,
    #[serde(flatten)]
    pub baseline: CropBaseline,
    pub created_at: DateTime<Utc>,
}

/// Reference agronomic parameters for a crop under normal conditions
///
/// All rates are per hectare. A zero rate means "not applicable" and a zero
/// yield bound means no baseline is available for the crop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropBaseline {
    pub name: String,
    /// Suitable planting months, e.g. `"Jun-Nov, Dec-Apr"`
    #[serde(default)]
    pub ideal_seasons: String,
    #[serde(default)]
    pub seed_rate_min_kg: f64,
    #[serde(default)]
    pub seed_rate_max_kg: f64,
    /// Recommended 50 kg fertilizer sacks per hectare
    #[serde(default)]
    pub fert_sacks_min: f64,
    #[serde(default)]
    pub fert_sacks_max: f64,
    #[serde(default)]
    pub yield_min_tonnes_per_ha: f64,
    #[serde(default)]
    pub yield_max_tonnes_per_ha: f64,
    #[serde(default = "default_days_to_harvest_min")]
    pub days_to_harvest_min: i32,
    #[serde(default = "default_days_to_harvest_max")]
    pub days_to_harvest_max: i32,
}

fn default_days_to_harvest_min() -> i32 {
    100
}

fn default_days_to_harvest_max() -> i32 {
    130
}

impl CropBaseline {
    /// Create a baseline with only a name and ideal seasons; every rate is zero
    pub fn new(name: impl Into<String>, ideal_seasons: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ideal_seasons: ideal_seasons.into(),
            seed_rate_min_kg: 0.0,
            seed_rate_max_kg: 0.0,
            fert_sacks_min: 0.0,
            fert_sacks_max: 0.0,
            yield_min_tonnes_per_ha: 0.0,
            yield_max_tonnes_per_ha: 0.0,
            days_to_harvest_min: default_days_to_harvest_min(),
            days_to_harvest_max: default_days_to_harvest_max(),
        }
    }

    pub fn with_seed_rate(mut self, min_kg: f64, max_kg: f64) -> Self {
        self.seed_rate_min_kg = min_kg;
        self.seed_rate_max_kg = max_kg;
        self
    }

    pub fn with_fertilizer(mut self, min_sacks: f64, max_sacks: f64) -> Self {
        self.fert_sacks_min = min_sacks;
        self.fert_sacks_max = max_sacks;
        self
    }

    pub fn with_yield(mut self, min_tonnes: f64, max_tonnes: f64) -> Self {
        self.yield_min_tonnes_per_ha = min_tonnes;
        self.yield_max_tonnes_per_ha = max_tonnes;
        self
    }

    pub fn with_days_to_harvest(mut self, min_days: i32, max_days: i32) -> Self {
        self.days_to_harvest_min = min_days;
        self.days_to_harvest_max = max_days;
        self
    }

    /// True when both yield bounds are positive
    pub fn has_yield_baseline(&self) -> bool {
        self.yield_min_tonnes_per_ha > 0.0 && self.yield_max_tonnes_per_ha > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_defaults_from_json() {
        let baseline: CropBaseline =
            serde_json::from_str(r#"{"name": "Eggplant", "ideal_seasons": "Jan-Mar"}"#).unwrap();
        assert_eq!(baseline.days_to_harvest_min, 100);
        assert_eq!(baseline.days_to_harvest_max, 130);
        assert_eq!(baseline.seed_rate_max_kg, 0.0);
        assert!(!baseline.has_yield_baseline());
    }

    #[test]
    fn test_has_yield_baseline() {
        assert!(CropBaseline::new("Rice", "").with_yield(4.0, 6.0).has_yield_baseline());
        assert!(!CropBaseline::new("Rice", "").with_yield(4.0, 0.0).has_yield_baseline());
        assert!(!CropBaseline::new("Rice", "").with_yield(-1.0, 6.0).has_yield_baseline());
    }
}
