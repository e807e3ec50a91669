//! Planting-density effects for tree and perennial crops

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::spacing::{parse_spacing, plants_per_hectare};

/// Clamp bounds for the population factor
pub const POPULATION_FACTOR_BOUNDS: (f64, f64) = (0.60, 1.30);

/// Reference planting density for a density-sensitive crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DensityProfile {
    pub crop: String,
    pub nominal_plants_per_ha: f64,
}

impl DensityProfile {
    pub fn new(crop: impl Into<String>, nominal_plants_per_ha: f64) -> Self {
        Self {
            crop: crop.into(),
            nominal_plants_per_ha,
        }
    }
}

/// Crops whose yield depends on planting density, keyed by lowercase name
#[derive(Debug, Clone, PartialEq)]
pub struct DensityTable {
    nominal: BTreeMap<String, f64>,
}

impl DensityTable {
    /// A table with no density-sensitive crops
    pub fn empty() -> Self {
        Self {
            nominal: BTreeMap::new(),
        }
    }

    /// Add or replace a crop's nominal density
    pub fn insert(&mut self, profile: DensityProfile) {
        self.nominal
            .insert(normalize_crop_name(&profile.crop), profile.nominal_plants_per_ha);
    }

    pub fn with_profile(mut self, profile: DensityProfile) -> Self {
        self.insert(profile);
        self
    }

    /// Nominal plants per hectare for a crop, if it is density-sensitive
    pub fn nominal_density(&self, crop_name: &str) -> Option<f64> {
        self.nominal
            .get(&normalize_crop_name(crop_name))
            .copied()
            .filter(|nominal| *nominal > 0.0)
    }

    pub fn is_density_sensitive(&self, crop_name: &str) -> bool {
        self.nominal_density(crop_name).is_some()
    }

    pub fn profiles(&self) -> impl Iterator<Item = DensityProfile> + '_ {
        self.nominal
            .iter()
            .map(|(crop, nominal)| DensityProfile::new(crop.clone(), *nominal))
    }

    pub fn len(&self) -> usize {
        self.nominal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nominal.is_empty()
    }
}

impl Default for DensityTable {
    /// Mango at 10x10 m, guava at 5x5 m, banana at 3x3 m
    fn default() -> Self {
        Self::empty()
            .with_profile(DensityProfile::new("mango", 100.0))
            .with_profile(DensityProfile::new("guava", 400.0))
            .with_profile(DensityProfile::new("banana", 1100.0))
    }
}

impl Extend<DensityProfile> for DensityTable {
    fn extend<I: IntoIterator<Item = DensityProfile>>(&mut self, iter: I) {
        for profile in iter {
            self.insert(profile);
        }
    }
}

/// Ratio of actual to nominal planting density, clamped.
///
/// Neutral (1.0) for crops not in the table and for missing or unparseable
/// spacing.
pub fn population_factor(crop_name: &str, spacing: Option<&str>, table: &DensityTable) -> f64 {
    let Some(nominal) = table.nominal_density(crop_name) else {
        return 1.0;
    };

    let density = spacing
        .and_then(parse_spacing)
        .and_then(|s| plants_per_hectare(&s))
        .filter(|d| *d > 0.0);

    match density {
        Some(density) => {
            let (lower, upper) = POPULATION_FACTOR_BOUNDS;
            (density / nominal).clamp(lower, upper)
        }
        None => 1.0,
    }
}

fn normalize_crop_name(name: &str) -> String {
    name.trim().to_lowercase()
}
