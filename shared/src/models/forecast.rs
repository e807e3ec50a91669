//! Yield forecast models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Output of a single forecast computation
///
/// Recomputed from scratch on every call. The three reported multipliers
/// (`season_factor`, `input_factor`, `population_factor`) are kept for
/// auditability alongside the sub-factors that produced them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastResult {
    pub yield_min_kg: f64,
    pub yield_max_kg: f64,
    pub expected_yield_kg: f64,
    pub season_factor: f64,
    /// Seed factor times fertilizer factor
    pub input_factor: f64,
    pub population_factor: f64,
    pub seed_factor: f64,
    pub fertilizer_factor: f64,
    /// Product of all multipliers after the overall sanity clamp
    pub combined_factor: f64,
    pub harvest_start: Option<NaiveDate>,
    pub harvest_end: Option<NaiveDate>,
    pub notes: String,
}

impl ForecastResult {
    /// Zero-valued result with neutral factors and a diagnostic note
    pub fn without_baseline(notes: impl Into<String>) -> Self {
        Self {
            yield_min_kg: 0.0,
            yield_max_kg: 0.0,
            expected_yield_kg: 0.0,
            season_factor: 1.0,
            input_factor: 1.0,
            population_factor: 1.0,
            seed_factor: 1.0,
            fertilizer_factor: 1.0,
            combined_factor: 1.0,
            harvest_start: None,
            harvest_end: None,
            notes: notes.into(),
        }
    }

    /// Whether the forecast carries an actual yield estimate
    pub fn has_estimate(&self) -> bool {
        self.harvest_start.is_some() || self.expected_yield_kg > 0.0
    }

    /// Number of days between the earliest and latest expected harvest
    pub fn harvest_window_days(&self) -> Option<i64> {
        match (self.harvest_start, self.harvest_end) {
            (Some(start), Some(end)) => Some((end - start).num_days().max(0)),
            _ => None,
        }
    }
}
