//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Three-letter month abbreviations, January first
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Look up a month number (1-12) from its three-letter abbreviation
pub fn month_from_abbreviation(abbr: &str) -> Option<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(abbr))
        .map(|i| i as u32 + 1)
}

/// Row and hill spacing of a planting, in meters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Spacing {
    pub row_m: f64,
    pub hill_m: f64,
}

impl Spacing {
    pub fn new(row_m: f64, hill_m: f64) -> Self {
        Self { row_m, hill_m }
    }

    /// Ground area occupied by one plant
    pub fn area_per_plant_m2(&self) -> f64 {
        self.row_m * self.hill_m
    }
}

/// Labelled series for dashboard charts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

/// Upcoming harvest windows, one entry per crop
///
/// `offsets` is days from today until the window opens, `windows` is the
/// window length in days.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HarvestTimeline {
    pub labels: Vec<String>,
    pub offsets: Vec<i64>,
    pub windows: Vec<i64>,
}

impl HarvestTimeline {
    pub fn push(&mut self, label: impl Into<String>, offset_days: i64, window_days: i64) {
        self.labels.push(label.into());
        self.offsets.push(offset_days.max(0));
        self.windows.push(window_days.max(0));
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
