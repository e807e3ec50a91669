//! Activity log and planting models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kinds of field activity a farmer can log
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Planting,
    Watering,
    Harvesting,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Planting => "planting",
            ActivityType::Watering => "watering",
            ActivityType::Harvesting => "harvesting",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityType::Planting => write!(f, "Planting"),
            ActivityType::Watering => write!(f, "Watering"),
            ActivityType::Harvesting => write!(f, "Harvesting"),
        }
    }
}

impl std::str::FromStr for ActivityType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planting" => Ok(ActivityType::Planting),
            "watering" => Ok(ActivityType::Watering),
            "harvesting" => Ok(ActivityType::Harvesting),
            _ => Err("Unknown activity type"),
        }
    }
}

/// Planting inputs consumed by the forecasting engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantingRecord {
    pub crop_name: String,
    pub date: NaiveDate,
    #[serde(default = "default_area_hectares")]
    pub area_hectares: f64,
    /// Total seed applied over the whole area
    #[serde(default)]
    pub seed_quantity_kg: Option<f64>,
    /// Total 50 kg fertilizer sacks applied over the whole area
    #[serde(default)]
    pub fertilizer_sacks: Option<f64>,
    /// Row x hill spacing, e.g. `"20x20 cm"` or `"10x10 m"`
    #[serde(default)]
    pub spacing: Option<String>,
}

fn default_area_hectares() -> f64 {
    1.0
}

impl PlantingRecord {
    pub fn new(crop_name: impl Into<String>, date: NaiveDate, area_hectares: f64) -> Self {
        Self {
            crop_name: crop_name.into(),
            date,
            area_hectares,
            seed_quantity_kg: None,
            fertilizer_sacks: None,
            spacing: None,
        }
    }

    pub fn with_seed_quantity(mut self, kg: f64) -> Self {
        self.seed_quantity_kg = Some(kg);
        self
    }

    pub fn with_fertilizer_sacks(mut self, sacks: f64) -> Self {
        self.fertilizer_sacks = Some(sacks);
        self
    }

    pub fn with_spacing(mut self, spacing: impl Into<String>) -> Self {
        self.spacing = Some(spacing.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_type_parse() {
        assert_eq!("planting".parse::<ActivityType>(), Ok(ActivityType::Planting));
        assert_eq!(" Watering ".parse::<ActivityType>(), Ok(ActivityType::Watering));
        assert!("weeding".parse::<ActivityType>().is_err());
        assert_eq!(ActivityType::Harvesting.as_str(), "harvesting");
    }

    #[test]
    fn test_planting_defaults_from_json() {
        let record: PlantingRecord =
            serde_json::from_str(r#"{"crop_name": "Rice", "date": "2024-07-01"}"#).unwrap();
        assert_eq!(record.area_hectares, 1.0);
        assert!(record.seed_quantity_kg.is_none());
        assert!(record.fertilizer_sacks.is_none());
        assert!(record.spacing.is_none());
    }

    #[test]
    fn test_absent_and_zero_quantities_are_distinct() {
        let record: PlantingRecord = serde_json::from_str(
            r#"{"crop_name": "Rice", "date": "2024-07-01", "seed_quantity_kg": 0, "fertilizer_sacks": null}"#,
        )
        .unwrap();
        assert_eq!(record.seed_quantity_kg, Some(0.0));
        assert_eq!(record.fertilizer_sacks, None);
    }
}
