//! Activity log service
//!
//! Recording a planting also computes and stores its yield forecast, in the
//! same transaction as the activity insert.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::ActivityType;
use sqlx::PgPool;
use uuid::Uuid;

use super::crop::CropService;
use super::forecast::{normalize_spacing, validate_planting_inputs, ForecastService, StoredForecast};
use crate::error::{AppError, AppResult};

/// Activity service
#[derive(Clone)]
pub struct ActivityService {
    db: PgPool,
    forecasts: ForecastService,
}

/// Database row for an activity joined with its crop name
#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    id: Uuid,
    farmer_id: Uuid,
    crop_id: Uuid,
    crop_name: String,
    activity_type: String,
    date: NaiveDate,
    notes: String,
    area_ha: f64,
    seed_qty_kg: Option<f64>,
    fert_sacks: Option<f64>,
    spacing: Option<String>,
    created_at: DateTime<Utc>,
}

/// A logged field activity
#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub crop_id: Uuid,
    pub crop_name: String,
    pub activity_type: ActivityType,
    pub date: NaiveDate,
    pub notes: String,
    pub area_ha: f64,
    pub seed_qty_kg: Option<f64>,
    pub fert_sacks: Option<f64>,
    pub spacing: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = AppError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let activity_type = row.activity_type.parse::<ActivityType>().map_err(|_| {
            AppError::Internal(format!("Unknown activity type '{}'", row.activity_type))
        })?;

        Ok(Self {
            id: row.id,
            farmer_id: row.farmer_id,
            crop_id: row.crop_id,
            crop_name: row.crop_name,
            activity_type,
            date: row.date,
            notes: row.notes,
            area_ha: row.area_ha,
            seed_qty_kg: row.seed_qty_kg,
            fert_sacks: row.fert_sacks,
            spacing: row.spacing,
            created_at: row.created_at,
        })
    }
}

/// Input for logging an activity
#[derive(Debug, Deserialize)]
pub struct RecordActivityInput {
    pub crop_id: Uuid,
    pub activity_type: ActivityType,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub area_ha: Option<f64>,
    pub seed_qty_kg: Option<f64>,
    pub fert_sacks: Option<f64>,
    pub spacing: Option<String>,
}

impl RecordActivityInput {
    /// Planted area, 1 ha when not given
    pub fn area_ha(&self) -> f64 {
        self.area_ha.unwrap_or(1.0)
    }

    /// Spacing with surrounding whitespace removed, `None` when blank
    pub fn spacing(&self) -> Option<&str> {
        normalize_spacing(self.spacing.as_deref())
    }

    /// Planting inputs are only checked for planting activities
    pub fn validate(&self) -> AppResult<()> {
        if self.activity_type != ActivityType::Planting {
            return Ok(());
        }
        validate_planting_inputs(self.area_ha(), self.seed_qty_kg, self.fert_sacks, self.spacing())
    }
}

/// Logged activity together with the forecast it produced, if any
#[derive(Debug, Serialize)]
pub struct RecordedActivity {
    pub activity: Activity,
    pub forecast: Option<StoredForecast>,
}

/// Optional filters for the activity log
#[derive(Debug, Default, Deserialize)]
pub struct ActivityFilter {
    pub crop_id: Option<Uuid>,
    #[serde(alias = "from")]
    pub start_date: Option<NaiveDate>,
    #[serde(alias = "to")]
    pub end_date: Option<NaiveDate>,
}

impl ActivityFilter {
    pub fn validate(&self) -> AppResult<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(AppError::validation(
                    "start_date",
                    "Start date must not be after end date",
                ));
            }
        }
        Ok(())
    }
}

const ACTIVITY_COLUMNS: &str = r#"
    a.id, a.farmer_id, a.crop_id, c.name AS crop_name, a.activity_type, a.date, a.notes,
    a.area_ha, a.seed_qty_kg, a.fert_sacks, a.spacing, a.created_at
"#;

impl ActivityService {
    /// Create a new ActivityService instance
    pub fn new(db: PgPool, forecasts: ForecastService) -> Self {
        Self { db, forecasts }
    }

    /// List a farmer's activities, newest first. Date bounds are inclusive.
    pub async fn list_activities(
        &self,
        farmer_id: Uuid,
        filter: &ActivityFilter,
    ) -> AppResult<Vec<Activity>> {
        filter.validate()?;

        let rows = sqlx::query_as::<_, ActivityRow>(&format!(
            r#"
            SELECT {}
            FROM activities a
            JOIN crops c ON c.id = a.crop_id
            WHERE a.farmer_id = $1
              AND ($2::uuid IS NULL OR a.crop_id = $2)
              AND ($3::date IS NULL OR a.date >= $3)
              AND ($4::date IS NULL OR a.date <= $4)
            ORDER BY a.date DESC, a.created_at DESC
            "#,
            ACTIVITY_COLUMNS
        ))
        .bind(farmer_id)
        .bind(filter.crop_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Activity::try_from).collect()
    }

    /// Get one of a farmer's activities
    pub async fn get_activity(&self, farmer_id: Uuid, activity_id: Uuid) -> AppResult<Activity> {
        let row = sqlx::query_as::<_, ActivityRow>(&format!(
            r#"
            SELECT {}
            FROM activities a
            JOIN crops c ON c.id = a.crop_id
            WHERE a.id = $1 AND a.farmer_id = $2
            "#,
            ACTIVITY_COLUMNS
        ))
        .bind(activity_id)
        .bind(farmer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity".to_string()))?;

        Activity::try_from(row)
    }

    /// Log an activity. Plantings also refresh the farmer's forecast for the crop.
    pub async fn record_activity(
        &self,
        farmer_id: Uuid,
        input: RecordActivityInput,
    ) -> AppResult<RecordedActivity> {
        input.validate()?;

        let crop = CropService::new(self.db.clone())
            .get_crop_row(input.crop_id)
            .await?;

        let today = Utc::now().date_naive();
        let is_planting = input.activity_type == ActivityType::Planting;
        let area_ha = if is_planting { input.area_ha() } else { 1.0 };
        let (seed_qty_kg, fert_sacks, spacing) = if is_planting {
            (input.seed_qty_kg, input.fert_sacks, input.spacing().map(str::to_string))
        } else {
            (None, None, None)
        };

        let mut tx = self.db.begin().await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO activities (farmer_id, crop_id, activity_type, date, notes,
                                    area_ha, seed_qty_kg, fert_sacks, spacing)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(farmer_id)
        .bind(crop.id)
        .bind(input.activity_type.as_str())
        .bind(input.date.unwrap_or(today))
        .bind(input.notes.as_deref().unwrap_or("").trim())
        .bind(area_ha)
        .bind(seed_qty_kg)
        .bind(fert_sacks)
        .bind(&spacing)
        .fetch_one(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, ActivityRow>(&format!(
            r#"
            SELECT {}
            FROM activities a
            JOIN crops c ON c.id = a.crop_id
            WHERE a.id = $1
            "#,
            ACTIVITY_COLUMNS
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        let activity = Activity::try_from(row)?;

        let forecast = if is_planting {
            Some(
                self.forecasts
                    .refresh_for_activity(&mut *tx, &activity, &crop.baseline(), today)
                    .await?,
            )
        } else {
            None
        };

        tx.commit().await?;

        tracing::info!(
            activity_id = %activity.id,
            farmer_id = %farmer_id,
            activity_type = %activity.activity_type.as_str(),
            "Activity recorded"
        );

        Ok(RecordedActivity { activity, forecast })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(activity_type: ActivityType) -> RecordActivityInput {
        RecordActivityInput {
            crop_id: Uuid::new_v4(),
            activity_type,
            date: None,
            notes: None,
            area_ha: None,
            seed_qty_kg: None,
            fert_sacks: None,
            spacing: None,
        }
    }

    fn row(activity_type: &str) -> ActivityRow {
        ActivityRow {
            id: Uuid::new_v4(),
            farmer_id: Uuid::new_v4(),
            crop_id: Uuid::new_v4(),
            crop_name: "Corn".into(),
            activity_type: activity_type.into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            notes: String::new(),
            area_ha: 1.5,
            seed_qty_kg: Some(30.0),
            fert_sacks: Some(6.0),
            spacing: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_planting_defaults() {
        let planting = input(ActivityType::Planting);
        assert_eq!(planting.area_ha(), 1.0);
        assert_eq!(planting.spacing(), None);
        assert!(planting.validate().is_ok());
    }

    #[test]
    fn test_blank_spacing_is_ignored() {
        let mut planting = input(ActivityType::Planting);
        planting.spacing = Some("   ".into());
        assert_eq!(planting.spacing(), None);
        assert!(planting.validate().is_ok());

        planting.spacing = Some(" 75x25 cm ".into());
        assert_eq!(planting.spacing(), Some("75x25 cm"));
    }

    #[test]
    fn test_planting_rejects_zero_area() {
        let mut planting = input(ActivityType::Planting);
        planting.area_ha = Some(0.0);
        let err = planting.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "area_ha"));
    }

    #[test]
    fn test_watering_skips_planting_checks() {
        let mut watering = input(ActivityType::Watering);
        watering.area_ha = Some(-3.0);
        watering.spacing = Some("garbage".into());
        assert!(watering.validate().is_ok());
    }

    #[test]
    fn test_row_conversion() {
        let activity = Activity::try_from(row("harvesting")).unwrap();
        assert_eq!(activity.activity_type, ActivityType::Harvesting);
        assert_eq!(activity.crop_name, "Corn");

        let err = Activity::try_from(row("pruning")).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_input_deserializes_snake_case_type() {
        let input: RecordActivityInput = serde_json::from_value(serde_json::json!({
            "crop_id": Uuid::nil(),
            "activity_type": "planting",
            "date": "2024-01-01",
            "area_ha": 2.0,
            "spacing": "20x20 cm"
        }))
        .unwrap();
        assert_eq!(input.activity_type, ActivityType::Planting);
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(input.area_ha(), 2.0);
    }

    #[test]
    fn test_filter_accepts_date_aliases() {
        let filter: ActivityFilter = serde_json::from_value(serde_json::json!({
            "crop_id": Uuid::nil(),
            "from": "2024-01-01",
            "to": "2024-03-31"
        }))
        .unwrap();
        assert_eq!(filter.crop_id, Some(Uuid::nil()));
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.end_date, NaiveDate::from_ymd_opt(2024, 3, 31));
        assert!(filter.validate().is_ok());

        let empty: ActivityFilter = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.crop_id.is_none() && empty.start_date.is_none() && empty.end_date.is_none());
    }

    #[test]
    fn test_filter_rejects_inverted_range() {
        let filter = ActivityFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 4, 30),
            ..Default::default()
        };
        let err = filter.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "start_date"));

        let single_day = ActivityFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        };
        assert!(single_day.validate().is_ok());
    }
}
