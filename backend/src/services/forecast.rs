//! Forecast service: runs the yield engine for planting activities and keeps
//! the latest result per farmer, crop and day

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    compute_forecast_with, validate_input_quantity, validate_planting_area, validate_spacing,
    ActivityType, ChartSeries, CropBaseline, DensityTable, ForecastResult, HarvestTimeline,
    PlantingRecord,
};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::activity::Activity;
use super::crop::{CropRow, CropService};
use crate::error::{AppError, AppResult};

/// Number of forecasts shown on the farmer dashboard
const DASHBOARD_LIMIT: i64 = 3;

/// Forecast service
#[derive(Clone)]
pub struct ForecastService {
    db: PgPool,
    density_table: Arc<DensityTable>,
}

/// Stored forecast, one per farmer, crop and forecast date
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredForecast {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub crop_id: Uuid,
    pub forecast_date: NaiveDate,
    pub expected_yield_kg: f64,
    pub yield_min_kg: f64,
    pub yield_max_kg: f64,
    pub season_factor: f64,
    pub input_factor: f64,
    pub population_factor: f64,
    pub harvest_start: Option<NaiveDate>,
    pub harvest_end: Option<NaiveDate>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Stored forecast with its crop name, for dashboards and charts
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ForecastWithCrop {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub crop_id: Uuid,
    pub crop_name: String,
    pub forecast_date: NaiveDate,
    pub expected_yield_kg: f64,
    pub yield_min_kg: f64,
    pub yield_max_kg: f64,
    pub season_factor: f64,
    pub input_factor: f64,
    pub population_factor: f64,
    pub harvest_start: Option<NaiveDate>,
    pub harvest_end: Option<NaiveDate>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Input for previewing a forecast without storing it
#[derive(Debug, Deserialize)]
pub struct PreviewForecastInput {
    pub crop_id: Uuid,
    pub date: NaiveDate,
    pub area_ha: Option<f64>,
    pub seed_qty_kg: Option<f64>,
    pub fert_sacks: Option<f64>,
    pub spacing: Option<String>,
}

const FORECAST_COLUMNS: &str = r#"
    id, farmer_id, crop_id, forecast_date, expected_yield_kg, yield_min_kg, yield_max_kg,
    season_factor, input_factor, population_factor, harvest_start, harvest_end, notes, created_at
"#;

const FORECAST_WITH_CROP_COLUMNS: &str = r#"
    f.id, f.farmer_id, f.crop_id, c.name AS crop_name, f.forecast_date, f.expected_yield_kg,
    f.yield_min_kg, f.yield_max_kg, f.season_factor, f.input_factor, f.population_factor,
    f.harvest_start, f.harvest_end, f.notes, f.created_at
"#;

impl PreviewForecastInput {
    /// Planted area, 1 ha when not given
    pub fn area_ha(&self) -> f64 {
        self.area_ha.unwrap_or(1.0)
    }

    pub fn spacing(&self) -> Option<&str> {
        normalize_spacing(self.spacing.as_deref())
    }

    pub fn validate(&self) -> AppResult<()> {
        validate_planting_inputs(self.area_ha(), self.seed_qty_kg, self.fert_sacks, self.spacing())
    }

    /// Planting record for this input against a crop baseline
    pub fn planting(&self, baseline: &CropBaseline) -> PlantingRecord {
        PlantingRecord {
            crop_name: baseline.name.clone(),
            date: self.date,
            area_hectares: self.area_ha(),
            seed_quantity_kg: self.seed_qty_kg,
            fertilizer_sacks: self.fert_sacks,
            spacing: self.spacing().map(str::to_string),
        }
    }
}

/// Trimmed spacing text, `None` when absent or blank
pub fn normalize_spacing(spacing: Option<&str>) -> Option<&str> {
    spacing.map(str::trim).filter(|s| !s.is_empty())
}

/// Validate the planting-specific fields of an activity or preview
pub fn validate_planting_inputs(
    area_ha: f64,
    seed_qty_kg: Option<f64>,
    fert_sacks: Option<f64>,
    spacing: Option<&str>,
) -> AppResult<()> {
    validate_planting_area(area_ha).map_err(|msg| AppError::validation("area_ha", msg))?;
    validate_input_quantity(seed_qty_kg).map_err(|msg| AppError::validation("seed_qty_kg", msg))?;
    validate_input_quantity(fert_sacks).map_err(|msg| AppError::validation("fert_sacks", msg))?;
    if let Some(spacing) = spacing {
        validate_spacing(spacing).map_err(|msg| AppError::validation("spacing", msg))?;
    }
    Ok(())
}

/// Planting record for an activity against its crop's baseline
pub fn planting_record(activity: &Activity, baseline: &CropBaseline) -> PlantingRecord {
    PlantingRecord {
        crop_name: baseline.name.clone(),
        date: activity.date,
        area_hectares: activity.area_ha,
        seed_quantity_kg: activity.seed_qty_kg,
        fertilizer_sacks: activity.fert_sacks,
        spacing: activity.spacing.clone(),
    }
}

impl ForecastService {
    /// Create a new ForecastService instance
    pub fn new(db: PgPool, density_table: Arc<DensityTable>) -> Self {
        Self { db, density_table }
    }

    /// Run the yield engine for a planting
    pub fn forecast(&self, planting: &PlantingRecord, baseline: &CropBaseline) -> ForecastResult {
        let result = compute_forecast_with(planting, baseline, &self.density_table);
        if result.has_estimate() {
            tracing::debug!(
                crop = %baseline.name,
                expected_yield_kg = result.expected_yield_kg,
                notes = %result.notes,
                "Forecast computed"
            );
        } else {
            tracing::warn!(crop = %baseline.name, "Crop has no yield baseline; forecast is empty");
        }
        result
    }

    /// Compute and store the forecast for a planting activity.
    ///
    /// Replaces any forecast already stored for the same farmer, crop and
    /// `forecast_date`.
    pub async fn refresh_for_activity<'e, E>(
        &self,
        executor: E,
        activity: &Activity,
        baseline: &CropBaseline,
        forecast_date: NaiveDate,
    ) -> AppResult<StoredForecast>
    where
        E: PgExecutor<'e>,
    {
        let result = self.forecast(&planting_record(activity, baseline), baseline);
        let stored = Self::upsert_forecast(
            executor,
            activity.farmer_id,
            activity.crop_id,
            forecast_date,
            &result,
        )
        .await?;

        tracing::info!(
            farmer_id = %activity.farmer_id,
            crop_id = %activity.crop_id,
            activity_id = %activity.id,
            expected_yield_kg = stored.expected_yield_kg,
            "Forecast refreshed"
        );

        Ok(stored)
    }

    /// Recompute the forecast for an existing planting activity
    pub async fn recompute_for_activity(
        &self,
        farmer_id: Uuid,
        activity_id: Uuid,
    ) -> AppResult<StoredForecast> {
        let activity = super::activity::ActivityService::new(self.db.clone(), self.clone())
            .get_activity(farmer_id, activity_id)
            .await?;

        if activity.activity_type != ActivityType::Planting {
            return Err(AppError::NotPlanting(format!(
                "Forecasts are computed from planting activities, not {}",
                activity.activity_type.as_str()
            )));
        }

        let crop = CropService::new(self.db.clone())
            .get_crop_row(activity.crop_id)
            .await?;

        self.refresh_for_activity(&self.db, &activity, &crop.baseline(), Utc::now().date_naive())
            .await
    }

    /// Compute a forecast for unsaved planting input
    pub async fn preview(&self, input: PreviewForecastInput) -> AppResult<ForecastResult> {
        input.validate()?;

        let crop: CropRow = CropService::new(self.db.clone())
            .get_crop_row(input.crop_id)
            .await?;
        let baseline = crop.baseline();

        Ok(self.forecast(&input.planting(&baseline), &baseline))
    }

    /// Insert or replace the forecast keyed by farmer, crop and forecast date
    pub async fn upsert_forecast<'e, E>(
        executor: E,
        farmer_id: Uuid,
        crop_id: Uuid,
        forecast_date: NaiveDate,
        result: &ForecastResult,
    ) -> AppResult<StoredForecast>
    where
        E: PgExecutor<'e>,
    {
        let stored = sqlx::query_as::<_, StoredForecast>(&format!(
            r#"
            INSERT INTO forecasts (farmer_id, crop_id, forecast_date, expected_yield_kg,
                                   yield_min_kg, yield_max_kg, season_factor, input_factor,
                                   population_factor, harvest_start, harvest_end, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (farmer_id, crop_id, forecast_date) DO UPDATE
            SET expected_yield_kg = EXCLUDED.expected_yield_kg,
                yield_min_kg = EXCLUDED.yield_min_kg,
                yield_max_kg = EXCLUDED.yield_max_kg,
                season_factor = EXCLUDED.season_factor,
                input_factor = EXCLUDED.input_factor,
                population_factor = EXCLUDED.population_factor,
                harvest_start = EXCLUDED.harvest_start,
                harvest_end = EXCLUDED.harvest_end,
                notes = EXCLUDED.notes,
                created_at = NOW()
            RETURNING {}
            "#,
            FORECAST_COLUMNS
        ))
        .bind(farmer_id)
        .bind(crop_id)
        .bind(forecast_date)
        .bind(result.expected_yield_kg)
        .bind(result.yield_min_kg)
        .bind(result.yield_max_kg)
        .bind(result.season_factor)
        .bind(result.input_factor)
        .bind(result.population_factor)
        .bind(result.harvest_start)
        .bind(result.harvest_end)
        .bind(&result.notes)
        .fetch_one(executor)
        .await?;

        Ok(stored)
    }

    /// Forecasts for the dashboard: upcoming harvests first, otherwise the
    /// most recent forecasts
    pub async fn dashboard_forecasts(
        &self,
        farmer_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<Vec<ForecastWithCrop>> {
        let upcoming = sqlx::query_as::<_, ForecastWithCrop>(&format!(
            r#"
            SELECT {}
            FROM forecasts f
            JOIN crops c ON c.id = f.crop_id
            WHERE f.farmer_id = $1 AND f.harvest_end IS NOT NULL AND f.harvest_end >= $2
            ORDER BY f.harvest_start ASC, f.created_at DESC
            LIMIT $3
            "#,
            FORECAST_WITH_CROP_COLUMNS
        ))
        .bind(farmer_id)
        .bind(today)
        .bind(DASHBOARD_LIMIT)
        .fetch_all(&self.db)
        .await?;

        if !upcoming.is_empty() {
            return Ok(upcoming);
        }

        let latest = sqlx::query_as::<_, ForecastWithCrop>(&format!(
            r#"
            SELECT {}
            FROM forecasts f
            JOIN crops c ON c.id = f.crop_id
            WHERE f.farmer_id = $1
            ORDER BY f.created_at DESC
            LIMIT $2
            "#,
            FORECAST_WITH_CROP_COLUMNS
        ))
        .bind(farmer_id)
        .bind(DASHBOARD_LIMIT)
        .fetch_all(&self.db)
        .await?;

        Ok(latest)
    }

    /// Expected yield of the latest forecast for each crop
    pub async fn yield_by_crop(&self, farmer_id: Uuid) -> AppResult<ChartSeries> {
        let rows = sqlx::query_as::<_, (String, f64)>(
            r#"
            SELECT crop_name, expected_yield_kg
            FROM (
                SELECT DISTINCT ON (f.crop_id) c.name AS crop_name, f.expected_yield_kg
                FROM forecasts f
                JOIN crops c ON c.id = f.crop_id
                WHERE f.farmer_id = $1
                ORDER BY f.crop_id, f.created_at DESC
            ) latest
            ORDER BY crop_name
            "#,
        )
        .bind(farmer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(build_yield_series(&rows))
    }

    /// Upcoming harvest windows, one per crop, relative to `today`
    pub async fn harvest_timeline(
        &self,
        farmer_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<HarvestTimeline> {
        let rows = sqlx::query_as::<_, ForecastWithCrop>(&format!(
            r#"
            SELECT {}
            FROM forecasts f
            JOIN crops c ON c.id = f.crop_id
            WHERE f.farmer_id = $1 AND f.harvest_start IS NOT NULL AND f.harvest_end IS NOT NULL
            ORDER BY f.harvest_start ASC, c.name ASC
            "#,
            FORECAST_WITH_CROP_COLUMNS
        ))
        .bind(farmer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(build_harvest_timeline(&rows, today))
    }
}

/// Sum expected yields per crop name, keeping first-seen order and rounding
/// to two decimals
pub fn build_yield_series(rows: &[(String, f64)]) -> ChartSeries {
    let mut series = ChartSeries::default();
    for (name, expected) in rows {
        match series.labels.iter().position(|label| label == name) {
            Some(i) => series.data[i] += expected,
            None => {
                series.labels.push(name.clone());
                series.data.push(*expected);
            }
        }
    }
    for value in &mut series.data {
        *value = (*value * 100.0).round() / 100.0;
    }
    series
}

/// First still-open harvest window per crop, from rows ordered by harvest start
pub fn build_harvest_timeline(rows: &[ForecastWithCrop], today: NaiveDate) -> HarvestTimeline {
    let mut timeline = HarvestTimeline::default();
    let mut seen = std::collections::HashSet::new();

    for row in rows {
        let (Some(start), Some(end)) = (row.harvest_start, row.harvest_end) else {
            continue;
        };
        if end < today || !seen.insert(row.crop_id) {
            continue;
        }
        timeline.push(
            row.crop_name.clone(),
            (start - today).num_days(),
            (end - start).num_days(),
        );
    }

    timeline
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(crop_id: Uuid, crop_name: &str, start: NaiveDate, end: NaiveDate) -> ForecastWithCrop {
        ForecastWithCrop {
            id: Uuid::new_v4(),
            farmer_id: Uuid::nil(),
            crop_id,
            crop_name: crop_name.to_string(),
            forecast_date: date(2024, 1, 1),
            expected_yield_kg: 5000.0,
            yield_min_kg: 4000.0,
            yield_max_kg: 6000.0,
            season_factor: 1.0,
            input_factor: 1.0,
            population_factor: 1.0,
            harvest_start: Some(start),
            harvest_end: Some(end),
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    fn planting_activity(area_ha: f64) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            farmer_id: Uuid::new_v4(),
            crop_id: Uuid::new_v4(),
            crop_name: "rice".into(),
            activity_type: ActivityType::Planting,
            date: date(2024, 1, 1),
            notes: String::new(),
            area_ha,
            seed_qty_kg: Some(100.0),
            fert_sacks: None,
            spacing: Some("20x20 cm".into()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_planting_record_from_activity() {
        let baseline = CropBaseline::new("Rice", "Jun-Nov");
        let record = planting_record(&planting_activity(2.0), &baseline);
        assert_eq!(record.crop_name, "Rice");
        assert_eq!(record.area_hectares, 2.0);
        assert_eq!(record.seed_quantity_kg, Some(100.0));
        assert_eq!(record.fertilizer_sacks, None);
        assert_eq!(record.spacing.as_deref(), Some("20x20 cm"));
        assert_eq!(record.date, date(2024, 1, 1));
    }

    #[test]
    fn test_validate_planting_inputs() {
        assert!(validate_planting_inputs(1.0, Some(40.0), Some(4.0), Some("20x20 cm")).is_ok());
        assert!(validate_planting_inputs(1.0, None, None, None).is_ok());

        let err = validate_planting_inputs(0.0, None, None, None).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "area_ha"));

        let err = validate_planting_inputs(1.0, Some(-1.0), None, None).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "seed_qty_kg"));

        let err = validate_planting_inputs(1.0, None, None, Some("wide")).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "spacing"));
    }

    fn preview_input(spacing: Option<&str>) -> PreviewForecastInput {
        PreviewForecastInput {
            crop_id: Uuid::new_v4(),
            date: date(2024, 1, 1),
            area_ha: None,
            seed_qty_kg: None,
            fert_sacks: None,
            spacing: spacing.map(str::to_string),
        }
    }

    #[test]
    fn test_normalize_spacing() {
        assert_eq!(normalize_spacing(None), None);
        assert_eq!(normalize_spacing(Some("")), None);
        assert_eq!(normalize_spacing(Some("   ")), None);
        assert_eq!(normalize_spacing(Some(" 3x3 m ")), Some("3x3 m"));
    }

    #[test]
    fn test_preview_treats_blank_spacing_as_absent() {
        let input = preview_input(Some(""));
        assert!(input.validate().is_ok());
        let baseline = CropBaseline::new("Mango", "Dec-Apr").with_yield(3.0, 5.0);
        let planting = input.planting(&baseline);
        assert_eq!(planting.spacing, None);
        assert_eq!(planting.area_hectares, 1.0);
        assert_eq!(planting.crop_name, "Mango");
    }

    #[test]
    fn test_preview_trims_spacing() {
        let input = preview_input(Some("  10x10 m "));
        assert!(input.validate().is_ok());
        let baseline = CropBaseline::new("Mango", "Dec-Apr").with_yield(3.0, 5.0);
        assert_eq!(input.planting(&baseline).spacing.as_deref(), Some("10x10 m"));

        let err = preview_input(Some("wide")).validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "spacing"));
    }

    #[test]
    fn test_yield_series_rounds_and_merges_names() {
        let rows = vec![
            ("Corn".to_string(), 4500.126),
            ("Rice".to_string(), 5000.0),
            ("Corn".to_string(), 100.0),
        ];
        let series = build_yield_series(&rows);
        assert_eq!(series.labels, vec!["Corn", "Rice"]);
        assert_eq!(series.data, vec![4600.13, 5000.0]);
    }

    #[test]
    fn test_yield_series_empty() {
        assert_eq!(build_yield_series(&[]), ChartSeries::default());
    }

    #[test]
    fn test_harvest_timeline_one_per_crop() {
        let today = date(2024, 3, 1);
        let rice = Uuid::new_v4();
        let corn = Uuid::new_v4();
        let rows = vec![
            row(rice, "Rice", date(2024, 2, 20), date(2024, 3, 10)),
            row(corn, "Corn", date(2024, 3, 11), date(2024, 4, 10)),
            row(rice, "Rice", date(2024, 5, 1), date(2024, 5, 21)),
        ];

        let timeline = build_harvest_timeline(&rows, today);
        assert_eq!(timeline.labels, vec!["Rice", "Corn"]);
        // Rice window already open, so the offset clamps to zero
        assert_eq!(timeline.offsets, vec![0, 10]);
        assert_eq!(timeline.windows, vec![19, 30]);
    }

    #[test]
    fn test_harvest_timeline_skips_closed_windows() {
        let today = date(2024, 6, 1);
        let rice = Uuid::new_v4();
        let rows = vec![
            row(rice, "Rice", date(2024, 4, 20), date(2024, 5, 10)),
            row(rice, "Rice", date(2024, 8, 1), date(2024, 8, 21)),
        ];

        let timeline = build_harvest_timeline(&rows, today);
        assert_eq!(timeline.labels, vec!["Rice"]);
        assert_eq!(timeline.offsets, vec![61]);
        assert_eq!(timeline.windows, vec![20]);
    }
}
