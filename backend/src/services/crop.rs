//! Crop catalog service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::{validate_baseline_ranges, validate_crop_name, validate_ideal_seasons, Crop, CropBaseline};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Crop service for reading and extending the crop catalog
#[derive(Clone)]
pub struct CropService {
    db: PgPool,
}

/// Database row for a crop
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CropRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub ideal_seasons: String,
    pub seed_rate_min_kg: f64,
    pub seed_rate_max_kg: f64,
    pub fert_sacks_min: f64,
    pub fert_sacks_max: f64,
    pub yield_t_min: f64,
    pub yield_t_max: f64,
    pub days_to_harvest_min: i32,
    pub days_to_harvest_max: i32,
    pub created_at: DateTime<Utc>,
}

impl CropRow {
    pub fn baseline(&self) -> CropBaseline {
        CropBaseline {
            name: self.name.clone(),
            ideal_seasons: self.ideal_seasons.clone(),
            seed_rate_min_kg: self.seed_rate_min_kg,
            seed_rate_max_kg: self.seed_rate_max_kg,
            fert_sacks_min: self.fert_sacks_min,
            fert_sacks_max: self.fert_sacks_max,
            yield_min_tonnes_per_ha: self.yield_t_min,
            yield_max_tonnes_per_ha: self.yield_t_max,
            days_to_harvest_min: self.days_to_harvest_min,
            days_to_harvest_max: self.days_to_harvest_max,
        }
    }
}

impl From<CropRow> for Crop {
    fn from(row: CropRow) -> Self {
        Self {
            baseline: row.baseline(),
            id: row.id,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// Input for adding a crop to the catalog
#[derive(Debug, Deserialize)]
pub struct CreateCropInput {
    pub name: String,
    pub description: Option<String>,
    pub ideal_seasons: String,
    pub seed_rate_min_kg: Option<f64>,
    pub seed_rate_max_kg: Option<f64>,
    pub fert_sacks_min: Option<f64>,
    pub fert_sacks_max: Option<f64>,
    pub yield_t_min: Option<f64>,
    pub yield_t_max: Option<f64>,
    pub days_to_harvest_min: Option<i32>,
    pub days_to_harvest_max: Option<i32>,
}

impl CreateCropInput {
    /// Baseline described by this input, unspecified rates defaulting to zero
    pub fn baseline(&self) -> CropBaseline {
        let defaults = CropBaseline::new(self.name.trim(), self.ideal_seasons.trim());
        CropBaseline {
            seed_rate_min_kg: self.seed_rate_min_kg.unwrap_or(0.0),
            seed_rate_max_kg: self.seed_rate_max_kg.unwrap_or(0.0),
            fert_sacks_min: self.fert_sacks_min.unwrap_or(0.0),
            fert_sacks_max: self.fert_sacks_max.unwrap_or(0.0),
            yield_min_tonnes_per_ha: self.yield_t_min.unwrap_or(0.0),
            yield_max_tonnes_per_ha: self.yield_t_max.unwrap_or(0.0),
            days_to_harvest_min: self
                .days_to_harvest_min
                .unwrap_or(defaults.days_to_harvest_min),
            days_to_harvest_max: self
                .days_to_harvest_max
                .unwrap_or(defaults.days_to_harvest_max),
            ..defaults
        }
    }

    /// Validate the input before it reaches the catalog
    pub fn validate(&self) -> AppResult<CropBaseline> {
        validate_crop_name(&self.name).map_err(|msg| AppError::validation("name", msg))?;
        validate_ideal_seasons(&self.ideal_seasons)
            .map_err(|msg| AppError::validation("ideal_seasons", msg))?;

        let baseline = self.baseline();
        validate_baseline_ranges(&baseline).map_err(|msg| AppError::validation("baseline", msg))?;
        Ok(baseline)
    }
}

/// Input for editing a catalog crop; absent fields keep their current value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCropInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ideal_seasons: Option<String>,
    pub seed_rate_min_kg: Option<f64>,
    pub seed_rate_max_kg: Option<f64>,
    pub fert_sacks_min: Option<f64>,
    pub fert_sacks_max: Option<f64>,
    pub yield_t_min: Option<f64>,
    pub yield_t_max: Option<f64>,
    pub days_to_harvest_min: Option<i32>,
    pub days_to_harvest_max: Option<i32>,
}

impl UpdateCropInput {
    /// Merge this input over a crop's current baseline
    pub fn apply(&self, current: CropBaseline) -> CropBaseline {
        CropBaseline {
            name: self
                .name
                .as_deref()
                .map(|name| name.trim().to_string())
                .unwrap_or(current.name),
            ideal_seasons: self
                .ideal_seasons
                .as_deref()
                .map(|seasons| seasons.trim().to_string())
                .unwrap_or(current.ideal_seasons),
            seed_rate_min_kg: self.seed_rate_min_kg.unwrap_or(current.seed_rate_min_kg),
            seed_rate_max_kg: self.seed_rate_max_kg.unwrap_or(current.seed_rate_max_kg),
            fert_sacks_min: self.fert_sacks_min.unwrap_or(current.fert_sacks_min),
            fert_sacks_max: self.fert_sacks_max.unwrap_or(current.fert_sacks_max),
            yield_min_tonnes_per_ha: self.yield_t_min.unwrap_or(current.yield_min_tonnes_per_ha),
            yield_max_tonnes_per_ha: self.yield_t_max.unwrap_or(current.yield_max_tonnes_per_ha),
            days_to_harvest_min: self.days_to_harvest_min.unwrap_or(current.days_to_harvest_min),
            days_to_harvest_max: self.days_to_harvest_max.unwrap_or(current.days_to_harvest_max),
        }
    }

    /// Validate the merged result
    pub fn validate(&self, current: CropBaseline) -> AppResult<CropBaseline> {
        let baseline = self.apply(current);
        validate_crop_name(&baseline.name).map_err(|msg| AppError::validation("name", msg))?;
        validate_ideal_seasons(&baseline.ideal_seasons)
            .map_err(|msg| AppError::validation("ideal_seasons", msg))?;
        validate_baseline_ranges(&baseline).map_err(|msg| AppError::validation("baseline", msg))?;
        Ok(baseline)
    }
}

const CROP_COLUMNS: &str = r#"
    id, name, description, ideal_seasons,
    seed_rate_min_kg, seed_rate_max_kg, fert_sacks_min, fert_sacks_max,
    yield_t_min, yield_t_max, days_to_harvest_min, days_to_harvest_max, created_at
"#;

impl CropService {
    /// Create a new CropService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List every crop in the catalog, alphabetically
    pub async fn list_crops(&self) -> AppResult<Vec<Crop>> {
        let rows = sqlx::query_as::<_, CropRow>(&format!(
            "SELECT {} FROM crops ORDER BY name",
            CROP_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Crop::from).collect())
    }

    /// Get a crop by ID
    pub async fn get_crop(&self, crop_id: Uuid) -> AppResult<Crop> {
        self.get_crop_row(crop_id).await.map(Crop::from)
    }

    pub(crate) async fn get_crop_row(&self, crop_id: Uuid) -> AppResult<CropRow> {
        sqlx::query_as::<_, CropRow>(&format!(
            "SELECT {} FROM crops WHERE id = $1",
            CROP_COLUMNS
        ))
        .bind(crop_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Crop".to_string()))
    }

    /// Add a crop to the catalog
    pub async fn create_crop(&self, input: CreateCropInput) -> AppResult<Crop> {
        let baseline = input.validate()?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM crops WHERE LOWER(name) = LOWER($1)",
        )
        .bind(&baseline.name)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("name".to_string()));
        }

        let row = sqlx::query_as::<_, CropRow>(&format!(
            r#"
            INSERT INTO crops (name, description, ideal_seasons,
                               seed_rate_min_kg, seed_rate_max_kg, fert_sacks_min, fert_sacks_max,
                               yield_t_min, yield_t_max, days_to_harvest_min, days_to_harvest_max)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            CROP_COLUMNS
        ))
        .bind(&baseline.name)
        .bind(input.description.as_deref().unwrap_or(""))
        .bind(&baseline.ideal_seasons)
        .bind(baseline.seed_rate_min_kg)
        .bind(baseline.seed_rate_max_kg)
        .bind(baseline.fert_sacks_min)
        .bind(baseline.fert_sacks_max)
        .bind(baseline.yield_min_tonnes_per_ha)
        .bind(baseline.yield_max_tonnes_per_ha)
        .bind(baseline.days_to_harvest_min)
        .bind(baseline.days_to_harvest_max)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(crop_id = %row.id, name = %row.name, "Crop added to catalog");

        Ok(Crop::from(row))
    }

    /// Edit a catalog crop. Stored forecasts keep the values they were computed with.
    pub async fn update_crop(&self, crop_id: Uuid, input: UpdateCropInput) -> AppResult<Crop> {
        let existing = self.get_crop_row(crop_id).await?;
        let baseline = input.validate(existing.baseline())?;

        if input.name.is_some() {
            let duplicate = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM crops WHERE LOWER(name) = LOWER($1) AND id != $2",
            )
            .bind(&baseline.name)
            .bind(crop_id)
            .fetch_one(&self.db)
            .await?;

            if duplicate > 0 {
                return Err(AppError::DuplicateEntry("name".to_string()));
            }
        }

        let description = input.description.unwrap_or(existing.description);

        let row = sqlx::query_as::<_, CropRow>(&format!(
            r#"
            UPDATE crops
            SET name = $1, description = $2, ideal_seasons = $3,
                seed_rate_min_kg = $4, seed_rate_max_kg = $5, fert_sacks_min = $6, fert_sacks_max = $7,
                yield_t_min = $8, yield_t_max = $9, days_to_harvest_min = $10, days_to_harvest_max = $11
            WHERE id = $12
            RETURNING {}
            "#,
            CROP_COLUMNS
        ))
        .bind(&baseline.name)
        .bind(description.trim())
        .bind(&baseline.ideal_seasons)
        .bind(baseline.seed_rate_min_kg)
        .bind(baseline.seed_rate_max_kg)
        .bind(baseline.fert_sacks_min)
        .bind(baseline.fert_sacks_max)
        .bind(baseline.yield_min_tonnes_per_ha)
        .bind(baseline.yield_max_tonnes_per_ha)
        .bind(baseline.days_to_harvest_min)
        .bind(baseline.days_to_harvest_max)
        .bind(crop_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(crop_id = %row.id, name = %row.name, "Crop updated");

        Ok(Crop::from(row))
    }

    /// Remove a crop from the catalog along with its activities and forecasts
    pub async fn delete_crop(&self, crop_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM crops WHERE id = $1")
            .bind(crop_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Crop".to_string()));
        }

        tracing::info!(crop_id = %crop_id, "Crop deleted");

        Ok(())
    }
}
