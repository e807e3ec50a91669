//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub database: String,
    /// Crops in the catalog, absent when the database is unreachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crops: Option<i64>,
    pub density_sensitive_crops: usize,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let crops = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM crops")
        .fetch_one(&state.db)
        .await;

    let (database, crops) = match crops {
        Ok(count) => ("connected", Some(count)),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            ("disconnected", None)
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        database: database.to_string(),
        crops,
        density_sensitive_crops: state.density_table.len(),
    })
}
