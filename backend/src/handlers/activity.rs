//! Activity log HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::activity::{ActivityFilter, ActivityService, RecordActivityInput};
use crate::AppState;

/// List the current farmer's activities, optionally by crop and date range
pub async fn list_activities(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<ActivityFilter>,
) -> impl IntoResponse {
    if let Err(e) = user.require_farmer() {
        return e.into_response();
    }

    let service = ActivityService::new(state.db.clone(), state.forecast_service());

    match service.list_activities(user.user_id, &filter).await {
        Ok(activities) => {
            (StatusCode::OK, Json(serde_json::json!({ "activities": activities }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Log an activity; plantings come back with their forecast
pub async fn record_activity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<RecordActivityInput>,
) -> impl IntoResponse {
    if let Err(e) = user.require_farmer() {
        return e.into_response();
    }

    let service = ActivityService::new(state.db.clone(), state.forecast_service());

    match service.record_activity(user.user_id, input).await {
        Ok(recorded) => (StatusCode::CREATED, Json(recorded)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Recompute the forecast for a planting activity
pub async fn recompute_forecast(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(activity_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = user.require_farmer() {
        return e.into_response();
    }

    match state
        .forecast_service()
        .recompute_for_activity(user.user_id, activity_id)
        .await
    {
        Ok(forecast) => (StatusCode::OK, Json(forecast)).into_response(),
        Err(e) => e.into_response(),
    }
}
