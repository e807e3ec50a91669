//! Forecast dashboard and chart HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::middleware::CurrentUser;
use crate::services::forecast::PreviewForecastInput;
use crate::AppState;

/// Dashboard forecasts for the current farmer
pub async fn list_forecasts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    if let Err(e) = user.require_farmer() {
        return e.into_response();
    }

    let today = Utc::now().date_naive();

    match state
        .forecast_service()
        .dashboard_forecasts(user.user_id, today)
        .await
    {
        Ok(forecasts) => {
            (StatusCode::OK, Json(serde_json::json!({ "forecasts": forecasts }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Expected yield per crop chart
pub async fn yield_by_crop_chart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    if let Err(e) = user.require_farmer() {
        return e.into_response();
    }

    match state.forecast_service().yield_by_crop(user.user_id).await {
        Ok(series) => (StatusCode::OK, Json(series)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Upcoming harvest windows chart
pub async fn harvest_timeline_chart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    if let Err(e) = user.require_farmer() {
        return e.into_response();
    }

    let today = Utc::now().date_naive();

    match state
        .forecast_service()
        .harvest_timeline(user.user_id, today)
        .await
    {
        Ok(timeline) => (StatusCode::OK, Json(timeline)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Forecast unsaved planting inputs without storing anything
pub async fn preview_forecast(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(input): Json<PreviewForecastInput>,
) -> impl IntoResponse {
    match state.forecast_service().preview(input).await {
        Ok(forecast) => (StatusCode::OK, Json(forecast)).into_response(),
        Err(e) => e.into_response(),
    }
}
