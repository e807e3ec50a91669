//! Route definitions for the Farm Records Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - crop catalog
        .nest("/crops", crop_routes(state.clone()))
        // Protected routes - activity log
        .nest("/activities", activity_routes(state.clone()))
        // Protected routes - forecasts and charts
        .nest("/forecasts", forecast_routes(state))
}

/// Crop catalog routes (protected)
fn crop_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_crops).post(handlers::create_crop))
        .route(
            "/:crop_id",
            get(handlers::get_crop)
                .put(handlers::update_crop)
                .delete(handlers::delete_crop),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Activity log routes (protected)
fn activity_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_activities).post(handlers::record_activity),
        )
        .route("/:activity_id/forecast", post(handlers::recompute_forecast))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Forecast routes (protected)
fn forecast_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_forecasts))
        .route("/preview", post(handlers::preview_forecast))
        .route("/charts/yield-by-crop", get(handlers::yield_by_crop_chart))
        .route(
            "/charts/harvest-timeline",
            get(handlers::harvest_timeline_chart),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
