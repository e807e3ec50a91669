//! Crop catalog HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::crop::{CreateCropInput, CropService, UpdateCropInput};
use crate::AppState;

/// List the crop catalog
pub async fn list_crops(State(state): State<AppState>, _user: CurrentUser) -> impl IntoResponse {
    let service = CropService::new(state.db.clone());

    match service.list_crops().await {
        Ok(crops) => (StatusCode::OK, Json(serde_json::json!({ "crops": crops }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a single crop with its baseline
pub async fn get_crop(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(crop_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = CropService::new(state.db.clone());

    match service.get_crop(crop_id).await {
        Ok(crop) => (StatusCode::OK, Json(crop)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Add a crop to the catalog (technicians and admins)
pub async fn create_crop(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateCropInput>,
) -> impl IntoResponse {
    if let Err(e) = user.require_catalog_editor() {
        return e.into_response();
    }

    let service = CropService::new(state.db.clone());

    match service.create_crop(input).await {
        Ok(crop) => (StatusCode::CREATED, Json(crop)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Edit a catalog crop (technicians and admins)
pub async fn update_crop(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(crop_id): Path<Uuid>,
    Json(input): Json<UpdateCropInput>,
) -> impl IntoResponse {
    if let Err(e) = user.require_catalog_editor() {
        return e.into_response();
    }

    let service = CropService::new(state.db.clone());

    match service.update_crop(crop_id, input).await {
        Ok(crop) => (StatusCode::OK, Json(crop)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a catalog crop (technicians and admins)
pub async fn delete_crop(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(crop_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = user.require_catalog_editor() {
        return e.into_response();
    }

    let service = CropService::new(state.db.clone());

    match service.delete_crop(crop_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
