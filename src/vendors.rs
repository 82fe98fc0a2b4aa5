//! Vendor handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::AppError;
use crate::models::VendorPayload;
use crate::state::AppState;

pub async fn list_vendors(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.list_vendors())
}

pub async fn get_vendor(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let vendor = state.store.get_vendor(&slug)?;
    Ok(Json(vendor))
}

pub async fn create_vendor(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VendorPayload>,
) -> Result<impl IntoResponse, AppError> {
    let vendor = state.store.create_vendor(payload)?;
    Ok((StatusCode::CREATED, Json(vendor)))
}

pub async fn update_vendor(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<VendorPayload>,
) -> Result<impl IntoResponse, AppError> {
    let vendor = state.store.update_vendor(&slug, payload)?;
    Ok(Json(vendor))
}

pub async fn delete_vendor(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete_vendor(&slug)?;
    Ok(StatusCode::NO_CONTENT)
}
