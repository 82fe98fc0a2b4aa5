//! Product handlers, including the image/variant/attribute sub-resources.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    ProductAttributePayload, ProductImagePayload, ProductPayload, ProductVariantPayload,
    RatingPayload,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ProductFilter>,
) -> Result<impl IntoResponse, AppError> {
    let products = state.store.list_products(filter.category.as_deref())?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.store.get_product(&slug)?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.store.create_product(payload)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.store.update_product(&slug, payload)?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete_product(&slug)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn rate_product(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<RatingPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.store.record_rating(&slug, payload.rating)?;
    Ok(Json(product))
}

pub async fn list_images(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let images = state.store.list_images(&slug)?;
    Ok(Json(images))
}

pub async fn add_image(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<ProductImagePayload>,
) -> Result<impl IntoResponse, AppError> {
    let image = state.store.add_image(&slug, payload)?;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path((slug, image_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete_image(&slug, image_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_variants(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let variants = state.store.list_variants(&slug)?;
    Ok(Json(variants))
}

pub async fn add_variant(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<ProductVariantPayload>,
) -> Result<impl IntoResponse, AppError> {
    let variant = state.store.add_variant(&slug, payload)?;
    Ok((StatusCode::CREATED, Json(variant)))
}

pub async fn list_attributes(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let attributes = state.store.list_attributes(&slug)?;
    Ok(Json(attributes))
}

pub async fn add_attribute(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<ProductAttributePayload>,
) -> Result<impl IntoResponse, AppError> {
    let attribute = state.store.add_attribute(&slug, payload)?;
    Ok((StatusCode::CREATED, Json(attribute)))
}
