//! Category handlers.
//!
//! Reads go straight to the store; the tree endpoint goes through the
//! cache. Every mutation invalidates the cached tree before returning, so
//! navigation reflects structural changes immediately and the TTL only
//! covers crashes of the invalidation path.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::CategoryPayload;
use crate::state::AppState;
use crate::tree::build_tree;

#[derive(Deserialize)]
pub struct CategoryFilter {
    /// `null` for roots only, otherwise a parent slug.
    pub parent: Option<String>,
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CategoryFilter>,
) -> Result<impl IntoResponse, AppError> {
    let parent = match filter.parent.as_deref() {
        None => None,
        Some("null") => Some(None),
        Some(slug) => Some(Some(slug)),
    };

    let categories = state.store.list_categories(parent)?;
    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category = state.store.get_category(&slug)?;
    Ok(Json(category))
}

pub async fn category_tree(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(tree) = state.tree_cache.get().await? {
        return Ok(Json(tree));
    }

    let tree = build_tree(&state.store.active_categories());
    state.tree_cache.set(&tree).await?;
    Ok(Json(tree))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let category = state.store.create_category(payload)?;
    state.tree_cache.invalidate().await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let category = state.store.update_category(&slug, payload)?;
    state.tree_cache.invalidate().await?;
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete_category(&slug)?;
    state.tree_cache.invalidate().await?;
    Ok(StatusCode::NO_CONTENT)
}
