use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use core_types::{validate_id, Property, PropertyDraft};

/// Incoming payload for create and update.
///
/// `status` stays a plain string here so that every invalid value is
/// rejected by the same validation path with the same error shape,
/// instead of some values failing inside deserialization. Missing
/// fields default to empty strings and fail validation the same way.
#[derive(Debug, Deserialize)]
pub struct PropertyPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: String,
}

impl PropertyPayload {
    fn into_draft(self) -> Result<PropertyDraft, AppError> {
        Ok(PropertyDraft::new(self.title, self.address, &self.status)?)
    }
}

/// # GET /health
/// Liveness probe; answers without touching the database.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

/// # GET /properties
pub async fn list_properties(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Property>>, AppError> {
    let properties = state.repo.list().await?;
    Ok(Json(properties))
}

/// # POST /properties
pub async fn create_property(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PropertyPayload>,
) -> Result<(StatusCode, Json<Property>), AppError> {
    let draft = payload.into_draft()?;
    let property = state.repo.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

/// # PUT /properties/:id
/// Full replacement of an existing property; partial updates are not
/// supported.
pub async fn update_property(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<PropertyPayload>,
) -> Result<Json<Property>, AppError> {
    let id = validate_id(id)?;
    let draft = payload.into_draft()?;
    let property = state.repo.update(id, &draft).await?;
    Ok(Json(property))
}

/// # DELETE /properties/:id
pub async fn delete_property(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let id = validate_id(id)?;
    state.repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
