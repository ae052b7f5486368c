//! Handlers for `/references/{id}/data` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/references/{id}/data` | Optional `?filter_field=&filter_value=` exact match |
//! | `POST`   | `/references/{id}/data` | Body: [`NewReferenceData`]; returns 201 |
//! | `GET`    | `/references/{id}/data/check` | Rows whose payload has undeclared keys |
//! | `PUT`    | `/references/{id}/data/check` | Row update for a row whose id is `check` |
//! | `DELETE` | `/references/{id}/data/check` | Row delete for a row whose id is `check` |
//! | `PUT`    | `/references/{id}/data/{data_id}` | Body: [`ReferenceDataPatch`] |
//! | `DELETE` | `/references/{id}/data/{data_id}` | Single row; no cascade |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use taxon_core::{
  reference::{DataFilter, NewReferenceData, ReferenceData, ReferenceDataPatch, StaleKeys},
  store::CatalogStore,
};

use crate::{error::ApiError, references};

fn not_found(data_id: &str) -> ApiError {
  ApiError::NotFound(format!("data row {data_id} not found"))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Field id to filter on; ignored unless `filter_value` is also set.
  pub filter_field: Option<String>,
  pub filter_value: Option<String>,
}

/// `GET /references/{id}/data[?filter_field=<field>&filter_value=<value>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(ref_id): Path<String>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ReferenceData>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let filter = DataFilter::from_params(params.filter_field, params.filter_value);
  let rows = store.list_data(ref_id, filter).await.map_err(ApiError::store)?;
  Ok(Json(rows))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /references/{id}/data`: 404 if the reference does not exist.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(ref_id): Path<String>,
  Json(body): Json<NewReferenceData>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let row = store
    .create_data(ref_id.clone(), body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| references::not_found(&ref_id))?;
  Ok((StatusCode::CREATED, Json(row)))
}

// ─── Update / delete ──────────────────────────────────────────────────────────

/// `PUT /references/{id}/data/{data_id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path((ref_id, data_id)): Path<(String, String)>,
  Json(patch): Json<ReferenceDataPatch>,
) -> Result<Json<ReferenceData>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let row = store
    .update_data(ref_id, data_id.clone(), patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&data_id))?;
  Ok(Json(row))
}

/// `DELETE /references/{id}/data/{data_id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path((ref_id, data_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_data(ref_id, data_id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&data_id))?;
  Ok(Json(json!({ "message": "Data row deleted successfully" })))
}

// ─── Check ────────────────────────────────────────────────────────────────────

/// `GET /references/{id}/data/check`: never modifies anything.
pub async fn check<S>(
  State(store): State<Arc<S>>,
  Path(ref_id): Path<String>,
) -> Result<Json<Vec<StaleKeys>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let report = store
    .check_data(ref_id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| references::not_found(&ref_id))?;
  Ok(Json(report))
}

/// Row id that collides with the static `check` segment.
const CHECK_ROW_ID: &str = "check";

/// `PUT /references/{id}/data/check`: the row update for a row whose id is
/// `check`, which the static route would otherwise shadow.
pub async fn update_check_row<S>(
  state: State<Arc<S>>,
  Path(ref_id): Path<String>,
  patch: Json<ReferenceDataPatch>,
) -> Result<Json<ReferenceData>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  update(state, Path((ref_id, CHECK_ROW_ID.to_string())), patch).await
}

/// `DELETE /references/{id}/data/check`
pub async fn delete_check_row<S>(
  state: State<Arc<S>>,
  Path(ref_id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  delete(state, Path((ref_id, CHECK_ROW_ID.to_string()))).await
}
