//! Handlers for `/references/{id}/fields` endpoints.
//!
//! Every operation is scoped to the reference in the path: a field id that
//! belongs to another reference is reported as not found.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::{Value, json};
use taxon_core::{
  reference::{NewReferenceField, ReferenceField, ReferenceFieldPatch},
  store::CatalogStore,
};

use crate::{error::ApiError, references};

fn not_found(field_id: &str) -> ApiError {
  ApiError::NotFound(format!("field {field_id} not found"))
}

/// `GET /references/{id}/fields`: ordered by `sort_order`.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(ref_id): Path<String>,
) -> Result<Json<Vec<ReferenceField>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let fields = store.list_fields(ref_id).await.map_err(ApiError::store)?;
  Ok(Json(fields))
}

/// `POST /references/{id}/fields`: 404 if the reference does not exist.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(ref_id): Path<String>,
  Json(body): Json<NewReferenceField>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let field = store
    .create_field(ref_id.clone(), body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| references::not_found(&ref_id))?;
  Ok((StatusCode::CREATED, Json(field)))
}

/// `PUT /references/{id}/fields/{field_id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path((ref_id, field_id)): Path<(String, String)>,
  Json(patch): Json<ReferenceFieldPatch>,
) -> Result<Json<ReferenceField>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let field = store
    .update_field(ref_id, field_id.clone(), patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&field_id))?;
  Ok(Json(field))
}

/// `DELETE /references/{id}/fields/{field_id}`: payload keys of existing
/// data rows are left in place.
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path((ref_id, field_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_field(ref_id, field_id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&field_id))?;
  Ok(Json(json!({ "message": "Field deleted successfully" })))
}
