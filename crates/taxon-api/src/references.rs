//! Handlers for `/references` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/references` | Ordered by `sort_order` |
//! | `POST`   | `/references` | Body: [`NewReference`]; optional caller id |
//! | `GET`    | `/references/{id}` | 404 if not found |
//! | `PUT`    | `/references/{id}` | Body: [`ReferencePatch`] |
//! | `DELETE` | `/references/{id}` | Also removes its fields and data rows |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::{Value, json};
use taxon_core::{
  reference::{NewReference, Reference, ReferencePatch},
  store::CatalogStore,
};

use crate::error::ApiError;

pub(crate) fn not_found(id: &str) -> ApiError {
  ApiError::NotFound(format!("reference {id} not found"))
}

/// `GET /references`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Reference>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let refs = store.list_references().await.map_err(ApiError::store)?;
  Ok(Json(refs))
}

/// `GET /references/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Reference>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let reference = store
    .get_reference(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(reference))
}

/// `POST /references`: returns 201 + the stored reference.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewReference>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let reference = store.create_reference(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(reference)))
}

/// `PUT /references/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(patch): Json<ReferencePatch>,
) -> Result<Json<Reference>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let reference = store
    .update_reference(id.clone(), patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(reference))
}

/// `DELETE /references/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_reference(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  tracing::info!(%id, "deleted reference with its fields and data");
  Ok(Json(json!({ "message": "Reference deleted successfully" })))
}
