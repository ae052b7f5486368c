//! Handlers for `/subject-areas` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/subject-areas` | Every area with a computed `is_terminal` |
//! | `POST`   | `/subject-areas` | Body: [`NewSubjectArea`]; returns 201 |
//! | `PUT`    | `/subject-areas/{id}` | Body: [`SubjectAreaPatch`]; 404 if not found |
//! | `DELETE` | `/subject-areas/{id}` | Cascades to descendant areas and their concepts |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::{Value, json};
use taxon_core::{
  store::CatalogStore,
  subject_area::{NewSubjectArea, SubjectAreaNode, SubjectAreaPatch},
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /subject-areas`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<SubjectAreaNode>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let areas = store.list_subject_areas().await.map_err(ApiError::store)?;
  Ok(Json(areas))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /subject-areas`: returns 201 + the stored area.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewSubjectArea>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let area = store.create_subject_area(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(area)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /subject-areas/{id}`: only the supplied fields change.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(patch): Json<SubjectAreaPatch>,
) -> Result<Json<SubjectAreaNode>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let area = store
    .update_subject_area(id.clone(), patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("subject area {id} not found")))?;
  Ok(Json(area))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /subject-areas/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let report = store
    .delete_subject_area(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("subject area {id} not found")))?;

  tracing::info!(
    %id,
    subject_areas = report.subject_areas.len(),
    domain_concepts = report.domain_concepts.len(),
    "deleted subject area"
  );

  Ok(Json(json!({
    "message": "Subject area deleted successfully",
    "deleted": report,
  })))
}
