//! Handlers for `/domain-concepts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/domain-concepts` | Optional `?subject_area_id=` |
//! | `POST`   | `/domain-concepts` | Body: [`NewDomainConcept`]; returns 201 |
//! | `PUT`    | `/domain-concepts/{id}` | Body: [`DomainConceptPatch`] |
//! | `DELETE` | `/domain-concepts/{id}` | Cascades to child concepts only |

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
  concept::{DomainConcept, DomainConceptPatch, NewDomainConcept},
  store::CatalogStore,
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Restrict to one subject area. An empty value means no filter.
  pub subject_area_id: Option<String>,
}

/// `GET /domain-concepts[?subject_area_id=<id>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<DomainConcept>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let area = params.subject_area_id.filter(|id| !id.is_empty());
  let concepts = store.list_domain_concepts(area).await.map_err(ApiError::store)?;
  Ok(Json(concepts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /domain-concepts`: returns 201 + the stored concept.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewDomainConcept>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let concept = store.create_domain_concept(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(concept)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /domain-concepts/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(patch): Json<DomainConceptPatch>,
) -> Result<Json<DomainConcept>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let concept = store
    .update_domain_concept(id.clone(), patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("domain concept {id} not found")))?;
  Ok(Json(concept))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /domain-concepts/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let report = store
    .delete_domain_concept(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("domain concept {id} not found")))?;

  tracing::info!(%id, domain_concepts = report.domain_concepts.len(), "deleted domain concept");

  Ok(Json(json!({
    "message": "Domain concept deleted successfully",
    "deleted": report,
  })))
}
