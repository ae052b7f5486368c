//! Handler for `POST /bulk-save`.
//!
//! Body: `{"subject_areas": [...], "domain_concepts": [...]}` with partial
//! records (see [`taxon_core::bulk`]). Rows are upserted by id; nothing is
//! ever deleted. The batch is applied as a whole or not at all.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};
use taxon_core::{bulk::BulkSave, store::CatalogStore};

use crate::error::ApiError;

/// `POST /bulk-save`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Json(batch): Json<BulkSave>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let areas = batch.subject_areas.len();
  let concepts = batch.domain_concepts.len();

  let report = store.bulk_save(batch).await.map_err(|e| {
    tracing::warn!(areas, concepts, error = %e, "bulk save rolled back");
    ApiError::store(e)
  })?;

  tracing::info!(?report, "bulk save applied");

  Ok(Json(json!({
    "message": "All changes saved successfully",
    "report": report,
  })))
}
