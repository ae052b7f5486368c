//! JSON REST API for the Taxon catalog.
//!
//! Exposes an axum [`Router`] backed by any [`taxon_core::store::CatalogStore`].
//! CORS, tracing layers, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", taxon_api::api_router(store.clone()))
//! ```

pub mod bulk;
pub mod data;
pub mod domain_concepts;
pub mod error;
pub mod fields;
pub mod references;
pub mod subject_areas;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use taxon_core::store::CatalogStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CatalogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Subject areas
    .route(
      "/subject-areas",
      get(subject_areas::list::<S>).post(subject_areas::create::<S>),
    )
    .route(
      "/subject-areas/{id}",
      put(subject_areas::update::<S>).delete(subject_areas::delete::<S>),
    )
    // Domain concepts
    .route(
      "/domain-concepts",
      get(domain_concepts::list::<S>).post(domain_concepts::create::<S>),
    )
    .route(
      "/domain-concepts/{id}",
      put(domain_concepts::update::<S>).delete(domain_concepts::delete::<S>),
    )
    // Bulk
    .route("/bulk-save", post(bulk::handler::<S>))
    // References
    .route("/references", get(references::list::<S>).post(references::create::<S>))
    .route(
      "/references/{id}",
      get(references::get_one::<S>)
        .put(references::update::<S>)
        .delete(references::delete::<S>),
    )
    .route(
      "/references/{id}/fields",
      get(fields::list::<S>).post(fields::create::<S>),
    )
    .route(
      "/references/{id}/fields/{field_id}",
      put(fields::update::<S>).delete(fields::delete::<S>),
    )
    .route("/references/{id}/data", get(data::list::<S>).post(data::create::<S>))
    .route(
      "/references/{id}/data/check",
      get(data::check::<S>)
        .put(data::update_check_row::<S>)
        .delete(data::delete_check_row::<S>),
    )
    .route(
      "/references/{id}/data/{data_id}",
      put(data::update::<S>).delete(data::delete::<S>),
    )
    .with_state(store)
}
