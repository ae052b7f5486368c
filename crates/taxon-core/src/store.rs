//! The `CatalogStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `taxon-store-sqlite`).
//! Higher layers (`taxon-api`, `taxon-server`) depend on this abstraction, not
//! on any concrete backend.
//!
//! Operations that target an id return `Option` (or `None` inside the
//! result) when the id does not exist; callers map that to "not found".

use std::future::Future;

use crate::{
  bulk::{BulkSave, BulkSaveReport},
  concept::{DomainConcept, DomainConceptPatch, NewDomainConcept},
  reference::{
    DataFilter, NewReference, NewReferenceData, NewReferenceField, Reference,
    ReferenceData, ReferenceDataPatch, ReferenceField, ReferenceFieldPatch,
    ReferencePatch, StaleKeys,
  },
  subject_area::{NewSubjectArea, SubjectAreaNode, SubjectAreaPatch},
  tree::CascadeReport,
};

/// Abstraction over a catalog store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Subject areas ─────────────────────────────────────────────────────

  /// All subject areas ordered by `sort_order`, each with `is_terminal`
  /// computed from the same snapshot.
  fn list_subject_areas(
    &self,
  ) -> impl Future<Output = Result<Vec<SubjectAreaNode>, Self::Error>> + Send + '_;

  /// Persist a new subject area under a freshly generated id.
  fn create_subject_area(
    &self,
    input: NewSubjectArea,
  ) -> impl Future<Output = Result<SubjectAreaNode, Self::Error>> + Send + '_;

  /// Apply a partial update. `None` if `id` does not exist.
  fn update_subject_area(
    &self,
    id: String,
    patch: SubjectAreaPatch,
  ) -> impl Future<Output = Result<Option<SubjectAreaNode>, Self::Error>> + Send + '_;

  /// Delete a subject area, all of its descendant areas, and every domain
  /// concept whose `subject_area_id` is any of the deleted areas.
  /// `None` if `id` does not exist.
  fn delete_subject_area(
    &self,
    id: String,
  ) -> impl Future<Output = Result<Option<CascadeReport>, Self::Error>> + Send + '_;

  // ── Domain concepts ───────────────────────────────────────────────────

  /// Concepts ordered by `sort_order`, optionally restricted to one area.
  fn list_domain_concepts(
    &self,
    subject_area_id: Option<String>,
  ) -> impl Future<Output = Result<Vec<DomainConcept>, Self::Error>> + Send + '_;

  fn create_domain_concept(
    &self,
    input: NewDomainConcept,
  ) -> impl Future<Output = Result<DomainConcept, Self::Error>> + Send + '_;

  fn update_domain_concept(
    &self,
    id: String,
    patch: DomainConceptPatch,
  ) -> impl Future<Output = Result<Option<DomainConcept>, Self::Error>> + Send + '_;

  /// Delete a concept and its concept-tree descendants. No other table is
  /// touched.
  fn delete_domain_concept(
    &self,
    id: String,
  ) -> impl Future<Output = Result<Option<CascadeReport>, Self::Error>> + Send + '_;

  // ── Bulk ──────────────────────────────────────────────────────────────

  /// Upsert every record by id. Either the whole batch is applied or none
  /// of it is.
  fn bulk_save(
    &self,
    batch: BulkSave,
  ) -> impl Future<Output = Result<BulkSaveReport, Self::Error>> + Send + '_;

  // ── References ────────────────────────────────────────────────────────

  fn list_references(
    &self,
  ) -> impl Future<Output = Result<Vec<Reference>, Self::Error>> + Send + '_;

  fn get_reference(
    &self,
    id: String,
  ) -> impl Future<Output = Result<Option<Reference>, Self::Error>> + Send + '_;

  fn create_reference(
    &self,
    input: NewReference,
  ) -> impl Future<Output = Result<Reference, Self::Error>> + Send + '_;

  fn update_reference(
    &self,
    id: String,
    patch: ReferencePatch,
  ) -> impl Future<Output = Result<Option<Reference>, Self::Error>> + Send + '_;

  /// Delete a reference together with its fields and data rows. Fields of
  /// *other* references pointing here are left dangling.
  fn delete_reference(
    &self,
    id: String,
  ) -> impl Future<Output = Result<Option<Reference>, Self::Error>> + Send + '_;

  // ── Reference fields ──────────────────────────────────────────────────

  fn list_fields(
    &self,
    reference_id: String,
  ) -> impl Future<Output = Result<Vec<ReferenceField>, Self::Error>> + Send + '_;

  /// `None` if the owning reference does not exist.
  fn create_field(
    &self,
    reference_id: String,
    input: NewReferenceField,
  ) -> impl Future<Output = Result<Option<ReferenceField>, Self::Error>> + Send + '_;

  fn update_field(
    &self,
    reference_id: String,
    field_id: String,
    patch: ReferenceFieldPatch,
  ) -> impl Future<Output = Result<Option<ReferenceField>, Self::Error>> + Send + '_;

  /// Existing payloads keep their values under the deleted field's id.
  fn delete_field(
    &self,
    reference_id: String,
    field_id: String,
  ) -> impl Future<Output = Result<Option<ReferenceField>, Self::Error>> + Send + '_;

  // ── Reference data ────────────────────────────────────────────────────

  /// Rows of a reference in insertion order, optionally filtered.
  fn list_data(
    &self,
    reference_id: String,
    filter: Option<DataFilter>,
  ) -> impl Future<Output = Result<Vec<ReferenceData>, Self::Error>> + Send + '_;

  /// `None` if the owning reference does not exist.
  fn create_data(
    &self,
    reference_id: String,
    input: NewReferenceData,
  ) -> impl Future<Output = Result<Option<ReferenceData>, Self::Error>> + Send + '_;

  fn update_data(
    &self,
    reference_id: String,
    data_id: String,
    patch: ReferenceDataPatch,
  ) -> impl Future<Output = Result<Option<ReferenceData>, Self::Error>> + Send + '_;

  fn delete_data(
    &self,
    reference_id: String,
    data_id: String,
  ) -> impl Future<Output = Result<Option<ReferenceData>, Self::Error>> + Send + '_;

  /// Compare every row's payload keys against the declared fields.
  /// `None` if the reference does not exist.
  fn check_data(
    &self,
    reference_id: String,
  ) -> impl Future<Output = Result<Option<Vec<StaleKeys>>, Self::Error>> + Send + '_;
}
