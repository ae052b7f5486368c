//! [`SqliteStore`]: the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use chrono::Utc;
use taxon_core::{
  bulk::{BulkSave, BulkSaveReport},
  concept::{DomainConcept, DomainConceptPatch, NewDomainConcept},
  new_id,
  reference::{
    DataFilter, NewReference, NewReferenceData, NewReferenceField, Reference,
    ReferenceData, ReferenceDataPatch, ReferenceField, ReferenceFieldPatch,
    ReferencePatch, StaleKeys, check_rows,
  },
  store::CatalogStore,
  subject_area::{
    NewSubjectArea, SubjectArea, SubjectAreaNode, SubjectAreaPatch,
    with_terminal_flags,
  },
  tree::CascadeReport,
};

use crate::{
  Error, Result,
  queries::{self, Tree},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A catalog store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the connection thread, surfacing its own error unchanged.
  async fn run<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut rusqlite::Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  /// Run `f` inside one transaction. Any error drops the transaction, which
  /// rolls back every statement `f` issued.
  async fn run_in_tx<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .run(move |conn| {
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
      })
      .await
  }

  /// Execute raw SQL, bypassing the domain layer. Tests use this to plant
  /// rows the API would never write.
  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<()> {
    self
      .run(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await
  }

  /// A single subject area with `is_terminal` recomputed against the
  /// current table.
  fn area_node(conn: &rusqlite::Connection, area: SubjectArea) -> Result<SubjectAreaNode> {
    let is_terminal = !queries::has_children(conn, Tree::SubjectAreas, &area.id)?;
    Ok(SubjectAreaNode { area, is_terminal })
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Subject areas ─────────────────────────────────────────────────────────

  async fn list_subject_areas(&self) -> Result<Vec<SubjectAreaNode>> {
    let areas = self.run(|conn| queries::list_areas(conn)).await?;
    Ok(with_terminal_flags(areas))
  }

  async fn create_subject_area(&self, input: NewSubjectArea) -> Result<SubjectAreaNode> {
    let now = Utc::now();
    let area = SubjectArea {
      id:         new_id(),
      code:       input.code,
      name:       input.name,
      parent_id:  input.parent_id,
      sort_order: input.sort_order,
      created_at: now,
      updated_at: now,
    };

    self
      .run_in_tx(move |tx| {
        queries::insert_area(tx, &area)?;
        Self::area_node(tx, area)
      })
      .await
  }

  async fn update_subject_area(
    &self,
    id:    String,
    patch: SubjectAreaPatch,
  ) -> Result<Option<SubjectAreaNode>> {
    self
      .run_in_tx(move |tx| {
        let Some(mut area) = queries::fetch_area(tx, &id)? else {
          return Ok(None);
        };
        patch.apply(&mut area);
        area.updated_at = Utc::now();
        queries::write_area(tx, &area)?;
        Self::area_node(tx, area).map(Some)
      })
      .await
  }

  async fn delete_subject_area(&self, id: String) -> Result<Option<CascadeReport>> {
    self
      .run_in_tx(move |tx| queries::delete_subject_area_cascade(tx, &id))
      .await
  }

  // ── Domain concepts ───────────────────────────────────────────────────────

  async fn list_domain_concepts(
    &self,
    subject_area_id: Option<String>,
  ) -> Result<Vec<DomainConcept>> {
    self
      .run(move |conn| queries::list_concepts(conn, subject_area_id.as_deref()))
      .await
  }

  async fn create_domain_concept(&self, input: NewDomainConcept) -> Result<DomainConcept> {
    let now = Utc::now();
    let concept = DomainConcept {
      id:               new_id(),
      code:             input.code,
      name:             input.name,
      subject_area_id:  input.subject_area_id,
      parent_id:        input.parent_id,
      concept_type:     input.concept_type,
      sort_order:       input.sort_order,
      reference_id:     input.reference_id,
      detail_form_code: input.detail_form_code,
      created_at:       now,
      updated_at:       now,
    };

    self
      .run(move |conn| {
        queries::insert_concept(conn, &concept)?;
        Ok(concept)
      })
      .await
  }

  async fn update_domain_concept(
    &self,
    id:    String,
    patch: DomainConceptPatch,
  ) -> Result<Option<DomainConcept>> {
    self
      .run_in_tx(move |tx| {
        let Some(mut concept) = queries::fetch_concept(tx, &id)? else {
          return Ok(None);
        };
        patch.apply(&mut concept);
        concept.updated_at = Utc::now();
        queries::write_concept(tx, &concept)?;
        Ok(Some(concept))
      })
      .await
  }

  async fn delete_domain_concept(&self, id: String) -> Result<Option<CascadeReport>> {
    self
      .run_in_tx(move |tx| queries::delete_domain_concept_cascade(tx, &id))
      .await
  }

  // ── Bulk ──────────────────────────────────────────────────────────────────

  async fn bulk_save(&self, batch: BulkSave) -> Result<BulkSaveReport> {
    let now = Utc::now();

    self
      .run_in_tx(move |tx| {
        let mut report = BulkSaveReport::default();

        for record in batch.subject_areas {
          let existing = match record.id.as_deref() {
            Some(id) => queries::fetch_area(tx, id)?,
            None => None,
          };
          if let Some(mut area) = existing {
            record.overwrite(&mut area, now);
            queries::write_area(tx, &area)?;
            report.subject_areas.updated += 1;
          } else {
            queries::insert_area(tx, &record.into_area(now))?;
            report.subject_areas.inserted += 1;
          }
        }

        for record in batch.domain_concepts {
          let existing = match record.id.as_deref() {
            Some(id) => queries::fetch_concept(tx, id)?,
            None => None,
          };
          if let Some(mut concept) = existing {
            record.overwrite(&mut concept, now);
            queries::write_concept(tx, &concept)?;
            report.domain_concepts.updated += 1;
          } else {
            queries::insert_concept(tx, &record.into_concept(now))?;
            report.domain_concepts.inserted += 1;
          }
        }

        Ok(report)
      })
      .await
  }

  // ── References ────────────────────────────────────────────────────────────

  async fn list_references(&self) -> Result<Vec<Reference>> {
    self.run(|conn| queries::list_references(conn)).await
  }

  async fn get_reference(&self, id: String) -> Result<Option<Reference>> {
    self.run(move |conn| queries::fetch_reference(conn, &id)).await
  }

  async fn create_reference(&self, input: NewReference) -> Result<Reference> {
    let now = Utc::now();
    let reference = Reference {
      id:               input.id.unwrap_or_else(new_id),
      code:             input.code,
      name:             input.name,
      parent_id:        input.parent_id,
      sort_order:       input.sort_order,
      is_hierarchical:  input.is_hierarchical,
      data_by_script:   input.data_by_script,
      calculation_code: input.calculation_code,
      created_at:       now,
      updated_at:       now,
    };

    self
      .run(move |conn| {
        queries::insert_reference(conn, &reference)?;
        Ok(reference)
      })
      .await
  }

  async fn update_reference(
    &self,
    id:    String,
    patch: ReferencePatch,
  ) -> Result<Option<Reference>> {
    self
      .run_in_tx(move |tx| {
        let Some(mut reference) = queries::fetch_reference(tx, &id)? else {
          return Ok(None);
        };
        patch.apply(&mut reference);
        reference.updated_at = Utc::now();
        queries::write_reference(tx, &reference)?;
        Ok(Some(reference))
      })
      .await
  }

  async fn delete_reference(&self, id: String) -> Result<Option<Reference>> {
    self
      .run_in_tx(move |tx| queries::delete_reference_cascade(tx, &id))
      .await
  }

  // ── Reference fields ──────────────────────────────────────────────────────

  async fn list_fields(&self, reference_id: String) -> Result<Vec<ReferenceField>> {
    self
      .run(move |conn| queries::list_fields(conn, &reference_id))
      .await
  }

  async fn create_field(
    &self,
    reference_id: String,
    input:        NewReferenceField,
  ) -> Result<Option<ReferenceField>> {
    let now = Utc::now();

    self
      .run_in_tx(move |tx| {
        if queries::fetch_reference(tx, &reference_id)?.is_none() {
          return Ok(None);
        }
        let field = ReferenceField {
          id: input.id.unwrap_or_else(new_id),
          reference_id,
          code: input.code,
          name: input.name,
          ref_reference_id: input.ref_reference_id,
          sort_order: input.sort_order,
          created_at: now,
          updated_at: now,
        };
        queries::insert_field(tx, &field)?;
        Ok(Some(field))
      })
      .await
  }

  async fn update_field(
    &self,
    reference_id: String,
    field_id:     String,
    patch:        ReferenceFieldPatch,
  ) -> Result<Option<ReferenceField>> {
    self
      .run_in_tx(move |tx| {
        let Some(mut field) = queries::fetch_field(tx, &reference_id, &field_id)? else {
          return Ok(None);
        };
        patch.apply(&mut field);
        field.updated_at = Utc::now();
        queries::write_field(tx, &field)?;
        Ok(Some(field))
      })
      .await
  }

  async fn delete_field(
    &self,
    reference_id: String,
    field_id:     String,
  ) -> Result<Option<ReferenceField>> {
    self
      .run_in_tx(move |tx| {
        let Some(field) = queries::fetch_field(tx, &reference_id, &field_id)? else {
          return Ok(None);
        };
        queries::delete_field(tx, &field.id)?;
        Ok(Some(field))
      })
      .await
  }

  // ── Reference data ────────────────────────────────────────────────────────

  async fn list_data(
    &self,
    reference_id: String,
    filter:       Option<DataFilter>,
  ) -> Result<Vec<ReferenceData>> {
    let mut rows = self
      .run(move |conn| queries::list_data(conn, &reference_id))
      .await?;

    if let Some(f) = &filter {
      rows.retain(|row| f.matches(&row.data));
    }

    Ok(rows)
  }

  async fn create_data(
    &self,
    reference_id: String,
    input:        NewReferenceData,
  ) -> Result<Option<ReferenceData>> {
    let now = Utc::now();

    self
      .run_in_tx(move |tx| {
        if queries::fetch_reference(tx, &reference_id)?.is_none() {
          return Ok(None);
        }
        let row = ReferenceData {
          id: input.id.unwrap_or_else(new_id),
          reference_id,
          parent_id: input.parent_id,
          data: input.data,
          created_at: now,
          updated_at: now,
        };
        queries::insert_data(tx, &row)?;
        Ok(Some(row))
      })
      .await
  }

  async fn update_data(
    &self,
    reference_id: String,
    data_id:      String,
    patch:        ReferenceDataPatch,
  ) -> Result<Option<ReferenceData>> {
    self
      .run_in_tx(move |tx| {
        let Some(mut row) = queries::fetch_data(tx, &reference_id, &data_id)? else {
          return Ok(None);
        };
        patch.apply(&mut row);
        row.updated_at = Utc::now();
        queries::write_data(tx, &row)?;
        Ok(Some(row))
      })
      .await
  }

  async fn delete_data(
    &self,
    reference_id: String,
    data_id:      String,
  ) -> Result<Option<ReferenceData>> {
    self
      .run_in_tx(move |tx| {
        let Some(row) = queries::fetch_data(tx, &reference_id, &data_id)? else {
          return Ok(None);
        };
        queries::delete_data(tx, &row.id)?;
        Ok(Some(row))
      })
      .await
  }

  async fn check_data(&self, reference_id: String) -> Result<Option<Vec<StaleKeys>>> {
    self
      .run(move |conn| {
        if queries::fetch_reference(conn, &reference_id)?.is_none() {
          return Ok(None);
        }
        let fields = queries::list_fields(conn, &reference_id)?;
        let rows = queries::list_data(conn, &reference_id)?;
        Ok(Some(check_rows(&rows, &fields)))
      })
      .await
  }
}
