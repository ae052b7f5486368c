//! Synchronous SQL helpers run inside `tokio_rusqlite` connection closures.
//!
//! Every function takes a plain [`rusqlite::Connection`]; a
//! [`rusqlite::Transaction`] derefs to one, so multi-statement operations
//! compose these helpers inside a single transaction.

use rusqlite::{Connection, OptionalExtension as _, params};
use taxon_core::{
  concept::DomainConcept,
  reference::{Reference, ReferenceData, ReferenceField},
  subject_area::SubjectArea,
  tree::{CascadeReport, collect_subtree},
};

use crate::{
  Result,
  encode::{
    AREA_COLUMNS, CONCEPT_COLUMNS, DATA_COLUMNS, FIELD_COLUMNS, REFERENCE_COLUMNS,
    RawDomainConcept, RawReference, RawReferenceData, RawReferenceField,
    RawSubjectArea, encode_dt, encode_payload,
  },
};

// ─── Trees ───────────────────────────────────────────────────────────────────

/// The self-referencing tables sharing the parent-pointer algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tree {
  SubjectAreas,
  DomainConcepts,
}

impl Tree {
  fn table(self) -> &'static str {
    match self {
      Self::SubjectAreas => "subject_areas",
      Self::DomainConcepts => "domain_concepts",
    }
  }
}

pub fn exists(conn: &Connection, tree: Tree, id: &str) -> Result<bool> {
  let sql = format!("SELECT 1 FROM {} WHERE id = ?1", tree.table());
  Ok(
    conn
      .query_row(&sql, params![id], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

pub fn child_ids(conn: &Connection, tree: Tree, id: &str) -> Result<Vec<String>> {
  let sql = format!("SELECT id FROM {} WHERE parent_id = ?1", tree.table());
  let mut stmt = conn.prepare_cached(&sql)?;
  let ids = stmt
    .query_map(params![id], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(ids)
}

pub fn has_children(conn: &Connection, tree: Tree, id: &str) -> Result<bool> {
  let sql = format!("SELECT 1 FROM {} WHERE parent_id = ?1 LIMIT 1", tree.table());
  Ok(
    conn
      .query_row(&sql, params![id], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

/// Every transitive descendant of `root`, failing on a parent cycle.
pub fn descendants(conn: &Connection, tree: Tree, root: &str) -> Result<Vec<String>> {
  collect_subtree(root, |id| child_ids(conn, tree, id))
}

fn delete_ids(conn: &Connection, tree: Tree, ids: &[String]) -> Result<()> {
  let sql = format!("DELETE FROM {} WHERE id = ?1", tree.table());
  let mut stmt = conn.prepare_cached(&sql)?;
  for id in ids {
    stmt.execute(params![id])?;
  }
  Ok(())
}

/// Remove a subject area, its descendant areas, and every concept belonging
/// to any of them. Run inside a transaction.
pub fn delete_subject_area_cascade(
  conn: &Connection,
  id: &str,
) -> Result<Option<CascadeReport>> {
  if !exists(conn, Tree::SubjectAreas, id)? {
    return Ok(None);
  }

  let mut areas = vec![id.to_owned()];
  areas.extend(descendants(conn, Tree::SubjectAreas, id)?);

  let mut concepts = Vec::new();
  {
    let mut select = conn
      .prepare_cached("SELECT id FROM domain_concepts WHERE subject_area_id = ?1")?;
    for area_id in &areas {
      let ids = select
        .query_map(params![area_id], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      concepts.extend(ids);
    }
  }

  delete_ids(conn, Tree::DomainConcepts, &concepts)?;
  delete_ids(conn, Tree::SubjectAreas, &areas)?;

  Ok(Some(CascadeReport { subject_areas: areas, domain_concepts: concepts }))
}

/// Remove a domain concept and its concept-tree descendants only.
pub fn delete_domain_concept_cascade(
  conn: &Connection,
  id: &str,
) -> Result<Option<CascadeReport>> {
  if !exists(conn, Tree::DomainConcepts, id)? {
    return Ok(None);
  }

  let mut concepts = vec![id.to_owned()];
  concepts.extend(descendants(conn, Tree::DomainConcepts, id)?);
  delete_ids(conn, Tree::DomainConcepts, &concepts)?;

  Ok(Some(CascadeReport { subject_areas: Vec::new(), domain_concepts: concepts }))
}

// ─── Subject areas ───────────────────────────────────────────────────────────

pub fn list_areas(conn: &Connection) -> Result<Vec<SubjectArea>> {
  let sql = format!("SELECT {AREA_COLUMNS} FROM subject_areas ORDER BY sort_order, rowid");
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map([], RawSubjectArea::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawSubjectArea::into_area).collect()
}

pub fn fetch_area(conn: &Connection, id: &str) -> Result<Option<SubjectArea>> {
  let sql = format!("SELECT {AREA_COLUMNS} FROM subject_areas WHERE id = ?1");
  conn
    .query_row(&sql, params![id], RawSubjectArea::from_row)
    .optional()?
    .map(RawSubjectArea::into_area)
    .transpose()
}

pub fn insert_area(conn: &Connection, area: &SubjectArea) -> Result<()> {
  conn.execute(
    "INSERT INTO subject_areas (
       id, code, name, parent_id, sort_order, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    params![
      area.id,
      area.code,
      area.name,
      area.parent_id,
      area.sort_order,
      encode_dt(area.created_at),
      encode_dt(area.updated_at),
    ],
  )?;
  Ok(())
}

/// Overwrite every mutable column of an existing row.
pub fn write_area(conn: &Connection, area: &SubjectArea) -> Result<()> {
  conn.execute(
    "UPDATE subject_areas
     SET code = ?2, name = ?3, parent_id = ?4, sort_order = ?5, updated_at = ?6
     WHERE id = ?1",
    params![
      area.id,
      area.code,
      area.name,
      area.parent_id,
      area.sort_order,
      encode_dt(area.updated_at),
    ],
  )?;
  Ok(())
}

// ─── Domain concepts ─────────────────────────────────────────────────────────

pub fn list_concepts(
  conn: &Connection,
  subject_area_id: Option<&str>,
) -> Result<Vec<DomainConcept>> {
  let raws = if let Some(area_id) = subject_area_id {
    let sql = format!(
      "SELECT {CONCEPT_COLUMNS} FROM domain_concepts
       WHERE subject_area_id = ?1 ORDER BY sort_order, rowid"
    );
    let mut stmt = conn.prepare(&sql)?;
    stmt
      .query_map(params![area_id], RawDomainConcept::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?
  } else {
    let sql =
      format!("SELECT {CONCEPT_COLUMNS} FROM domain_concepts ORDER BY sort_order, rowid");
    let mut stmt = conn.prepare(&sql)?;
    stmt
      .query_map([], RawDomainConcept::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };
  raws.into_iter().map(RawDomainConcept::into_concept).collect()
}

pub fn fetch_concept(conn: &Connection, id: &str) -> Result<Option<DomainConcept>> {
  let sql = format!("SELECT {CONCEPT_COLUMNS} FROM domain_concepts WHERE id = ?1");
  conn
    .query_row(&sql, params![id], RawDomainConcept::from_row)
    .optional()?
    .map(RawDomainConcept::into_concept)
    .transpose()
}

pub fn insert_concept(conn: &Connection, c: &DomainConcept) -> Result<()> {
  conn.execute(
    "INSERT INTO domain_concepts (
       id, code, name, subject_area_id, parent_id, concept_type,
       sort_order, reference_id, detail_form_code, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    params![
      c.id,
      c.code,
      c.name,
      c.subject_area_id,
      c.parent_id,
      c.concept_type.as_str(),
      c.sort_order,
      c.reference_id,
      c.detail_form_code,
      encode_dt(c.created_at),
      encode_dt(c.updated_at),
    ],
  )?;
  Ok(())
}

/// Overwrite the mutable columns; `subject_area_id` is never rewritten.
pub fn write_concept(conn: &Connection, c: &DomainConcept) -> Result<()> {
  conn.execute(
    "UPDATE domain_concepts
     SET code = ?2, name = ?3, parent_id = ?4, concept_type = ?5,
         sort_order = ?6, reference_id = ?7, detail_form_code = ?8,
         updated_at = ?9
     WHERE id = ?1",
    params![
      c.id,
      c.code,
      c.name,
      c.parent_id,
      c.concept_type.as_str(),
      c.sort_order,
      c.reference_id,
      c.detail_form_code,
      encode_dt(c.updated_at),
    ],
  )?;
  Ok(())
}

// ─── References ──────────────────────────────────────────────────────────────

pub fn list_references(conn: &Connection) -> Result<Vec<Reference>> {
  let sql =
    format!(r#"SELECT {REFERENCE_COLUMNS} FROM "references" ORDER BY sort_order, rowid"#);
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map([], RawReference::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawReference::into_reference).collect()
}

pub fn fetch_reference(conn: &Connection, id: &str) -> Result<Option<Reference>> {
  let sql = format!(r#"SELECT {REFERENCE_COLUMNS} FROM "references" WHERE id = ?1"#);
  conn
    .query_row(&sql, params![id], RawReference::from_row)
    .optional()?
    .map(RawReference::into_reference)
    .transpose()
}

pub fn insert_reference(conn: &Connection, r: &Reference) -> Result<()> {
  conn.execute(
    r#"INSERT INTO "references" (
         id, code, name, parent_id, sort_order, is_hierarchical,
         data_by_script, calculation_code, created_at, updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
    params![
      r.id,
      r.code,
      r.name,
      r.parent_id,
      r.sort_order,
      r.is_hierarchical,
      r.data_by_script,
      r.calculation_code,
      encode_dt(r.created_at),
      encode_dt(r.updated_at),
    ],
  )?;
  Ok(())
}

pub fn write_reference(conn: &Connection, r: &Reference) -> Result<()> {
  conn.execute(
    r#"UPDATE "references"
       SET code = ?2, name = ?3, parent_id = ?4, sort_order = ?5,
           is_hierarchical = ?6, data_by_script = ?7, calculation_code = ?8,
           updated_at = ?9
       WHERE id = ?1"#,
    params![
      r.id,
      r.code,
      r.name,
      r.parent_id,
      r.sort_order,
      r.is_hierarchical,
      r.data_by_script,
      r.calculation_code,
      encode_dt(r.updated_at),
    ],
  )?;
  Ok(())
}

/// Remove a reference and everything it owns. Run inside a transaction.
pub fn delete_reference_cascade(conn: &Connection, id: &str) -> Result<Option<Reference>> {
  let Some(reference) = fetch_reference(conn, id)? else {
    return Ok(None);
  };
  conn.execute("DELETE FROM reference_fields WHERE reference_id = ?1", params![id])?;
  conn.execute("DELETE FROM reference_data WHERE reference_id = ?1", params![id])?;
  conn.execute(r#"DELETE FROM "references" WHERE id = ?1"#, params![id])?;
  Ok(Some(reference))
}

// ─── Reference fields ────────────────────────────────────────────────────────

pub fn list_fields(conn: &Connection, reference_id: &str) -> Result<Vec<ReferenceField>> {
  let sql = format!(
    "SELECT {FIELD_COLUMNS} FROM reference_fields
     WHERE reference_id = ?1 ORDER BY sort_order, rowid"
  );
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params![reference_id], RawReferenceField::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawReferenceField::into_field).collect()
}

pub fn fetch_field(
  conn: &Connection,
  reference_id: &str,
  field_id: &str,
) -> Result<Option<ReferenceField>> {
  let sql = format!(
    "SELECT {FIELD_COLUMNS} FROM reference_fields WHERE id = ?1 AND reference_id = ?2"
  );
  conn
    .query_row(&sql, params![field_id, reference_id], RawReferenceField::from_row)
    .optional()?
    .map(RawReferenceField::into_field)
    .transpose()
}

pub fn insert_field(conn: &Connection, f: &ReferenceField) -> Result<()> {
  conn.execute(
    "INSERT INTO reference_fields (
       id, reference_id, code, name, ref_reference_id, sort_order,
       created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    params![
      f.id,
      f.reference_id,
      f.code,
      f.name,
      f.ref_reference_id,
      f.sort_order,
      encode_dt(f.created_at),
      encode_dt(f.updated_at),
    ],
  )?;
  Ok(())
}

pub fn write_field(conn: &Connection, f: &ReferenceField) -> Result<()> {
  conn.execute(
    "UPDATE reference_fields
     SET code = ?2, name = ?3, ref_reference_id = ?4, sort_order = ?5,
         updated_at = ?6
     WHERE id = ?1",
    params![
      f.id,
      f.code,
      f.name,
      f.ref_reference_id,
      f.sort_order,
      encode_dt(f.updated_at),
    ],
  )?;
  Ok(())
}

pub fn delete_field(conn: &Connection, field_id: &str) -> Result<()> {
  conn.execute("DELETE FROM reference_fields WHERE id = ?1", params![field_id])?;
  Ok(())
}

// ─── Reference data ──────────────────────────────────────────────────────────

pub fn list_data(conn: &Connection, reference_id: &str) -> Result<Vec<ReferenceData>> {
  let sql = format!(
    "SELECT {DATA_COLUMNS} FROM reference_data WHERE reference_id = ?1 ORDER BY rowid"
  );
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params![reference_id], RawReferenceData::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawReferenceData::into_data).collect()
}

pub fn fetch_data(
  conn: &Connection,
  reference_id: &str,
  data_id: &str,
) -> Result<Option<ReferenceData>> {
  let sql = format!(
    "SELECT {DATA_COLUMNS} FROM reference_data WHERE id = ?1 AND reference_id = ?2"
  );
  conn
    .query_row(&sql, params![data_id, reference_id], RawReferenceData::from_row)
    .optional()?
    .map(RawReferenceData::into_data)
    .transpose()
}

pub fn insert_data(conn: &Connection, d: &ReferenceData) -> Result<()> {
  conn.execute(
    "INSERT INTO reference_data (
       id, reference_id, parent_id, data_json, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      d.id,
      d.reference_id,
      d.parent_id,
      encode_payload(&d.data)?,
      encode_dt(d.created_at),
      encode_dt(d.updated_at),
    ],
  )?;
  Ok(())
}

pub fn write_data(conn: &Connection, d: &ReferenceData) -> Result<()> {
  conn.execute(
    "UPDATE reference_data
     SET parent_id = ?2, data_json = ?3, updated_at = ?4
     WHERE id = ?1",
    params![d.id, d.parent_id, encode_payload(&d.data)?, encode_dt(d.updated_at)],
  )?;
  Ok(())
}

pub fn delete_data(conn: &Connection, data_id: &str) -> Result<()> {
  conn.execute("DELETE FROM reference_data WHERE id = ?1", params![data_id])?;
  Ok(())
}
