//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Reference data payloads are
//! stored as compact JSON objects. Booleans go through rusqlite's native
//! 0/1 integer mapping.

use chrono::{DateTime, Utc};
use taxon_core::{
  concept::{ConceptType, DomainConcept},
  reference::{Payload, Reference, ReferenceData, ReferenceField, decode_payload_lossy},
  subject_area::SubjectArea,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Payload ─────────────────────────────────────────────────────────────────

pub fn encode_payload(p: &Payload) -> Result<String> {
  Ok(serde_json::to_string(p)?)
}

// ─── Column lists ────────────────────────────────────────────────────────────
//
// Each list matches the field order of the `from_row` constructor below.

pub const AREA_COLUMNS: &str =
  "id, code, name, parent_id, sort_order, created_at, updated_at";

pub const CONCEPT_COLUMNS: &str = "id, code, name, subject_area_id, parent_id, \
                                   concept_type, sort_order, reference_id, \
                                   detail_form_code, created_at, updated_at";

pub const REFERENCE_COLUMNS: &str = "id, code, name, parent_id, sort_order, \
                                     is_hierarchical, data_by_script, \
                                     calculation_code, created_at, updated_at";

pub const FIELD_COLUMNS: &str = "id, reference_id, code, name, ref_reference_id, \
                                 sort_order, created_at, updated_at";

pub const DATA_COLUMNS: &str =
  "id, reference_id, parent_id, data_json, created_at, updated_at";

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `subject_areas` row.
pub struct RawSubjectArea {
  pub id:         String,
  pub code:       String,
  pub name:       String,
  pub parent_id:  Option<String>,
  pub sort_order: i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawSubjectArea {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      code:       row.get(1)?,
      name:       row.get(2)?,
      parent_id:  row.get(3)?,
      sort_order: row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_area(self) -> Result<SubjectArea> {
    Ok(SubjectArea {
      id:         self.id,
      code:       self.code,
      name:       self.name,
      parent_id:  self.parent_id,
      sort_order: self.sort_order,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `domain_concepts` row.
pub struct RawDomainConcept {
  pub id:               String,
  pub code:             String,
  pub name:             String,
  pub subject_area_id:  String,
  pub parent_id:        Option<String>,
  pub concept_type:     String,
  pub sort_order:       i64,
  pub reference_id:     Option<String>,
  pub detail_form_code: Option<String>,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawDomainConcept {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      code:             row.get(1)?,
      name:             row.get(2)?,
      subject_area_id:  row.get(3)?,
      parent_id:        row.get(4)?,
      concept_type:     row.get(5)?,
      sort_order:       row.get(6)?,
      reference_id:     row.get(7)?,
      detail_form_code: row.get(8)?,
      created_at:       row.get(9)?,
      updated_at:       row.get(10)?,
    })
  }

  pub fn into_concept(self) -> Result<DomainConcept> {
    Ok(DomainConcept {
      id:               self.id,
      code:             self.code,
      name:             self.name,
      subject_area_id:  self.subject_area_id,
      parent_id:        self.parent_id,
      concept_type:     self.concept_type.parse::<ConceptType>()?,
      sort_order:       self.sort_order,
      reference_id:     self.reference_id,
      detail_form_code: self.detail_form_code,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `references` row.
pub struct RawReference {
  pub id:               String,
  pub code:             String,
  pub name:             String,
  pub parent_id:        Option<String>,
  pub sort_order:       i64,
  pub is_hierarchical:  bool,
  pub data_by_script:   bool,
  pub calculation_code: Option<String>,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawReference {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      code:             row.get(1)?,
      name:             row.get(2)?,
      parent_id:        row.get(3)?,
      sort_order:       row.get(4)?,
      is_hierarchical:  row.get(5)?,
      data_by_script:   row.get(6)?,
      calculation_code: row.get(7)?,
      created_at:       row.get(8)?,
      updated_at:       row.get(9)?,
    })
  }

  pub fn into_reference(self) -> Result<Reference> {
    Ok(Reference {
      id:               self.id,
      code:             self.code,
      name:             self.name,
      parent_id:        self.parent_id,
      sort_order:       self.sort_order,
      is_hierarchical:  self.is_hierarchical,
      data_by_script:   self.data_by_script,
      calculation_code: self.calculation_code,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `reference_fields` row.
pub struct RawReferenceField {
  pub id:               String,
  pub reference_id:     String,
  pub code:             String,
  pub name:             String,
  pub ref_reference_id: Option<String>,
  pub sort_order:       i64,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawReferenceField {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      reference_id:     row.get(1)?,
      code:             row.get(2)?,
      name:             row.get(3)?,
      ref_reference_id: row.get(4)?,
      sort_order:       row.get(5)?,
      created_at:       row.get(6)?,
      updated_at:       row.get(7)?,
    })
  }

  pub fn into_field(self) -> Result<ReferenceField> {
    Ok(ReferenceField {
      id:               self.id,
      reference_id:     self.reference_id,
      code:             self.code,
      name:             self.name,
      ref_reference_id: self.ref_reference_id,
      sort_order:       self.sort_order,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `reference_data` row.
pub struct RawReferenceData {
  pub id:           String,
  pub reference_id: String,
  pub parent_id:    Option<String>,
  pub data_json:    Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawReferenceData {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      reference_id: row.get(1)?,
      parent_id:    row.get(2)?,
      data_json:    row.get(3)?,
      created_at:   row.get(4)?,
      updated_at:   row.get(5)?,
    })
  }

  /// A payload that fails to parse decodes as empty; the row is still
  /// returned.
  pub fn into_data(self) -> Result<ReferenceData> {
    Ok(ReferenceData {
      id:           self.id,
      reference_id: self.reference_id,
      parent_id:    self.parent_id,
      data:         self.data_json.as_deref().map(decode_payload_lossy).unwrap_or_default(),
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}
