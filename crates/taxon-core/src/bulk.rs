//! Bulk upsert of subject areas and domain concepts.
//!
//! Records are partial: a key that is absent from the JSON keeps the stored
//! value when the row already exists and falls back to a default when it does
//! not. Bulk save never deletes anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
  concept::{ConceptType, DomainConcept},
  new_id,
  subject_area::SubjectArea,
};

/// Deserialize a field so that an absent key stays `None` while an explicit
/// `null` becomes `Some(None)`. Pair with `#[serde(default)]`.
fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// Body of `POST /api/bulk-save`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkSave {
  #[serde(default)]
  pub subject_areas:   Vec<BulkSubjectArea>,
  #[serde(default)]
  pub domain_concepts: Vec<BulkDomainConcept>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkSubjectArea {
  #[serde(default)]
  pub id:         Option<String>,
  #[serde(default)]
  pub code:       Option<String>,
  #[serde(default)]
  pub name:       Option<String>,
  /// `None`: key absent. `Some(None)`: explicitly cleared.
  #[serde(default, deserialize_with = "double_option")]
  pub parent_id:  Option<Option<String>>,
  #[serde(default)]
  pub sort_order: Option<i64>,
}

impl BulkSubjectArea {
  /// Overwrite the fields present in this record.
  pub fn overwrite(self, area: &mut SubjectArea, now: DateTime<Utc>) {
    if let Some(code) = self.code {
      area.code = code;
    }
    if let Some(name) = self.name {
      area.name = name;
    }
    if let Some(parent_id) = self.parent_id {
      area.parent_id = parent_id;
    }
    if let Some(sort_order) = self.sort_order {
      area.sort_order = sort_order;
    }
    area.updated_at = now;
  }

  /// Build a brand-new row, keeping the supplied id when there is one.
  pub fn into_area(self, now: DateTime<Utc>) -> SubjectArea {
    SubjectArea {
      id:         self.id.unwrap_or_else(new_id),
      code:       self.code.unwrap_or_default(),
      name:       self.name.unwrap_or_default(),
      parent_id:  self.parent_id.flatten(),
      sort_order: self.sort_order.unwrap_or(0),
      created_at: now,
      updated_at: now,
    }
  }
}

/// A partial domain concept. `subject_area_id` is only read when the concept
/// is new; existing concepts never change subject area.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkDomainConcept {
  #[serde(default)]
  pub id:               Option<String>,
  #[serde(default)]
  pub code:             Option<String>,
  #[serde(default)]
  pub name:             Option<String>,
  #[serde(default)]
  pub subject_area_id:  Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub parent_id:        Option<Option<String>>,
  #[serde(default)]
  pub concept_type:     Option<ConceptType>,
  #[serde(default)]
  pub sort_order:       Option<i64>,
  #[serde(default, deserialize_with = "double_option")]
  pub reference_id:     Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub detail_form_code: Option<Option<String>>,
}

impl BulkDomainConcept {
  pub fn overwrite(self, concept: &mut DomainConcept, now: DateTime<Utc>) {
    if let Some(code) = self.code {
      concept.code = code;
    }
    if let Some(name) = self.name {
      concept.name = name;
    }
    if let Some(parent_id) = self.parent_id {
      concept.parent_id = parent_id;
    }
    if let Some(concept_type) = self.concept_type {
      concept.concept_type = concept_type;
    }
    if let Some(sort_order) = self.sort_order {
      concept.sort_order = sort_order;
    }
    if let Some(reference_id) = self.reference_id {
      concept.reference_id = reference_id;
    }
    if let Some(detail_form_code) = self.detail_form_code {
      concept.detail_form_code = detail_form_code;
    }
    concept.updated_at = now;
  }

  pub fn into_concept(self, now: DateTime<Utc>) -> DomainConcept {
    DomainConcept {
      id:               self.id.unwrap_or_else(new_id),
      code:             self.code.unwrap_or_default(),
      name:             self.name.unwrap_or_default(),
      subject_area_id:  self.subject_area_id.unwrap_or_default(),
      parent_id:        self.parent_id.flatten(),
      concept_type:     self.concept_type.unwrap_or_default(),
      sort_order:       self.sort_order.unwrap_or(0),
      reference_id:     self.reference_id.flatten(),
      detail_form_code: self.detail_form_code.flatten(),
      created_at:       now,
      updated_at:       now,
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertCounts {
  pub inserted: usize,
  pub updated:  usize,
}

/// What a bulk save did, per entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSaveReport {
  pub subject_areas:   UpsertCounts,
  pub domain_concepts: UpsertCounts,
}
