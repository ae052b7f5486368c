//! Domain concepts: attributes and lists nested under a subject area.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, tree::TreeNode};

/// What a domain concept describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptType {
  /// A single data attribute.
  #[default]
  Attribute,
  /// A repeating list, optionally backed by a reference dictionary or a
  /// nested detail form.
  List,
}

impl ConceptType {
  /// The string stored in the `concept_type` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Attribute => "attribute",
      Self::List => "list",
    }
  }
}

impl fmt::Display for ConceptType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ConceptType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "attribute" => Ok(Self::Attribute),
      "list" => Ok(Self::List),
      other => Err(Error::UnknownConceptType(other.to_owned())),
    }
  }
}

/// A stored domain concept row.
///
/// `subject_area_id` is fixed at creation; concepts never move between
/// subject areas. `parent_id` points at another concept of the same area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConcept {
  pub id:               String,
  pub code:             String,
  pub name:             String,
  pub subject_area_id:  String,
  pub parent_id:        Option<String>,
  pub concept_type:     ConceptType,
  pub sort_order:       i64,
  /// Reference dictionary backing a list-typed concept.
  pub reference_id:     Option<String>,
  /// Nested form describing the rows of a list-typed concept.
  pub detail_form_code: Option<String>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

impl TreeNode for DomainConcept {
  fn id(&self) -> &str { &self.id }

  fn parent_id(&self) -> Option<&str> { self.parent_id.as_deref() }
}

/// Input to [`crate::store::CatalogStore::create_domain_concept`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewDomainConcept {
  pub code:             String,
  pub name:             String,
  pub subject_area_id:  String,
  #[serde(default)]
  pub parent_id:        Option<String>,
  #[serde(default)]
  pub concept_type:     ConceptType,
  #[serde(default)]
  pub sort_order:       i64,
  #[serde(default)]
  pub reference_id:     Option<String>,
  #[serde(default)]
  pub detail_form_code: Option<String>,
}

impl NewDomainConcept {
  /// Convenience constructor for a root attribute of `subject_area_id`.
  pub fn new(
    subject_area_id: impl Into<String>,
    code: impl Into<String>,
    name: impl Into<String>,
  ) -> Self {
    Self {
      code:             code.into(),
      name:             name.into(),
      subject_area_id:  subject_area_id.into(),
      parent_id:        None,
      concept_type:     ConceptType::default(),
      sort_order:       0,
      reference_id:     None,
      detail_form_code: None,
    }
  }

  pub fn under(mut self, parent_id: impl Into<String>) -> Self {
    self.parent_id = Some(parent_id.into());
    self
  }
}

/// Partial update for a domain concept. `subject_area_id` is deliberately
/// absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainConceptPatch {
  pub code:             Option<String>,
  pub name:             Option<String>,
  pub parent_id:        Option<String>,
  pub concept_type:     Option<ConceptType>,
  pub sort_order:       Option<i64>,
  pub reference_id:     Option<String>,
  pub detail_form_code: Option<String>,
}

impl DomainConceptPatch {
  pub fn apply(self, concept: &mut DomainConcept) {
    if let Some(code) = self.code {
      concept.code = code;
    }
    if let Some(name) = self.name {
      concept.name = name;
    }
    if let Some(parent_id) = self.parent_id {
      concept.parent_id = Some(parent_id);
    }
    if let Some(concept_type) = self.concept_type {
      concept.concept_type = concept_type;
    }
    if let Some(sort_order) = self.sort_order {
      concept.sort_order = sort_order;
    }
    if let Some(reference_id) = self.reference_id {
      concept.reference_id = Some(reference_id);
    }
    if let Some(detail_form_code) = self.detail_form_code {
      concept.detail_form_code = Some(detail_form_code);
    }
  }
}
