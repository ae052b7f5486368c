//! Reference dictionaries: user-defined lookup tables with a dynamic field
//! schema and free-form data rows.
//!
//! A [`Reference`] owns its [`ReferenceField`]s and [`ReferenceData`] rows.
//! A data row's [`Payload`] maps field ids to values but is *not* checked
//! against the declared fields on write; stale or unknown keys are kept as-is.
//! [`stale_keys`] is the opt-in checker for callers who care.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The data of one reference row: field id → value.
pub type Payload = BTreeMap<String, serde_json::Value>;

// ─── Reference ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
  pub id:               String,
  pub code:             String,
  pub name:             String,
  /// Grouping parent; another reference.
  pub parent_id:        Option<String>,
  pub sort_order:       i64,
  /// Whether data rows form a tree through their own `parent_id`.
  pub is_hierarchical:  bool,
  /// Whether the rows are computed rather than stored.
  pub data_by_script:   bool,
  pub calculation_code: Option<String>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

/// Input to [`crate::store::CatalogStore::create_reference`]. When `id` is
/// absent the store generates one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReference {
  #[serde(default)]
  pub id:               Option<String>,
  pub code:             String,
  pub name:             String,
  #[serde(default)]
  pub parent_id:        Option<String>,
  #[serde(default)]
  pub sort_order:       i64,
  #[serde(default)]
  pub is_hierarchical:  bool,
  #[serde(default)]
  pub data_by_script:   bool,
  #[serde(default)]
  pub calculation_code: Option<String>,
}

impl NewReference {
  pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
    Self { code: code.into(), name: name.into(), ..Default::default() }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferencePatch {
  pub code:             Option<String>,
  pub name:             Option<String>,
  pub parent_id:        Option<String>,
  pub sort_order:       Option<i64>,
  pub is_hierarchical:  Option<bool>,
  pub data_by_script:   Option<bool>,
  pub calculation_code: Option<String>,
}

impl ReferencePatch {
  pub fn apply(self, reference: &mut Reference) {
    if let Some(code) = self.code {
      reference.code = code;
    }
    if let Some(name) = self.name {
      reference.name = name;
    }
    if let Some(parent_id) = self.parent_id {
      reference.parent_id = Some(parent_id);
    }
    if let Some(sort_order) = self.sort_order {
      reference.sort_order = sort_order;
    }
    if let Some(flag) = self.is_hierarchical {
      reference.is_hierarchical = flag;
    }
    if let Some(flag) = self.data_by_script {
      reference.data_by_script = flag;
    }
    if let Some(code) = self.calculation_code {
      reference.calculation_code = Some(code);
    }
  }
}

// ─── Fields ──────────────────────────────────────────────────────────────────

/// One column of a reference's dynamic schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceField {
  pub id:               String,
  pub reference_id:     String,
  pub code:             String,
  pub name:             String,
  /// When set, values of this field are ids of rows in another reference.
  pub ref_reference_id: Option<String>,
  pub sort_order:       i64,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

/// Input to [`crate::store::CatalogStore::create_field`]. The owning
/// reference comes from the request path, not the body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReferenceField {
  #[serde(default)]
  pub id:               Option<String>,
  pub code:             String,
  pub name:             String,
  #[serde(default)]
  pub ref_reference_id: Option<String>,
  #[serde(default)]
  pub sort_order:       i64,
}

impl NewReferenceField {
  pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
    Self { code: code.into(), name: name.into(), ..Default::default() }
  }

  pub fn with_id(mut self, id: impl Into<String>) -> Self {
    self.id = Some(id.into());
    self
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceFieldPatch {
  pub code:             Option<String>,
  pub name:             Option<String>,
  pub ref_reference_id: Option<String>,
  pub sort_order:       Option<i64>,
}

impl ReferenceFieldPatch {
  pub fn apply(self, field: &mut ReferenceField) {
    if let Some(code) = self.code {
      field.code = code;
    }
    if let Some(name) = self.name {
      field.name = name;
    }
    if let Some(target) = self.ref_reference_id {
      field.ref_reference_id = Some(target);
    }
    if let Some(sort_order) = self.sort_order {
      field.sort_order = sort_order;
    }
  }
}

// ─── Data rows ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
  pub id:           String,
  pub reference_id: String,
  /// Parent row within the same reference; only meaningful for
  /// hierarchical references.
  pub parent_id:    Option<String>,
  pub data:         Payload,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReferenceData {
  #[serde(default)]
  pub id:        Option<String>,
  #[serde(default)]
  pub parent_id: Option<String>,
  #[serde(default)]
  pub data:      Payload,
}

impl NewReferenceData {
  pub fn new(data: Payload) -> Self { Self { data, ..Default::default() } }
}

/// Partial update of a data row. A supplied `data` replaces the whole
/// payload; keys are not merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceDataPatch {
  pub parent_id: Option<String>,
  pub data:      Option<Payload>,
}

impl ReferenceDataPatch {
  pub fn apply(self, row: &mut ReferenceData) {
    if let Some(parent_id) = self.parent_id {
      row.parent_id = Some(parent_id);
    }
    if let Some(data) = self.data {
      row.data = data;
    }
  }
}

/// Decode a stored payload. Anything that is not a JSON object decodes to an
/// empty payload rather than failing the whole listing.
pub fn decode_payload_lossy(text: &str) -> Payload {
  serde_json::from_str(text).unwrap_or_default()
}

// ─── Filtering ───────────────────────────────────────────────────────────────

/// Keep only rows whose value under `field` equals `value` as a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFilter {
  pub field: String,
  pub value: String,
}

impl DataFilter {
  /// Build a filter from optional query parameters. The filter is only
  /// active when both parts are present and non-empty.
  pub fn from_params(
    field: Option<String>,
    value: Option<String>,
  ) -> Option<Self> {
    match (field, value) {
      (Some(field), Some(value)) if !field.is_empty() && !value.is_empty() => {
        Some(Self { field, value })
      }
      _ => None,
    }
  }

  /// Exact string match; a missing key or a `null` never matches.
  pub fn matches(&self, payload: &Payload) -> bool {
    payload
      .get(&self.field)
      .and_then(coerce_to_string)
      .is_some_and(|v| v == self.value)
  }
}

/// The string form of a payload value used for filtering.
///
/// Strings are taken verbatim, scalars use their JSON text, and arrays or
/// objects use compact JSON. `null` has no string form.
///
/// Booleans are `true`/`false` in lowercase, so `filter_value=True` never matches.
pub fn coerce_to_string(value: &serde_json::Value) -> Option<String> {
  match value {
    serde_json::Value::Null => None,
    serde_json::Value::String(s) => Some(s.clone()),
    other => Some(other.to_string()),
  }
}

// ─── Schema check ────────────────────────────────────────────────────────────

/// A data row carrying keys that match no declared field of its reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleKeys {
  pub data_id: String,
  pub keys:    Vec<String>,
}

/// Payload keys that are not the id of any field in `fields`, in key order.
pub fn stale_keys(payload: &Payload, fields: &[ReferenceField]) -> Vec<String> {
  let declared: HashSet<&str> = fields.iter().map(|f| f.id.as_str()).collect();
  payload
    .keys()
    .filter(|k| !declared.contains(k.as_str()))
    .cloned()
    .collect()
}

/// Run [`stale_keys`] over every row, reporting only rows with findings.
pub fn check_rows(rows: &[ReferenceData], fields: &[ReferenceField]) -> Vec<StaleKeys> {
  rows
    .iter()
    .filter_map(|row| {
      let keys = stale_keys(&row.data, fields);
      (!keys.is_empty()).then(|| StaleKeys { data_id: row.id.clone(), keys })
    })
    .collect()
}
