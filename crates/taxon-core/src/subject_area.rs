//! Subject areas: the top-level classification tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tree::{TreeNode, parent_ids};

/// A stored subject area row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectArea {
  pub id:         String,
  pub code:       String,
  pub name:       String,
  /// `None` for roots.
  pub parent_id:  Option<String>,
  pub sort_order: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl TreeNode for SubjectArea {
  fn id(&self) -> &str { &self.id }

  fn parent_id(&self) -> Option<&str> { self.parent_id.as_deref() }
}

/// A subject area together with its leaf status, computed at query time and
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectAreaNode {
  #[serde(flatten)]
  pub area:        SubjectArea,
  /// `true` iff no subject area names this one as its parent.
  pub is_terminal: bool,
}

/// Attach `is_terminal` to every area, judged against the whole snapshot.
pub fn with_terminal_flags(areas: Vec<SubjectArea>) -> Vec<SubjectAreaNode> {
  let parents: std::collections::HashSet<String> =
    parent_ids(&areas).into_iter().map(str::to_owned).collect();

  areas
    .into_iter()
    .map(|area| {
      let is_terminal = !parents.contains(&area.id);
      SubjectAreaNode { area, is_terminal }
    })
    .collect()
}

/// Input to [`crate::store::CatalogStore::create_subject_area`].
/// The id and timestamps are always assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubjectArea {
  pub code:       String,
  pub name:       String,
  #[serde(default)]
  pub parent_id:  Option<String>,
  #[serde(default)]
  pub sort_order: i64,
}

impl NewSubjectArea {
  /// Convenience constructor for a root area with default ordering.
  pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      code:       code.into(),
      name:       name.into(),
      parent_id:  None,
      sort_order: 0,
    }
  }

  pub fn under(mut self, parent_id: impl Into<String>) -> Self {
    self.parent_id = Some(parent_id.into());
    self
  }
}

/// Partial update: every `Some` field overwrites, every `None` is left alone.
///
/// Note that a `null` `parent_id` is indistinguishable from an absent one, so
/// an area cannot be moved back to the root through a patch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectAreaPatch {
  pub code:       Option<String>,
  pub name:       Option<String>,
  pub parent_id:  Option<String>,
  pub sort_order: Option<i64>,
}

impl SubjectAreaPatch {
  /// Apply the patch to a stored row in place.
  pub fn apply(self, area: &mut SubjectArea) {
    if let Some(code) = self.code {
      area.code = code;
    }
    if let Some(name) = self.name {
      area.name = name;
    }
    if let Some(parent_id) = self.parent_id {
      area.parent_id = Some(parent_id);
    }
    if let Some(sort_order) = self.sort_order {
      area.sort_order = sort_order;
    }
  }
}
