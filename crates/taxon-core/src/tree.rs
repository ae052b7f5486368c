//! Algorithms shared by every self-referencing entity kind.
//!
//! Subject areas and domain concepts both form forests through a nullable
//! `parent_id` column. The functions here work on ids only and never touch
//! storage directly: backends hand in a child-lookup closure, which keeps the
//! walk identical for SQLite, tests, or anything else.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::Error;

// ─── TreeNode ────────────────────────────────────────────────────────────────

/// A row that points at its parent (of the same kind) by id.
pub trait TreeNode {
  fn id(&self) -> &str;
  fn parent_id(&self) -> Option<&str>;
}

/// Every id that some node in `nodes` names as its parent.
pub fn parent_ids<N: TreeNode>(nodes: &[N]) -> HashSet<&str> {
  nodes.iter().filter_map(TreeNode::parent_id).collect()
}

// ─── Subtree walk ────────────────────────────────────────────────────────────

/// Collect the ids of every transitive descendant of `root` (root excluded).
///
/// `children_of` returns the direct children of one node. The walk uses an
/// explicit stack, so depth is bounded only by memory. Reaching any node a
/// second time (including `root` itself) means the parent chain loops; the
/// walk stops with [`Error::CycleDetected`] instead of spinning forever.
///
/// Order of the returned ids is unspecified.
pub fn collect_subtree<F, E>(root: &str, mut children_of: F) -> Result<Vec<String>, E>
where
  F: FnMut(&str) -> Result<Vec<String>, E>,
  E: From<Error>,
{
  let mut visited = HashSet::from([root.to_owned()]);
  let mut pending = vec![root.to_owned()];
  let mut found = Vec::new();

  while let Some(id) = pending.pop() {
    for child in children_of(&id)? {
      if !visited.insert(child.clone()) {
        return Err(Error::CycleDetected(child).into());
      }
      found.push(child.clone());
      pending.push(child);
    }
  }

  Ok(found)
}

// ─── Cascade report ──────────────────────────────────────────────────────────

/// Everything removed by a cascading delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
  /// Subject areas removed: the target (first) followed by its descendants.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub subject_areas:   Vec<String>,
  /// Domain concepts removed, in no particular order.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub domain_concepts: Vec<String>,
}
