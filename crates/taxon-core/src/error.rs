//! Error types for `taxon-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A `parent_id` chain loops back on itself; the tree is corrupt.
  #[error("cycle detected in tree at node {0}")]
  CycleDetected(String),

  #[error("unknown concept type: {0:?}")]
  UnknownConceptType(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
