//! Core types and trait definitions for the Taxon subject-area catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod bulk;
pub mod concept;
pub mod error;
pub mod reference;
pub mod store;
pub mod subject_area;
pub mod tree;

pub use error::{Error, Result};

/// Generate a fresh opaque identifier for a newly created row.
pub fn new_id() -> String { uuid::Uuid::new_v4().to_string() }
