//! SQL schema for the Taxon SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// No foreign keys: ids are opaque and dangling `parent_id` /
/// `ref_reference_id` values are tolerated.
pub const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS subject_areas (
    id          TEXT PRIMARY KEY,
    code        TEXT NOT NULL,
    name        TEXT NOT NULL,
    parent_id   TEXT,                        -- NULL for roots
    sort_order  INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,               -- RFC 3339 UTC
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS domain_concepts (
    id               TEXT PRIMARY KEY,
    code             TEXT NOT NULL,
    name             TEXT NOT NULL,
    subject_area_id  TEXT NOT NULL,
    parent_id        TEXT,
    concept_type     TEXT NOT NULL DEFAULT 'attribute',  -- 'attribute' | 'list'
    sort_order       INTEGER NOT NULL DEFAULT 0,
    reference_id     TEXT,
    detail_form_code TEXT,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS "references" (
    id               TEXT PRIMARY KEY,
    code             TEXT NOT NULL,
    name             TEXT NOT NULL,
    parent_id        TEXT,
    sort_order       INTEGER NOT NULL DEFAULT 0,
    is_hierarchical  INTEGER NOT NULL DEFAULT 0,
    data_by_script   INTEGER NOT NULL DEFAULT 0,
    calculation_code TEXT,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reference_fields (
    id               TEXT PRIMARY KEY,
    reference_id     TEXT NOT NULL,
    code             TEXT NOT NULL,
    name             TEXT NOT NULL,
    ref_reference_id TEXT,
    sort_order       INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

-- data_json is an open field-id -> value object; never validated here.
CREATE TABLE IF NOT EXISTS reference_data (
    id            TEXT PRIMARY KEY,
    reference_id  TEXT NOT NULL,
    parent_id     TEXT,
    data_json     TEXT NOT NULL DEFAULT '{}',
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS subject_areas_parent_idx    ON subject_areas(parent_id);
CREATE INDEX IF NOT EXISTS domain_concepts_parent_idx  ON domain_concepts(parent_id);
CREATE INDEX IF NOT EXISTS domain_concepts_area_idx    ON domain_concepts(subject_area_id);
CREATE INDEX IF NOT EXISTS reference_fields_ref_idx    ON reference_fields(reference_id);
CREATE INDEX IF NOT EXISTS reference_data_ref_idx      ON reference_data(reference_id);

PRAGMA user_version = 1;
"#;
