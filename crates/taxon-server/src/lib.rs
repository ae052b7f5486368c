//! HTTP host for the Taxon catalog.
//!
//! Wraps [`taxon_api::api_router`] under `/api`, adds the liveness routes,
//! and applies the CORS and tracing layers.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Json, Router,
  http::{HeaderValue, Method, header},
  routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use taxon_core::store::CatalogStore;
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173,\
                                    http://localhost:5174,http://localhost:5175";

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment. Every key is optional.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,
  /// Comma-separated list of allowed browser origins.
  pub cors_origins:  String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "0.0.0.0".to_string(),
      port:          8001,
      database_path: PathBuf::from("./subject_areas.db"),
      cors_origins:  DEFAULT_CORS_ORIGINS.to_string(),
    }
  }
}

/// Environment variables that may override the config file. Anything else in
/// the process environment is ignored.
pub const ENV_KEYS: [&str; 4] = ["HOST", "PORT", "DATABASE_PATH", "CORS_ORIGINS"];

/// An environment source restricted to [`ENV_KEYS`].
pub fn env_source<I>(vars: I) -> config::Environment
where
  I: IntoIterator<Item = (String, String)>,
{
  let allowed: config::Map<String, String> = vars
    .into_iter()
    .filter(|(key, _)| ENV_KEYS.contains(&key.as_str()))
    .collect();
  config::Environment::default().source(Some(allowed)).try_parsing(true)
}

/// Layer `env` over the optional TOML file at `path`.
pub fn load_config(
  path: &Path,
  env: config::Environment,
) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(env)
    .build()?
    .try_deserialize()
}

/// Split a comma-separated origin list, skipping blanks and anything that is
/// not a valid header value.
pub fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
  origins
    .split(',')
    .filter_map(|s| {
      let trimmed = s.trim();
      if trimmed.is_empty() {
        return None;
      }
      match trimmed.parse::<HeaderValue>() {
        Ok(v) => Some(v),
        Err(e) => {
          tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
          None
        }
      }
    })
    .collect()
}

fn cors_layer(origins: &str) -> CorsLayer {
  CorsLayer::new()
    .allow_origin(AllowOrigin::list(parse_allowed_origins(origins)))
    .allow_methods([
      Method::GET,
      Method::POST,
      Method::PUT,
      Method::DELETE,
      Method::OPTIONS,
    ])
    .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
    .allow_credentials(true)
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: CatalogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(root))
    .route("/health", get(health))
    .nest("/api", taxon_api::api_router(store))
    .layer(cors_layer(&config.cors_origins))
    .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> {
  Json(json!({
    "message": "Subject Area Editor API",
    "version": env!("CARGO_PKG_VERSION"),
  }))
}

async fn health() -> Json<Value> { Json(json!({ "status": "healthy" })) }

// ─── Integration tests ────────────────────────────────────────────────────────
