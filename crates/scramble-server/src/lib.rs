//! HTTP server assembly for Scramblelist.
//!
//! Wraps the [`scramble_api`] router with optional Basic auth and request
//! tracing, and nests it under `/api`.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use scramble_core::store::ExchangeStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_basic};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SCRAMBLE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  /// SQLite file; `:memory:` keeps everything in process.
  pub store_path:         PathBuf,
  pub auth_username:      Option<String>,
  pub auth_password_hash: Option<String>,
}

impl ServerConfig {
  pub const DEFAULT_HOST: &'static str = "0.0.0.0";
  pub const DEFAULT_PORT: u16 = 5000;
  pub const DEFAULT_STORE_PATH: &'static str = "scramblelist.db";

  /// The configured credentials, if auth is enabled. Setting only one of
  /// the two auth fields is a configuration error.
  pub fn auth(&self) -> Result<Option<AuthConfig>, Error> {
    match (&self.auth_username, &self.auth_password_hash) {
      (Some(username), Some(password_hash)) => Ok(Some(AuthConfig {
        username:      username.clone(),
        password_hash: password_hash.clone(),
      })),
      (None, None) => Ok(None),
      _ => Err(Error::Config(
        "auth_username and auth_password_hash must be set together".to_string(),
      )),
    }
  }

  pub fn uses_memory_store(&self) -> bool { self.store_path.as_os_str() == ":memory:" }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router: the JSON API under `/api`, guarded by
/// Basic auth when `auth` is set.
pub fn router<S>(store: Arc<S>, auth: Option<AuthConfig>) -> Router
where
  S: ExchangeStore + 'static,
{
  let api = scramble_api::api_router(store);
  let api = match auth {
    Some(cfg) => api.layer(middleware::from_fn_with_state(Arc::new(cfg), require_basic)),
    None => api,
  };

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use scramble_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use crate::auth::hash_password;

  fn config(user: Option<&str>, hash: Option<String>) -> ServerConfig {
    ServerConfig {
      host:               ServerConfig::DEFAULT_HOST.to_string(),
      port:               ServerConfig::DEFAULT_PORT,
      store_path:         PathBuf::from(":memory:"),
      auth_username:      user.map(str::to_owned),
      auth_password_hash: hash,
    }
  }

  async fn app(auth: Option<AuthConfig>) -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(Arc::new(store), auth)
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn get(app: &Router, uri: &str, auth: Option<&str>) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = auth {
      builder = builder.header(header::AUTHORIZATION, value);
    }
    app
      .clone()
      .oneshot(builder.body(Body::empty()).unwrap())
      .await
      .unwrap()
  }

  // ── Configuration ───────────────────────────────────────────────────────────

  #[test]
  fn auth_disabled_without_credentials() {
    assert!(config(None, None).auth().unwrap().is_none());
  }

  #[test]
  fn auth_requires_both_fields() {
    let half = config(Some("santa"), None);
    assert!(matches!(half.auth(), Err(Error::Config(_))));
  }

  #[test]
  fn memory_store_detected() {
    assert!(config(None, None).uses_memory_store());
  }

  // ── Routing ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn open_api_without_auth() {
    let app = app(None).await;
    let resp = get(&app, "/api/participants", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn unknown_route_returns_404() {
    let app = app(None).await;
    let resp = get(&app, "/participants", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn unauthenticated_requests_return_401() {
    let cfg = config(Some("santa"), Some(hash_password("secret").unwrap()));
    let app = app(cfg.auth().unwrap()).await;

    let resp = get(&app, "/api/participants", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let wrong = auth_header("santa", "nope");
    let resp = get(&app, "/api/exchanges", Some(&wrong)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn authenticated_requests_pass() {
    let cfg = config(Some("santa"), Some(hash_password("secret").unwrap()));
    let app = app(cfg.auth().unwrap()).await;

    let ok = auth_header("santa", "secret");
    let resp = get(&app, "/api/participants", Some(&ok)).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn health_is_public() {
    let cfg = config(Some("santa"), Some(hash_password("secret").unwrap()));
    let app = app(cfg.auth().unwrap()).await;

    let resp = get(&app, "/api/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn only_the_exact_health_path_is_public() {
    let cfg = config(Some("santa"), Some(hash_password("secret").unwrap()));
    let app = app(cfg.auth().unwrap()).await;

    for uri in ["/api/exchanges/health", "/api/participants/health"] {
      let resp = get(&app, uri, None).await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
  }
}
