//! Handler for `GET /health`.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use scramble_core::store::ExchangeStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
  pub status:    String,
  /// `"connected"` or `"unavailable"`.
  pub store:     String,
  pub timestamp: DateTime<Utc>,
}

/// `GET /health` — 200 when the store answers, 503 otherwise.
pub async fn handler<S>(State(store): State<Arc<S>>) -> (StatusCode, Json<HealthReport>)
where
  S: ExchangeStore,
{
  let (code, status, store_state) = match store.ping().await {
    Ok(()) => (StatusCode::OK, "ok", "connected"),
    Err(e) => {
      tracing::warn!("store ping failed: {e}");
      (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    }
  };

  (
    code,
    Json(HealthReport {
      status:    status.to_owned(),
      store:     store_state.to_owned(),
      timestamp: Utc::now(),
    }),
  )
}
