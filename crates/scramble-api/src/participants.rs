//! Handlers for `/participants` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/participants` | Roster in creation order |
//! | `POST`   | `/participants` | Body: `{"name":"...","email":"..."}`; returns 201 |
//! | `DELETE` | `/participants` | Clears the roster; returns `{"removed":n}` |
//! | `GET`    | `/participants/:id` | 404 if not found |
//! | `DELETE` | `/participants/:id` | 204; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use scramble_core::{
  participant::{NewParticipant, Participant},
  store::ExchangeStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /participants`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Participant>>, ApiError>
where
  S: ExchangeStore,
{
  let participants = store
    .list_participants()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(participants))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:  String,
  /// Blank strings are treated as absent.
  pub email: Option<String>,
}

/// `POST /participants` — returns 201 + the stored [`Participant`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ExchangeStore,
{
  let input = NewParticipant::new(&body.name, body.email.as_deref())?;
  let participant = store
    .add_participant(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(participant)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /participants/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Participant>, ApiError>
where
  S: ExchangeStore,
{
  let participant = store
    .get_participant(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("participant {id} not found")))?;
  Ok(Json(participant))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /participants/:id`
pub async fn remove_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ExchangeStore,
{
  store
    .remove_participant(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Clear ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Cleared {
  pub removed: usize,
}

/// `DELETE /participants`
pub async fn clear<S>(State(store): State<Arc<S>>) -> Result<Json<Cleared>, ApiError>
where
  S: ExchangeStore,
{
  let removed = store
    .clear_participants()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(Cleared { removed }))
}
