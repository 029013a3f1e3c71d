//! Handlers for `/exchanges` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/exchanges` | Summaries, newest first |
//! | `POST` | `/exchanges` | Body: [`CreateBody`]; draws assignments, returns 201 + exchange |
//! | `GET`  | `/exchanges/:id` | Snapshot + assignments; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use scramble_core::{
  exchange::{Exchange, ExchangeSummary, NewExchange},
  participant::Participant,
  store::ExchangeStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /exchanges`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ExchangeSummary>>, ApiError>
where
  S: ExchangeStore,
{
  let exchanges = store
    .list_exchanges()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(exchanges))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /exchanges`.
///
/// At most one participant source may be given. With neither, the whole
/// current roster takes part.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:           String,
  pub description:     Option<String>,
  /// Roster members to include, in giver order.
  pub participant_ids: Option<Vec<Uuid>>,
  /// Re-draw among the participant snapshot of an earlier exchange.
  pub from_exchange:   Option<Uuid>,
}

/// `POST /exchanges` — returns 201 + the recorded [`Exchange`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ExchangeStore,
{
  let participants = match (body.participant_ids, body.from_exchange) {
    (Some(_), Some(_)) => {
      return Err(ApiError::BadRequest(
        "participant_ids and from_exchange are mutually exclusive".to_owned(),
      ));
    }
    (Some(ids), None) => selected_participants(store.as_ref(), &ids).await?,
    (None, Some(previous)) => {
      store
        .get_exchange(previous)
        .await
        .map_err(ApiError::from_store)?
        .ok_or_else(|| ApiError::BadRequest(format!("exchange {previous} not found")))?
        .participants
    }
    (None, None) => store
      .list_participants()
      .await
      .map_err(ApiError::from_store)?,
  };

  let draft = NewExchange::draft(&body.title, body.description.as_deref(), participants)?;
  let exchange = store
    .record_exchange(draft)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(
    exchange_id = %exchange.exchange_id,
    participants = exchange.participants.len(),
    "drew exchange"
  );
  Ok((StatusCode::CREATED, Json(exchange)))
}

/// Resolve roster ids, keeping the caller's order. Unknown ids are a client
/// error; repeated ids are left for the generator to reject.
async fn selected_participants<S>(
  store: &S,
  ids: &[Uuid],
) -> Result<Vec<Participant>, ApiError>
where
  S: ExchangeStore,
{
  let mut participants = Vec::with_capacity(ids.len());
  for &id in ids {
    let participant = store
      .get_participant(id)
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(|| ApiError::BadRequest(format!("participant {id} not found")))?;
    participants.push(participant);
  }
  Ok(participants)
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /exchanges/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Exchange>, ApiError>
where
  S: ExchangeStore,
{
  let exchange = store
    .get_exchange(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("exchange {id} not found")))?;
  Ok(Json(exchange))
}
