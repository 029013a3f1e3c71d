//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use scramble_core::{
  exchange::{Assignment, Exchange, ExchangeSummary},
  participant::Participant,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read from a `participants` or `exchange_participants` row.
pub struct RawParticipant {
  pub participant_id: String,
  pub name:           String,
  pub email:          Option<String>,
  pub created_at:     String,
}

impl RawParticipant {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      participant_id: row.get(0)?,
      name:           row.get(1)?,
      email:          row.get(2)?,
      created_at:     row.get(3)?,
    })
  }

  pub fn into_participant(self) -> Result<Participant> {
    Ok(Participant {
      participant_id: decode_uuid(&self.participant_id)?,
      name:           self.name,
      email:          self.email,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from an `exchanges` row.
pub struct RawExchange {
  pub exchange_id: String,
  pub title:       String,
  pub description: Option<String>,
  pub created_at:  String,
}

/// Raw strings read from an `assignments` row.
pub struct RawAssignment {
  pub giver_id:    String,
  pub receiver_id: String,
}

/// Everything stored for one exchange, still in column form.
pub struct RawExchangeRecord {
  pub exchange:     RawExchange,
  pub participants: Vec<RawParticipant>,
  pub assignments:  Vec<RawAssignment>,
}

impl RawExchangeRecord {
  /// Rebuild the [`Exchange`], resolving assignment ids against the stored
  /// participant snapshot.
  pub fn into_exchange(self) -> Result<Exchange> {
    let exchange_id = decode_uuid(&self.exchange.exchange_id)?;

    let participants: Vec<Participant> = self
      .participants
      .into_iter()
      .map(RawParticipant::into_participant)
      .collect::<Result<_>>()?;

    let by_id: HashMap<Uuid, &Participant> =
      participants.iter().map(|p| (p.participant_id, p)).collect();
    let lookup = |raw: &str| -> Result<Participant> {
      let id = decode_uuid(raw)?;
      by_id.get(&id).map(|p| (*p).clone()).ok_or_else(|| {
        scramble_core::Error::Inconsistent(format!(
          "exchange {exchange_id} references unknown participant {id}"
        ))
        .into()
      })
    };

    let assignments = self
      .assignments
      .iter()
      .map(|a| {
        Ok(Assignment {
          giver:    lookup(&a.giver_id)?,
          receiver: lookup(&a.receiver_id)?,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Exchange {
      exchange_id,
      title: self.exchange.title,
      description: self.exchange.description,
      created_at: decode_dt(&self.exchange.created_at)?,
      participants,
      assignments,
    })
  }
}

/// Raw strings read from the exchange listing query.
pub struct RawExchangeSummary {
  pub exchange:          RawExchange,
  pub participant_count: i64,
}

impl RawExchangeSummary {
  pub fn into_summary(self) -> Result<ExchangeSummary> {
    let exchange_id = decode_uuid(&self.exchange.exchange_id)?;
    let participant_count = usize::try_from(self.participant_count).map_err(|_| {
      scramble_core::Error::Inconsistent(format!(
        "exchange {exchange_id} has invalid participant count {}",
        self.participant_count
      ))
    })?;

    Ok(ExchangeSummary {
      exchange_id,
      title: self.exchange.title,
      description: self.exchange.description,
      created_at: decode_dt(&self.exchange.created_at)?,
      participant_count,
    })
  }
}
