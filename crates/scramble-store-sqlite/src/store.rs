//! [`SqliteStore`] — the SQLite implementation of [`ExchangeStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use scramble_core::{
  exchange::{Exchange, ExchangeSummary, NewExchange},
  participant::{NewParticipant, Participant},
  store::ExchangeStore,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawAssignment, RawExchange, RawExchangeRecord, RawExchangeSummary,
    RawParticipant, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Scramblelist store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ExchangeStore impl ──────────────────────────────────────────────────────

impl ExchangeStore for SqliteStore {
  type Error = Error;

  // ── Roster ────────────────────────────────────────────────────────────────

  async fn add_participant(&self, input: NewParticipant) -> Result<Participant> {
    let participant = Participant {
      participant_id: Uuid::new_v4(),
      name:           input.name().to_owned(),
      email:          input.email().map(str::to_owned),
      created_at:     Utc::now(),
    };

    let id_str   = encode_uuid(participant.participant_id);
    let name     = participant.name.clone();
    let name_key = input.name_key();
    let email    = participant.email.clone();
    let at_str   = encode_dt(participant.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM participants WHERE name_key = ?1",
            rusqlite::params![name_key],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO participants (participant_id, name, name_key, email, created_at, seq)
           VALUES (?1, ?2, ?3, ?4, ?5,
                   (SELECT COALESCE(MAX(seq), 0) + 1 FROM participants))",
          rusqlite::params![id_str, name, name_key, email, at_str],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(scramble_core::Error::DuplicateName(participant.name).into());
    }

    debug!(participant_id = %participant.participant_id, "added participant");
    Ok(participant)
  }

  async fn get_participant(&self, id: Uuid) -> Result<Option<Participant>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawParticipant> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT participant_id, name, email, created_at
               FROM participants WHERE participant_id = ?1",
              rusqlite::params![id_str],
              RawParticipant::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawParticipant::into_participant).transpose()
  }

  async fn list_participants(&self) -> Result<Vec<Participant>> {
    let raws: Vec<RawParticipant> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT participant_id, name, email, created_at
           FROM participants ORDER BY seq",
        )?;
        let rows = stmt
          .query_map([], RawParticipant::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawParticipant::into_participant).collect()
  }

  async fn remove_participant(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let removed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM participants WHERE participant_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if removed == 0 {
      return Err(scramble_core::Error::ParticipantNotFound(id).into());
    }
    debug!(participant_id = %id, "removed participant");
    Ok(())
  }

  async fn clear_participants(&self) -> Result<usize> {
    let removed: usize = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM participants", [])?))
      .await?;

    debug!(removed, "cleared roster");
    Ok(removed)
  }

  // ── Exchanges ─────────────────────────────────────────────────────────────

  async fn record_exchange(&self, input: NewExchange) -> Result<Exchange> {
    let exchange = input.into_exchange(Uuid::new_v4(), Utc::now());
    exchange.verify()?;

    let exchange_id_str = encode_uuid(exchange.exchange_id);
    let title           = exchange.title.clone();
    let description     = exchange.description.clone();
    let at_str          = encode_dt(exchange.created_at);
    let snapshot: Vec<(String, String, Option<String>, String)> = exchange
      .participants
      .iter()
      .map(|p| {
        (
          encode_uuid(p.participant_id),
          p.name.clone(),
          p.email.clone(),
          encode_dt(p.created_at),
        )
      })
      .collect();
    let pairs: Vec<(String, String)> = exchange
      .assignments
      .iter()
      .map(|a| {
        (
          encode_uuid(a.giver.participant_id),
          encode_uuid(a.receiver.participant_id),
        )
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO exchanges (exchange_id, title, description, created_at, seq)
           VALUES (?1, ?2, ?3, ?4,
                   (SELECT COALESCE(MAX(seq), 0) + 1 FROM exchanges))",
          rusqlite::params![exchange_id_str, title, description, at_str],
        )?;

        {
          let mut stmt = tx.prepare(
            "INSERT INTO exchange_participants
               (exchange_id, position, participant_id, name, email, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for (position, (id, name, email, created_at)) in snapshot.iter().enumerate() {
            stmt.execute(rusqlite::params![
              exchange_id_str,
              position as i64,
              id,
              name,
              email,
              created_at,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO assignments (exchange_id, position, giver_id, receiver_id)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for (position, (giver, receiver)) in pairs.iter().enumerate() {
            stmt.execute(rusqlite::params![
              exchange_id_str,
              position as i64,
              giver,
              receiver,
            ])?;
          }
        }

        tx.commit()?;
        Ok(())
      })
      .await?;

    debug!(
      exchange_id = %exchange.exchange_id,
      participants = exchange.participants.len(),
      "recorded exchange"
    );
    Ok(exchange)
  }

  async fn get_exchange(&self, id: Uuid) -> Result<Option<Exchange>> {
    let id_str = encode_uuid(id);

    let record: Option<RawExchangeRecord> = self
      .conn
      .call(move |conn| {
        let exchange = conn
          .query_row(
            "SELECT exchange_id, title, description, created_at
             FROM exchanges WHERE exchange_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawExchange {
                exchange_id: row.get(0)?,
                title:       row.get(1)?,
                description: row.get(2)?,
                created_at:  row.get(3)?,
              })
            },
          )
          .optional()?;

        let Some(exchange) = exchange else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(
          "SELECT participant_id, name, email, created_at
           FROM exchange_participants
           WHERE exchange_id = ?1
           ORDER BY position",
        )?;
        let participants = stmt
          .query_map(rusqlite::params![id_str], RawParticipant::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT giver_id, receiver_id
           FROM assignments
           WHERE exchange_id = ?1
           ORDER BY position",
        )?;
        let assignments = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawAssignment {
              giver_id:    row.get(0)?,
              receiver_id: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(RawExchangeRecord { exchange, participants, assignments }))
      })
      .await?;

    let Some(record) = record else {
      return Ok(None);
    };
    let exchange = record.into_exchange()?;
    exchange.verify()?;
    Ok(Some(exchange))
  }

  async fn list_exchanges(&self) -> Result<Vec<ExchangeSummary>> {
    let raws: Vec<RawExchangeSummary> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT e.exchange_id, e.title, e.description, e.created_at,
                  COUNT(p.participant_id)
           FROM exchanges e
           LEFT JOIN exchange_participants p ON p.exchange_id = e.exchange_id
           GROUP BY e.exchange_id
           ORDER BY e.seq DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawExchangeSummary {
              exchange:          RawExchange {
                exchange_id: row.get(0)?,
                title:       row.get(1)?,
                description: row.get(2)?,
                created_at:  row.get(3)?,
              },
              participant_count: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawExchangeSummary::into_summary).collect()
  }

  // ── Health ────────────────────────────────────────────────────────────────

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
