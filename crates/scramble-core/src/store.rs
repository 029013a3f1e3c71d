//! The `ExchangeStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `scramble-store-sqlite`).
//! Higher layers (`scramble-api`, `scramble-server`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  exchange::{Exchange, ExchangeSummary, NewExchange},
  participant::{NewParticipant, Participant},
};

// ─── Error classification ────────────────────────────────────────────────────

/// Backend error types expose the domain error they wrap, if any, so callers
/// can tell a rejected request apart from a storage failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn as_core(&self) -> Option<&crate::Error>;
}

impl StoreError for crate::Error {
  fn as_core(&self) -> Option<&crate::Error> { Some(self) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Scramblelist store backend.
///
/// The roster of participants is mutable (add, remove, clear). Exchanges are
/// append-only: once recorded they are never changed.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ExchangeStore: Send + Sync {
  type Error: StoreError;

  // ── Roster ────────────────────────────────────────────────────────────

  /// Add a participant to the roster.
  ///
  /// Returns [`crate::Error::DuplicateName`] if a participant with the same
  /// name (ignoring case) already exists.
  fn add_participant(
    &self,
    input: NewParticipant,
  ) -> impl Future<Output = Result<Participant, Self::Error>> + Send + '_;

  /// Retrieve a participant by id. Returns `None` if not found.
  fn get_participant(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Participant>, Self::Error>> + Send + '_;

  /// The whole roster, in creation order.
  fn list_participants(
    &self,
  ) -> impl Future<Output = Result<Vec<Participant>, Self::Error>> + Send + '_;

  /// Remove one participant. Recorded exchanges keep their snapshot.
  ///
  /// Returns [`crate::Error::ParticipantNotFound`] if the id is unknown.
  fn remove_participant(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Empty the roster and return how many participants were removed.
  fn clear_participants(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Exchanges ─────────────────────────────────────────────────────────

  /// Persist a drafted exchange atomically and return it with its id and
  /// `created_at` set by the store.
  fn record_exchange(
    &self,
    input: NewExchange,
  ) -> impl Future<Output = Result<Exchange, Self::Error>> + Send + '_;

  /// Retrieve an exchange with its snapshot and assignments. Returns `None`
  /// if not found.
  fn get_exchange(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Exchange>, Self::Error>> + Send + '_;

  /// Summaries of all exchanges, newest first.
  fn list_exchanges(
    &self,
  ) -> impl Future<Output = Result<Vec<ExchangeSummary>, Self::Error>> + Send + '_;

  // ── Health ────────────────────────────────────────────────────────────

  /// Round-trip to the backend without touching any data.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
