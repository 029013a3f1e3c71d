//! Error types for `scramble-core`.

use thiserror::Error;
use uuid::Uuid;

/// Caller-correctable problems with the input to a domain operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
  #[error("at least 2 participants are required, got {count}")]
  TooFewParticipants { count: usize },

  #[error("participant {0} appears more than once")]
  DuplicateParticipant(Uuid),

  #[error("participant name must not be empty")]
  EmptyName,

  #[error("exchange title must not be empty")]
  EmptyTitle,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid input: {0}")]
  InvalidInput(#[from] InvalidInput),

  #[error("a participant named {0:?} already exists")]
  DuplicateName(String),

  #[error("participant not found: {0}")]
  ParticipantNotFound(Uuid),

  #[error("exchange not found: {0}")]
  ExchangeNotFound(Uuid),

  /// A materialised exchange broke one of its structural invariants.
  #[error("inconsistent exchange: {0}")]
  Inconsistent(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
