//! Participant — one person on the gift-exchange roster.
//!
//! Participants are immutable once created; the roster changes only by adding
//! or deleting whole participants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{InvalidInput, Result};

/// A roster entry. The `participant_id` is the identity used by the
/// derangement generator; names are for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
  pub participant_id: Uuid,
  pub name:           String,
  /// Optional contact address.
  pub email:          Option<String>,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::ExchangeStore::add_participant`].
/// The id and `created_at` are always set by the store.
///
/// Only constructed through [`NewParticipant::new`], so a value of this type
/// always carries a trimmed, non-empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
  name:  String,
  email: Option<String>,
}

impl NewParticipant {
  /// Build a validated input: the name is trimmed and must be non-empty, and
  /// a blank email collapses to `None`.
  pub fn new(name: &str, email: Option<&str>) -> Result<Self> {
    let name = name.trim();
    if name.is_empty() {
      return Err(InvalidInput::EmptyName.into());
    }
    let email = email
      .map(str::trim)
      .filter(|e| !e.is_empty())
      .map(str::to_owned);
    Ok(Self { name: name.to_owned(), email })
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn email(&self) -> Option<&str> { self.email.as_deref() }

  /// Key used for the roster's case-insensitive name uniqueness rule.
  pub fn name_key(&self) -> String { name_key(&self.name) }
}

/// Case-folded form of a display name.
pub fn name_key(name: &str) -> String { name.trim().to_lowercase() }

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  #[test]
  fn trims_name_and_blank_email() {
    let p = NewParticipant::new("  Alice ", Some("   ")).unwrap();
    assert_eq!(p.name(), "Alice");
    assert_eq!(p.email(), None);
  }

  #[test]
  fn keeps_email() {
    let p = NewParticipant::new("Bob", Some("bob@example.com")).unwrap();
    assert_eq!(p.email(), Some("bob@example.com"));
  }

  #[test]
  fn rejects_empty_name() {
    let err = NewParticipant::new("   ", None).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(InvalidInput::EmptyName)));
  }

  #[test]
  fn name_key_ignores_case() {
    assert_eq!(name_key("ALICE"), name_key(" alice"));
  }
}
