//! Exchange types — one generated round of gift assignments.
//!
//! An exchange is written once, when its assignments are generated, and is
//! never updated afterwards. It keeps its own snapshot of the participants so
//! that later roster changes do not reach into past rounds.

use std::{collections::HashSet, fmt};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, InvalidInput, Result, derange, participant::Participant};

// ─── Assignment ──────────────────────────────────────────────────────────────

/// `giver` buys a gift for `receiver`. The two are always different people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
  pub giver:    Participant,
  pub receiver: Participant,
}

impl fmt::Display for Assignment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} → {}", self.giver.name, self.receiver.name)
  }
}

// ─── NewExchange ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::ExchangeStore::record_exchange`].
///
/// Only constructible through [`NewExchange::draft`] / [`NewExchange::draft_with`],
/// so the assignments always come from the derangement generator. The id and
/// `created_at` are set by the store.
#[derive(Debug, Clone)]
pub struct NewExchange {
  title:        String,
  description:  Option<String>,
  participants: Vec<Participant>,
  assignments:  Vec<Assignment>,
}

impl NewExchange {
  /// Validate the title and generate assignments with the thread-local RNG.
  pub fn draft(
    title: &str,
    description: Option<&str>,
    participants: Vec<Participant>,
  ) -> Result<Self> {
    Self::draft_with(title, description, participants, &mut rand::thread_rng())
  }

  /// As [`NewExchange::draft`], drawing randomness from `rng`.
  pub fn draft_with<R>(
    title: &str,
    description: Option<&str>,
    participants: Vec<Participant>,
    rng: &mut R,
  ) -> Result<Self>
  where
    R: Rng + ?Sized,
  {
    let title = title.trim();
    if title.is_empty() {
      return Err(InvalidInput::EmptyTitle.into());
    }
    let description = description
      .map(str::trim)
      .filter(|d| !d.is_empty())
      .map(str::to_owned);

    let assignments = derange::generate_with(&participants, rng)?;

    Ok(Self {
      title: title.to_owned(),
      description,
      participants,
      assignments,
    })
  }

  pub fn title(&self) -> &str { &self.title }

  pub fn description(&self) -> Option<&str> { self.description.as_deref() }

  pub fn participants(&self) -> &[Participant] { &self.participants }

  pub fn assignments(&self) -> &[Assignment] { &self.assignments }

  /// Attach the store-assigned identity and timestamp.
  pub fn into_exchange(self, exchange_id: Uuid, created_at: DateTime<Utc>) -> Exchange {
    Exchange {
      exchange_id,
      title: self.title,
      description: self.description,
      created_at,
      participants: self.participants,
      assignments: self.assignments,
    }
  }
}

// ─── Exchange ────────────────────────────────────────────────────────────────

/// A persisted round: the participant snapshot plus one assignment per
/// participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
  pub exchange_id:  Uuid,
  pub title:        String,
  pub description:  Option<String>,
  pub created_at:   DateTime<Utc>,
  pub participants: Vec<Participant>,
  pub assignments:  Vec<Assignment>,
}

impl Exchange {
  /// Check the structural invariants: one assignment per participant, givers
  /// and receivers each cover the snapshot exactly once, and nobody draws
  /// themselves.
  pub fn verify(&self) -> Result<()> {
    let inconsistent = |msg: String| -> Result<()> { Err(Error::Inconsistent(msg)) };

    if self.participants.len() < derange::MIN_PARTICIPANTS {
      return inconsistent(format!(
        "exchange {} has {} participants",
        self.exchange_id,
        self.participants.len()
      ));
    }
    if self.assignments.len() != self.participants.len() {
      return inconsistent(format!(
        "exchange {} has {} assignments for {} participants",
        self.exchange_id,
        self.assignments.len(),
        self.participants.len()
      ));
    }

    let roster: HashSet<Uuid> =
      self.participants.iter().map(|p| p.participant_id).collect();
    if roster.len() != self.participants.len() {
      return inconsistent(format!(
        "exchange {} repeats a participant",
        self.exchange_id
      ));
    }

    let mut givers = HashSet::with_capacity(roster.len());
    let mut receivers = HashSet::with_capacity(roster.len());
    for a in &self.assignments {
      let (g, r) = (a.giver.participant_id, a.receiver.participant_id);
      if g == r {
        return inconsistent(format!("participant {g} is assigned to themselves"));
      }
      if !roster.contains(&g) || !roster.contains(&r) {
        return inconsistent(format!("assignment {g} → {r} is outside the roster"));
      }
      if !givers.insert(g) {
        return inconsistent(format!("participant {g} gives more than once"));
      }
      if !receivers.insert(r) {
        return inconsistent(format!("participant {r} receives more than once"));
      }
    }

    Ok(())
  }

  pub fn summary(&self) -> ExchangeSummary {
    ExchangeSummary {
      exchange_id:       self.exchange_id,
      title:             self.title.clone(),
      description:       self.description.clone(),
      created_at:        self.created_at,
      participant_count: self.participants.len(),
    }
  }
}

/// Listing row for an exchange; assignments are fetched separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeSummary {
  pub exchange_id:       Uuid,
  pub title:             String,
  pub description:       Option<String>,
  pub created_at:        DateTime<Utc>,
  pub participant_count: usize,
}

#[cfg(test)]
mod tests {
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  fn person(name: &str) -> Participant {
    Participant {
      participant_id: Uuid::new_v4(),
      name:           name.to_owned(),
      email:          None,
      created_at:     Utc::now(),
    }
  }

  fn people() -> Vec<Participant> {
    vec![person("Alice"), person("Bob"), person("Cara"), person("Dan")]
  }

  #[test]
  fn draft_trims_and_generates() {
    let draft =
      NewExchange::draft("  Office 2026 ", Some("  "), people()).unwrap();
    assert_eq!(draft.title(), "Office 2026");
    assert_eq!(draft.description(), None);
    assert_eq!(draft.assignments().len(), 4);

    let exchange = draft.into_exchange(Uuid::new_v4(), Utc::now());
    exchange.verify().unwrap();
    assert_eq!(exchange.summary().participant_count, 4);
  }

  #[test]
  fn draft_rejects_blank_title() {
    let err = NewExchange::draft(" ", None, people()).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(InvalidInput::EmptyTitle)));
  }

  #[test]
  fn draft_rejects_lonely_roster() {
    let err = NewExchange::draft("Solo", None, vec![person("Alice")]).unwrap_err();
    assert!(matches!(
      err,
      Error::InvalidInput(InvalidInput::TooFewParticipants { count: 1 })
    ));
  }

  #[test]
  fn seeded_drafts_agree() {
    let roster = people();
    let a = NewExchange::draft_with("x", None, roster.clone(), &mut StdRng::seed_from_u64(9))
      .unwrap();
    let b = NewExchange::draft_with("x", None, roster, &mut StdRng::seed_from_u64(9))
      .unwrap();
    assert_eq!(a.assignments(), b.assignments());
  }

  #[test]
  fn verify_catches_self_assignment() {
    let mut exchange = NewExchange::draft("x", None, people())
      .unwrap()
      .into_exchange(Uuid::new_v4(), Utc::now());
    exchange.assignments[0].receiver = exchange.assignments[0].giver.clone();
    assert!(matches!(exchange.verify(), Err(Error::Inconsistent(_))));
  }

  #[test]
  fn verify_catches_missing_assignment() {
    let mut exchange = NewExchange::draft("x", None, people())
      .unwrap()
      .into_exchange(Uuid::new_v4(), Utc::now());
    exchange.assignments.pop();
    assert!(matches!(exchange.verify(), Err(Error::Inconsistent(_))));
  }

  #[test]
  fn assignment_display_uses_arrow() {
    let a = Assignment { giver: person("Alice"), receiver: person("Bob") };
    assert_eq!(a.to_string(), "Alice → Bob");
  }
}
