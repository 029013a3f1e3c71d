//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::BTreeSet;

use rand::{SeedableRng, rngs::StdRng};
use scramble_core::{
  Error as CoreError, InvalidInput,
  exchange::NewExchange,
  participant::{NewParticipant, Participant},
  store::{ExchangeStore, StoreError},
};
use uuid::Uuid;

use crate::{
  Error, SqliteStore,
  encode::{RawExchange, RawExchangeSummary},
};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn add(s: &SqliteStore, name: &str) -> Participant {
  s.add_participant(NewParticipant::new(name, None).unwrap())
    .await
    .unwrap()
}

async fn roster(s: &SqliteStore, names: &[&str]) -> Vec<Participant> {
  let mut out = Vec::new();
  for name in names {
    out.push(add(s, name).await);
  }
  out
}

// ─── Roster ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_participant() {
  let s = store().await;

  let input = NewParticipant::new("Alice", Some("alice@example.com")).unwrap();
  let alice = s.add_participant(input).await.unwrap();
  assert_eq!(alice.name, "Alice");

  let fetched = s.get_participant(alice.participant_id).await.unwrap();
  assert_eq!(fetched, Some(alice));
}

#[tokio::test]
async fn get_participant_missing_returns_none() {
  let s = store().await;
  let result = s.get_participant(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn list_participants_keeps_insertion_order() {
  let s = store().await;
  roster(&s, &["Cara", "Alice", "Bob"]).await;

  let names: Vec<String> = s
    .list_participants()
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.name)
    .collect();
  assert_eq!(names, ["Cara", "Alice", "Bob"]);
}

#[tokio::test]
async fn duplicate_name_is_rejected_ignoring_case() {
  let s = store().await;
  add(&s, "Alice").await;

  let err = s
    .add_participant(NewParticipant::new("aLiCe", None).unwrap())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::DuplicateName(ref n)) if n == "aLiCe"));
  assert!(err.as_core().is_some());
  assert_eq!(s.list_participants().await.unwrap().len(), 1);
}

#[tokio::test]
async fn blank_name_never_reaches_the_roster() {
  let s = store().await;

  let err = NewParticipant::new("   ", Some("")).unwrap_err();
  assert!(matches!(err, CoreError::InvalidInput(InvalidInput::EmptyName)));
  assert!(s.list_participants().await.unwrap().is_empty());

  let padded = s
    .add_participant(NewParticipant::new("  Alice  ", Some("  ")).unwrap())
    .await
    .unwrap();
  assert_eq!(padded.name, "Alice");
  assert_eq!(padded.email, None);

  let stored = s.get_participant(padded.participant_id).await.unwrap().unwrap();
  assert_eq!(stored.name, "Alice");
  assert_eq!(stored.email, None);
}

#[tokio::test]
async fn remove_participant() {
  let s = store().await;
  let people = roster(&s, &["Alice", "Bob"]).await;

  s.remove_participant(people[0].participant_id).await.unwrap();
  let left = s.list_participants().await.unwrap();
  assert_eq!(left, vec![people[1].clone()]);

  // The name is free again.
  add(&s, "Alice").await;
}

#[tokio::test]
async fn remove_missing_participant_fails() {
  let s = store().await;
  let id = Uuid::new_v4();
  let err = s.remove_participant(id).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::ParticipantNotFound(got)) if got == id));
}

#[tokio::test]
async fn clear_participants_reports_count() {
  let s = store().await;
  roster(&s, &["Alice", "Bob", "Cara"]).await;

  assert_eq!(s.clear_participants().await.unwrap(), 3);
  assert!(s.list_participants().await.unwrap().is_empty());
  assert_eq!(s.clear_participants().await.unwrap(), 0);
}

// ─── Exchanges ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_and_get_exchange() {
  let s = store().await;
  let people = roster(&s, &["Alice", "Bob", "Cara", "Dan"]).await;

  let draft = NewExchange::draft_with(
    "Office 2026",
    Some("Budget: 20"),
    people.clone(),
    &mut StdRng::seed_from_u64(3),
  )
  .unwrap();
  let recorded = s.record_exchange(draft).await.unwrap();
  assert_eq!(recorded.participants, people);
  assert_eq!(recorded.assignments.len(), 4);

  let fetched = s
    .get_exchange(recorded.exchange_id)
    .await
    .unwrap()
    .expect("exchange exists");
  assert_eq!(fetched, recorded);
  assert_eq!(fetched.description.as_deref(), Some("Budget: 20"));
  fetched.verify().unwrap();
}

#[tokio::test]
async fn get_exchange_missing_returns_none() {
  let s = store().await;
  assert!(s.get_exchange(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn exchange_snapshot_survives_roster_changes() {
  let s = store().await;
  let people = roster(&s, &["Alice", "Bob", "Cara"]).await;

  let recorded = s
    .record_exchange(NewExchange::draft("Family", None, people.clone()).unwrap())
    .await
    .unwrap();

  s.clear_participants().await.unwrap();

  let fetched = s.get_exchange(recorded.exchange_id).await.unwrap().unwrap();
  assert_eq!(fetched.participants, people);
  assert_eq!(fetched.assignments, recorded.assignments);
}

#[tokio::test]
async fn list_exchanges_newest_first() {
  let s = store().await;
  let people = roster(&s, &["Alice", "Bob", "Cara"]).await;

  let first = s
    .record_exchange(NewExchange::draft("First", None, people.clone()).unwrap())
    .await
    .unwrap();
  let second = s
    .record_exchange(NewExchange::draft("Second", None, people[..2].to_vec()).unwrap())
    .await
    .unwrap();

  let listed = s.list_exchanges().await.unwrap();
  assert_eq!(listed, vec![second.summary(), first.summary()]);
  assert_eq!(listed[0].participant_count, 2);
  assert_eq!(listed[1].participant_count, 3);
}

#[tokio::test]
async fn stored_pairings_are_derangements() {
  let s = store().await;
  let people = roster(&s, &["A", "B", "C", "D", "E", "F", "G"]).await;
  let expected: BTreeSet<Uuid> = people.iter().map(|p| p.participant_id).collect();

  for _ in 0..10 {
    let recorded = s
      .record_exchange(NewExchange::draft("Round", None, people.clone()).unwrap())
      .await
      .unwrap();
    let fetched = s.get_exchange(recorded.exchange_id).await.unwrap().unwrap();

    let receivers: BTreeSet<Uuid> = fetched
      .assignments
      .iter()
      .map(|a| a.receiver.participant_id)
      .collect();
    assert_eq!(receivers, expected);
    assert!(
      fetched
        .assignments
        .iter()
        .all(|a| a.giver.participant_id != a.receiver.participant_id)
    );
  }
}

#[tokio::test]
async fn ping_succeeds() {
  let s = store().await;
  s.ping().await.unwrap();
}

// ─── Decoding ────────────────────────────────────────────────────────────────

#[test]
fn negative_participant_count_is_inconsistent() {
  let raw = RawExchangeSummary {
    exchange:          RawExchange {
      exchange_id: Uuid::new_v4().to_string(),
      title:       "Office".to_owned(),
      description: None,
      created_at:  "2026-12-24T18:30:00+00:00".to_owned(),
    },
    participant_count: -1,
  };
  let err = raw.into_summary().unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::Inconsistent(_))));
}
