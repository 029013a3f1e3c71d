//! Plain-text rendering of API results for the terminal.

use chrono::{DateTime, Utc};
use scramble_core::{
  exchange::{Exchange, ExchangeSummary},
  participant::Participant,
};

/// Short human-readable timestamp, e.g. `Dec 24, 2026 18:30`.
pub fn format_date(at: DateTime<Utc>) -> String { at.format("%b %-d, %Y %H:%M").to_string() }

pub fn participant_line(p: &Participant) -> String {
  match &p.email {
    Some(email) => format!("{}  {} ({email})", p.participant_id, p.name),
    None => format!("{}  {}", p.participant_id, p.name),
  }
}

pub fn roster(participants: &[Participant]) -> String {
  if participants.is_empty() {
    return "No participants added yet.".to_string();
  }
  participants
    .iter()
    .map(participant_line)
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn summaries(exchanges: &[ExchangeSummary]) -> String {
  if exchanges.is_empty() {
    return "No exchanges created yet.".to_string();
  }
  exchanges
    .iter()
    .map(|e| {
      format!(
        "{}  {}  ({} participants, {})",
        e.exchange_id,
        e.title,
        e.participant_count,
        format_date(e.created_at)
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Title, optional description, date, then one `Giver → Receiver` line per
/// assignment.
pub fn exchange(e: &Exchange) -> String {
  let mut lines = vec![e.title.clone()];
  if let Some(description) = &e.description {
    lines.push(description.clone());
  }
  lines.push(format_date(e.created_at));
  lines.push(String::new());
  lines.extend(e.assignments.iter().map(ToString::to_string));
  lines.join("\n")
}
