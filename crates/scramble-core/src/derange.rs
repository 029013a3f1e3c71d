//! The derangement generator.
//!
//! Pairs every giver with a receiver such that the pairing is a permutation
//! of the participants with no fixed points: nobody draws themselves.
//!
//! The strategy is reject-and-retry: shuffle the receivers with Fisher–Yates,
//! discard the candidate if any position still holds its own participant, and
//! try again. Each accepted candidate is a uniform sample over all
//! derangements. The expected number of attempts tends to `e` as the roster
//! grows, which is negligible for the roster sizes a gift exchange sees.

use std::collections::HashSet;

use rand::Rng;

use crate::{InvalidInput, Result, exchange::Assignment, participant::Participant};

/// Smallest roster for which a derangement exists.
pub const MIN_PARTICIPANTS: usize = 2;

/// Pair `participants` using the thread-local RNG.
///
/// See [`generate_with`].
pub fn generate(participants: &[Participant]) -> Result<Vec<Assignment>> {
  generate_with(participants, &mut rand::thread_rng())
}

/// Pair `participants` using `rng`.
///
/// Returns one [`Assignment`] per participant, in input order of the givers.
/// Fails with [`InvalidInput`] if fewer than [`MIN_PARTICIPANTS`] are given or
/// if two participants share an id.
pub fn generate_with<R>(
  participants: &[Participant],
  rng: &mut R,
) -> Result<Vec<Assignment>>
where
  R: Rng + ?Sized,
{
  check_distinct(participants)?;
  let receivers = derangement(participants.len(), rng)?;

  Ok(
    participants
      .iter()
      .zip(receivers)
      .map(|(giver, r)| Assignment {
        giver:    giver.clone(),
        receiver: participants[r].clone(),
      })
      .collect(),
  )
}

/// A uniformly random derangement of `0..n`: element `k` of the result is the
/// receiver index for giver `k`, and never equals `k`.
pub fn derangement<R>(n: usize, rng: &mut R) -> Result<Vec<usize>>
where
  R: Rng + ?Sized,
{
  if n < MIN_PARTICIPANTS {
    return Err(InvalidInput::TooFewParticipants { count: n }.into());
  }

  let mut receivers: Vec<usize> = Vec::with_capacity(n);
  loop {
    receivers.clear();
    receivers.extend(0..n);
    shuffle(&mut receivers, rng);

    if !has_fixed_point(&receivers) {
      return Ok(receivers);
    }
  }
}

/// In-place Fisher–Yates shuffle.
fn shuffle<T, R>(items: &mut [T], rng: &mut R)
where
  R: Rng + ?Sized,
{
  for i in (1..items.len()).rev() {
    let j = rng.gen_range(0..=i);
    items.swap(i, j);
  }
}

fn has_fixed_point(receivers: &[usize]) -> bool {
  receivers.iter().enumerate().any(|(giver, &receiver)| giver == receiver)
}

fn check_distinct(participants: &[Participant]) -> Result<()> {
  let mut seen = HashSet::with_capacity(participants.len());
  for p in participants {
    if !seen.insert(p.participant_id) {
      return Err(InvalidInput::DuplicateParticipant(p.participant_id).into());
    }
  }
  Ok(())
}
