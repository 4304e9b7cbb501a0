//! Splits one expense total into per-person integer-cent shares.

use crate::model::{Cents, Person, PersonId, SplitMode, Weight};
use std::collections::{BTreeMap, HashSet};

/// Each participant's share of one expense, in cents.
pub type Shares = BTreeMap<PersonId, Cents>;

/// Divides `total` cents among `participants` according to `mode`.
///
/// The returned shares always sum to exactly `total` and are never negative. Cents left over
/// after rounding down go to the payer when the payer is a participant. Otherwise they are handed
/// out one at a time: in participant order for equal splits, or by largest fractional remainder
/// (then by id) for weighted splits.
///
/// Returns an empty map if there are no participants or `total` is not positive. A participant
/// listed more than once is counted once.
pub fn allocate(
    total: Cents,
    participants: &[&Person],
    mode: SplitMode,
    payer: &PersonId,
) -> Shares {
    let participants = distinct(participants);
    if participants.is_empty() || total <= 0 {
        return Shares::new();
    }
    match mode {
        SplitMode::Equal => allocate_equal(total, &participants, payer),
        SplitMode::Weighted => allocate_weighted(total, &participants, payer),
    }
}

fn allocate_equal(total: Cents, participants: &[&Person], payer: &PersonId) -> Shares {
    let count = participants.len() as Cents;
    let base = total / count;
    let mut remainder = total - base * count;

    let mut shares: Shares = participants
        .iter()
        .map(|person| (person.id().clone(), base))
        .collect();

    if remainder > 0 {
        if let Some(share) = shares.get_mut(payer) {
            *share += remainder;
            remainder = 0;
        }
    }

    // remainder < count, so a single pass is enough
    for person in participants.iter().take(remainder as usize) {
        if let Some(share) = shares.get_mut(person.id()) {
            *share += 1;
        }
    }
    shares
}

fn allocate_weighted(total: Cents, participants: &[&Person], payer: &PersonId) -> Shares {
    let weights: Vec<f64> = participants
        .iter()
        .map(|person| Weight::normalize(person.weight().value()))
        .collect();
    let total_weight: f64 = weights.iter().sum();
    if !total_weight.is_finite() || total_weight <= 0.0 {
        return allocate_equal(total, participants, payer);
    }

    let raw: Vec<f64> = weights
        .iter()
        .map(|weight| total as f64 * weight / total_weight)
        .collect();
    let mut base: Vec<Cents> = raw.iter().map(|share| share.floor() as Cents).collect();
    let mut remainder = total - base.iter().sum::<Cents>();

    if remainder > 0 {
        if let Some(ix) = participants.iter().position(|person| person.id() == payer) {
            base[ix] += remainder;
            remainder = 0;
        }
    }

    if remainder > 0 {
        let mut order: Vec<usize> = (0..participants.len()).collect();
        order.sort_by(|&a, &b| {
            let fraction_a = raw[a] - base[a] as f64;
            let fraction_b = raw[b] - base[b] as f64;
            fraction_b
                .total_cmp(&fraction_a)
                .then_with(|| participants[a].id().cmp(participants[b].id()))
        });
        // The remainder is smaller than the participant count unless the weights are extreme
        // enough for float error to dominate. Wrapping keeps the total exact either way.
        for &ix in order.iter().cycle().take(remainder as usize) {
            base[ix] += 1;
        }
    }

    participants
        .iter()
        .zip(base)
        .map(|(person, share)| (person.id().clone(), share))
        .collect()
}

/// Drops repeated people, keeping the first occurrence of each id.
fn distinct<'a>(participants: &[&'a Person]) -> Vec<&'a Person> {
    let mut seen: HashSet<&PersonId> = HashSet::with_capacity(participants.len());
    participants
        .iter()
        .copied()
        .filter(|person| seen.insert(person.id()))
        .collect()
}
