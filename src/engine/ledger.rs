use crate::engine::allocate;
use crate::model::{Cents, Expense, Person, PersonId};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Net position per person in cents. Positive means the group owes them money, negative means they
/// owe the group.
pub type Balances = BTreeMap<PersonId, Cents>;

/// Derives every person's net balance from the full list of expenses.
///
/// Each expense credits its payer with the full amount and debits each participant by their share,
/// so the balances always sum to zero. Participant ids that do not match anyone in `people` are
/// skipped. An expense whose payer is unknown, or that has no known participants, contributes
/// nothing.
pub fn compute_balances(people: &[Person], expenses: &[Expense]) -> Balances {
    let lookup: HashMap<&PersonId, &Person> =
        people.iter().map(|person| (person.id(), person)).collect();
    let initial: Balances = people
        .iter()
        .map(|person| (person.id().clone(), 0))
        .collect();

    expenses.iter().fold(initial, |mut balances, expense| {
        apply(&mut balances, &lookup, expense);
        balances
    })
}

fn apply(balances: &mut Balances, lookup: &HashMap<&PersonId, &Person>, expense: &Expense) {
    let Some(total) = expense.amount().to_cents() else {
        trace!("Skipping expense {}: amount out of range", expense.id());
        return;
    };
    if !lookup.contains_key(expense.payer_id()) {
        trace!(
            "Skipping expense {}: unknown payer {}",
            expense.id(),
            expense.payer_id()
        );
        return;
    }

    let participants: Vec<&Person> = expense
        .participants()
        .iter()
        .filter_map(|id| lookup.get(id).copied())
        .collect();
    let shares = allocate(total, &participants, expense.mode(), expense.payer_id());
    if shares.is_empty() {
        return;
    }

    // 0 <= share <= total, so the per-person deltas cannot overflow on their own
    let mut deltas: BTreeMap<&PersonId, Cents> = BTreeMap::new();
    *deltas.entry(expense.payer_id()).or_insert(0) += total;
    for (id, share) in &shares {
        *deltas.entry(id).or_insert(0) -= share;
    }

    let updated: Option<Vec<(PersonId, Cents)>> = deltas
        .into_iter()
        .map(|(id, delta)| {
            let current = balances.get(id).copied().unwrap_or(0);
            current.checked_add(delta).map(|next| (id.clone(), next))
        })
        .collect();
    match updated {
        Some(updated) => balances.extend(updated),
        None => trace!("Skipping expense {}: balances would overflow", expense.id()),
    }
}
