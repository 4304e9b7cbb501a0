//! Coerces loosely-typed JSON into a well-formed `TripBook`.
//!
//! Malformed entries are dropped with a warning instead of failing the whole load. Keys are
//! accepted in both `snake_case` and `camelCase` so that state exported by other tools can be
//! imported.

use crate::model::{
    Amount, Expense, ExpenseId, Person, PersonId, SplitMode, Trip, TripBook, TripId, Weight,
};
use crate::Result;
use anyhow::{anyhow, bail, ensure};
use serde_json::Value;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::warn;

const DEFAULT_EXPENSE_NAME: &str = "Expense";

/// Builds a `TripBook` from raw JSON.
///
/// The only hard failure is a document that has no `trips` array. Every other problem is repaired
/// or the offending entry is dropped:
/// - trips need a string id and a non-blank name
/// - people need a string id and a non-blank name, and their weights are normalized
/// - expenses need a string id, an amount between one cent and `MAX_CENTS`, and a payer who is in
///   the trip; they keep only the participants who are in the trip (at least one must remain)
/// - an active trip id that matches no trip falls back to the first trip
pub fn normalize(raw: &Value) -> Result<TripBook> {
    let Some(entries) = raw.get("trips").and_then(Value::as_array) else {
        bail!("Expected a JSON object with a 'trips' array")
    };

    let mut trips: Vec<Trip> = Vec::with_capacity(entries.len());
    for (ix, entry) in entries.iter().enumerate() {
        match normalize_trip(entry) {
            Ok(trip) if trips.iter().any(|t| t.id() == trip.id()) => {
                warn!("Dropping trip at index {ix}: duplicate id {}", trip.id())
            }
            Ok(trip) => trips.push(trip),
            Err(e) => warn!("Dropping trip at index {ix}: {e}"),
        }
    }

    let active = field(raw, "active_trip_id", "activeTripId").and_then(Value::as_str);
    let active_trip_id = match active {
        Some(id) if trips.iter().any(|trip| trip.id().as_str() == id) => Some(TripId::from(id)),
        _ => trips.first().map(|trip| trip.id().clone()),
    };

    Ok(TripBook::new(trips, active_trip_id))
}

fn normalize_trip(value: &Value) -> Result<Trip> {
    let id = string(value, "id").ok_or_else(|| anyhow!("missing id"))?;
    let name = trimmed(value, "name").ok_or_else(|| anyhow!("missing name"))?;

    let mut people: Vec<Person> = Vec::new();
    for entry in array(value.get("people")) {
        match normalize_person(entry) {
            Ok(person) if people.iter().any(|p| p.id() == person.id()) => {
                warn!("Dropping person in trip {id}: duplicate id {}", person.id())
            }
            Ok(person) => people.push(person),
            Err(e) => warn!("Dropping person in trip {id}: {e}"),
        }
    }

    let known: HashSet<&str> = people.iter().map(|person| person.id().as_str()).collect();
    let mut expenses: Vec<Expense> = Vec::new();
    for entry in array(value.get("expenses")) {
        match normalize_expense(entry, &known) {
            Ok(expense) => expenses.push(expense),
            Err(e) => warn!("Dropping expense in trip {id}: {e}"),
        }
    }

    Ok(Trip::new(id, name, people, expenses))
}

fn normalize_person(value: &Value) -> Result<Person> {
    let id = string(value, "id").ok_or_else(|| anyhow!("missing id"))?;
    let name = trimmed(value, "name").ok_or_else(|| anyhow!("missing name"))?;
    let weight = value
        .get("weight")
        .and_then(Value::as_f64)
        .map(Weight::new)
        .unwrap_or_default();
    Ok(Person::new(PersonId::from(id), name, weight))
}

fn normalize_expense(value: &Value, known: &HashSet<&str>) -> Result<Expense> {
    let id = string(value, "id").ok_or_else(|| anyhow!("missing id"))?;
    let payer = field(value, "payer_id", "payerId")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("expense {id} has no payer"))?;
    ensure!(known.contains(payer), "expense {id} has unknown payer {payer}");

    let amount = amount(value.get("amount")).map_err(|e| anyhow!("expense {id}: {e}"))?;
    let name = trimmed(value, "name").unwrap_or_else(|| DEFAULT_EXPENSE_NAME.to_string());
    let mode = match value.get("mode").and_then(Value::as_str) {
        Some("weighted") => SplitMode::Weighted,
        _ => SplitMode::Equal,
    };

    let mut participants: Vec<PersonId> = Vec::new();
    for participant in array(value.get("participants")).filter_map(Value::as_str) {
        let participant = PersonId::from(participant);
        if known.contains(participant.as_str()) && !participants.contains(&participant) {
            participants.push(participant);
        }
    }
    ensure!(
        !participants.is_empty(),
        "expense {id} has no known participants"
    );

    Ok(Expense::new(
        ExpenseId::from(id),
        name,
        payer,
        amount,
        mode,
        participants,
    ))
}

/// Accepts a JSON number or a decimal string (with optional `$` and commas), rounded to whole
/// cents.
fn amount(value: Option<&Value>) -> Result<Amount> {
    let parsed = match value {
        Some(Value::Number(n)) => Amount::from_str(&n.to_string()),
        Some(Value::String(s)) => Amount::from_str(s),
        _ => bail!("missing amount"),
    }
    .map_err(|e| anyhow!("invalid amount: {e}"))?;
    ensure!(parsed.is_positive(), "amount must be positive");
    let cents = parsed
        .to_expense_cents()
        .ok_or_else(|| anyhow!("amount {parsed} is out of range"))?;
    Ok(Amount::from_cents(cents))
}

fn field<'a>(value: &'a Value, snake: &str, camel: &str) -> Option<&'a Value> {
    value.get(snake).or_else(|| value.get(camel))
}

fn string(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn trimmed(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn array(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flat_map(|entries| entries.iter())
}
