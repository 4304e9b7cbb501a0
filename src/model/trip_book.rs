//! The `TripBook` holds every trip along with the currently selected one, and provides the
//! validated mutations that the CLI commands perform on it.

use crate::model::{
    id, Amount, Expense, ExpenseId, Person, PersonId, SplitMode, Trip, TripId, MAX_CENTS,
};
use crate::Result;
use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// All trips known to the application and which one is active.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TripBook {
    pub(crate) trips: Vec<Trip>,
    pub(crate) active_trip_id: Option<TripId>,
}

/// The fields needed to record a new expense. People are referenced by id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub name: String,
    pub payer: String,
    pub amount: Amount,
    pub mode: SplitMode,
    /// When empty, everyone in the trip participates.
    pub participants: Vec<String>,
}

/// The result of removing a person, which also prunes the expenses that referenced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovedPerson {
    pub person: Person,
    pub dropped_expenses: Vec<Expense>,
}

impl TripBook {
    pub fn new(trips: Vec<Trip>, active_trip_id: Option<TripId>) -> Self {
        Self {
            trips,
            active_trip_id,
        }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn active_trip_id(&self) -> Option<&TripId> {
        self.active_trip_id.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Looks up a trip by id or name, or returns the active trip when `reference` is `None`.
    pub fn trip(&self, reference: Option<&str>) -> Result<&Trip> {
        let ix = self.trip_index(reference)?;
        Ok(&self.trips[ix])
    }

    pub fn create_trip(&mut self, name: &str) -> Result<&Trip> {
        let name = clean_name(name, "trip")?;
        let id: TripId = id::generate(|candidate| self.trip_id_taken(candidate));
        debug!("Creating trip {id} '{name}'");
        self.trips.push(Trip::new(id.clone(), name, Vec::new(), Vec::new()));
        self.active_trip_id = Some(id);
        Ok(&self.trips[self.trips.len() - 1])
    }

    pub fn select_trip(&mut self, reference: &str) -> Result<&Trip> {
        let ix = self.trip_index(Some(reference))?;
        self.active_trip_id = Some(self.trips[ix].id.clone());
        Ok(&self.trips[ix])
    }

    pub fn rename_trip(&mut self, reference: &str, name: &str) -> Result<&Trip> {
        let name = clean_name(name, "trip")?;
        let ix = self.trip_index(Some(reference))?;
        self.trips[ix].name = name;
        Ok(&self.trips[ix])
    }

    /// Removes a trip. If it was active, the first remaining trip becomes active.
    pub fn delete_trip(&mut self, reference: &str) -> Result<Trip> {
        let ix = self.trip_index(Some(reference))?;
        let removed = self.trips.remove(ix);
        if self.active_trip_id.as_ref() == Some(&removed.id) {
            self.active_trip_id = self.trips.first().map(|trip| trip.id.clone());
        }
        Ok(removed)
    }

    /// Clears every expense from a trip, returning the removed expenses.
    pub fn reset_trip(&mut self, reference: Option<&str>) -> Result<Vec<Expense>> {
        let ix = self.trip_index(reference)?;
        let trip = &mut self.trips[ix];
        ensure!(
            !trip.expenses.is_empty(),
            "Trip '{}' has no expenses to clear",
            trip.name
        );
        Ok(std::mem::take(&mut trip.expenses))
    }

    pub fn clear(&mut self) {
        self.trips.clear();
        self.active_trip_id = None;
    }

    pub fn add_person(
        &mut self,
        trip: Option<&str>,
        name: &str,
        weight: Option<f64>,
    ) -> Result<&Person> {
        let name = clean_name(name, "person")?;
        let ix = self.trip_index(trip)?;
        let id: PersonId = id::generate(|candidate| self.person_id_taken(candidate));
        let people = &mut self.trips[ix].people;
        people.push(Person::new(id, name, weight.unwrap_or(1.0)));
        Ok(&people[people.len() - 1])
    }

    pub fn rename_person(&mut self, trip: Option<&str>, person: &str, name: &str) -> Result<&Person> {
        let name = clean_name(name, "person")?;
        let (trip_ix, person_ix) = self.person_index(trip, person)?;
        let person = &mut self.trips[trip_ix].people[person_ix];
        person.set_name(name);
        Ok(person)
    }

    /// Sets a person's weight. Non-finite and non-positive values become 1.
    pub fn set_weight(&mut self, trip: Option<&str>, person: &str, weight: f64) -> Result<&Person> {
        let (trip_ix, person_ix) = self.person_index(trip, person)?;
        let person = &mut self.trips[trip_ix].people[person_ix];
        person.set_weight(weight);
        Ok(person)
    }

    /// Removes a person along with every expense they paid. They are also taken out of the
    /// participant lists of other expenses, and expenses left with nobody to split between are
    /// dropped.
    pub fn remove_person(&mut self, trip: Option<&str>, person: &str) -> Result<RemovedPerson> {
        let (trip_ix, person_ix) = self.person_index(trip, person)?;
        let trip = &mut self.trips[trip_ix];
        let person = trip.people.remove(person_ix);

        let mut kept = Vec::with_capacity(trip.expenses.len());
        let mut dropped_expenses = Vec::new();
        for mut expense in std::mem::take(&mut trip.expenses) {
            if expense.payer_id() == person.id() {
                dropped_expenses.push(expense);
                continue;
            }
            expense.remove_participant(person.id());
            if expense.participants().is_empty() {
                dropped_expenses.push(expense);
            } else {
                kept.push(expense);
            }
        }
        trip.expenses = kept;
        debug!(
            "Removed {} and {} expense(s) from trip {}",
            person.id(),
            dropped_expenses.len(),
            trip.id
        );
        Ok(RemovedPerson {
            person,
            dropped_expenses,
        })
    }

    pub fn add_expense(&mut self, trip: Option<&str>, new: NewExpense) -> Result<&Expense> {
        let name = clean_name(&new.name, "expense")?;
        let ix = self.trip_index(trip)?;
        let people = &self.trips[ix].people;
        ensure!(!people.is_empty(), "Add people to the trip before recording expenses");

        let payer_ix = person_position(people, &new.payer)?;
        let payer = people[payer_ix].id().clone();

        ensure!(
            new.amount.is_positive(),
            "The amount must be positive, got {}",
            new.amount
        );
        let Some(cents) = new.amount.to_expense_cents() else {
            bail!(
                "The amount {} must be between $0.01 and {}",
                new.amount,
                Amount::from_cents(MAX_CENTS)
            )
        };

        let mut participants: Vec<PersonId> = Vec::new();
        if new.participants.is_empty() {
            participants.extend(people.iter().map(|person| person.id().clone()));
        } else {
            for reference in &new.participants {
                let id = people[person_position(people, reference)?].id().clone();
                if !participants.contains(&id) {
                    participants.push(id);
                }
            }
        }
        ensure!(
            participants.len() >= 2,
            "An expense needs at least two participants"
        );

        let id: ExpenseId = id::generate(|candidate| self.expense_id_taken(candidate));
        let expenses = &mut self.trips[ix].expenses;
        expenses.push(Expense::new(
            id,
            name,
            payer,
            Amount::from_cents(cents),
            new.mode,
            participants,
        ));
        Ok(&expenses[expenses.len() - 1])
    }

    pub fn delete_expense(&mut self, trip: Option<&str>, reference: &str) -> Result<Expense> {
        let trip_ix = self.trip_index(trip)?;
        let expenses = &mut self.trips[trip_ix].expenses;
        let ix = resolve(
            expenses,
            reference,
            |expense| expense.id().as_str(),
            |expense| expense.name(),
            "expense",
        )?;
        Ok(expenses.remove(ix))
    }

    fn trip_index(&self, reference: Option<&str>) -> Result<usize> {
        match reference {
            Some(reference) => resolve(
                &self.trips,
                reference,
                |trip| trip.id.as_str(),
                |trip| trip.name.as_str(),
                "trip",
            ),
            None => {
                let Some(active) = &self.active_trip_id else {
                    bail!("No trip selected, create one with 'trip trip add' or pass --trip")
                };
                match self.trips.iter().position(|trip| &trip.id == active) {
                    Some(ix) => Ok(ix),
                    None => bail!("The active trip {active} no longer exists"),
                }
            }
        }
    }

    fn person_index(&self, trip: Option<&str>, person: &str) -> Result<(usize, usize)> {
        let trip_ix = self.trip_index(trip)?;
        let person_ix = person_position(&self.trips[trip_ix].people, person)?;
        Ok((trip_ix, person_ix))
    }

    fn trip_id_taken(&self, candidate: &str) -> bool {
        self.trips.iter().any(|trip| trip.id.as_str() == candidate)
    }

    fn person_id_taken(&self, candidate: &str) -> bool {
        self.trips
            .iter()
            .flat_map(|trip| trip.people.iter())
            .any(|person| person.id().as_str() == candidate)
    }

    fn expense_id_taken(&self, candidate: &str) -> bool {
        self.trips
            .iter()
            .flat_map(|trip| trip.expenses.iter())
            .any(|expense| expense.id().as_str() == candidate)
    }
}

fn person_position(people: &[Person], reference: &str) -> Result<usize> {
    resolve(
        people,
        reference,
        |person| person.id().as_str(),
        |person| person.name(),
        "person",
    )
}

/// Finds an item by exact id, falling back to an unambiguous exact name match.
fn resolve<T>(
    items: &[T],
    reference: &str,
    id: impl Fn(&T) -> &str,
    name: impl Fn(&T) -> &str,
    kind: &str,
) -> Result<usize> {
    if let Some(ix) = items.iter().position(|item| id(item) == reference) {
        return Ok(ix);
    }
    let matches: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| name(item) == reference)
        .map(|(ix, _)| ix)
        .collect();
    match matches.as_slice() {
        [ix] => Ok(*ix),
        [] => bail!("No {kind} found matching '{reference}'"),
        _ => bail!("More than one {kind} is named '{reference}', use the id instead"),
    }
}

fn clean_name(name: &str, kind: &str) -> Result<String> {
    let trimmed = name.trim();
    ensure!(!trimmed.is_empty(), "The {kind} name cannot be empty");
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Weight;
    use std::str::FromStr;

    fn new_expense(name: &str, payer: &str, cents: i64, participants: &[&str]) -> NewExpense {
        NewExpense {
            name: name.to_string(),
            payer: payer.to_string(),
            amount: Amount::from_cents(cents),
            mode: SplitMode::Equal,
            participants: participants.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn book_with_people(names: &[&str]) -> TripBook {
        let mut book = TripBook::default();
        book.create_trip("Lisbon").unwrap();
        for name in names {
            book.add_person(None, name, None).unwrap();
        }
        book
    }

    #[test]
    fn test_create_trip_becomes_active() {
        let mut book = TripBook::default();
        let first = book.create_trip("  Lisbon ").unwrap().id().clone();
        assert_eq!(book.trip(None).unwrap().name(), "Lisbon");
        let second = book.create_trip("Porto").unwrap().id().clone();
        assert_ne!(first, second);
        assert_eq!(book.active_trip_id(), Some(&second));
    }

    #[test]
    fn test_create_trip_rejects_blank_name() {
        let mut book = TripBook::default();
        assert!(book.create_trip("   ").is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn test_no_active_trip() {
        let book = TripBook::default();
        let err = book.trip(None).unwrap_err().to_string();
        assert!(err.contains("No trip selected"));
    }

    #[test]
    fn test_select_and_rename_by_name() {
        let mut book = TripBook::default();
        book.create_trip("Lisbon").unwrap();
        book.create_trip("Porto").unwrap();
        book.select_trip("Lisbon").unwrap();
        assert_eq!(book.trip(None).unwrap().name(), "Lisbon");
        book.rename_trip("Lisbon", "Lisboa").unwrap();
        assert_eq!(book.trip(None).unwrap().name(), "Lisboa");
    }

    #[test]
    fn test_ambiguous_name() {
        let mut book = TripBook::default();
        book.create_trip("Same").unwrap();
        book.create_trip("Same").unwrap();
        let err = book.select_trip("Same").unwrap_err().to_string();
        assert!(err.contains("More than one trip"));
    }

    #[test]
    fn test_delete_active_trip_selects_first() {
        let mut book = TripBook::default();
        let first = book.create_trip("One").unwrap().id().clone();
        book.create_trip("Two").unwrap();
        book.delete_trip("Two").unwrap();
        assert_eq!(book.active_trip_id(), Some(&first));
        book.delete_trip("One").unwrap();
        assert_eq!(book.active_trip_id(), None);
    }

    #[test]
    fn test_delete_inactive_trip_keeps_active() {
        let mut book = TripBook::default();
        book.create_trip("One").unwrap();
        let second = book.create_trip("Two").unwrap().id().clone();
        book.delete_trip("One").unwrap();
        assert_eq!(book.active_trip_id(), Some(&second));
    }

    #[test]
    fn test_reset_trip() {
        let mut book = book_with_people(&["Ana", "Ben"]);
        assert!(book.reset_trip(None).is_err());
        book.add_expense(None, new_expense("Taxi", "Ana", 2000, &[]))
            .unwrap();
        let removed = book.reset_trip(None).unwrap();
        assert_eq!(removed.len(), 1);
        assert!(book.trip(None).unwrap().expenses().is_empty());
    }

    #[test]
    fn test_add_person_normalizes_weight() {
        let mut book = book_with_people(&[]);
        let person = book.add_person(None, "Ana", Some(-1.0)).unwrap();
        assert_eq!(person.weight(), Weight::ONE);
        let person = book.add_person(None, "Ben", Some(2.0)).unwrap();
        assert_eq!(person.weight().value(), 2.0);
    }

    #[test]
    fn test_rename_and_weight_person() {
        let mut book = book_with_people(&["Ana"]);
        book.rename_person(None, "Ana", "Anna").unwrap();
        assert!(book.rename_person(None, "Anna", " ").is_err());
        let person = book.set_weight(None, "Anna", f64::NAN).unwrap();
        assert_eq!(person.weight(), Weight::ONE);
        let person = book.set_weight(None, "Anna", 3.0).unwrap();
        assert_eq!(person.name(), "Anna");
        assert_eq!(person.weight().value(), 3.0);
    }

    #[test]
    fn test_add_expense_defaults_to_everyone() {
        let mut book = book_with_people(&["Ana", "Ben", "Cy"]);
        let expense = book
            .add_expense(None, new_expense("Dinner", "Ana", 3000, &[]))
            .unwrap()
            .clone();
        assert_eq!(expense.participants().len(), 3);
        assert_eq!(expense.name(), "Dinner");
    }

    #[test]
    fn test_add_expense_dedupes_participants() {
        let mut book = book_with_people(&["Ana", "Ben"]);
        let ana = book.trip(None).unwrap().people()[0].id().to_string();
        let result = book.add_expense(None, new_expense("Snack", "Ana", 500, &["Ana", ana.as_str()]));
        assert!(result.is_err());
        let expense = book
            .add_expense(None, new_expense("Snack", "Ana", 500, &["Ana", ana.as_str(), "Ben"]))
            .unwrap();
        assert_eq!(expense.participants().len(), 2);
    }

    #[test]
    fn test_add_expense_validation() {
        let mut book = book_with_people(&["Ana", "Ben"]);
        assert!(book
            .add_expense(None, new_expense(" ", "Ana", 500, &[]))
            .is_err());
        assert!(book
            .add_expense(None, new_expense("Taxi", "Zed", 500, &[]))
            .is_err());
        assert!(book
            .add_expense(None, new_expense("Taxi", "Ana", 0, &[]))
            .is_err());
        assert!(book
            .add_expense(None, new_expense("Taxi", "Ana", -500, &[]))
            .is_err());
        assert!(book
            .add_expense(None, new_expense("Taxi", "Ana", 500, &["Ana", "Zed"]))
            .is_err());
        assert!(book
            .add_expense(None, new_expense("Yacht", "Ana", MAX_CENTS + 1, &[]))
            .is_err());
        assert!(book.trip(None).unwrap().expenses().is_empty());
    }

    #[test]
    fn test_add_expense_stores_whole_cents() {
        let mut book = book_with_people(&["Ana", "Ben"]);
        let mut tiny = new_expense("Gum", "Ana", 0, &[]);
        tiny.amount = Amount::from_str("0.015").unwrap();
        let expense = book.add_expense(None, tiny).unwrap();
        assert_eq!(expense.amount(), Amount::from_cents(2));

        let mut dust = new_expense("Dust", "Ana", 0, &[]);
        dust.amount = Amount::from_str("0.004").unwrap();
        assert!(book.add_expense(None, dust).is_err());

        let largest = book
            .add_expense(None, new_expense("Island", "Ben", MAX_CENTS, &[]))
            .unwrap();
        assert_eq!(largest.amount().to_cents(), Some(MAX_CENTS));
    }

    #[test]
    fn test_remove_person_cascades() {
        let mut book = book_with_people(&["Ana", "Ben", "Cy"]);
        book.add_expense(None, new_expense("Paid by Ana", "Ana", 900, &[]))
            .unwrap();
        book.add_expense(None, new_expense("Ben and Ana", "Ben", 400, &["Ben", "Ana"]))
            .unwrap();
        book.add_expense(None, new_expense("Shared", "Cy", 600, &[]))
            .unwrap();

        let removed = book.remove_person(None, "Ana").unwrap();
        assert_eq!(removed.person.name(), "Ana");
        assert_eq!(removed.dropped_expenses.len(), 1);

        let trip = book.trip(None).unwrap();
        assert_eq!(trip.people().len(), 2);
        let names: Vec<&str> = trip.expenses().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["Ben and Ana", "Shared"]);
        assert!(trip
            .expenses()
            .iter()
            .all(|e| e.participants().iter().all(|id| id != removed.person.id())));
    }

    #[test]
    fn test_remove_person_drops_emptied_expense() {
        let mut book = book_with_people(&["Ana", "Ben"]);
        book.add_expense(None, new_expense("Lunch", "Ana", 1000, &[]))
            .unwrap();
        book.remove_person(None, "Ben").unwrap();
        book.remove_person(None, "Ana").unwrap();
        assert!(book.trip(None).unwrap().expenses().is_empty());
    }

    #[test]
    fn test_delete_expense() {
        let mut book = book_with_people(&["Ana", "Ben"]);
        book.add_expense(None, new_expense("Taxi", "Ana", 1000, &[]))
            .unwrap();
        assert!(book.delete_expense(None, "Bus").is_err());
        let removed = book.delete_expense(None, "Taxi").unwrap();
        assert_eq!(removed.name(), "Taxi");
        assert!(book.trip(None).unwrap().expenses().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut book = book_with_people(&["Ana"]);
        book.clear();
        assert!(book.is_empty());
        assert_eq!(book.active_trip_id(), None);
    }

    #[test]
    fn test_trip_balances_and_settlements() {
        let mut book = book_with_people(&["Ana", "Ben", "Cy"]);
        book.add_expense(None, new_expense("Dinner", "Ana", 3000, &[]))
            .unwrap();
        let trip = book.trip(None).unwrap();
        let balances = trip.balances();
        assert_eq!(balances.values().sum::<i64>(), 0);
        let settlements = trip.settlements();
        assert_eq!(settlements.len(), 2);
        assert!(settlements.iter().all(|s| s.to == "Ana" && s.amount == 1000));
    }
}
