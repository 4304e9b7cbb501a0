use crate::engine::{self, Balances, Settlement};
use crate::model::{Expense, Person, TripId};
use serde::{Deserialize, Serialize};

/// A group of people and the expenses they shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Trip {
    pub(crate) id: TripId,
    pub(crate) name: String,
    pub(crate) people: Vec<Person>,
    pub(crate) expenses: Vec<Expense>,
}

impl Trip {
    pub fn new(
        id: impl Into<TripId>,
        name: impl Into<String>,
        people: Vec<Person>,
        expenses: Vec<Expense>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            people,
            expenses,
        }
    }

    pub fn id(&self) -> &TripId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Net balance per person, derived fresh from the full expense list.
    pub fn balances(&self) -> Balances {
        engine::compute_balances(&self.people, &self.expenses)
    }

    /// The transfers that settle this trip's current balances.
    pub fn settlements(&self) -> Vec<Settlement> {
        engine::settle(&self.people, &self.balances())
    }

    pub fn summary(&self) -> TripSummary {
        TripSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            people: self.people.len(),
            expenses: self.expenses.len(),
        }
    }
}

/// A short description of a trip for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSummary {
    pub id: TripId,
    pub name: String,
    pub people: usize,
    pub expenses: usize,
}
