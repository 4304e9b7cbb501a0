//! Types that represent the core data model, such as `Trip`, `Person` and `Expense`.
mod amount;
mod expense;
pub(crate) mod id;
mod person;
mod trip;
mod trip_book;

pub use amount::{Amount, AmountError, AmountFormat, MAX_CENTS};
pub use expense::{Expense, SplitMode};
pub use id::{ExpenseId, PersonId, TripId};
pub use person::{Person, Weight};
pub use trip::{Trip, TripSummary};
pub use trip_book::{NewExpense, RemovedPerson, TripBook};

/// A signed amount of money in the smallest currency unit.
pub type Cents = i64;
