use crate::args::{ExpenseAddArgs, ExpenseRefArgs, TripScopeArgs};
use crate::commands::Out;
use crate::model::{Amount, Expense, ExpenseId, NewExpense, Person, PersonId, SplitMode};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const UNKNOWN: &str = "Unknown";

/// An expense with the payer and participants resolved to names, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub id: ExpenseId,
    pub name: String,
    pub payer: String,
    pub amount: Amount,
    pub mode: SplitMode,
    pub participants: Vec<String>,
}

impl ExpenseLine {
    fn new(expense: &Expense, people: &[Person]) -> Self {
        Self {
            id: expense.id().clone(),
            name: expense.name().to_string(),
            payer: name_of(people, expense.payer_id()),
            amount: expense.amount(),
            mode: expense.mode(),
            participants: expense
                .participants()
                .iter()
                .map(|id| name_of(people, id))
                .collect(),
        }
    }
}

impl Display for ExpenseLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} paid {} - {} split - {}",
            self.name,
            self.payer,
            self.amount,
            self.mode,
            self.participants.join(", ")
        )
    }
}

/// Records an expense in a trip.
///
/// The payer and participants may be given by id or name. When no participants are given,
/// everyone on the trip shares the expense.
pub async fn expense_add(config: Config, args: ExpenseAddArgs) -> Result<Out<ExpenseLine>> {
    let store = config.store();
    let mut book = store.load().await?;
    let new = NewExpense {
        name: args.name().to_string(),
        payer: args.payer().to_string(),
        amount: args.amount(),
        mode: args.mode(),
        participants: args.participants().to_vec(),
    };
    let expense = book.add_expense(args.trip(), new)?.clone();
    let line = ExpenseLine::new(&expense, book.trip(args.trip())?.people());
    store.save(&book).await?;
    Ok(Out::new(format!("Added {line}"), line))
}

/// Lists the expenses of a trip in the order they were recorded.
pub async fn expense_list(config: Config, args: TripScopeArgs) -> Result<Out<Vec<ExpenseLine>>> {
    let book = config.store().load().await?;
    let trip = book.trip(args.trip())?;
    if trip.expenses().is_empty() {
        return Ok(format!(
            "No expenses in trip '{}' yet, add one with 'trip expense add'",
            trip.name()
        )
        .into());
    }
    let lines: Vec<ExpenseLine> = trip
        .expenses()
        .iter()
        .map(|expense| ExpenseLine::new(expense, trip.people()))
        .collect();
    let message = lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Out::new(message, lines))
}

pub async fn expense_delete(config: Config, args: ExpenseRefArgs) -> Result<Out<ExpenseLine>> {
    let store = config.store();
    let mut book = store.load().await?;
    let expense = book.delete_expense(args.trip(), args.expense())?;
    let line = ExpenseLine::new(&expense, book.trip(args.trip())?.people());
    store.save(&book).await?;
    Ok(Out::new(format!("Deleted {line}"), line))
}

fn name_of(people: &[Person], id: &PersonId) -> String {
    people
        .iter()
        .find(|person| person.id() == id)
        .map(|person| person.name().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
