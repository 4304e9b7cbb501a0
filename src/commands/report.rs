use crate::args::TripScopeArgs;
use crate::commands::Out;
use crate::engine::Settlement;
use crate::model::{Amount, Cents, PersonId};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One person's net position in a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLine {
    pub id: PersonId,
    pub name: String,
    /// Positive when the group owes this person, negative when they owe the group.
    pub cents: Cents,
    pub amount: Amount,
    /// Either "owed" or "owes".
    pub label: String,
}

impl BalanceLine {
    fn new(id: PersonId, name: impl Into<String>, cents: Cents) -> Self {
        let label = if cents >= 0 { "owed" } else { "owes" };
        Self {
            id,
            name: name.into(),
            cents,
            amount: Amount::from_cents(cents),
            label: label.to_string(),
        }
    }
}

impl Display for BalanceLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.name, self.amount, self.label)
    }
}

/// Computes every person's balance from the full expense list of a trip.
pub async fn balances(config: Config, args: TripScopeArgs) -> Result<Out<Vec<BalanceLine>>> {
    let book = config.store().load().await?;
    let trip = book.trip(args.trip())?;
    if trip.people().is_empty() {
        return Ok("Add people and expenses to see balances.".into());
    }
    let balances = trip.balances();
    let lines: Vec<BalanceLine> = trip
        .people()
        .iter()
        .map(|person| {
            let cents = balances.get(person.id()).copied().unwrap_or(0);
            BalanceLine::new(person.id().clone(), person.name(), cents)
        })
        .collect();
    let message = lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Out::new(message, lines))
}

/// Computes the payments that settle a trip.
pub async fn settle(config: Config, args: TripScopeArgs) -> Result<Out<Vec<Settlement>>> {
    let book = config.store().load().await?;
    let trip = book.trip(args.trip())?;
    let settlements = trip.settlements();
    if settlements.is_empty() {
        return Ok("Everyone is settled up.".into());
    }
    let message = settlements
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Out::new(message, settlements))
}
