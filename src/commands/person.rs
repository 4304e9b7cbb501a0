use crate::args::{PersonAddArgs, PersonRefArgs, PersonRenameArgs, PersonWeightArgs, TripScopeArgs};
use crate::commands::{plural, Out};
use crate::model::{Person, RemovedPerson};
use crate::{Config, Result};

pub async fn person_add(config: Config, args: PersonAddArgs) -> Result<Out<Person>> {
    let store = config.store();
    let mut book = store.load().await?;
    let person = book
        .add_person(args.trip(), args.name(), args.weight())?
        .clone();
    store.save(&book).await?;
    Ok(Out::new(
        format!("Added {} ({})", person.name(), person.id()),
        person,
    ))
}

/// Lists the people on a trip with their weights.
pub async fn person_list(config: Config, args: TripScopeArgs) -> Result<Out<Vec<Person>>> {
    let book = config.store().load().await?;
    let trip = book.trip(args.trip())?;
    if trip.people().is_empty() {
        return Ok(format!(
            "Nobody is on trip '{}' yet, add someone with 'trip person add <NAME>'",
            trip.name()
        )
        .into());
    }
    let lines: Vec<String> = trip.people().iter().map(person_line).collect();
    Ok(Out::new(lines.join("\n"), trip.people().to_vec()))
}

pub async fn person_rename(config: Config, args: PersonRenameArgs) -> Result<Out<Person>> {
    let store = config.store();
    let mut book = store.load().await?;
    let person = book
        .rename_person(args.trip(), args.person(), args.name())?
        .clone();
    store.save(&book).await?;
    Ok(Out::new(
        format!("Renamed {} to '{}'", person.id(), person.name()),
        person,
    ))
}

pub async fn person_weight(config: Config, args: PersonWeightArgs) -> Result<Out<Person>> {
    let store = config.store();
    let mut book = store.load().await?;
    let person = book
        .set_weight(args.trip(), args.person(), args.weight())?
        .clone();
    store.save(&book).await?;
    Ok(Out::new(
        format!("Set the weight of {} to {}", person.name(), person.weight().value()),
        person,
    ))
}

/// Removes a person and reports how many expenses went with them.
pub async fn person_remove(config: Config, args: PersonRefArgs) -> Result<Out<RemovedPerson>> {
    let store = config.store();
    let mut book = store.load().await?;
    let removed = book.remove_person(args.trip(), args.person())?;
    store.save(&book).await?;
    let message = if removed.dropped_expenses.is_empty() {
        format!("Removed {}", removed.person.name())
    } else {
        format!(
            "Removed {} and deleted {}",
            removed.person.name(),
            plural(removed.dropped_expenses.len(), "expense", "expenses")
        )
    };
    Ok(Out::new(message, removed))
}

fn person_line(person: &Person) -> String {
    format!(
        "{} ({}): weight {}",
        person.name(),
        person.id(),
        person.weight().value()
    )
}
