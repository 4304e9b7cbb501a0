use crate::args::{NameArgs, TripRefArgs, TripRenameArgs, TripScopeArgs};
use crate::backup::{TRIP_DELETE, TRIP_RESET};
use crate::commands::{plural, Out};
use crate::model::{TripId, TripSummary};
use crate::{Config, Result};
use tracing::info;

/// Creates a trip and makes it the active trip.
pub async fn trip_add(config: Config, args: NameArgs) -> Result<Out<TripSummary>> {
    let store = config.store();
    let mut book = store.load().await?;
    let summary = book.create_trip(args.name())?.summary();
    store.save(&book).await?;
    Ok(Out::new(
        format!("Created trip '{}' ({})", summary.name, summary.id),
        summary,
    ))
}

/// Lists every trip, marking the active one with `*`.
pub async fn trip_list(config: Config) -> Result<Out<Vec<TripSummary>>> {
    let book = config.store().load().await?;
    if book.is_empty() {
        return Ok("No trips yet, create one with 'trip trip add <NAME>'".into());
    }
    let summaries: Vec<TripSummary> = book.trips().iter().map(|trip| trip.summary()).collect();
    let lines: Vec<String> = summaries
        .iter()
        .map(|summary| trip_line(summary, book.active_trip_id()))
        .collect();
    Ok(Out::new(lines.join("\n"), summaries))
}

pub async fn trip_select(config: Config, args: TripRefArgs) -> Result<Out<TripSummary>> {
    let store = config.store();
    let mut book = store.load().await?;
    let summary = book.select_trip(args.trip())?.summary();
    store.save(&book).await?;
    Ok(Out::new(
        format!("Selected trip '{}' ({})", summary.name, summary.id),
        summary,
    ))
}

pub async fn trip_rename(config: Config, args: TripRenameArgs) -> Result<Out<TripSummary>> {
    let store = config.store();
    let mut book = store.load().await?;
    let summary = book.rename_trip(args.trip(), args.name())?.summary();
    store.save(&book).await?;
    Ok(Out::new(
        format!("Renamed trip {} to '{}'", summary.id, summary.name),
        summary,
    ))
}

/// Deletes a trip after backing up the whole trip book.
pub async fn trip_delete(config: Config, args: TripRefArgs) -> Result<Out<TripSummary>> {
    let store = config.store();
    let mut book = store.load().await?;
    // resolve before backing up so that a bad reference leaves no backup behind
    book.trip(Some(args.trip()))?;
    let backup_path = config.backup().save_json(TRIP_DELETE, &book).await?;
    info!("Backed up trips to {}", backup_path.display());

    let summary = book.delete_trip(args.trip())?.summary();
    store.save(&book).await?;
    Ok(Out::new(
        format!(
            "Deleted trip '{}' with {} and {}",
            summary.name,
            plural(summary.people, "person", "people"),
            plural(summary.expenses, "expense", "expenses")
        ),
        summary,
    ))
}

/// Deletes every expense in a trip after backing up the whole trip book.
pub async fn trip_reset(config: Config, args: TripScopeArgs) -> Result<Out<TripSummary>> {
    let store = config.store();
    let mut book = store.load().await?;
    let trip = book.trip(args.trip())?;
    anyhow::ensure!(
        !trip.expenses().is_empty(),
        "Trip '{}' has no expenses to clear",
        trip.name()
    );
    let backup_path = config.backup().save_json(TRIP_RESET, &book).await?;
    info!("Backed up trips to {}", backup_path.display());

    let removed = book.reset_trip(args.trip())?;
    let summary = book.trip(args.trip())?.summary();
    store.save(&book).await?;
    Ok(Out::new(
        format!(
            "Cleared {} from trip '{}'",
            plural(removed.len(), "expense", "expenses"),
            summary.name
        ),
        summary,
    ))
}

fn trip_line(summary: &TripSummary, active: Option<&TripId>) -> String {
    let marker = if active == Some(&summary.id) { "*" } else { " " };
    format!(
        "{marker} {} ({}): {}, {}",
        summary.name,
        summary.id,
        plural(summary.people, "person", "people"),
        plural(summary.expenses, "expense", "expenses")
    )
}
