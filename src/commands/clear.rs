use crate::backup::CLEAR;
use crate::commands::{plural, Out};
use crate::{Config, Result};
use tracing::info;

/// Deletes every trip. The current trip book is backed up first.
pub async fn clear(config: Config) -> Result<Out<()>> {
    let store = config.store();
    let mut book = store.load().await?;
    if book.is_empty() {
        return Ok("There are no trips to clear".into());
    }
    let backup_path = config.backup().save_json(CLEAR, &book).await?;
    info!("Backed up trips to {}", backup_path.display());

    let count = book.trips().len();
    book.clear();
    store.save(&book).await?;
    Ok(format!("Deleted {}", plural(count, "trip", "trips")).into())
}
