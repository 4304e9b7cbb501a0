use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, its backups subdirectory and:
/// - Creates an initial `config.json` file with default settings
/// - Creates an empty trip state file if one does not already exist
///
/// # Arguments
/// - `trip_home` - The directory that will be the root of the home directory, e.g.
///   `$HOME/trip-ledger`
///
/// # Errors
/// - Returns an error if any file operations fail or if the directory was already initialized.
pub async fn init(trip_home: &Path) -> Result<Out<()>> {
    let config = Config::create(trip_home)
        .await
        .context("Unable to create the home directory and config")?;
    Ok(format!(
        "Successfully created the trip-ledger directory at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("trips");
        let out = init(&home).await.unwrap();
        assert!(out.message().contains("Successfully created"));
        assert!(home.join("config.json").is_file());
        assert!(home.join("trips.json").is_file());

        let config = Config::load(&home).await.unwrap();
        assert!(config.store().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_twice_fails() {
        let dir = TempDir::new().unwrap();
        init(dir.path()).await.unwrap();
        assert!(init(dir.path()).await.is_err());
    }
}
