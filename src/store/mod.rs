//! Reads and writes the trip book JSON file.
//!
//! Everything read from disk passes through [`normalize`] before it becomes a `TripBook`, so the
//! rest of the program only ever sees well-formed people and expenses.

mod normalize;

use crate::model::TripBook;
use crate::{utils, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use normalize::normalize;

/// Loads and saves the `TripBook` at a fixed path.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the trip book. A missing file is an empty book.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is not a trip book.
    pub async fn load(&self) -> Result<TripBook> {
        if !self.path.exists() {
            debug!(
                "No state file at {}, starting with an empty trip book",
                self.path.display()
            );
            return Ok(TripBook::default());
        }
        let content = utils::read(&self.path).await?;
        let raw: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON file at {}", self.path.display()))?;
        normalize(&raw).with_context(|| format!("Invalid trip data in {}", self.path.display()))
    }

    /// Saves the trip book. The data is written to a sibling temporary file first and then moved
    /// into place so that a failed write never truncates the existing state.
    pub async fn save(&self, book: &TripBook) -> Result<()> {
        let json = serde_json::to_string_pretty(book).context("Unable to serialize trips")?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        utils::write(&tmp, json).await?;
        utils::rename(&tmp, &self.path).await?;
        debug!("Saved {} trip(s) to {}", book.trips().len(), self.path.display());
        Ok(())
    }
}
