//! trip-ledger: split shared trip expenses and work out who owes whom.
//!
//! The [`engine`] module holds the money arithmetic. It turns expenses into integer-cent shares,
//! folds them into per-person balances and reduces those balances to a list of payments. Everything
//! else loads and saves trips, validates what people type and drives the `trip` CLI.

pub mod args;
mod backup;
pub mod commands;
mod config;
pub mod engine;
mod error;
pub mod model;
mod store;
mod utils;


pub use config::Config;
pub use engine::{allocate, compute_balances, settle, Balances, Settlement, Shares};
pub use error::Error;
pub use error::Result;
pub use store::{normalize, Store};
