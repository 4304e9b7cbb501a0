//! The balance and settlement engine.
//!
//! Everything here is a pure function of its arguments: expenses are split into shares by
//! [`allocate`], folded into per-person [`Balances`] by [`compute_balances`], and reduced to a
//! list of [`Settlement`] transfers by [`settle`]. Nothing is cached between calls, so balances
//! are always derived from the complete expense history.

mod allocate;
mod ledger;
mod settle;

pub use allocate::{allocate, Shares};
pub use ledger::{compute_balances, Balances};
pub use settle::{settle, Settlement, TOLERANCE};
