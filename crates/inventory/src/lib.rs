//! Inventory domain module.
//!
//! This crate contains the per-(location, product) inventory line with its
//! non-negativity rule, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage). The ledger crate owns the versioned book
//! that stores these lines.

pub mod line;

pub use line::{InventoryLine, LineKey};
