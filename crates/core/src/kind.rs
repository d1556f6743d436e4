//! Product type tag shared across crates.
//!
//! Animals and goods move through deliberately separate lookup paths; the tag
//! is what callers declare and what the ledger checks against the catalog.

use serde::{Deserialize, Serialize};

/// Type tag of a product: live animal or packaged goods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Animal,
    Goods,
}

impl core::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProductKind::Animal => f.write_str("animal"),
            ProductKind::Goods => f.write_str("goods"),
        }
    }
}
