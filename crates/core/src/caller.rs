//! Resolved caller identity.
//!
//! The surrounding shell authenticates and resolves roles; the ledger trusts
//! the result. The context is passed explicitly into every operation (no
//! process-wide "current user") and is used for audit attribution and logs.

use serde::{Deserialize, Serialize};

use crate::id::CustomerId;

/// Who is invoking a ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Caller {
    /// Back-office administrator.
    Admin,
    /// A storefront customer acting on their own account.
    Customer(CustomerId),
}

impl core::fmt::Display for Caller {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Caller::Admin => f.write_str("admin"),
            Caller::Customer(id) => write!(f, "customer:{id}"),
        }
    }
}
