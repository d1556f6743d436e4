//! Ledger error model.
//!
//! Business-rule failures are a closed taxonomy surfaced verbatim to callers;
//! infrastructure faults are a separate, unstructured category. Either way an
//! operation that fails leaves state untouched.

use thiserror::Error;
use uuid::Uuid;

use crate::id::{LocationId, NestId, ProductId};
use crate::kind::ProductKind;

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// What kind of record an unresolved reference pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Product,
    Location,
    Store,
    Warehouse,
    BreedingUnit,
    Customer,
    Employee,
    Carrier,
    Breeder,
    Vendor,
    Nest,
}

impl core::fmt::Display for RefKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            RefKind::Product => "product",
            RefKind::Location => "location",
            RefKind::Store => "store",
            RefKind::Warehouse => "warehouse",
            RefKind::BreedingUnit => "breeding unit",
            RefKind::Customer => "customer",
            RefKind::Employee => "employee",
            RefKind::Carrier => "carrier",
            RefKind::Breeder => "breeder",
            RefKind::Vendor => "vendor",
            RefKind::Nest => "nest",
        };
        f.write_str(name)
    }
}

/// A deterministic business-rule failure.
///
/// These are results, not faults: the ledger validated a command against
/// current state and rejected it. Callers render them verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    /// An identifier did not resolve to a record of the required kind.
    #[error("unknown {kind} reference: {id}")]
    UnknownReference { kind: RefKind, id: Uuid },

    /// A debit would drive an inventory line negative.
    #[error("insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: ProductId,
        requested: u64,
        available: u64,
    },

    /// The declared product type tag disagrees with the catalog.
    #[error("product {product} is {actual}, not {declared}")]
    TypeMismatch {
        product: ProductId,
        declared: ProductKind,
        actual: ProductKind,
    },

    /// A transfer named the same location as source and destination.
    #[error("transfer source and destination are the same location: {location}")]
    SameLocationTransfer { location: LocationId },

    /// The nest already holds its configured maximum of animals.
    #[error("nest {nest} is at capacity ({capacity})")]
    NestFull { nest: NestId, capacity: u32 },

    /// A payment would drive the debt balance negative.
    #[error("payment of {amount} exceeds outstanding balance {balance}")]
    Overpayment { amount: u64, balance: u64 },

    /// An amount or percentage was outside its valid range.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The product exists but is not the variant the operation requires.
    #[error("product {product} is not an animal")]
    InvalidProductType { product: ProductId },
}

impl RuleViolation {
    pub fn unknown(kind: RefKind, id: impl Into<Uuid>) -> Self {
        Self::UnknownReference {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }
}

/// Ledger-level error: a named business-rule failure or a system fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Business-rule rejection; state is unchanged.
    #[error(transparent)]
    Rule(#[from] RuleViolation),

    /// Storage unavailability or unexpected fault; state is unchanged.
    #[error("system failure: {0}")]
    System(String),
}

impl LedgerError {
    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// True for deterministic business-rule rejections (rendered as such by
    /// the calling shell, distinct from generic system errors).
    pub fn is_rule(&self) -> bool {
        matches!(self, LedgerError::Rule(_))
    }
}
