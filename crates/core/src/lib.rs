//! `aviary-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the business-rule error taxonomy, the optimistic version
//! expectation and the caller context.

pub mod caller;
pub mod entity;
pub mod error;
pub mod id;
pub mod kind;
pub mod version;

pub use caller::Caller;
pub use entity::Entity;
pub use error::{LedgerError, LedgerResult, RefKind, RuleViolation};
pub use id::{
    CustomerId, EmployeeId, IdParseError, LocationId, NestId, OrderId, PaymentId, ProductId,
    SupplyId, TransferId, VendorId,
};
pub use kind::ProductKind;
pub use version::ExpectedVersion;
