//! Immutable records written by the ledger engine.
//!
//! Once committed these never change; payment application against an order
//! is tracked on the debt account, not by editing the order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aviary_core::{
    Caller, CustomerId, EmployeeId, LocationId, OrderId, PaymentId, ProductId, SupplyId,
    TransferId, VendorId,
};

/// Order line with the unit price snapshotted at placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: ProductId,
    pub quantity: u64,
    pub unit_price: u64,
    pub line_total: u64,
}

/// A placed customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: CustomerId,
    pub store: LocationId,
    pub placed_at: DateTime<Utc>,
    pub placed_by: Caller,
    pub paid_at_creation: u64,
    pub lines: Vec<OrderLine>,
    /// Sum of line totals.
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLine {
    pub product: ProductId,
    pub quantity: u64,
}

/// A completed stock movement between two locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    pub source: LocationId,
    pub destination: LocationId,
    pub carrier: EmployeeId,
    pub moved_at: DateTime<Utc>,
    pub lines: Vec<TransferLine>,
}

/// A received vendor supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supply {
    pub id: SupplyId,
    pub vendor: VendorId,
    pub warehouse: LocationId,
    pub product: ProductId,
    pub quantity: u64,
    pub pack_size: String,
    pub received_at: DateTime<Utc>,
}

/// A debt settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub customer: CustomerId,
    pub amount: u64,
    pub paid_at: DateTime<Utc>,
}
