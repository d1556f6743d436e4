//! Command inputs, one per ledger operation.
//!
//! Fixed input shapes at the core boundary; the calling shell builds these
//! from whatever transport it speaks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use aviary_catalog::{Gender, HealthStatus};
use aviary_core::{
    CustomerId, EmployeeId, LocationId, NestId, ProductId, ProductKind, VendorId,
};

/// One requested order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub product: ProductId,
    pub quantity: u64,
}

/// Place an order at a store, decrementing stock and charging the customer's
/// debt account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub customer: CustomerId,
    pub store: LocationId,
    pub lines: Vec<OrderLineInput>,
    /// Amount paid at creation, in smallest currency unit. Zero when unpaid.
    pub paid: u64,
}

/// Move stock between two locations via a carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStock {
    pub source: LocationId,
    pub destination: LocationId,
    pub carrier: EmployeeId,
    /// Declared type tag; must match the catalog or the transfer is rejected.
    pub kind: ProductKind,
    pub product: ProductId,
    pub quantity: u64,
}

/// Receive vendor stock into a warehouse. Purely additive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveSupply {
    pub vendor: VendorId,
    pub warehouse: LocationId,
    pub product: ProductId,
    pub quantity: u64,
    /// Unit-of-measure / packaging note, advisory only.
    pub pack_size: String,
}

/// Settle part or all of a customer's outstanding debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakePayment {
    pub customer: CustomerId,
    pub amount: u64,
}

/// Open a new breeding nest in a breeding unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddNest {
    pub unit: LocationId,
    pub breeder: EmployeeId,
    pub species: String,
}

/// Register a newborn animal into a nest, creating the product and its
/// single-unit inventory line at the nest's breeding unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterAnimal {
    pub species: String,
    pub breed: Option<String>,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub nest: NestId,
    /// Standard price in smallest currency unit.
    pub price: u64,
}

/// Overwrite an animal's health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateHealth {
    pub animal: ProductId,
    pub status: HealthStatus,
}

/// Adjust an employee's salary by a percentage (> -100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncreaseSalary {
    pub employee: EmployeeId,
    pub percent: f64,
}

/// Reassign an employee to an existing location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignLocation {
    pub employee: EmployeeId,
    pub location: LocationId,
}
