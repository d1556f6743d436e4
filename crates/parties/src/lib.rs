//! Parties domain module: customers, employees, vendors and the customer
//! debt account.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod customer;
pub mod debt;
pub mod employee;
pub mod store;
pub mod vendor;

pub use customer::Customer;
pub use debt::DebtAccount;
pub use employee::{Employee, EmployeeRole};
pub use store::PartyStore;
pub use vendor::Vendor;
