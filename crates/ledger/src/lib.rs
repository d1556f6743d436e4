//! Transaction engine for the aviary commerce ledger.
//!
//! Orders, transfers, supplies, payments, breeding and HR adjustments run
//! through [`LedgerEngine`], which validates each command against catalog and
//! party reference data and applies its inventory and debt writes atomically.

mod books;

pub mod commands;
pub mod config;
pub mod engine;
pub mod receipts;
pub mod records;

pub use commands::{
    AddNest, AssignLocation, IncreaseSalary, MakePayment, OrderLineInput, PlaceOrder,
    ReceiveSupply, RegisterAnimal, TransferStock, UpdateHealth,
};
pub use config::LedgerConfig;
pub use engine::LedgerEngine;
pub use receipts::{
    AnimalReceipt, NestReceipt, OrderReceipt, PaymentReceipt, SupplyReceipt, TransferReceipt,
};
pub use records::{Order, OrderLine, Payment, Supply, Transfer, TransferLine};
