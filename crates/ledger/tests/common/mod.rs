//! Shared world setup for ledger integration tests: one store, one
//! warehouse, one breeding unit, a staffed crew and a goods product.

use std::sync::Arc;

use chrono::NaiveDate;

use aviary_catalog::{CatalogStore, GoodsDetails, Location, LocationKind, Product};
use aviary_core::{
    Caller, CustomerId, EmployeeId, LedgerError, LocationId, ProductId, ProductKind,
    RuleViolation, VendorId,
};
use aviary_ledger::{LedgerConfig, LedgerEngine, OrderLineInput, ReceiveSupply, TransferStock};
use aviary_parties::{Customer, Employee, EmployeeRole, PartyStore, Vendor};

pub struct World {
    pub engine: LedgerEngine,
    pub store: LocationId,
    pub warehouse: LocationId,
    pub unit: LocationId,
    pub customer: CustomerId,
    pub carrier: EmployeeId,
    pub breeder: EmployeeId,
    pub clerk: EmployeeId,
    pub vendor: VendorId,
    /// Goods product priced at 900.
    pub seed_mix: ProductId,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        aviary_observability::init();

        let catalog = Arc::new(CatalogStore::new());
        let parties = Arc::new(PartyStore::new());

        let store = catalog
            .add_location(Location::new(
                LocationId::new(),
                LocationKind::Store,
                "harbor street store",
            ))
            .unwrap();
        let warehouse = catalog
            .add_location(Location::new(
                LocationId::new(),
                LocationKind::Warehouse,
                "central warehouse",
            ))
            .unwrap();
        let unit = catalog
            .add_location(Location::new(
                LocationId::new(),
                LocationKind::BreedingUnit,
                "breeding unit a",
            ))
            .unwrap();

        let customer = parties
            .add_customer(Customer::new(CustomerId::new(), "Deniz", "Aksoy"))
            .unwrap();
        let carrier = parties
            .add_employee(Employee::new(
                EmployeeId::new(),
                "Kerem",
                "Yilmaz",
                EmployeeRole::Carrier,
                80_000,
                warehouse,
            ))
            .unwrap();
        let breeder = parties
            .add_employee(Employee::new(
                EmployeeId::new(),
                "Mina",
                "Aydin",
                EmployeeRole::Breeder,
                90_000,
                unit,
            ))
            .unwrap();
        let clerk = parties
            .add_employee(Employee::new(
                EmployeeId::new(),
                "Ada",
                "Martin",
                EmployeeRole::Clerk,
                70_000,
                store,
            ))
            .unwrap();
        let vendor = parties
            .add_vendor(Vendor::new(VendorId::new(), "Seed & Feather Co"))
            .unwrap();

        let seed_mix = catalog
            .add_product(Product::goods(
                ProductId::new(),
                900,
                GoodsDetails {
                    category: "seed mix".into(),
                    size: "400g".into(),
                    material: "mixed grain".into(),
                    expires_on: NaiveDate::from_ymd_opt(2027, 1, 1),
                },
            ))
            .unwrap();

        let engine = LedgerEngine::with_config(config, catalog, parties);
        Self {
            engine,
            store,
            warehouse,
            unit,
            customer,
            carrier,
            breeder,
            clerk,
            vendor,
            seed_mix,
        }
    }

    /// Receive seed mix from the vendor into the warehouse, then truck it to
    /// the store. This is the only way stock reaches a store shelf.
    pub fn stock_store(&self, quantity: u64) {
        self.engine
            .receive_supply(
                Caller::Admin,
                ReceiveSupply {
                    vendor: self.vendor,
                    warehouse: self.warehouse,
                    product: self.seed_mix,
                    quantity,
                    pack_size: "400g bag".into(),
                },
            )
            .unwrap();
        self.engine
            .transfer_stock(
                Caller::Admin,
                TransferStock {
                    source: self.warehouse,
                    destination: self.store,
                    carrier: self.carrier,
                    kind: ProductKind::Goods,
                    product: self.seed_mix,
                    quantity,
                },
            )
            .unwrap();
    }

    /// Add a second goods product to the catalog (no stock anywhere).
    pub fn add_goods(&self, price: u64) -> ProductId {
        self.engine
            .catalog()
            .add_product(Product::goods(
                ProductId::new(),
                price,
                GoodsDetails {
                    category: "perch".into(),
                    size: "20cm".into(),
                    material: "wood".into(),
                    expires_on: None,
                },
            ))
            .unwrap()
    }

    pub fn line(&self, quantity: u64) -> Vec<OrderLineInput> {
        vec![OrderLineInput {
            product: self.seed_mix,
            quantity,
        }]
    }
}

/// Unwrap a business-rule rejection, panicking on system errors.
pub fn rule(err: LedgerError) -> RuleViolation {
    match err {
        LedgerError::Rule(violation) => violation,
        LedgerError::System(msg) => panic!("expected rule violation, got system error: {msg}"),
    }
}
