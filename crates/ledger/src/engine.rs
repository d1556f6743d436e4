//! The ledger engine: atomic, validated state transitions over shared
//! inventory and debt state.
//!
//! The engine is the sole writer of inventory lines, debt balances and the
//! order/transfer/supply/payment records. Every operation validates its
//! preconditions against a snapshot of the rows it touches, then commits all
//! row writes as one unit through the versioned books; a version conflict
//! sends the operation back to revalidation, so no lost updates and no
//! partial application under concurrent load.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use aviary_catalog::{
    AnimalDetails, CatalogStore, HealthStatus, Location, LocationKind, Nest, Product,
};
use aviary_core::{
    Caller, CustomerId, EmployeeId, ExpectedVersion, LedgerError, LedgerResult, LocationId,
    NestId, OrderId, PaymentId, ProductId, RefKind, RuleViolation, SupplyId, TransferId,
};
use aviary_inventory::LineKey;
use aviary_parties::{DebtAccount, Employee, EmployeeRole, PartyStore};

use crate::books::{
    Books, CommitError, DebtMutation, DebtWrite, StockMutation, StockWrite, WriteBatch,
};
use crate::commands::{
    AddNest, AssignLocation, IncreaseSalary, MakePayment, PlaceOrder, ReceiveSupply,
    RegisterAnimal, TransferStock, UpdateHealth,
};
use crate::config::LedgerConfig;
use crate::receipts::{
    AnimalReceipt, NestReceipt, OrderReceipt, PaymentReceipt, SupplyReceipt, TransferReceipt,
};
use crate::records::{Order, OrderLine, Payment, Supply, Transfer, TransferLine};

/// Outcome of one optimistic attempt: committed, or a version conflict that
/// requires revalidating from scratch.
enum Attempt<T> {
    Done(T),
    Retry,
}

/// Executes the ledger's mutating business transactions.
pub struct LedgerEngine {
    config: LedgerConfig,
    catalog: Arc<CatalogStore>,
    parties: Arc<PartyStore>,
    books: Books,
    orders: RwLock<HashMap<OrderId, Order>>,
    transfers: RwLock<HashMap<TransferId, Transfer>>,
    supplies: RwLock<HashMap<SupplyId, Supply>>,
    payments: RwLock<HashMap<PaymentId, Payment>>,
}

impl LedgerEngine {
    pub fn new(catalog: Arc<CatalogStore>, parties: Arc<PartyStore>) -> Self {
        Self::with_config(LedgerConfig::default(), catalog, parties)
    }

    pub fn with_config(
        config: LedgerConfig,
        catalog: Arc<CatalogStore>,
        parties: Arc<PartyStore>,
    ) -> Self {
        Self {
            config,
            catalog,
            parties,
            books: Books::new(),
            orders: RwLock::new(HashMap::new()),
            transfers: RwLock::new(HashMap::new()),
            supplies: RwLock::new(HashMap::new()),
            payments: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn parties(&self) -> &PartyStore {
        &self.parties
    }

    // ---- order placement -----------------------------------------------

    /// Place an order: debit every line's stock at the store, snapshot unit
    /// prices, charge the customer's debt account and apply the initial
    /// payment, all as one atomic unit.
    pub fn place_order(&self, caller: Caller, cmd: PlaceOrder) -> LedgerResult<OrderReceipt> {
        if cmd.lines.is_empty() {
            return Err(RuleViolation::invalid_amount("order requires at least one line").into());
        }
        if self.parties.customer(cmd.customer)?.is_none() {
            return Err(RuleViolation::unknown(RefKind::Customer, cmd.customer).into());
        }
        self.location_of_kind(cmd.store, LocationKind::Store, RefKind::Store)?;

        // Coalesce duplicate products so a batch never writes one row twice.
        let mut wanted: Vec<(ProductId, u64)> = Vec::new();
        for line in &cmd.lines {
            if line.quantity == 0 {
                return Err(
                    RuleViolation::invalid_amount("order line quantity must be positive").into(),
                );
            }
            match wanted.iter_mut().find(|(product, _)| *product == line.product) {
                Some((_, quantity)) => {
                    *quantity = quantity.checked_add(line.quantity).ok_or_else(|| {
                        LedgerError::from(RuleViolation::invalid_amount("order quantity overflow"))
                    })?;
                }
                None => wanted.push((line.product, line.quantity)),
            }
        }

        // Unit prices are snapshotted here; later catalog price changes do
        // not reprice the order.
        let mut lines = Vec::with_capacity(wanted.len());
        let mut total: u64 = 0;
        for (product_id, quantity) in wanted {
            let product = self.product(product_id)?;
            let line_total = product
                .price()
                .checked_mul(quantity)
                .ok_or_else(|| {
                    LedgerError::from(RuleViolation::invalid_amount("order total overflow"))
                })?;
            total = total.checked_add(line_total).ok_or_else(|| {
                LedgerError::from(RuleViolation::invalid_amount("order total overflow"))
            })?;
            lines.push(OrderLine {
                product: product_id,
                quantity,
                unit_price: product.price(),
                line_total,
            });
        }

        self.with_retries("place_order", || {
            let mut batch = WriteBatch::default();
            for line in &lines {
                let key = LineKey::new(cmd.store, line.product);
                let Some(mut snapshot) = self.books.stock_line(&key)? else {
                    return Err(RuleViolation::InsufficientStock {
                        product: line.product,
                        requested: line.quantity,
                        available: 0,
                    }
                    .into());
                };
                let expected = ExpectedVersion::Exact(snapshot.version());
                snapshot.debit(line.quantity, line.product)?;
                batch.stock.push(StockWrite {
                    key,
                    expected,
                    mutation: StockMutation::Debit(line.quantity),
                });
            }

            let (expected, mut debt_snapshot) = match self.books.debt_account(cmd.customer)? {
                Some(account) => (ExpectedVersion::Exact(account.version()), account),
                None => (ExpectedVersion::Absent, DebtAccount::default()),
            };
            debt_snapshot.charge(total, cmd.paid)?;
            batch.debt = Some(DebtWrite {
                customer: cmd.customer,
                expected,
                mutation: DebtMutation::Charge {
                    total,
                    paid: cmd.paid,
                },
            });

            match self.books.commit(&batch) {
                Ok(()) => {
                    let order = Order {
                        id: OrderId::new(),
                        customer: cmd.customer,
                        store: cmd.store,
                        placed_at: Utc::now(),
                        placed_by: caller,
                        paid_at_creation: cmd.paid,
                        lines: lines.clone(),
                        total,
                    };
                    let order_id = order.id;
                    self.record_order(order)?;
                    tracing::info!(%caller, %order_id, total, "order placed");
                    Ok(Attempt::Done(OrderReceipt { order_id, total }))
                }
                Err(CommitError::Conflict) => Ok(Attempt::Retry),
                Err(CommitError::Poisoned) => Err(LedgerError::system("books lock poisoned")),
            }
        })
    }

    // ---- stock transfer ------------------------------------------------

    /// Move stock between two locations. Debits the source line and credits
    /// (or creates) the destination line atomically.
    pub fn transfer_stock(
        &self,
        caller: Caller,
        cmd: TransferStock,
    ) -> LedgerResult<TransferReceipt> {
        if cmd.source == cmd.destination {
            return Err(RuleViolation::SameLocationTransfer {
                location: cmd.source,
            }
            .into());
        }
        if cmd.quantity == 0 {
            return Err(
                RuleViolation::invalid_amount("transfer quantity must be positive").into(),
            );
        }
        self.any_location(cmd.source)?;
        self.any_location(cmd.destination)?;
        self.employee_in_role(cmd.carrier, EmployeeRole::Carrier, RefKind::Carrier)?;

        // Animals and goods go through disjoint lookup paths in the calling
        // shell; the declared tag must agree with the catalog, never coerced.
        let product = self.product(cmd.product)?;
        if product.kind() != cmd.kind {
            return Err(RuleViolation::TypeMismatch {
                product: cmd.product,
                declared: cmd.kind,
                actual: product.kind(),
            }
            .into());
        }

        self.with_retries("transfer_stock", || {
            let source_key = LineKey::new(cmd.source, cmd.product);
            let Some(mut source_line) = self.books.stock_line(&source_key)? else {
                return Err(RuleViolation::InsufficientStock {
                    product: cmd.product,
                    requested: cmd.quantity,
                    available: 0,
                }
                .into());
            };
            let source_expected = ExpectedVersion::Exact(source_line.version());
            source_line.debit(cmd.quantity, cmd.product)?;

            let destination_key = LineKey::new(cmd.destination, cmd.product);
            let destination_expected = match self.books.stock_line(&destination_key)? {
                Some(line) => ExpectedVersion::Exact(line.version()),
                None => ExpectedVersion::Absent,
            };

            let batch = WriteBatch {
                stock: vec![
                    StockWrite {
                        key: source_key,
                        expected: source_expected,
                        mutation: StockMutation::Debit(cmd.quantity),
                    },
                    StockWrite {
                        key: destination_key,
                        expected: destination_expected,
                        mutation: StockMutation::Credit(cmd.quantity),
                    },
                ],
                debt: None,
            };
            match self.books.commit(&batch) {
                Ok(()) => {
                    let transfer = Transfer {
                        id: TransferId::new(),
                        source: cmd.source,
                        destination: cmd.destination,
                        carrier: cmd.carrier,
                        moved_at: Utc::now(),
                        lines: vec![TransferLine {
                            product: cmd.product,
                            quantity: cmd.quantity,
                        }],
                    };
                    let transfer_id = transfer.id;
                    self.record_transfer(transfer)?;
                    tracing::info!(%caller, %transfer_id, quantity = cmd.quantity, "stock transferred");
                    Ok(Attempt::Done(TransferReceipt { transfer_id }))
                }
                Err(CommitError::Conflict) => Ok(Attempt::Retry),
                Err(CommitError::Poisoned) => Err(LedgerError::system("books lock poisoned")),
            }
        })
    }

    // ---- supply receipt ------------------------------------------------

    /// Receive vendor stock into a warehouse. The only purely additive path:
    /// no stock-sufficiency check.
    pub fn receive_supply(&self, caller: Caller, cmd: ReceiveSupply) -> LedgerResult<SupplyReceipt> {
        if self.parties.vendor(cmd.vendor)?.is_none() {
            return Err(RuleViolation::unknown(RefKind::Vendor, cmd.vendor).into());
        }
        self.location_of_kind(cmd.warehouse, LocationKind::Warehouse, RefKind::Warehouse)?;
        self.product(cmd.product)?;

        self.with_retries("receive_supply", || {
            let key = LineKey::new(cmd.warehouse, cmd.product);
            let expected = match self.books.stock_line(&key)? {
                Some(line) => ExpectedVersion::Exact(line.version()),
                None => ExpectedVersion::Absent,
            };
            let batch = WriteBatch {
                stock: vec![StockWrite {
                    key,
                    expected,
                    mutation: StockMutation::Credit(cmd.quantity),
                }],
                debt: None,
            };
            match self.books.commit(&batch) {
                Ok(()) => {
                    let supply = Supply {
                        id: SupplyId::new(),
                        vendor: cmd.vendor,
                        warehouse: cmd.warehouse,
                        product: cmd.product,
                        quantity: cmd.quantity,
                        pack_size: cmd.pack_size.clone(),
                        received_at: Utc::now(),
                    };
                    let supply_id = supply.id;
                    self.record_supply(supply)?;
                    tracing::info!(%caller, %supply_id, quantity = cmd.quantity, "supply received");
                    Ok(Attempt::Done(SupplyReceipt { supply_id }))
                }
                Err(CommitError::Conflict) => Ok(Attempt::Retry),
                Err(CommitError::Poisoned) => Err(LedgerError::system("books lock poisoned")),
            }
        })
    }

    // ---- breeding ------------------------------------------------------

    /// Open a new nest in a breeding unit, managed by a breeder.
    pub fn add_nest(&self, caller: Caller, cmd: AddNest) -> LedgerResult<NestReceipt> {
        let unit = self.location_of_kind(cmd.unit, LocationKind::BreedingUnit, RefKind::BreedingUnit)?;
        self.employee_in_role(cmd.breeder, EmployeeRole::Breeder, RefKind::Breeder)?;

        let nest = Nest::new(NestId::new(), cmd.species, Some(cmd.breeder), unit.id_typed());
        let nest_id = self.catalog.add_nest(nest)?;
        tracing::info!(%caller, %nest_id, "nest opened");
        Ok(NestReceipt { nest_id })
    }

    /// Register a newborn animal: new Animal product (health defaults to
    /// healthy), assigned to the nest, with a quantity-1 inventory line at
    /// the nest's breeding unit.
    pub fn register_animal(&self, caller: Caller, cmd: RegisterAnimal) -> LedgerResult<AnimalReceipt> {
        let nest = self
            .catalog
            .nest(cmd.nest)?
            .ok_or_else(|| LedgerError::from(RuleViolation::unknown(RefKind::Nest, cmd.nest)))?;

        let product_id = ProductId::new();
        let capacity = self.config.nest_capacity;
        // Capacity check and admission run under the nest lock, so two
        // concurrent registrations cannot both take the last slot.
        match self
            .catalog
            .with_nest_mut(cmd.nest, |nest| nest.admit(product_id, capacity))?
        {
            None => return Err(RuleViolation::unknown(RefKind::Nest, cmd.nest).into()),
            Some(Err(violation)) => return Err(violation.into()),
            Some(Ok(())) => {}
        }

        let details = AnimalDetails {
            species: cmd.species,
            breed: cmd.breed,
            gender: cmd.gender,
            birth_date: cmd.birth_date,
            health: HealthStatus::default(),
            nest: Some(cmd.nest),
        };
        self.catalog
            .add_product(Product::animal(product_id, cmd.price, details))?;

        let batch = WriteBatch {
            stock: vec![StockWrite {
                key: LineKey::new(nest.unit(), product_id),
                expected: ExpectedVersion::Absent,
                mutation: StockMutation::Credit(1),
            }],
            debt: None,
        };
        match self.books.commit(&batch) {
            Ok(()) => {
                tracing::info!(%caller, %product_id, nest = %cmd.nest, "animal registered");
                Ok(AnimalReceipt { product_id })
            }
            Err(CommitError::Conflict) => Err(LedgerError::system(
                "inventory line for a freshly issued product id already existed",
            )),
            Err(CommitError::Poisoned) => Err(LedgerError::system("books lock poisoned")),
        }
    }

    /// Overwrite an animal's health status. No stock effect.
    pub fn update_health(&self, caller: Caller, cmd: UpdateHealth) -> LedgerResult<()> {
        match self
            .catalog
            .with_product_mut(cmd.animal, |product| product.update_health(cmd.status))?
        {
            None => Err(RuleViolation::unknown(RefKind::Product, cmd.animal).into()),
            Some(Err(violation)) => Err(violation.into()),
            Some(Ok(())) => {
                tracing::info!(%caller, animal = %cmd.animal, status = ?cmd.status, "health updated");
                Ok(())
            }
        }
    }

    // ---- payment --------------------------------------------------------

    /// Settle part or all of a customer's outstanding debt. Overpayment is
    /// rejected, not clamped.
    pub fn make_payment(&self, caller: Caller, cmd: MakePayment) -> LedgerResult<PaymentReceipt> {
        if cmd.amount == 0 {
            return Err(RuleViolation::invalid_amount("payment amount must be positive").into());
        }
        if self.parties.customer(cmd.customer)?.is_none() {
            return Err(RuleViolation::unknown(RefKind::Customer, cmd.customer).into());
        }

        self.with_retries("make_payment", || {
            let (expected, mut snapshot) = match self.books.debt_account(cmd.customer)? {
                Some(account) => (ExpectedVersion::Exact(account.version()), account),
                None => (ExpectedVersion::Absent, DebtAccount::default()),
            };
            snapshot.settle(cmd.amount)?;

            let batch = WriteBatch {
                stock: Vec::new(),
                debt: Some(DebtWrite {
                    customer: cmd.customer,
                    expected,
                    mutation: DebtMutation::Settle(cmd.amount),
                }),
            };
            match self.books.commit(&batch) {
                Ok(()) => {
                    let payment = Payment {
                        id: PaymentId::new(),
                        customer: cmd.customer,
                        amount: cmd.amount,
                        paid_at: Utc::now(),
                    };
                    let payment_id = payment.id;
                    self.record_payment(payment)?;
                    tracing::info!(%caller, %payment_id, amount = cmd.amount, "payment recorded");
                    Ok(Attempt::Done(PaymentReceipt {
                        payment_id,
                        balance: snapshot.balance(),
                    }))
                }
                Err(CommitError::Conflict) => Ok(Attempt::Retry),
                Err(CommitError::Poisoned) => Err(LedgerError::system("books lock poisoned")),
            }
        })
    }

    // ---- HR adjustments --------------------------------------------------

    /// Adjust an employee's salary by a percentage. Returns the new salary.
    pub fn increase_salary(&self, caller: Caller, cmd: IncreaseSalary) -> LedgerResult<u64> {
        match self
            .parties
            .with_employee_mut(cmd.employee, |employee| employee.increase_salary(cmd.percent))?
        {
            None => Err(RuleViolation::unknown(RefKind::Employee, cmd.employee).into()),
            Some(Err(violation)) => Err(violation.into()),
            Some(Ok(salary)) => {
                tracing::info!(%caller, employee = %cmd.employee, salary, "salary adjusted");
                Ok(salary)
            }
        }
    }

    /// Reassign an employee to an existing location.
    pub fn assign_location(&self, caller: Caller, cmd: AssignLocation) -> LedgerResult<()> {
        self.any_location(cmd.location)?;
        match self
            .parties
            .with_employee_mut(cmd.employee, |employee| employee.assign_to(cmd.location))?
        {
            None => Err(RuleViolation::unknown(RefKind::Employee, cmd.employee).into()),
            Some(()) => {
                tracing::info!(%caller, employee = %cmd.employee, location = %cmd.location, "employee reassigned");
                Ok(())
            }
        }
    }

    // ---- read path -----------------------------------------------------------

    /// Current quantity of one product at one location (0 when no line).
    pub fn stock_level(&self, location: LocationId, product: ProductId) -> LedgerResult<u64> {
        Ok(self
            .books
            .stock_line(&LineKey::new(location, product))?
            .map(|line| line.quantity())
            .unwrap_or(0))
    }

    /// Every product with stock at one location.
    pub fn location_stock(&self, location: LocationId) -> LedgerResult<Vec<(ProductId, u64)>> {
        self.books.location_stock(location)
    }

    /// Current debt balance of a customer (0 when no account).
    pub fn debt_balance(&self, customer: CustomerId) -> LedgerResult<u64> {
        Ok(self
            .books
            .debt_account(customer)?
            .map(|account| account.balance())
            .unwrap_or(0))
    }

    pub fn order(&self, id: OrderId) -> LedgerResult<Option<Order>> {
        let orders = self
            .orders
            .read()
            .map_err(|_| LedgerError::system("order records lock poisoned"))?;
        Ok(orders.get(&id).cloned())
    }

    pub fn transfer(&self, id: TransferId) -> LedgerResult<Option<Transfer>> {
        let transfers = self
            .transfers
            .read()
            .map_err(|_| LedgerError::system("transfer records lock poisoned"))?;
        Ok(transfers.get(&id).cloned())
    }

    pub fn supply(&self, id: SupplyId) -> LedgerResult<Option<Supply>> {
        let supplies = self
            .supplies
            .read()
            .map_err(|_| LedgerError::system("supply records lock poisoned"))?;
        Ok(supplies.get(&id).cloned())
    }

    pub fn payment(&self, id: PaymentId) -> LedgerResult<Option<Payment>> {
        let payments = self
            .payments
            .read()
            .map_err(|_| LedgerError::system("payment records lock poisoned"))?;
        Ok(payments.get(&id).cloned())
    }

    // ---- internals -------------------------------------------------------------

    fn with_retries<T>(
        &self,
        op: &'static str,
        mut attempt: impl FnMut() -> LedgerResult<Attempt<T>>,
    ) -> LedgerResult<T> {
        for _ in 0..self.config.max_commit_retries {
            match attempt()? {
                Attempt::Done(value) => return Ok(value),
                Attempt::Retry => tracing::debug!("{op}: commit conflict, revalidating"),
            }
        }
        Err(LedgerError::system(format!(
            "{op}: commit contention exceeded {} attempts",
            self.config.max_commit_retries
        )))
    }

    /// Resolve a location that must be of one kind; anything else fails as an
    /// unresolved reference of that kind (disjoint lookup, never coerced).
    fn location_of_kind(
        &self,
        id: LocationId,
        kind: LocationKind,
        as_kind: RefKind,
    ) -> LedgerResult<Location> {
        match self.catalog.location(id)? {
            Some(location) if location.kind() == kind => Ok(location),
            _ => Err(RuleViolation::unknown(as_kind, id).into()),
        }
    }

    fn any_location(&self, id: LocationId) -> LedgerResult<Location> {
        self.catalog
            .location(id)?
            .ok_or_else(|| LedgerError::from(RuleViolation::unknown(RefKind::Location, id)))
    }

    fn product(&self, id: ProductId) -> LedgerResult<Product> {
        self.catalog
            .product(id)?
            .ok_or_else(|| LedgerError::from(RuleViolation::unknown(RefKind::Product, id)))
    }

    /// Resolve an employee that must hold one role; a different role fails as
    /// an unresolved reference of the role-specific kind.
    fn employee_in_role(
        &self,
        id: EmployeeId,
        role: EmployeeRole,
        as_kind: RefKind,
    ) -> LedgerResult<Employee> {
        match self.parties.employee(id)? {
            Some(employee) if employee.role() == role => Ok(employee),
            _ => Err(RuleViolation::unknown(as_kind, id).into()),
        }
    }

    fn record_order(&self, order: Order) -> LedgerResult<()> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| LedgerError::system("order records lock poisoned"))?;
        orders.insert(order.id, order);
        Ok(())
    }

    fn record_transfer(&self, transfer: Transfer) -> LedgerResult<()> {
        let mut transfers = self
            .transfers
            .write()
            .map_err(|_| LedgerError::system("transfer records lock poisoned"))?;
        transfers.insert(transfer.id, transfer);
        Ok(())
    }

    fn record_supply(&self, supply: Supply) -> LedgerResult<()> {
        let mut supplies = self
            .supplies
            .write()
            .map_err(|_| LedgerError::system("supply records lock poisoned"))?;
        supplies.insert(supply.id, supply);
        Ok(())
    }

    fn record_payment(&self, payment: Payment) -> LedgerResult<()> {
        let mut payments = self
            .payments
            .write()
            .map_err(|_| LedgerError::system("payment records lock poisoned"))?;
        payments.insert(payment.id, payment);
        Ok(())
    }
}
