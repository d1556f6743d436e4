//! Versioned books: the shared inventory and debt state.
//!
//! Mutating operations snapshot the rows they touch, validate against the
//! snapshot, then commit a write batch. The commit re-checks every row's
//! expected version inside one critical section and applies nothing on any
//! mismatch; the caller revalidates from scratch. Stock is locked before
//! debt, always in that order, so an order's inventory debits and its debt
//! charge land atomically.

use std::collections::HashMap;
use std::sync::RwLock;

use aviary_core::{CustomerId, ExpectedVersion, LedgerError, LedgerResult, LocationId, ProductId};
use aviary_inventory::{InventoryLine, LineKey};
use aviary_parties::DebtAccount;

/// Stock row mutation. A credit against an absent row creates the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StockMutation {
    Debit(u64),
    Credit(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StockWrite {
    pub key: LineKey,
    pub expected: ExpectedVersion,
    pub mutation: StockMutation,
}

/// Debt row mutation. A charge against an absent row creates the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DebtMutation {
    Charge { total: u64, paid: u64 },
    Settle(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DebtWrite {
    pub customer: CustomerId,
    pub expected: ExpectedVersion,
    pub mutation: DebtMutation,
}

/// All row writes of one ledger operation, committed as a unit.
#[derive(Debug, Default)]
pub(crate) struct WriteBatch {
    pub stock: Vec<StockWrite>,
    pub debt: Option<DebtWrite>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommitError {
    /// A row moved since it was read; revalidate and retry.
    Conflict,
    /// A lock was poisoned; surfaced as a system failure.
    Poisoned,
}

/// In-memory versioned store of inventory lines and debt accounts.
#[derive(Debug, Default)]
pub(crate) struct Books {
    stock: RwLock<HashMap<LineKey, InventoryLine>>,
    debts: RwLock<HashMap<CustomerId, DebtAccount>>,
}

impl Books {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stock_line(&self, key: &LineKey) -> LedgerResult<Option<InventoryLine>> {
        let stock = self
            .stock
            .read()
            .map_err(|_| LedgerError::system("stock lock poisoned"))?;
        Ok(stock.get(key).copied())
    }

    pub fn debt_account(&self, customer: CustomerId) -> LedgerResult<Option<DebtAccount>> {
        let debts = self
            .debts
            .read()
            .map_err(|_| LedgerError::system("debt lock poisoned"))?;
        Ok(debts.get(&customer).copied())
    }

    /// Snapshot of every line at one location (shell read path).
    pub fn location_stock(&self, location: LocationId) -> LedgerResult<Vec<(ProductId, u64)>> {
        let stock = self
            .stock
            .read()
            .map_err(|_| LedgerError::system("stock lock poisoned"))?;
        Ok(stock
            .iter()
            .filter(|(key, _)| key.location == location)
            .map(|(key, line)| (key.product, line.quantity()))
            .collect())
    }

    /// Apply a validated write batch if every touched row is still at the
    /// version the caller read. All-or-nothing.
    pub fn commit(&self, batch: &WriteBatch) -> Result<(), CommitError> {
        let mut stock = self.stock.write().map_err(|_| CommitError::Poisoned)?;
        let mut debts = self.debts.write().map_err(|_| CommitError::Poisoned)?;

        for write in &batch.stock {
            let current = stock.get(&write.key).map(|line| line.version());
            if !write.expected.matches(current) {
                return Err(CommitError::Conflict);
            }
        }
        if let Some(write) = &batch.debt {
            let current = debts.get(&write.customer).map(|account| account.version());
            if !write.expected.matches(current) {
                return Err(CommitError::Conflict);
            }
        }

        // Stage every new row before storing any of them. With versions
        // matched the mutations were already validated by the caller, so a
        // failure here is treated as a conflict and sent back around for
        // revalidation rather than partially applied.
        let mut staged: HashMap<LineKey, InventoryLine> = HashMap::new();
        for write in &batch.stock {
            let current = staged
                .get(&write.key)
                .copied()
                .or_else(|| stock.get(&write.key).copied());
            let line = match (current, write.mutation) {
                (None, StockMutation::Credit(quantity)) => InventoryLine::new(quantity),
                (None, StockMutation::Debit(_)) => return Err(CommitError::Conflict),
                (Some(mut line), StockMutation::Debit(quantity)) => {
                    line.debit(quantity, write.key.product)
                        .map_err(|_| CommitError::Conflict)?;
                    line
                }
                (Some(mut line), StockMutation::Credit(quantity)) => {
                    line.credit(quantity).map_err(|_| CommitError::Conflict)?;
                    line
                }
            };
            staged.insert(write.key, line);
        }

        let staged_debt = match &batch.debt {
            Some(write) => {
                let mut account = debts.get(&write.customer).copied().unwrap_or_default();
                match write.mutation {
                    DebtMutation::Charge { total, paid } => account.charge(total, paid),
                    DebtMutation::Settle(amount) => account.settle(amount),
                }
                .map_err(|_| CommitError::Conflict)?;
                Some((write.customer, account))
            }
            None => None,
        };

        for (key, line) in staged {
            stock.insert(key, line);
        }
        if let Some((customer, account)) = staged_debt {
            debts.insert(customer, account);
        }
        Ok(())
    }
}
