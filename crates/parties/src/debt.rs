//! Customer debt account.
//!
//! Balance = sum(order totals) − sum(payments), never negative. The row
//! carries a version for the books' optimistic commit; every successful
//! mutation bumps it.

use serde::{Deserialize, Serialize};

use aviary_core::RuleViolation;

/// Running balance of a customer's unpaid order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtAccount {
    balance: u64,
    version: u64,
}

impl DebtAccount {
    /// Fresh account with zero balance, created on first charge.
    pub fn new() -> Self {
        Self {
            balance: 0,
            version: 1,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Append an order total, then immediately apply the amount paid at
    /// creation. A paid amount exceeding the charged total plus the prior
    /// balance would drive the account negative and is rejected.
    pub fn charge(&mut self, total: u64, paid: u64) -> Result<(), RuleViolation> {
        let charged = self
            .balance
            .checked_add(total)
            .ok_or_else(|| RuleViolation::invalid_amount("debt balance overflow"))?;
        let balance = charged.checked_sub(paid).ok_or(RuleViolation::Overpayment {
            amount: paid,
            balance: charged,
        })?;
        self.balance = balance;
        self.version += 1;
        Ok(())
    }

    /// Settle part or all of the outstanding balance. Overpayment is
    /// rejected, not clamped.
    pub fn settle(&mut self, amount: u64) -> Result<(), RuleViolation> {
        let balance = self
            .balance
            .checked_sub(amount)
            .ok_or(RuleViolation::Overpayment {
                amount,
                balance: self.balance,
            })?;
        self.balance = balance;
        self.version += 1;
        Ok(())
    }
}

impl Default for DebtAccount {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn charge_adds_total_and_applies_initial_payment() {
        let mut account = DebtAccount::new();
        account.charge(150, 50).unwrap();
        assert_eq!(account.balance(), 100);
    }

    #[test]
    fn exact_settlement_drives_balance_to_zero() {
        let mut account = DebtAccount::new();
        account.charge(150, 0).unwrap();
        account.settle(150).unwrap();
        assert_eq!(account.balance(), 0);
    }

    #[test]
    fn settling_one_past_the_balance_is_rejected_unchanged() {
        let mut account = DebtAccount::new();
        account.charge(150, 0).unwrap();
        account.settle(150).unwrap();
        let err = account.settle(1).unwrap_err();
        assert_eq!(
            err,
            RuleViolation::Overpayment {
                amount: 1,
                balance: 0
            }
        );
        assert_eq!(account.balance(), 0);
    }

    #[test]
    fn initial_payment_may_not_exceed_total_plus_prior_balance() {
        let mut account = DebtAccount::new();
        account.charge(100, 0).unwrap();
        // prior 100 + total 50 = 150 chargeable; paying 151 would go negative
        let err = account.charge(50, 151).unwrap_err();
        assert!(matches!(err, RuleViolation::Overpayment { .. }));
        assert_eq!(account.balance(), 100);
    }

    #[test]
    fn every_mutation_bumps_the_version() {
        let mut account = DebtAccount::new();
        let v0 = account.version();
        account.charge(10, 0).unwrap();
        account.settle(5).unwrap();
        assert_eq!(account.version(), v0 + 2);
    }

    proptest! {
        #[test]
        fn balance_never_goes_negative(ops in proptest::collection::vec((0u64..1000, 0u64..1500), 0..50)) {
            let mut account = DebtAccount::new();
            for (total, amount) in ops {
                // Alternate between charges and settlements; rejected ops must
                // leave the balance untouched.
                let before = account.balance();
                if account.charge(total, 0).is_err() {
                    prop_assert_eq!(account.balance(), before);
                }
                let before = account.balance();
                if account.settle(amount).is_err() {
                    prop_assert_eq!(account.balance(), before);
                }
            }
        }
    }
}
