//! In-memory party store (customers, employees, vendors).

use std::collections::HashMap;
use std::sync::RwLock;

use aviary_core::{CustomerId, EmployeeId, LedgerError, LedgerResult, VendorId};

use crate::customer::Customer;
use crate::employee::Employee;
use crate::vendor::Vendor;

/// Thread-safe store of party reference data.
#[derive(Debug, Default)]
pub struct PartyStore {
    customers: RwLock<HashMap<CustomerId, Customer>>,
    employees: RwLock<HashMap<EmployeeId, Employee>>,
    vendors: RwLock<HashMap<VendorId, Vendor>>,
}

fn poisoned() -> LedgerError {
    LedgerError::system("party lock poisoned")
}

impl PartyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_customer(&self, customer: Customer) -> LedgerResult<CustomerId> {
        let id = customer.id_typed();
        let mut customers = self.customers.write().map_err(|_| poisoned())?;
        customers.insert(id, customer);
        Ok(id)
    }

    pub fn add_employee(&self, employee: Employee) -> LedgerResult<EmployeeId> {
        let id = employee.id_typed();
        let mut employees = self.employees.write().map_err(|_| poisoned())?;
        employees.insert(id, employee);
        Ok(id)
    }

    pub fn add_vendor(&self, vendor: Vendor) -> LedgerResult<VendorId> {
        let id = vendor.id_typed();
        let mut vendors = self.vendors.write().map_err(|_| poisoned())?;
        vendors.insert(id, vendor);
        Ok(id)
    }

    pub fn customer(&self, id: CustomerId) -> LedgerResult<Option<Customer>> {
        let customers = self.customers.read().map_err(|_| poisoned())?;
        Ok(customers.get(&id).cloned())
    }

    pub fn employee(&self, id: EmployeeId) -> LedgerResult<Option<Employee>> {
        let employees = self.employees.read().map_err(|_| poisoned())?;
        Ok(employees.get(&id).cloned())
    }

    pub fn vendor(&self, id: VendorId) -> LedgerResult<Option<Vendor>> {
        let vendors = self.vendors.read().map_err(|_| poisoned())?;
        Ok(vendors.get(&id).cloned())
    }

    /// Mutate an employee in place under the write lock (HR adjustments).
    ///
    /// Returns `Ok(None)` when the employee does not exist.
    pub fn with_employee_mut<T>(
        &self,
        id: EmployeeId,
        f: impl FnOnce(&mut Employee) -> T,
    ) -> LedgerResult<Option<T>> {
        let mut employees = self.employees.write().map_err(|_| poisoned())?;
        Ok(employees.get_mut(&id).map(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::EmployeeRole;
    use aviary_core::LocationId;

    #[test]
    fn stores_and_returns_parties() {
        let store = PartyStore::new();
        let id = store
            .add_customer(Customer::new(CustomerId::new(), "Deniz", "Aksoy"))
            .unwrap();
        assert_eq!(store.customer(id).unwrap().unwrap().full_name(), "Deniz Aksoy");
        assert!(store.customer(CustomerId::new()).unwrap().is_none());
    }

    #[test]
    fn with_employee_mut_applies_hr_changes() {
        let store = PartyStore::new();
        let id = store
            .add_employee(Employee::new(
                EmployeeId::new(),
                "Kerem",
                "Yilmaz",
                EmployeeRole::Carrier,
                80_000,
                LocationId::new(),
            ))
            .unwrap();
        store
            .with_employee_mut(id, |e| e.increase_salary(25.0).map(|_| ()))
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(store.employee(id).unwrap().unwrap().salary(), 100_000);
    }
}
