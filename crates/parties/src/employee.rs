use serde::{Deserialize, Serialize};

use aviary_core::{EmployeeId, Entity, LocationId, RuleViolation};

/// Role an employee performs. Transfers require a carrier; nests a breeder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Carrier,
    Breeder,
    Clerk,
    Manager,
}

/// Employee record. Mutation is limited to salary adjustment and location
/// reassignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    id: EmployeeId,
    first_name: String,
    last_name: String,
    role: EmployeeRole,
    /// Salary in smallest currency unit (e.g., cents).
    salary: u64,
    works_at: LocationId,
}

impl Employee {
    pub fn new(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: EmployeeRole,
        salary: u64,
        works_at: LocationId,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            role,
            salary,
            works_at,
        }
    }

    pub fn id_typed(&self) -> EmployeeId {
        self.id
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn role(&self) -> EmployeeRole {
        self.role
    }

    pub fn salary(&self) -> u64 {
        self.salary
    }

    pub fn works_at(&self) -> LocationId {
        self.works_at
    }

    /// Adjust salary by a percentage. Anything at or below -100% would drive
    /// pay negative and is rejected.
    pub fn increase_salary(&mut self, percent: f64) -> Result<u64, RuleViolation> {
        if !percent.is_finite() || percent <= -100.0 {
            return Err(RuleViolation::invalid_amount(
                "salary adjustment must be a percentage greater than -100",
            ));
        }
        let adjusted = (self.salary as f64 * (1.0 + percent / 100.0)).round();
        self.salary = adjusted as u64;
        Ok(self.salary)
    }

    pub fn assign_to(&mut self, location: LocationId) {
        self.works_at = location;
    }
}

impl Entity for Employee {
    type Id = EmployeeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clerk(salary: u64) -> Employee {
        Employee::new(
            EmployeeId::new(),
            "Ada",
            "Martin",
            EmployeeRole::Clerk,
            salary,
            LocationId::new(),
        )
    }

    #[test]
    fn raises_salary_by_percentage() {
        let mut employee = clerk(100_000);
        let new_salary = employee.increase_salary(10.0).unwrap();
        assert_eq!(new_salary, 110_000);
    }

    #[test]
    fn allows_cuts_down_to_but_not_past_minus_hundred() {
        let mut employee = clerk(100_000);
        employee.increase_salary(-50.0).unwrap();
        assert_eq!(employee.salary(), 50_000);

        let err = employee.increase_salary(-100.0).unwrap_err();
        assert!(matches!(err, RuleViolation::InvalidAmount(_)));
        assert_eq!(employee.salary(), 50_000);
    }

    #[test]
    fn rejects_non_finite_percentages() {
        let mut employee = clerk(100_000);
        assert!(employee.increase_salary(f64::NAN).is_err());
        assert!(employee.increase_salary(f64::INFINITY).is_err());
    }
}
