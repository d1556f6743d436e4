use serde::{Deserialize, Serialize};

use aviary_core::{Entity, EmployeeId, LocationId, NestId, ProductId, RuleViolation};

/// A breeding nest: a capacity-constrained slot for animals, housed in a
/// breeding-unit location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nest {
    id: NestId,
    /// Species the nest is set up for, e.g. "canary".
    species: String,
    /// Breeder managing the nest, if one is assigned.
    breeder: Option<EmployeeId>,
    /// Breeding-unit location housing the nest.
    unit: LocationId,
    occupants: Vec<ProductId>,
}

impl Nest {
    pub fn new(
        id: NestId,
        species: impl Into<String>,
        breeder: Option<EmployeeId>,
        unit: LocationId,
    ) -> Self {
        Self {
            id,
            species: species.into(),
            breeder,
            unit,
            occupants: Vec::new(),
        }
    }

    pub fn id_typed(&self) -> NestId {
        self.id
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn breeder(&self) -> Option<EmployeeId> {
        self.breeder
    }

    pub fn unit(&self) -> LocationId {
        self.unit
    }

    pub fn occupants(&self) -> &[ProductId] {
        &self.occupants
    }

    pub fn is_full(&self, capacity: u32) -> bool {
        self.occupants.len() as u32 >= capacity
    }

    /// Assign an animal to the nest, enforcing the capacity constraint.
    pub fn admit(&mut self, animal: ProductId, capacity: u32) -> Result<(), RuleViolation> {
        if self.is_full(capacity) {
            return Err(RuleViolation::NestFull {
                nest: self.id,
                capacity,
            });
        }
        self.occupants.push(animal);
        Ok(())
    }
}

impl Entity for Nest {
    type Id = NestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_nest() -> Nest {
        Nest::new(NestId::new(), "canary", Some(EmployeeId::new()), LocationId::new())
    }

    #[test]
    fn admits_animals_up_to_capacity() {
        let mut nest = empty_nest();
        nest.admit(ProductId::new(), 2).unwrap();
        nest.admit(ProductId::new(), 2).unwrap();
        assert_eq!(nest.occupants().len(), 2);
    }

    #[test]
    fn rejects_admission_at_capacity() {
        let mut nest = empty_nest();
        nest.admit(ProductId::new(), 1).unwrap();
        let err = nest.admit(ProductId::new(), 1).unwrap_err();
        assert!(matches!(err, RuleViolation::NestFull { capacity: 1, .. }));
        assert_eq!(nest.occupants().len(), 1);
    }
}
