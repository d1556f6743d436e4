use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use aviary_core::{Entity, NestId, ProductId, ProductKind, RuleViolation};

/// Health status of a live animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Healthy,
    Sick,
    Recovering,
    Quarantined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Variant payload for a live animal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalDetails {
    /// Species, e.g. "canary" or "budgerigar".
    pub species: String,
    pub breed: Option<String>,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub health: HealthStatus,
    /// Nest the animal is assigned to, while housed in a breeding unit.
    pub nest: Option<NestId>,
}

/// Variant payload for packaged goods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsDetails {
    /// Category, e.g. "seed mix" or "cage".
    pub category: String,
    pub size: String,
    pub material: String,
    pub expires_on: Option<NaiveDate>,
}

/// Exactly one variant payload per product, matching its type tag.
///
/// Modelled as an enum so the invariant holds by construction; the tag is
/// derived from the payload rather than stored beside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProductDetails {
    Animal(AnimalDetails),
    Goods(GoodsDetails),
}

/// Catalog entry: something the shop stocks and sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    /// Standard price in smallest currency unit (e.g., cents).
    price: u64,
    details: ProductDetails,
}

impl Product {
    pub fn animal(id: ProductId, price: u64, details: AnimalDetails) -> Self {
        Self {
            id,
            price,
            details: ProductDetails::Animal(details),
        }
    }

    pub fn goods(id: ProductId, price: u64, details: GoodsDetails) -> Self {
        Self {
            id,
            price,
            details: ProductDetails::Goods(details),
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn details(&self) -> &ProductDetails {
        &self.details
    }

    pub fn kind(&self) -> ProductKind {
        match self.details {
            ProductDetails::Animal(_) => ProductKind::Animal,
            ProductDetails::Goods(_) => ProductKind::Goods,
        }
    }

    pub fn as_animal(&self) -> Option<&AnimalDetails> {
        match &self.details {
            ProductDetails::Animal(details) => Some(details),
            ProductDetails::Goods(_) => None,
        }
    }

    pub fn as_goods(&self) -> Option<&GoodsDetails> {
        match &self.details {
            ProductDetails::Goods(details) => Some(details),
            ProductDetails::Animal(_) => None,
        }
    }

    /// Overwrite the health status. Fails on the goods variant.
    pub fn update_health(&mut self, status: HealthStatus) -> Result<(), RuleViolation> {
        match &mut self.details {
            ProductDetails::Animal(details) => {
                details.health = status;
                Ok(())
            }
            ProductDetails::Goods(_) => Err(RuleViolation::InvalidProductType { product: self.id }),
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
