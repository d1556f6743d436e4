//! Catalog domain module: products, locations and breeding nests.
//!
//! Pure domain types plus the in-memory reference-data store. No IO, no HTTP,
//! no persistence concerns.

pub mod location;
pub mod nest;
pub mod product;
pub mod store;

pub use location::{Location, LocationKind};
pub use nest::Nest;
pub use product::{
    AnimalDetails, Gender, GoodsDetails, HealthStatus, Product, ProductDetails,
};
pub use store::CatalogStore;
