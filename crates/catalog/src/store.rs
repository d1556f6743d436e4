//! In-memory catalog store.
//!
//! Reference data (products, locations, nests) created by administrative
//! flows and read by the ledger engine. The engine is the only writer on the
//! transactional paths (animal registration, nest creation, health updates);
//! everything else goes through the plain `add_*` methods.

use std::collections::HashMap;
use std::sync::RwLock;

use aviary_core::{LedgerError, LedgerResult, LocationId, NestId, ProductId};

use crate::location::Location;
use crate::nest::Nest;
use crate::product::Product;

/// Thread-safe store of catalog reference data.
#[derive(Debug, Default)]
pub struct CatalogStore {
    products: RwLock<HashMap<ProductId, Product>>,
    locations: RwLock<HashMap<LocationId, Location>>,
    nests: RwLock<HashMap<NestId, Nest>>,
}

fn poisoned(what: &str) -> LedgerError {
    LedgerError::system(format!("{what} lock poisoned"))
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_product(&self, product: Product) -> LedgerResult<ProductId> {
        let id = product.id_typed();
        let mut products = self.products.write().map_err(|_| poisoned("catalog"))?;
        products.insert(id, product);
        Ok(id)
    }

    pub fn add_location(&self, location: Location) -> LedgerResult<LocationId> {
        let id = location.id_typed();
        let mut locations = self.locations.write().map_err(|_| poisoned("catalog"))?;
        locations.insert(id, location);
        Ok(id)
    }

    pub fn add_nest(&self, nest: Nest) -> LedgerResult<NestId> {
        let id = nest.id_typed();
        let mut nests = self.nests.write().map_err(|_| poisoned("catalog"))?;
        nests.insert(id, nest);
        Ok(id)
    }

    pub fn product(&self, id: ProductId) -> LedgerResult<Option<Product>> {
        let products = self.products.read().map_err(|_| poisoned("catalog"))?;
        Ok(products.get(&id).cloned())
    }

    pub fn location(&self, id: LocationId) -> LedgerResult<Option<Location>> {
        let locations = self.locations.read().map_err(|_| poisoned("catalog"))?;
        Ok(locations.get(&id).cloned())
    }

    pub fn nest(&self, id: NestId) -> LedgerResult<Option<Nest>> {
        let nests = self.nests.read().map_err(|_| poisoned("catalog"))?;
        Ok(nests.get(&id).cloned())
    }

    /// Mutate a product in place under the write lock.
    ///
    /// Returns `Ok(None)` when the product does not exist.
    pub fn with_product_mut<T>(
        &self,
        id: ProductId,
        f: impl FnOnce(&mut Product) -> T,
    ) -> LedgerResult<Option<T>> {
        let mut products = self.products.write().map_err(|_| poisoned("catalog"))?;
        Ok(products.get_mut(&id).map(f))
    }

    /// Mutate a nest in place under the write lock.
    ///
    /// The closure runs while the lock is held, so a capacity check plus
    /// admission is atomic with respect to concurrent registrations.
    pub fn with_nest_mut<T>(
        &self,
        id: NestId,
        f: impl FnOnce(&mut Nest) -> T,
    ) -> LedgerResult<Option<T>> {
        let mut nests = self.nests.write().map_err(|_| poisoned("catalog"))?;
        Ok(nests.get_mut(&id).map(f))
    }

    /// Snapshot of all products (shell read path, e.g. catalog pages).
    pub fn list_products(&self) -> LedgerResult<Vec<Product>> {
        let products = self.products.read().map_err(|_| poisoned("catalog"))?;
        Ok(products.values().cloned().collect())
    }

    /// Snapshot of all locations (shell read path, e.g. dropdowns).
    pub fn list_locations(&self) -> LedgerResult<Vec<Location>> {
        let locations = self.locations.read().map_err(|_| poisoned("catalog"))?;
        Ok(locations.values().cloned().collect())
    }

    /// Snapshot of all nests for one breeding unit.
    pub fn list_nests_in(&self, unit: LocationId) -> LedgerResult<Vec<Nest>> {
        let nests = self.nests.read().map_err(|_| poisoned("catalog"))?;
        Ok(nests.values().filter(|n| n.unit() == unit).cloned().collect())
    }
}
