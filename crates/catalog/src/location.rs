use serde::{Deserialize, Serialize};

use aviary_core::{Entity, LocationId};

/// Kind of a physical location. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Store,
    Warehouse,
    BreedingUnit,
}

impl core::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LocationKind::Store => f.write_str("store"),
            LocationKind::Warehouse => f.write_str("warehouse"),
            LocationKind::BreedingUnit => f.write_str("breeding unit"),
        }
    }
}

/// A store, warehouse or breeding unit holding inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    id: LocationId,
    kind: LocationKind,
    name: String,
}

impl Location {
    pub fn new(id: LocationId, kind: LocationKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
        }
    }

    pub fn id_typed(&self) -> LocationId {
        self.id
    }

    pub fn kind(&self) -> LocationKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
