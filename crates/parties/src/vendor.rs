use serde::{Deserialize, Serialize};

use aviary_core::{Entity, VendorId};

/// A supplying vendor referenced by supply receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    id: VendorId,
    name: String,
}

impl Vendor {
    pub fn new(id: VendorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id_typed(&self) -> VendorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Vendor {
    type Id = VendorId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
