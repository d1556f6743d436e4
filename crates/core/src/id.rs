//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// An identifier string failed to parse as a UUID.
#[derive(Debug, Error)]
#[error("invalid {kind} id: {source}")]
pub struct IdParseError {
    kind: &'static str,
    #[source]
    source: uuid::Error,
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s).map_err(|source| IdParseError {
                    kind: $name,
                    source,
                })?;
                Ok(Self(uuid))
            }
        }
    };
}

uuid_id!(
    /// Identifier of a product (Animal or Goods).
    ProductId,
    "ProductId"
);
uuid_id!(
    /// Identifier of a location (store, warehouse or breeding unit).
    LocationId,
    "LocationId"
);
uuid_id!(
    /// Identifier of a breeding nest.
    NestId,
    "NestId"
);
uuid_id!(
    /// Identifier of a customer.
    CustomerId,
    "CustomerId"
);
uuid_id!(
    /// Identifier of an employee (carrier, breeder, clerk, manager).
    EmployeeId,
    "EmployeeId"
);
uuid_id!(
    /// Identifier of a supplying vendor.
    VendorId,
    "VendorId"
);
uuid_id!(
    /// Identifier of a customer order.
    OrderId,
    "OrderId"
);
uuid_id!(
    /// Identifier of a stock transfer.
    TransferId,
    "TransferId"
);
uuid_id!(
    /// Identifier of a supply receipt.
    SupplyId,
    "SupplyId"
);
uuid_id!(
    /// Identifier of a debt settlement payment.
    PaymentId,
    "PaymentId"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_display_and_from_str() {
        let id = ProductId::new();
        let parsed: ProductId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn malformed_id_reports_its_kind() {
        let err = "not-a-uuid".parse::<CustomerId>().unwrap_err();
        assert!(err.to_string().contains("CustomerId"));
    }

    #[test]
    fn serde_is_transparent() {
        let id = OrderId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
