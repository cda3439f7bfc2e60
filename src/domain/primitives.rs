//! Domain primitives: entity id newtypes, CargoMethod, TrackingNumber.

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                $name(id)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Customer/user identifier.
    UserId
);
id_newtype!(
    /// Cargo supplier (carrier) identifier.
    SupplierId
);
id_newtype!(
    /// Administrative location identifier.
    LocationId
);
id_newtype!(
    /// Cargo-type catalog identifier.
    CargoTypeId
);
id_newtype!(
    /// Customer address-book entry identifier.
    AddressId
);
id_newtype!(
    /// Internal cargo order identifier.
    CargoId
);
id_newtype!(
    /// Pricing-row identifier.
    PricingId
);

/// Shipment method offered by suppliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CargoMethod {
    Air,
    Sea,
    Land,
}

impl CargoMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CargoMethod::Air => "air",
            CargoMethod::Sea => "sea",
            CargoMethod::Land => "land",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "air" => Some(CargoMethod::Air),
            "sea" => Some(CargoMethod::Sea),
            "land" => Some(CargoMethod::Land),
            _ => None,
        }
    }
}

impl std::fmt::Display for CargoMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Human-readable public tracking identifier, distinct from the internal id.
///
/// Used for unauthenticated status lookup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackingNumber(pub String);

impl TrackingNumber {
    pub fn new(value: String) -> Self {
        TrackingNumber(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(SupplierId::new(7).to_string(), "7");
        assert_eq!(CargoId::new(42).as_i64(), 42);
    }

    #[test]
    fn test_cargo_method_roundtrip() {
        for method in [CargoMethod::Air, CargoMethod::Sea, CargoMethod::Land] {
            assert_eq!(CargoMethod::parse(method.as_str()), Some(method));
        }
        assert_eq!(CargoMethod::parse("teleport"), None);
    }

    #[test]
    fn test_cargo_method_serialization() {
        let json = serde_json::to_string(&CargoMethod::Sea).unwrap();
        assert_eq!(json, "\"sea\"");
    }

    #[test]
    fn test_tracking_number_display() {
        let tn = TrackingNumber::new("CM2608061234567".to_string());
        assert_eq!(tn.to_string(), "CM2608061234567");
    }
}
