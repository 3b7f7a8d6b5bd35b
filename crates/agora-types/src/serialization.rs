//! Serialization implementations for agora-types
//!
//! This module provides serde implementations for all types.

use crate::*;

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    // Address
    impl Serialize for Address {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            self.to_string().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Address {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Address::from_str(&s).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use crate::Address;

    #[test]
    fn test_address_serde_roundtrip() {
        let addr = Address::from_bytes([7u8; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert!(json.contains("agor1"));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }
}
