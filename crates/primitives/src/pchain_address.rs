//! P-Chain addresses (`P-<hrp>1...` bech32).

use std::{fmt, str::FromStr};

use alloy_primitives::Address;
use bech32::{Bech32, Hrp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::PrimitiveParseError;

const CHAIN_PREFIX: &str = "P-";

/// A P-Chain address: a bech32 human-readable part plus a 20-byte short ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PChainAddress {
    hrp: Hrp,
    bytes: [u8; 20],
}

impl PChainAddress {
    pub fn new(hrp: &str, bytes: [u8; 20]) -> Result<Self, PrimitiveParseError> {
        let hrp = Hrp::parse(hrp).map_err(|e| PrimitiveParseError::Bech32(e.to_string()))?;
        Ok(Self { hrp, bytes })
    }

    pub fn hrp(&self) -> &str {
        self.hrp.as_str()
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.bytes
    }

    /// The short ID as an EVM `address`, the form the validator manager
    /// expects in `PChainOwner.addresses`.
    pub fn to_evm_address(&self) -> Address {
        Address::from(self.bytes)
    }
}

impl FromStr for PChainAddress {
    type Err = PrimitiveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix(CHAIN_PREFIX)
            .ok_or(PrimitiveParseError::MissingPrefix(CHAIN_PREFIX))?;
        let (hrp, data) =
            bech32::decode(body).map_err(|e| PrimitiveParseError::Bech32(e.to_string()))?;
        let bytes =
            <[u8; 20]>::try_from(data.as_slice()).map_err(|_| PrimitiveParseError::Length {
                expected: 20,
                actual: data.len(),
            })?;
        Ok(Self { hrp, bytes })
    }
}

impl fmt::Display for PChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded =
            bech32::encode::<Bech32>(self.hrp, &self.bytes).map_err(|_| fmt::Error)?;
        write!(f, "{CHAIN_PREFIX}{encoded}")
    }
}

impl Serialize for PChainAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PChainAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
