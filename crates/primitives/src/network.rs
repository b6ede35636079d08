//! Avalanche networks the toolbox can target.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::PrimitiveParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvalancheNetwork {
    Mainnet,
    #[serde(alias = "testnet")]
    Fuji,
}

impl AvalancheNetwork {
    /// Numeric network ID carried in Warp messages.
    pub const fn network_id(self) -> u32 {
        match self {
            Self::Mainnet => 1,
            Self::Fuji => 5,
        }
    }

    /// Human-readable part of P-Chain bech32 addresses.
    pub const fn hrp(self) -> &'static str {
        match self {
            Self::Mainnet => "avax",
            Self::Fuji => "fuji",
        }
    }

    /// Path segment used by the signature aggregation API.
    pub const fn aggregator_path(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Fuji => "fuji",
        }
    }

    /// Public API node serving the P-Chain.
    pub const fn default_api_url(self) -> &'static str {
        match self {
            Self::Mainnet => "https://api.avax.network",
            Self::Fuji => "https://api.avax-test.network",
        }
    }
}

impl fmt::Display for AvalancheNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.aggregator_path())
    }
}

impl FromStr for AvalancheNetwork {
    type Err = PrimitiveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "fuji" | "testnet" => Ok(Self::Fuji),
            _ => Err(PrimitiveParseError::UnknownNetwork(s.to_string())),
        }
    }
}
