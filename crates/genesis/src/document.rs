//! The subnet-evm genesis JSON document.
//!
//! Every map is ordered, so serializing the same document always yields the
//! same bytes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{error::GenesisResult, precompile::AllowlistKind};

/// Warp quorum, as a percentage of stake.
pub const WARP_QUORUM_NUMERATOR: u64 = 67;

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
pub const ZERO_HASH: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Formats a number as `0x`-prefixed lowercase hex.
pub(crate) fn hex_quantity(v: u64) -> String {
    format!("{v:#x}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfig {
    pub gas_limit: u64,
    pub target_block_rate: u64,
    pub min_base_fee: u64,
    pub target_gas: u64,
    pub base_fee_change_denominator: u64,
    pub min_block_gas_cost: u64,
    pub max_block_gas_cost: u64,
    pub block_gas_cost_step: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarpConfig {
    pub block_timestamp: u64,
    pub quorum_numerator: u64,
    pub require_primary_network_signers: bool,
}

/// Upgrade config of an allowlist precompile, active from genesis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowListConfig {
    pub block_timestamp: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admin_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manager_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enabled_addresses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub chain_id: u64,
    pub homestead_block: u64,
    pub eip150_block: u64,
    pub eip155_block: u64,
    pub eip158_block: u64,
    pub byzantium_block: u64,
    pub constantinople_block: u64,
    pub petersburg_block: u64,
    pub istanbul_block: u64,
    pub muir_glacier_block: u64,
    pub fee_config: FeeConfig,
    pub warp_config: WarpConfig,
    /// Allowlist precompile configs keyed by their chain config key.
    #[serde(flatten)]
    pub precompiles: BTreeMap<String, AllowListConfig>,
}

impl ChainConfig {
    /// Config with every fork active from block 0.
    pub fn new(chain_id: u64, fee_config: FeeConfig, warp_config: WarpConfig) -> Self {
        Self {
            chain_id,
            homestead_block: 0,
            eip150_block: 0,
            eip155_block: 0,
            eip158_block: 0,
            byzantium_block: 0,
            constantinople_block: 0,
            petersburg_block: 0,
            istanbul_block: 0,
            muir_glacier_block: 0,
            fee_config,
            warp_config,
            precompiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub balance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub storage: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisDocument {
    pub config: ChainConfig,
    pub alloc: BTreeMap<String, GenesisAccount>,
    pub nonce: String,
    pub timestamp: String,
    pub extra_data: String,
    pub gas_limit: String,
    pub difficulty: String,
    pub mix_hash: String,
    pub coinbase: String,
    pub number: String,
    pub gas_used: String,
    pub parent_hash: String,
}

impl GenesisDocument {
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Conventional file name, `genesis-<chainId>.json`.
    pub fn file_name(&self) -> String {
        format!("genesis-{}.json", self.config.chain_id)
    }

    pub fn precompile(&self, kind: AllowlistKind) -> Option<&AllowListConfig> {
        self.config.precompiles.get(kind.config_key())
    }

    pub fn to_json_pretty(&self) -> GenesisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_quantity() {
        assert_eq!(hex_quantity(0), "0x0");
        assert_eq!(hex_quantity(20_000_000), "0x1312d00");
    }

    #[test]
    fn test_precompile_keys_flatten_into_config() {
        let mut cfg = ChainConfig::new(
            1,
            FeeConfig {
                gas_limit: 1,
                target_block_rate: 2,
                min_base_fee: 0,
                target_gas: 1,
                base_fee_change_denominator: 1,
                min_block_gas_cost: 0,
                max_block_gas_cost: 0,
                block_gas_cost_step: 0,
            },
            WarpConfig {
                block_timestamp: 7,
                quorum_numerator: WARP_QUORUM_NUMERATOR,
                require_primary_network_signers: true,
            },
        );
        cfg.precompiles.insert(
            AllowlistKind::TxAllowlist.config_key().to_string(),
            AllowListConfig {
                enabled_addresses: vec![ZERO_ADDRESS.to_string()],
                ..Default::default()
            },
        );

        let v = serde_json::to_value(&cfg).unwrap();
        assert_eq!(v["eip150Block"], 0);
        assert_eq!(v["warpConfig"]["quorumNumerator"], 67);
        assert_eq!(v["txAllowListConfig"]["blockTimestamp"], 0);
        assert!(v["txAllowListConfig"].get("adminAddresses").is_none());
    }
}
