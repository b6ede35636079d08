//! Stateful precompiles configurable at genesis.

use std::fmt;

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

pub const CONTRACT_DEPLOYER_ALLOWLIST_ADDRESS: Address =
    address!("0200000000000000000000000000000000000000");
pub const NATIVE_MINTER_ADDRESS: Address = address!("0200000000000000000000000000000000000001");
pub const TX_ALLOWLIST_ADDRESS: Address = address!("0200000000000000000000000000000000000002");
pub const FEE_MANAGER_ADDRESS: Address = address!("0200000000000000000000000000000000000003");
pub const REWARD_MANAGER_ADDRESS: Address = address!("0200000000000000000000000000000000000004");
pub use l1_primitives::WARP_PRECOMPILE_ADDRESS;

/// Allowlist-gated precompiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowlistKind {
    ContractDeployer,
    NativeMinter,
    TxAllowlist,
    FeeManager,
    RewardManager,
}

impl AllowlistKind {
    pub const ALL: [AllowlistKind; 5] = [
        Self::ContractDeployer,
        Self::NativeMinter,
        Self::TxAllowlist,
        Self::FeeManager,
        Self::RewardManager,
    ];

    pub const fn address(self) -> Address {
        match self {
            Self::ContractDeployer => CONTRACT_DEPLOYER_ALLOWLIST_ADDRESS,
            Self::NativeMinter => NATIVE_MINTER_ADDRESS,
            Self::TxAllowlist => TX_ALLOWLIST_ADDRESS,
            Self::FeeManager => FEE_MANAGER_ADDRESS,
            Self::RewardManager => REWARD_MANAGER_ADDRESS,
        }
    }

    /// Key of the precompile's upgrade config inside the chain config.
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::ContractDeployer => "contractDeployerAllowListConfig",
            Self::NativeMinter => "contractNativeMinterConfig",
            Self::TxAllowlist => "txAllowListConfig",
            Self::FeeManager => "feeManagerConfig",
            Self::RewardManager => "rewardManagerConfig",
        }
    }

    /// Diagnostic key prefix for the section field holding this allowlist.
    pub const fn field_path(self) -> &'static str {
        match self {
            Self::ContractDeployer => "permissions.contract_deployer",
            Self::NativeMinter => "tokenomics.native_minter",
            Self::TxAllowlist => "permissions.tx_allowlist",
            Self::FeeManager => "fees.fee_manager",
            Self::RewardManager => "fees.reward_manager",
        }
    }
}

impl fmt::Display for AllowlistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}
