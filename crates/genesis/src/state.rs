//! User-edited genesis sections.
//!
//! Numeric fields are signed and allocation amounts are floats so that
//! out-of-range input survives parsing and is reported by the validators.

use std::collections::BTreeMap;

use alloy_primitives::{utils::parse_ether, U256};
use serde::{Deserialize, Serialize};

use crate::{allowlist::AllowlistPrecompileConfig, precompile::AllowlistKind};

pub const DEFAULT_CHAIN_ID: i64 = 99999;
pub const DEFAULT_GAS_LIMIT: i64 = 20_000_000;
pub const DEFAULT_TARGET_BLOCK_RATE: i64 = 2;
pub const DEFAULT_MIN_BASE_FEE: i64 = 25_000_000_000;
pub const DEFAULT_TARGET_GAS: i64 = 15_000_000;
pub const DEFAULT_BASE_FEE_CHANGE_DENOMINATOR: i64 = 36;
pub const DEFAULT_MIN_BLOCK_GAS_COST: i64 = 0;
pub const DEFAULT_MAX_BLOCK_GAS_COST: i64 = 1_000_000;
pub const DEFAULT_BLOCK_GAS_COST_STEP: i64 = 200_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    #[serde(default = "default_chain_id")]
    pub chain_id: i64,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
        }
    }
}

fn default_chain_id() -> i64 {
    DEFAULT_CHAIN_ID
}

/// Initial balance for one account, in whole native tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub address: String,
    pub amount: f64,
}

impl Allocation {
    pub fn new(address: impl Into<String>, amount: f64) -> Self {
        Self {
            address: address.into(),
            amount,
        }
    }

    /// The amount in wei, rounded to 18 decimals. `None` when the amount is
    /// negative, not finite, or does not fit in 256 bits.
    pub fn wei(&self) -> Option<U256> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return None;
        }
        parse_ether(&self.amount.to_string())
            .or_else(|_| parse_ether(&format!("{:.18}", self.amount)))
            .ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tokenomics {
    pub allocations: Vec<Allocation>,
    pub native_minter: AllowlistPrecompileConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permissions {
    pub contract_deployer: AllowlistPrecompileConfig,
    pub tx_allowlist: AllowlistPrecompileConfig,
}

/// Gas and fee parameters. `target_block_rate` is in seconds, fee values
/// in wei.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionFees {
    pub gas_limit: i64,
    pub target_block_rate: i64,
    pub min_base_fee: i64,
    pub target_gas: i64,
    pub base_fee_change_denominator: i64,
    pub min_block_gas_cost: i64,
    pub max_block_gas_cost: i64,
    pub block_gas_cost_step: i64,
    pub fee_manager: AllowlistPrecompileConfig,
    pub reward_manager: AllowlistPrecompileConfig,
}

impl Default for TransactionFees {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            target_block_rate: DEFAULT_TARGET_BLOCK_RATE,
            min_base_fee: DEFAULT_MIN_BASE_FEE,
            target_gas: DEFAULT_TARGET_GAS,
            base_fee_change_denominator: DEFAULT_BASE_FEE_CHANGE_DENOMINATOR,
            min_block_gas_cost: DEFAULT_MIN_BLOCK_GAS_COST,
            max_block_gas_cost: DEFAULT_MAX_BLOCK_GAS_COST,
            block_gas_cost_step: DEFAULT_BLOCK_GAS_COST_STEP,
            fee_manager: AllowlistPrecompileConfig::default(),
            reward_manager: AllowlistPrecompileConfig::default(),
        }
    }
}

/// A contract placed in the genesis state.
///
/// When `owner_slot` is set, the first allocation's address is written to
/// that storage slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Predeploy {
    pub name: String,
    pub address: String,
    /// Runtime bytecode, `0x`-prefixed hex.
    pub code: String,
    /// Storage slot to value, both 32-byte `0x` hex.
    pub storage: BTreeMap<String, String>,
    pub owner_slot: Option<String>,
}

/// The full editable genesis configuration for one chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisConfigState {
    pub chain: ChainParams,
    pub tokenomics: Tokenomics,
    pub permissions: Permissions,
    pub fees: TransactionFees,
    pub predeploys: Vec<Predeploy>,
}

impl GenesisConfigState {
    pub fn allowlist(&self, kind: AllowlistKind) -> &AllowlistPrecompileConfig {
        match kind {
            AllowlistKind::ContractDeployer => &self.permissions.contract_deployer,
            AllowlistKind::NativeMinter => &self.tokenomics.native_minter,
            AllowlistKind::TxAllowlist => &self.permissions.tx_allowlist,
            AllowlistKind::FeeManager => &self.fees.fee_manager,
            AllowlistKind::RewardManager => &self.fees.reward_manager,
        }
    }

    pub fn allowlist_mut(&mut self, kind: AllowlistKind) -> &mut AllowlistPrecompileConfig {
        match kind {
            AllowlistKind::ContractDeployer => &mut self.permissions.contract_deployer,
            AllowlistKind::NativeMinter => &mut self.tokenomics.native_minter,
            AllowlistKind::TxAllowlist => &mut self.permissions.tx_allowlist,
            AllowlistKind::FeeManager => &mut self.fees.fee_manager,
            AllowlistKind::RewardManager => &mut self.fees.reward_manager,
        }
    }
}

/// A single user edit to a [`GenesisConfigState`].
#[derive(Debug, Clone, PartialEq)]
pub enum GenesisEdit {
    SetChainId(i64),
    SetGasLimit(i64),
    SetTargetBlockRate(i64),
    SetMinBaseFee(i64),
    SetTargetGas(i64),
    SetBaseFeeChangeDenominator(i64),
    SetMinBlockGasCost(i64),
    SetMaxBlockGasCost(i64),
    SetBlockGasCostStep(i64),
    AddAllocation(Allocation),
    RemoveAllocation(usize),
    SetAllocations(Vec<Allocation>),
    SetAllowlist(AllowlistKind, AllowlistPrecompileConfig),
    SetPredeploys(Vec<Predeploy>),
    Replace(Box<GenesisConfigState>),
}

impl GenesisEdit {
    /// Applies the edit. Removing an out-of-range allocation is a no-op.
    pub fn apply(self, state: &mut GenesisConfigState) {
        let fees = &mut state.fees;
        match self {
            Self::SetChainId(v) => state.chain.chain_id = v,
            Self::SetGasLimit(v) => fees.gas_limit = v,
            Self::SetTargetBlockRate(v) => fees.target_block_rate = v,
            Self::SetMinBaseFee(v) => fees.min_base_fee = v,
            Self::SetTargetGas(v) => fees.target_gas = v,
            Self::SetBaseFeeChangeDenominator(v) => fees.base_fee_change_denominator = v,
            Self::SetMinBlockGasCost(v) => fees.min_block_gas_cost = v,
            Self::SetMaxBlockGasCost(v) => fees.max_block_gas_cost = v,
            Self::SetBlockGasCostStep(v) => fees.block_gas_cost_step = v,
            Self::AddAllocation(a) => state.tokenomics.allocations.push(a),
            Self::RemoveAllocation(i) => {
                if i < state.tokenomics.allocations.len() {
                    state.tokenomics.allocations.remove(i);
                }
            }
            Self::SetAllocations(a) => state.tokenomics.allocations = a,
            Self::SetAllowlist(kind, cfg) => *state.allowlist_mut(kind) = cfg,
            Self::SetPredeploys(p) => state.predeploys = p,
            Self::Replace(s) => *state = *s,
        }
    }
}
