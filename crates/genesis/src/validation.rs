//! Section validators.
//!
//! Each validator is pure and reports into [`Diagnostics`]. Errors block
//! genesis generation, warnings flag values outside the recommended range.

use std::{collections::BTreeMap, fmt};

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{
    address::parse_address,
    diagnostics::Diagnostics,
    precompile::AllowlistKind,
    state::{Allocation, ChainParams, GenesisConfigState, Permissions, Predeploy, Tokenomics, TransactionFees},
};

pub const MIN_GAS_LIMIT: i64 = 8_000_000;
pub const MAX_GAS_LIMIT: i64 = 100_000_000;
pub const RECOMMENDED_GAS_LIMIT: (i64, i64) = (15_000_000, 30_000_000);

pub const MAX_TARGET_BLOCK_RATE: i64 = 30;
pub const RECOMMENDED_MAX_TARGET_BLOCK_RATE: i64 = 10;

const GWEI: i64 = 1_000_000_000;
pub const RECOMMENDED_MIN_BASE_FEE: (i64, i64) = (GWEI, 500 * GWEI);
pub const RECOMMENDED_BASE_FEE_CHANGE_DENOMINATOR: (i64, i64) = (8, 1000);
pub const RECOMMENDED_MAX_MIN_BLOCK_GAS_COST: i64 = 1_000_000;
pub const RECOMMENDED_MAX_MAX_BLOCK_GAS_COST: i64 = 10_000_000;
pub const RECOMMENDED_TARGET_GAS: (i64, i64) = (5_000_000, 50_000_000);
pub const RECOMMENDED_MAX_BLOCK_GAS_COST_STEP: i64 = 5_000_000;

pub const EMPTY_ALLOCATIONS_MESSAGE: &str = "at least one allocation required";

/// Independently validated parts of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Chain,
    Tokenomics,
    Permissions,
    Fees,
    Predeploys,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Self::Chain,
        Self::Tokenomics,
        Self::Permissions,
        Self::Fees,
        Self::Predeploys,
    ];
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Chain => "chain",
            Self::Tokenomics => "tokenomics",
            Self::Permissions => "permissions",
            Self::Fees => "fees",
            Self::Predeploys => "predeploys",
        };
        f.write_str(s)
    }
}

pub fn validate_chain_params(chain: &ChainParams) -> Diagnostics {
    let mut d = Diagnostics::new();
    if chain.chain_id <= 0 {
        d.error("chain.chain_id", "chain ID must be positive");
    }
    d
}

pub fn validate_gas_limit(gas_limit: i64) -> Diagnostics {
    let mut d = Diagnostics::new();
    let key = "fees.gas_limit";
    if !(MIN_GAS_LIMIT..=MAX_GAS_LIMIT).contains(&gas_limit) {
        d.error(
            key,
            format!("gas limit must be between {MIN_GAS_LIMIT} and {MAX_GAS_LIMIT}"),
        );
    } else if !(RECOMMENDED_GAS_LIMIT.0..=RECOMMENDED_GAS_LIMIT.1).contains(&gas_limit) {
        d.warning(
            key,
            format!(
                "gas limit outside the recommended range {} to {}",
                RECOMMENDED_GAS_LIMIT.0, RECOMMENDED_GAS_LIMIT.1
            ),
        );
    }
    d
}

pub fn validate_target_block_rate(rate: i64) -> Diagnostics {
    let mut d = Diagnostics::new();
    let key = "fees.target_block_rate";
    if rate <= 0 {
        d.error(key, "target block rate must be positive");
    } else if rate > MAX_TARGET_BLOCK_RATE {
        d.error(
            key,
            format!("target block rate must be at most {MAX_TARGET_BLOCK_RATE}s"),
        );
    } else if rate > RECOMMENDED_MAX_TARGET_BLOCK_RATE {
        d.warning(
            key,
            format!("target block rate above {RECOMMENDED_MAX_TARGET_BLOCK_RATE}s slows confirmations"),
        );
    }
    d
}

fn check_range(d: &mut Diagnostics, key: &str, value: i64, (lo, hi): (i64, i64)) {
    if !(lo..=hi).contains(&value) {
        d.warning(key, format!("outside the recommended range {lo} to {hi}"));
    }
}

fn check_max(d: &mut Diagnostics, key: &str, value: i64, max: i64) {
    if value > max {
        d.warning(key, format!("above the recommended maximum {max}"));
    }
}

/// Fee config bounds. Lower bounds are errors, recommended ranges are
/// warnings.
pub fn validate_fee_config(fees: &TransactionFees) -> Diagnostics {
    let mut d = Diagnostics::new();

    let key = "fees.min_base_fee";
    if fees.min_base_fee < 0 {
        d.error(key, "minimum base fee cannot be negative");
    } else {
        check_range(&mut d, key, fees.min_base_fee, RECOMMENDED_MIN_BASE_FEE);
    }

    let key = "fees.base_fee_change_denominator";
    if fees.base_fee_change_denominator <= 0 {
        d.error(key, "base fee change denominator must be positive");
    } else {
        check_range(
            &mut d,
            key,
            fees.base_fee_change_denominator,
            RECOMMENDED_BASE_FEE_CHANGE_DENOMINATOR,
        );
    }

    let key = "fees.min_block_gas_cost";
    if fees.min_block_gas_cost < 0 {
        d.error(key, "minimum block gas cost cannot be negative");
    } else {
        check_max(&mut d, key, fees.min_block_gas_cost, RECOMMENDED_MAX_MIN_BLOCK_GAS_COST);
    }

    let key = "fees.max_block_gas_cost";
    if fees.max_block_gas_cost < 0 {
        d.error(key, "maximum block gas cost cannot be negative");
    } else if fees.max_block_gas_cost < fees.min_block_gas_cost {
        d.error(
            key,
            "maximum block gas cost must not be below the minimum block gas cost",
        );
    } else {
        check_max(&mut d, key, fees.max_block_gas_cost, RECOMMENDED_MAX_MAX_BLOCK_GAS_COST);
    }

    let key = "fees.target_gas";
    if fees.target_gas <= 0 {
        d.error(key, "target gas must be positive");
    } else {
        check_range(&mut d, key, fees.target_gas, RECOMMENDED_TARGET_GAS);
    }

    let key = "fees.block_gas_cost_step";
    if fees.block_gas_cost_step < 0 {
        d.error(key, "block gas cost step cannot be negative");
    } else {
        check_max(&mut d, key, fees.block_gas_cost_step, RECOMMENDED_MAX_BLOCK_GAS_COST_STEP);
    }

    d
}

pub fn validate_allocations(allocations: &[Allocation]) -> Diagnostics {
    let mut d = Diagnostics::new();
    if allocations.is_empty() {
        d.error("tokenomics.allocations", EMPTY_ALLOCATIONS_MESSAGE);
        return d;
    }

    // First index and running total per address.
    let mut balances: BTreeMap<Address, (usize, U256)> = BTreeMap::new();

    for (i, alloc) in allocations.iter().enumerate() {
        let address = parse_address(&alloc.address);
        if let Err(e) = &address {
            d.error(format!("tokenomics.allocations[{i}].address"), e.clone());
        }

        let amount_key = format!("tokenomics.allocations[{i}].amount");
        if alloc.amount.is_nan() || alloc.amount < 0.0 {
            d.error(amount_key, "amount must be a non-negative number");
            continue;
        }
        if alloc.amount.is_infinite() {
            d.error(amount_key, "amount must be finite");
            continue;
        }
        let Some(wei) = alloc.wei() else {
            d.error(amount_key, format!("amount {} does not fit in a wei balance", alloc.amount));
            continue;
        };

        let Ok(address) = address else {
            continue;
        };
        match balances.get_mut(&address) {
            Some((first, total)) => {
                d.warning(
                    format!("tokenomics.allocations[{i}].address"),
                    format!("duplicate of allocation {first}, balances are summed"),
                );
                match total.checked_add(wei) {
                    Some(sum) => *total = sum,
                    None => d.error(amount_key, "summed balance does not fit in a wei balance"),
                }
            }
            None => {
                balances.insert(address, (i, wei));
            }
        }
    }
    d
}

fn is_hex_word(s: &str) -> bool {
    s.strip_prefix("0x")
        .is_some_and(|h| h.len() == 64 && h.bytes().all(|b| b.is_ascii_hexdigit()))
}

pub fn validate_predeploys(predeploys: &[Predeploy]) -> Diagnostics {
    let mut d = Diagnostics::new();
    for (i, p) in predeploys.iter().enumerate() {
        let key = format!("predeploys[{i}]");
        if let Err(e) = parse_address(&p.address) {
            d.error(format!("{key}.address"), e);
        }
        let code_ok = p
            .code
            .strip_prefix("0x")
            .is_some_and(|h| hex::decode(h).is_ok());
        if !code_ok {
            d.error(format!("{key}.code"), "code must be 0x-prefixed hex");
        }
        for (slot, value) in &p.storage {
            if !is_hex_word(slot) || !is_hex_word(value) {
                d.error(
                    format!("{key}.storage"),
                    format!("storage entry {slot} must map a 32-byte hex slot to a 32-byte hex value"),
                );
            }
        }
        if let Some(slot) = &p.owner_slot {
            if !is_hex_word(slot) {
                d.error(format!("{key}.owner_slot"), "owner slot must be 32-byte hex");
            }
        }
    }
    d
}

pub fn validate_tokenomics(tokenomics: &Tokenomics) -> Diagnostics {
    let mut d = validate_allocations(&tokenomics.allocations);
    d.extend(
        tokenomics
            .native_minter
            .validate(AllowlistKind::NativeMinter.field_path()),
    );
    d
}

pub fn validate_permissions(permissions: &Permissions) -> Diagnostics {
    let mut d = permissions
        .contract_deployer
        .validate(AllowlistKind::ContractDeployer.field_path());
    d.extend(
        permissions
            .tx_allowlist
            .validate(AllowlistKind::TxAllowlist.field_path()),
    );
    d
}

pub fn validate_fees(fees: &TransactionFees) -> Diagnostics {
    let mut d = validate_gas_limit(fees.gas_limit);
    d.extend(validate_target_block_rate(fees.target_block_rate));
    d.extend(validate_fee_config(fees));
    d.extend(fees.fee_manager.validate(AllowlistKind::FeeManager.field_path()));
    d.extend(
        fees.reward_manager
            .validate(AllowlistKind::RewardManager.field_path()),
    );
    d
}

pub fn validate_section(state: &GenesisConfigState, section: Section) -> Diagnostics {
    match section {
        Section::Chain => validate_chain_params(&state.chain),
        Section::Tokenomics => validate_tokenomics(&state.tokenomics),
        Section::Permissions => validate_permissions(&state.permissions),
        Section::Fees => validate_fees(&state.fees),
        Section::Predeploys => validate_predeploys(&state.predeploys),
    }
}

/// Validates every section. Genesis may be generated iff the result has no
/// errors.
pub fn validate(state: &GenesisConfigState) -> Diagnostics {
    let mut d = Diagnostics::new();
    for section in Section::ALL {
        d.extend(validate_section(state, section));
    }
    d
}
