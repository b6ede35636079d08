//! Builds a [`GenesisDocument`] from a validated [`GenesisConfigState`].

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::{
    address::parse_address,
    allowlist::{AllowlistPrecompileConfig, AllowlistRole},
    document::{
        hex_quantity, AllowListConfig, ChainConfig, FeeConfig, GenesisAccount, GenesisDocument,
        WarpConfig, WARP_QUORUM_NUMERATOR, ZERO_ADDRESS, ZERO_HASH,
    },
    error::{GenesisError, GenesisResult},
    precompile::AllowlistKind,
    state::{GenesisConfigState, TransactionFees},
    validation::validate,
};

/// Assembles the genesis document.
///
/// `timestamp` (unix seconds) becomes both the genesis block timestamp and
/// the Warp activation timestamp. Identical inputs produce identical output.
pub fn assemble(state: &GenesisConfigState, timestamp: u64) -> GenesisResult<GenesisDocument> {
    let diags = validate(state);
    if diags.has_errors() {
        return Err(GenesisError::Invalid(diags));
    }

    // Validation guarantees these are non-negative.
    let chain_id = state.chain.chain_id as u64;
    let fee_config = fee_config(&state.fees);
    let gas_limit = fee_config.gas_limit;

    let mut config = ChainConfig::new(
        chain_id,
        fee_config,
        WarpConfig {
            block_timestamp: timestamp,
            quorum_numerator: WARP_QUORUM_NUMERATOR,
            require_primary_network_signers: true,
        },
    );

    for kind in AllowlistKind::ALL {
        let allowlist = state.allowlist(kind);
        if allowlist.activated {
            config
                .precompiles
                .insert(kind.config_key().to_string(), allowlist_config(allowlist));
        }
    }

    let alloc = build_alloc(state)?;
    debug!(%chain_id, accounts = alloc.len(), "assembled genesis");

    Ok(GenesisDocument {
        config,
        alloc,
        nonce: hex_quantity(0),
        timestamp: hex_quantity(timestamp),
        extra_data: "0x".to_string(),
        gas_limit: hex_quantity(gas_limit),
        difficulty: hex_quantity(0),
        mix_hash: ZERO_HASH.to_string(),
        coinbase: ZERO_ADDRESS.to_string(),
        number: hex_quantity(0),
        gas_used: hex_quantity(0),
        parent_hash: ZERO_HASH.to_string(),
    })
}

fn fee_config(fees: &TransactionFees) -> FeeConfig {
    FeeConfig {
        gas_limit: fees.gas_limit as u64,
        target_block_rate: fees.target_block_rate as u64,
        min_base_fee: fees.min_base_fee as u64,
        target_gas: fees.target_gas as u64,
        base_fee_change_denominator: fees.base_fee_change_denominator as u64,
        min_block_gas_cost: fees.min_block_gas_cost as u64,
        max_block_gas_cost: fees.max_block_gas_cost as u64,
        block_gas_cost_step: fees.block_gas_cost_step as u64,
    }
}

fn checksummed(addresses: Vec<Address>) -> Vec<String> {
    addresses.iter().map(|a| a.to_checksum(None)).collect()
}

fn allowlist_config(allowlist: &AllowlistPrecompileConfig) -> AllowListConfig {
    let addrs = &allowlist.addresses;
    AllowListConfig {
        block_timestamp: 0,
        admin_addresses: checksummed(addrs.addresses(AllowlistRole::Admin)),
        manager_addresses: checksummed(addrs.addresses(AllowlistRole::Manager)),
        enabled_addresses: checksummed(addrs.addresses(AllowlistRole::Enabled)),
    }
}

fn alloc_key(address: &Address) -> String {
    hex::encode(address)
}

fn owner_word(owner: &Address) -> String {
    format!("0x{:0>64}", hex::encode(owner))
}

fn build_alloc(state: &GenesisConfigState) -> GenesisResult<BTreeMap<String, GenesisAccount>> {
    let mut balances: BTreeMap<String, U256> = BTreeMap::new();
    let mut owner = None;

    for (index, alloc) in state.tokenomics.allocations.iter().enumerate() {
        let address = parse_address(&alloc.address)
            .map_err(|reason| GenesisError::Address { index, reason })?;
        owner.get_or_insert(address);

        let amount_err = || GenesisError::Amount {
            index,
            amount: alloc.amount,
        };
        let wei = alloc.wei().ok_or_else(amount_err)?;

        // Duplicates are summed; validation reports them as warnings.
        let balance = balances.entry(alloc_key(&address)).or_default();
        *balance = balance.checked_add(wei).ok_or_else(amount_err)?;
    }

    let mut accounts: BTreeMap<String, GenesisAccount> = balances
        .into_iter()
        .map(|(key, balance)| {
            let account = GenesisAccount {
                balance: format!("0x{balance:x}"),
                ..Default::default()
            };
            (key, account)
        })
        .collect();

    for predeploy in &state.predeploys {
        let Ok(address) = parse_address(&predeploy.address) else {
            continue;
        };
        let account = accounts
            .entry(alloc_key(&address))
            .or_insert_with(|| GenesisAccount {
                balance: hex_quantity(0),
                ..Default::default()
            });

        account.code = Some(predeploy.code.to_ascii_lowercase());
        account.storage.extend(
            predeploy
                .storage
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_ascii_lowercase())),
        );

        if let (Some(slot), Some(owner)) = (&predeploy.owner_slot, &owner) {
            account
                .storage
                .insert(slot.to_ascii_lowercase(), owner_word(owner));
        }
    }

    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Allocation, Predeploy};

    const OWNER: &str = "0x8db97C7cEcE249c2b98bDC0226Cc4C2A57BF52FC";

    fn state() -> GenesisConfigState {
        let mut s = GenesisConfigState::default();
        s.chain.chain_id = 12345;
        s.tokenomics.allocations = vec![Allocation::new(OWNER, 1.5)];
        s
    }

    #[test]
    fn test_balance_in_wei() {
        let doc = assemble(&state(), 0).unwrap();
        let acct = &doc.alloc["8db97c7cece249c2b98bdc0226cc4c2a57bf52fc"];
        // 1.5 * 10^18
        assert_eq!(acct.balance, "0x14d1120d7b160000");
    }

    #[test]
    fn test_owner_slot() {
        let mut s = state();
        let slot = format!("0x{}", "0".repeat(64));
        s.predeploys.push(Predeploy {
            name: "proxy-admin".into(),
            address: format!("0x{}", "C0FFEE".repeat(6) + "0000"),
            code: "0x60806040".into(),
            storage: BTreeMap::new(),
            owner_slot: Some(slot.clone()),
        });

        let doc = assemble(&s, 0).unwrap();
        let acct = &doc.alloc[&format!("{}0000", "c0ffee".repeat(6))];
        assert_eq!(acct.code.as_deref(), Some("0x60806040"));
        assert_eq!(
            acct.storage[&slot],
            "0x0000000000000000000000008db97c7cece249c2b98bdc0226cc4c2a57bf52fc"
        );
    }

    #[test]
    fn test_duplicate_allocations_sum() {
        let mut s = state();
        s.tokenomics.allocations.push(Allocation::new(OWNER.to_lowercase(), 0.5));
        let doc = assemble(&s, 0).unwrap();
        assert_eq!(doc.alloc.len(), 1);
        // 2 * 10^18
        assert_eq!(
            doc.alloc["8db97c7cece249c2b98bdc0226cc4c2a57bf52fc"].balance,
            "0x1bc16d674ec80000"
        );
    }

    #[test]
    fn test_amount_precision() {
        let wei = |amount| Allocation::new(OWNER, amount).wei();
        assert_eq!(wei(0.1), Some(U256::from(100_000_000_000_000_000u64)));
        assert_eq!(wei(0.0), Some(U256::ZERO));
        // Shortest form has more than 18 decimals.
        assert!(wei(1.2345678901234567e-5).is_some());
        assert_eq!(wei(1e60), None);
        assert_eq!(wei(-1.0), None);
    }

    #[test]
    fn test_invalid_state_rejected() {
        let mut s = state();
        s.fees.gas_limit = 1;
        assert!(matches!(assemble(&s, 0), Err(GenesisError::Invalid(_))));
    }
}
