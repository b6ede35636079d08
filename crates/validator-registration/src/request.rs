//! Registration inputs and their precondition checks.

use std::str::FromStr;

use alloy_primitives::Address;
use l1_primitives::{
    AvalancheNetwork, BlsProofOfPossession, BlsPublicKey, NodeId, PChainAddress,
    PrimitiveParseError, SubnetId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default P-Chain balance funding the validator's continuous fee, 0.1 AVAX.
pub const DEFAULT_VALIDATOR_BALANCE_NAVAX: u64 = 100_000_000;

/// Raised before step 1 when the request is incomplete or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid {field}: {source}")]
    Invalid {
        field: &'static str,
        #[source]
        source: PrimitiveParseError,
    },

    #[error("invalid validator manager address: {0}")]
    InvalidManagerAddress(String),

    #[error("weight must be a positive integer")]
    InvalidWeight,

    #[error("validator balance must be positive")]
    InvalidBalance,
}

/// Registration inputs as supplied by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub node_id: String,
    pub bls_public_key: String,
    pub bls_proof_of_possession: String,
    pub pchain_address: String,
    pub weight: String,
    pub validator_manager_address: String,
    pub subnet_id: String,
    pub network: AvalancheNetwork,
    #[serde(default = "default_balance")]
    pub balance_navax: u64,
}

fn default_balance() -> u64 {
    DEFAULT_VALIDATOR_BALANCE_NAVAX
}

/// A [`RegistrationRequest`] with every field parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub node_id: NodeId,
    pub bls_public_key: BlsPublicKey,
    pub bls_proof_of_possession: BlsProofOfPossession,
    pub pchain_address: PChainAddress,
    pub weight: u64,
    pub validator_manager: Address,
    pub subnet_id: SubnetId,
    pub network: AvalancheNetwork,
    pub balance_navax: u64,
}

fn require<'a>(value: &'a str, field: &'static str) -> Result<&'a str, PreconditionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PreconditionError::Missing(field));
    }
    Ok(trimmed)
}

fn parse<T>(value: &str, field: &'static str) -> Result<T, PreconditionError>
where
    T: FromStr<Err = PrimitiveParseError>,
{
    require(value, field)?
        .parse()
        .map_err(|source| PreconditionError::Invalid { field, source })
}

impl RegistrationRequest {
    /// Checks presence of every field, then parses them.
    pub fn validate(&self) -> Result<ValidatedRequest, PreconditionError> {
        require(&self.node_id, "node ID")?;
        require(&self.bls_public_key, "BLS public key")?;
        require(&self.bls_proof_of_possession, "BLS proof of possession")?;
        require(&self.pchain_address, "P-Chain address")?;
        require(&self.weight, "weight")?;
        require(&self.validator_manager_address, "validator manager address")?;
        require(&self.subnet_id, "subnet ID")?;

        let weight = self
            .weight
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|w| *w > 0)
            .ok_or(PreconditionError::InvalidWeight)?;

        if self.balance_navax == 0 {
            return Err(PreconditionError::InvalidBalance);
        }

        let validator_manager = self
            .validator_manager_address
            .trim()
            .parse::<Address>()
            .map_err(|e| PreconditionError::InvalidManagerAddress(e.to_string()))?;

        Ok(ValidatedRequest {
            node_id: parse(&self.node_id, "node ID")?,
            bls_public_key: parse(&self.bls_public_key, "BLS public key")?,
            bls_proof_of_possession: parse(
                &self.bls_proof_of_possession,
                "BLS proof of possession",
            )?,
            pchain_address: parse(&self.pchain_address, "P-Chain address")?,
            weight,
            validator_manager,
            subnet_id: parse(&self.subnet_id, "subnet ID")?,
            network: self.network,
            balance_navax: self.balance_navax,
        })
    }
}
