//! Seams to the three remote systems a registration talks to.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use l1_primitives::{AccessListEntry, BlsProofOfPossession, BlsPublicKey, NodeId, SubnetId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Owner of leftover P-Chain balance or of the disable right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PChainOwner {
    pub threshold: u32,
    pub addresses: Vec<Address>,
}

impl PChainOwner {
    /// A 1-of-1 owner.
    pub fn single(address: Address) -> Self {
        Self {
            threshold: 1,
            addresses: vec![address],
        }
    }
}

/// Arguments to `initiateValidatorRegistration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiateRegistration {
    pub node_id: NodeId,
    pub bls_public_key: BlsPublicKey,
    pub registration_expiry: u64,
    pub remaining_balance_owner: PChainOwner,
    pub disable_owner: PChainOwner,
    pub weight: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// The parts of an EVM receipt the workflow reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub success: bool,
    pub logs: Vec<ReceiptLog>,
}

#[derive(Debug, Error)]
pub enum ValidatorManagerError {
    #[error("transport: {0}")]
    Transport(String),

    #[error("contract call: {0}")]
    Contract(String),
}

/// The validator manager contract on the L1.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ValidatorManager: Send + Sync + 'static {
    /// Sends `initiateValidatorRegistration` and waits for the receipt.
    async fn initiate_validator_registration(
        &self,
        manager: Address,
        call: InitiateRegistration,
    ) -> Result<TxReceipt, ValidatorManagerError>;

    /// Sends `completeValidatorRegistration(message_index)` carrying
    /// `access_list`, and waits for the receipt.
    async fn complete_validator_registration(
        &self,
        manager: Address,
        message_index: u32,
        access_list: Vec<AccessListEntry>,
    ) -> Result<TxReceipt, ValidatorManagerError>;
}

/// One signature aggregation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRequest {
    pub message: Vec<u8>,
    pub justification: Option<Vec<u8>>,
    pub signing_subnet_id: SubnetId,
    pub quorum_percentage: u8,
}

#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("http: {0}")]
    Http(String),

    #[error("aggregator returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decode response: {0}")]
    Decode(String),
}

/// Collects BLS signatures from a quorum of validators.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait SignatureAggregator: Send + Sync + 'static {
    /// Returns the signed warp message bytes.
    async fn aggregate_signatures(&self, req: AggregateRequest) -> Result<Vec<u8>, AggregatorError>;
}

/// Inputs to a P-Chain `RegisterL1ValidatorTx`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterL1ValidatorTx {
    pub balance_navax: u64,
    pub proof_of_possession: BlsProofOfPossession,
    pub signed_warp_message: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PChainTxStatus {
    Committed,
    Processing,
    Dropped { reason: Option<String> },
    Unknown,
}

#[derive(Debug, Error)]
pub enum PChainError {
    #[error("rpc: {0}")]
    Rpc(String),

    #[error("signing: {0}")]
    Signer(String),

    #[error("decode: {0}")]
    Decode(String),
}

/// P-Chain node API.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait PChainClient: Send + Sync + 'static {
    /// Builds, signs and issues the transaction, returning its ID.
    async fn register_l1_validator(&self, tx: RegisterL1ValidatorTx) -> Result<String, PChainError>;

    async fn get_tx_status(&self, tx_id: &str) -> Result<PChainTxStatus, PChainError>;
}
