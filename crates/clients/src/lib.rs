//! Network implementations of the validator registration seams: the
//! validator manager contract over alloy, the P-Chain API over jsonrpsee and
//! the signature aggregation API over reqwest.
//!
//! These are library entry points. An embedding service that holds the
//! operator's keys builds [`AlloyValidatorManager`], [`HttpSignatureAggregator`]
//! and a [`PChainRpcClient`] with a real [`RegisterL1ValidatorSigner`], then
//! passes them to the orchestrator through
//! [`RegistrationDeps`](l1_validator_registration::RegistrationDeps). The
//! `l1-toolbox` binary holds no keys, so it only uses [`PChainRpcClient`] with
//! [`NoSigner`] to query transaction status.

mod aggregator;
mod pchain;
mod validator_manager;

pub use aggregator::{
    aggregator_endpoint, HttpSignatureAggregator, DEFAULT_AGGREGATOR_TIMEOUT,
    DEFAULT_AGGREGATOR_URL,
};
pub use pchain::{
    pchain_endpoint, NoSigner, PChainRpcClient, RegisterL1ValidatorSigner, PCHAIN_RPC_PATH,
};
pub use validator_manager::AlloyValidatorManager;
