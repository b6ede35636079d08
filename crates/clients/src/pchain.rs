//! [`PChainClient`] over the `platform.*` JSON-RPC API.

use std::fmt;

use async_trait::async_trait;
use jsonrpsee::{
    core::{client::ClientT, params::ObjectParams},
    http_client::{HttpClient, HttpClientBuilder},
};
use l1_primitives::cb58;
use l1_validator_registration::{PChainClient, PChainError, PChainTxStatus, RegisterL1ValidatorTx};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Path of the P-Chain endpoint on an Avalanche API node.
pub const PCHAIN_RPC_PATH: &str = "/ext/bc/P";

/// Builds and signs `RegisterL1ValidatorTx` transactions.
///
/// Produces the serialized signed transaction bytes ready for
/// `platform.issueTx`.
#[async_trait]
pub trait RegisterL1ValidatorSigner: Send + Sync + 'static {
    async fn sign_register_l1_validator(
        &self,
        tx: &RegisterL1ValidatorTx,
    ) -> Result<Vec<u8>, PChainError>;
}

/// Signer for status-only clients; every signing attempt fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSigner;

#[async_trait]
impl RegisterL1ValidatorSigner for NoSigner {
    async fn sign_register_l1_validator(
        &self,
        _tx: &RegisterL1ValidatorTx,
    ) -> Result<Vec<u8>, PChainError> {
        Err(PChainError::Signer("no P-Chain signer configured".into()))
    }
}

#[derive(Debug, Deserialize)]
struct IssueTxResponse {
    #[serde(rename = "txID")]
    tx_id: String,
}

#[derive(Debug, Deserialize)]
struct TxStatusResponse {
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

/// `{base_url}/ext/bc/P`, tolerating a trailing slash or an already
/// complete endpoint.
pub fn pchain_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with(PCHAIN_RPC_PATH) {
        base.to_owned()
    } else {
        format!("{base}{PCHAIN_RPC_PATH}")
    }
}

fn parse_status(resp: TxStatusResponse) -> PChainTxStatus {
    match resp.status.as_str() {
        "Committed" => PChainTxStatus::Committed,
        "Processing" => PChainTxStatus::Processing,
        "Dropped" => PChainTxStatus::Dropped {
            reason: resp.reason,
        },
        "Unknown" => PChainTxStatus::Unknown,
        other => {
            warn!(status = %other, "unrecognized p-chain tx status");
            PChainTxStatus::Unknown
        }
    }
}

fn rpc_err(e: impl fmt::Display) -> PChainError {
    PChainError::Rpc(e.to_string())
}

/// P-Chain API client that delegates transaction signing to `S`.
#[derive(Debug)]
pub struct PChainRpcClient<S> {
    client: HttpClient,
    signer: S,
}

impl<S> PChainRpcClient<S> {
    pub fn new(base_url: &str, signer: S) -> Result<Self, PChainError> {
        let client = HttpClientBuilder::default()
            .build(pchain_endpoint(base_url))
            .map_err(rpc_err)?;
        Ok(Self { client, signer })
    }

    /// Submits an already signed transaction, returning its ID.
    pub async fn issue_tx(&self, signed_tx: &[u8]) -> Result<String, PChainError> {
        let mut params = ObjectParams::new();
        params
            .insert("tx", cb58::encode_hex_checksummed(signed_tx))
            .map_err(|e| PChainError::Decode(e.to_string()))?;
        params
            .insert("encoding", "hex")
            .map_err(|e| PChainError::Decode(e.to_string()))?;

        let resp: IssueTxResponse = self
            .client
            .request("platform.issueTx", params)
            .await
            .map_err(rpc_err)?;
        Ok(resp.tx_id)
    }
}

#[async_trait]
impl<S: RegisterL1ValidatorSigner> PChainClient for PChainRpcClient<S> {
    #[instrument(skip(self, tx), fields(balance = tx.balance_navax))]
    async fn register_l1_validator(&self, tx: RegisterL1ValidatorTx) -> Result<String, PChainError> {
        let signed = self.signer.sign_register_l1_validator(&tx).await?;
        let tx_id = self.issue_tx(&signed).await?;
        debug!(%tx_id, "issued RegisterL1ValidatorTx");
        Ok(tx_id)
    }

    async fn get_tx_status(&self, tx_id: &str) -> Result<PChainTxStatus, PChainError> {
        let mut params = ObjectParams::new();
        params
            .insert("txID", tx_id)
            .map_err(|e| PChainError::Decode(e.to_string()))?;

        let resp: TxStatusResponse = self
            .client
            .request("platform.getTxStatus", params)
            .await
            .map_err(rpc_err)?;
        Ok(parse_status(resp))
    }
}
