//! [`ValidatorManager`] over an alloy HTTP provider.

use std::fmt;

use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{AccessList, AccessListItem, TransactionReceipt},
    signers::local::PrivateKeySigner,
    sol,
    transports::http::reqwest::Url,
};
use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use l1_primitives::AccessListEntry;
use l1_validator_registration::{
    InitiateRegistration, PChainOwner, ReceiptLog, TxReceipt, ValidatorManager,
    ValidatorManagerError,
};
use tracing::{debug, instrument};

sol! {
    #[sol(rpc)]
    interface IValidatorManager {
        struct PChainOwner {
            uint32 threshold;
            address[] addresses;
        }

        function initiateValidatorRegistration(
            bytes memory nodeID,
            bytes memory blsPublicKey,
            uint64 registrationExpiry,
            PChainOwner memory remainingBalanceOwner,
            PChainOwner memory disableOwner,
            uint64 weight
        ) external returns (bytes32 validationID);

        function completeValidatorRegistration(uint32 messageIndex)
            external
            returns (bytes32 validationID);
    }
}

/// Sends validator manager transactions from a local private-key wallet.
#[derive(Clone)]
pub struct AlloyValidatorManager {
    provider: DynProvider,
    sender: Address,
}

impl fmt::Debug for AlloyValidatorManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlloyValidatorManager")
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

impl AlloyValidatorManager {
    pub fn new(rpc_url: &str, private_key: &str) -> Result<Self, ValidatorManagerError> {
        let url: Url = rpc_url
            .parse()
            .map_err(|e| ValidatorManagerError::Transport(format!("rpc url {rpc_url}: {e}")))?;
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| ValidatorManagerError::Contract(format!("private key: {e}")))?;
        let sender = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        Ok(Self { provider, sender })
    }

    /// Address transactions are sent from.
    pub fn sender(&self) -> Address {
        self.sender
    }
}

fn to_sol_owner(owner: PChainOwner) -> IValidatorManager::PChainOwner {
    IValidatorManager::PChainOwner {
        threshold: owner.threshold,
        addresses: owner.addresses,
    }
}

fn to_access_list(entries: Vec<AccessListEntry>) -> AccessList {
    AccessList(
        entries
            .into_iter()
            .map(|e| AccessListItem {
                address: e.address,
                storage_keys: e.storage_keys,
            })
            .collect(),
    )
}

fn to_receipt(receipt: &TransactionReceipt) -> TxReceipt {
    TxReceipt {
        tx_hash: receipt.transaction_hash,
        success: receipt.status(),
        logs: receipt
            .inner
            .logs()
            .iter()
            .map(|log| ReceiptLog {
                address: log.inner.address,
                topics: log.inner.data.topics().to_vec(),
                data: log.inner.data.data.clone(),
            })
            .collect(),
    }
}

fn contract_err(e: alloy::contract::Error) -> ValidatorManagerError {
    ValidatorManagerError::Contract(e.to_string())
}

fn receipt_err(e: alloy::providers::PendingTransactionError) -> ValidatorManagerError {
    ValidatorManagerError::Transport(e.to_string())
}

#[async_trait]
impl ValidatorManager for AlloyValidatorManager {
    #[instrument(skip(self, call), fields(node_id = %call.node_id))]
    async fn initiate_validator_registration(
        &self,
        manager: Address,
        call: InitiateRegistration,
    ) -> Result<TxReceipt, ValidatorManagerError> {
        let contract = IValidatorManager::new(manager, &self.provider);
        let pending = contract
            .initiateValidatorRegistration(
                Bytes::copy_from_slice(call.node_id.as_bytes()),
                Bytes::copy_from_slice(call.bls_public_key.as_bytes()),
                call.registration_expiry,
                to_sol_owner(call.remaining_balance_owner),
                to_sol_owner(call.disable_owner),
                call.weight,
            )
            .send()
            .await
            .map_err(contract_err)?;
        debug!(tx = %pending.tx_hash(), "initiateValidatorRegistration sent");

        let receipt = pending.get_receipt().await.map_err(receipt_err)?;
        Ok(to_receipt(&receipt))
    }

    #[instrument(skip(self, access_list))]
    async fn complete_validator_registration(
        &self,
        manager: Address,
        message_index: u32,
        access_list: Vec<AccessListEntry>,
    ) -> Result<TxReceipt, ValidatorManagerError> {
        let contract = IValidatorManager::new(manager, &self.provider);
        let pending = contract
            .completeValidatorRegistration(message_index)
            .access_list(to_access_list(access_list))
            .send()
            .await
            .map_err(contract_err)?;
        debug!(tx = %pending.tx_hash(), "completeValidatorRegistration sent");

        let receipt = pending.get_receipt().await.map_err(receipt_err)?;
        Ok(to_receipt(&receipt))
    }
}

#[cfg(test)]
mod tests {
    use alloy::sol_types::SolCall;
    use alloy_primitives::B256;

    use super::*;

    // Anvil's first dev account.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_new_derives_sender() {
        let vm = AlloyValidatorManager::new("http://127.0.0.1:9650/ext/bc/C/rpc", DEV_KEY).unwrap();
        assert_eq!(
            vm.sender(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn test_new_rejects_bad_inputs() {
        assert!(matches!(
            AlloyValidatorManager::new("not a url", DEV_KEY),
            Err(ValidatorManagerError::Transport(_))
        ));
        assert!(matches!(
            AlloyValidatorManager::new("http://127.0.0.1:9650", "0x1234"),
            Err(ValidatorManagerError::Contract(_))
        ));
    }

    #[test]
    fn test_access_list_conversion() {
        let entry = AccessListEntry::warp_predicate(&[1, 2, 3]);
        let list = to_access_list(vec![entry.clone()]);
        assert_eq!(list.0.len(), 1);
        assert_eq!(list.0[0].address, entry.address);
        assert_eq!(list.0[0].storage_keys, entry.storage_keys);
        assert_ne!(list.0[0].storage_keys[0], B256::ZERO);
    }

    #[test]
    fn test_complete_call_encoding() {
        let call = IValidatorManager::completeValidatorRegistrationCall { messageIndex: 0 };
        let data = call.abi_encode();
        assert_eq!(data.len(), 4 + 32);
        assert!(data[4..].iter().all(|b| *b == 0));
    }
}
