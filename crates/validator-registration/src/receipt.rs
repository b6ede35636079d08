//! Pulling step-1 artifacts out of the `initiateValidatorRegistration`
//! receipt.
//!
//! The first log is the warp precompile's `SendWarpMessage` event whose data
//! is the ABI-encoded unsigned message; the second is the manager's
//! registration event whose first indexed topic is the validation ID.

use alloy_sol_types::{sol_data, SolType};
use l1_primitives::ValidationId;

use crate::traits::TxReceipt;

/// Step-1 artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatedRegistration {
    pub unsigned_warp_message: Vec<u8>,
    pub validation_id: ValidationId,
}

pub fn extract_initiated(receipt: &TxReceipt) -> Result<InitiatedRegistration, String> {
    let warp_log = receipt
        .logs
        .first()
        .ok_or("receipt has no warp message log")?;
    let (message,) = <(sol_data::Bytes,)>::abi_decode_params(&warp_log.data)
        .map_err(|e| format!("decode warp message log: {e}"))?;
    if message.is_empty() {
        return Err("warp message log carries an empty message".into());
    }

    let validation_id = receipt
        .logs
        .get(1)
        .and_then(|log| log.topics.get(1))
        .ok_or("receipt has no validation ID topic")?;

    Ok(InitiatedRegistration {
        unsigned_warp_message: message.to_vec(),
        validation_id: ValidationId::new(validation_id.0),
    })
}
