use alloy_primitives::{Bytes, B256};
use l1_primitives::ValidationId;
use serde::{Deserialize, Serialize};

use crate::step::RegistrationStep;

/// Artifacts produced by each step and consumed by later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationContext {
    /// Step 1.
    pub initiate_tx_hash: Option<B256>,
    /// Step 1, unsigned warp message emitted by the manager.
    pub unsigned_warp_message: Option<Bytes>,
    /// Step 1.
    pub validation_id: Option<ValidationId>,
    /// Step 2.
    pub signed_message: Option<Bytes>,
    /// Step 3.
    pub pchain_tx_id: Option<String>,
    /// Step 4.
    pub pchain_signed_warp_message: Option<Bytes>,
    /// Step 5.
    pub finalize_tx_hash: Option<B256>,
}

impl RegistrationContext {
    /// Drops artifacts produced by steps after `step`, which were derived
    /// from the value `step` just replaced.
    pub fn invalidate_after(&mut self, step: RegistrationStep) {
        use RegistrationStep::*;

        let clear_from = |s: RegistrationStep| s > step;
        if clear_from(SignMessage) {
            self.signed_message = None;
        }
        if clear_from(RegisterOnPChain) {
            self.pchain_tx_id = None;
        }
        if clear_from(AggregatePChainSignature) {
            self.pchain_signed_warp_message = None;
        }
        if clear_from(FinalizeRegistration) {
            self.finalize_tx_hash = None;
        }
    }
}
