use std::{fmt, str::FromStr};

use l1_step_tracker::StepKey;
use serde::{Deserialize, Serialize};

/// The steps of a validator registration, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    /// `initiateValidatorRegistration` on the validator manager.
    InitializeRegistration,
    /// Aggregate signatures over the unsigned registration message.
    SignMessage,
    /// Submit `RegisterL1ValidatorTx` and wait for it to commit.
    RegisterOnPChain,
    /// Aggregate signatures over the P-Chain registration attestation.
    AggregatePChainSignature,
    /// `completeValidatorRegistration` with the attestation as a predicate.
    FinalizeRegistration,
}

impl StepKey for RegistrationStep {
    fn all() -> &'static [Self] {
        &[
            Self::InitializeRegistration,
            Self::SignMessage,
            Self::RegisterOnPChain,
            Self::AggregatePChainSignature,
            Self::FinalizeRegistration,
        ]
    }
}

impl RegistrationStep {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InitializeRegistration => "initialize_registration",
            Self::SignMessage => "sign_message",
            Self::RegisterOnPChain => "register_on_pchain",
            Self::AggregatePChainSignature => "aggregate_pchain_signature",
            Self::FinalizeRegistration => "finalize_registration",
        }
    }
}

impl fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| format!("unknown registration step `{s}`"))
    }
}
