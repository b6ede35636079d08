//! Five-step registration of a validator on an Avalanche L1 through its
//! validator manager contract, the P-Chain and a signature aggregator.
//!
//! Progress is tracked with [`l1_step_tracker::StepTracker`] and written to a
//! [`CheckpointStore`] after every transition, so a failed or interrupted
//! registration can be retried from any step or resumed after a restart.

pub mod context;
pub mod errors;
pub mod orchestrator;
pub mod poll;
pub mod receipt;
pub mod request;
pub mod signature;
pub mod step;
pub mod store;
pub mod traits;

pub use context::RegistrationContext;
pub use errors::RegistrationError;
pub use orchestrator::{
    OrchestratorConfig, RegistrationDeps, RegistrationOrchestrator, RegistrationOutcome,
    RegistrationProgress, DEFAULT_EXPIRY_WINDOW, DEFAULT_QUORUM_PERCENTAGE,
};
pub use poll::PollConfig;
pub use request::{PreconditionError, RegistrationRequest, ValidatedRequest};
pub use step::RegistrationStep;
pub use store::{
    CheckpointStore, CheckpointStoreError, MemoryCheckpointStore, RegistrationCheckpoint,
    SledCheckpointStore,
};
pub use traits::{
    AggregateRequest, AggregatorError, InitiateRegistration, PChainClient, PChainError,
    PChainOwner, PChainTxStatus, ReceiptLog, RegisterL1ValidatorTx, SignatureAggregator,
    TxReceipt, ValidatorManager, ValidatorManagerError,
};
