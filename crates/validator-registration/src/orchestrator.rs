//! Drives the five registration steps, persisting a checkpoint and
//! publishing progress at every transition.

use std::{fmt, sync::Arc, time::Duration};

use alloy_primitives::{Bytes, B256};
use l1_common::Clock;
use l1_primitives::{warp::registration_attestation, AccessListEntry, ValidationId};
use l1_step_tracker::{StepKey, StepStatus, StepTracker};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::{
    context::RegistrationContext,
    errors::RegistrationError,
    poll::{poll_until_committed, PollConfig},
    receipt::extract_initiated,
    request::{RegistrationRequest, ValidatedRequest},
    signature::is_degenerate_signature,
    step::RegistrationStep,
    store::{CheckpointStore, RegistrationCheckpoint},
    traits::{
        AggregateRequest, InitiateRegistration, PChainClient, PChainOwner, PChainTxStatus,
        RegisterL1ValidatorTx, SignatureAggregator, ValidatorManager,
    },
};

pub const DEFAULT_EXPIRY_WINDOW: Duration = Duration::from_secs(12 * 60 * 60);
pub const DEFAULT_QUORUM_PERCENTAGE: u8 = 67;

const INTERRUPTED_MESSAGE: &str = "interrupted before the step finished";

/// Index of the warp message in the finalize transaction's predicates.
const FINALIZE_MESSAGE_INDEX: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    pub poll: PollConfig,
    /// How far past now the registration message expires.
    pub expiry_window: Duration,
    pub quorum_percentage: u8,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            poll: PollConfig::default(),
            expiry_window: DEFAULT_EXPIRY_WINDOW,
            quorum_percentage: DEFAULT_QUORUM_PERCENTAGE,
        }
    }
}

/// External collaborators of a registration.
#[derive(Clone)]
pub struct RegistrationDeps {
    pub validator_manager: Arc<dyn ValidatorManager>,
    pub aggregator: Arc<dyn SignatureAggregator>,
    pub pchain: Arc<dyn PChainClient>,
    pub store: Arc<dyn CheckpointStore>,
    pub clock: Arc<dyn Clock>,
}

impl fmt::Debug for RegistrationDeps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDeps")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Snapshot published on every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationProgress {
    pub tracker: StepTracker<RegistrationStep>,
    pub context: RegistrationContext,
}

/// Result of a completed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub validation_id: ValidationId,
    pub pchain_tx_id: String,
    pub finalize_tx_hash: B256,
    pub message: String,
}

/// One validator registration.
#[derive(Debug)]
pub struct RegistrationOrchestrator {
    id: String,
    request: RegistrationRequest,
    validated: ValidatedRequest,
    context: RegistrationContext,
    tracker: StepTracker<RegistrationStep>,
    deps: RegistrationDeps,
    config: OrchestratorConfig,
    progress_tx: watch::Sender<RegistrationProgress>,
}

impl RegistrationOrchestrator {
    /// Checks the request; the tracker stays idle if this fails.
    pub fn new(
        id: impl Into<String>,
        request: RegistrationRequest,
        deps: RegistrationDeps,
        config: OrchestratorConfig,
    ) -> Result<Self, RegistrationError> {
        let validated = request.validate()?;
        Ok(Self::assemble(
            id.into(),
            request,
            validated,
            RegistrationContext::default(),
            StepTracker::new(),
            deps,
            config,
        ))
    }

    /// Rebuilds an orchestrator from the stored checkpoint `id`.
    pub fn resume(
        id: &str,
        deps: RegistrationDeps,
        config: OrchestratorConfig,
    ) -> Result<Self, RegistrationError> {
        let checkpoint = deps
            .store
            .load(id)?
            .ok_or_else(|| RegistrationError::CheckpointNotFound(id.to_owned()))?;
        Self::from_checkpoint(checkpoint, deps, config)
    }

    /// Rebuilds an orchestrator from `checkpoint`. A step the checkpoint
    /// still shows as running was cut off mid-flight; it is marked failed so
    /// the registration can be retried.
    pub fn from_checkpoint(
        checkpoint: RegistrationCheckpoint,
        deps: RegistrationDeps,
        config: OrchestratorConfig,
    ) -> Result<Self, RegistrationError> {
        let validated = checkpoint.request.validate()?;
        let mut orch = Self::assemble(
            checkpoint.id,
            checkpoint.request,
            validated,
            checkpoint.context,
            checkpoint.tracker,
            deps,
            config,
        );
        if let Some(step) = orch.tracker.interrupt(INTERRUPTED_MESSAGE) {
            warn!(id = %orch.id, %step, "checkpoint left a step running");
            orch.transition()?;
        }
        Ok(orch)
    }

    fn assemble(
        id: String,
        request: RegistrationRequest,
        validated: ValidatedRequest,
        context: RegistrationContext,
        tracker: StepTracker<RegistrationStep>,
        deps: RegistrationDeps,
        config: OrchestratorConfig,
    ) -> Self {
        let (progress_tx, _) = watch::channel(RegistrationProgress {
            tracker: tracker.clone(),
            context: context.clone(),
        });
        Self {
            id,
            request,
            validated,
            context,
            tracker,
            deps,
            config,
            progress_tx,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracker(&self) -> &StepTracker<RegistrationStep> {
        &self.tracker
    }

    pub fn context(&self) -> &RegistrationContext {
        &self.context
    }

    pub fn progress_watcher(&self) -> watch::Receiver<RegistrationProgress> {
        self.progress_tx.subscribe()
    }

    pub fn checkpoint(&self) -> RegistrationCheckpoint {
        RegistrationCheckpoint {
            id: self.id.clone(),
            request: self.request.clone(),
            context: self.context.clone(),
            tracker: self.tracker.clone(),
            updated_at: self.deps.clock.now_unix_secs(),
        }
    }

    /// Runs every step from the first, discarding any earlier artifacts.
    pub async fn run(&mut self) -> Result<RegistrationOutcome, RegistrationError> {
        info!(id = %self.id, node_id = %self.validated.node_id, "starting validator registration");
        self.tracker.start();
        self.context = RegistrationContext::default();
        self.transition()?;
        self.execute_from(RegistrationStep::InitializeRegistration)
            .await
    }

    /// Re-runs `step` and everything after it, keeping earlier artifacts.
    pub async fn retry(
        &mut self,
        step: RegistrationStep,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let from = self.tracker.retry(step);
        self.transition()?;
        self.execute_from(from).await
    }

    /// Continues from the first step that has not succeeded.
    pub async fn resume_pending(&mut self) -> Result<RegistrationOutcome, RegistrationError> {
        let step = match self.tracker.current_step() {
            Some(step) if !self.tracker.is_complete() => step,
            _ => return Err(RegistrationError::AlreadyComplete(self.id.clone())),
        };
        info!(id = %self.id, %step, "resuming validator registration");
        self.retry(step).await
    }

    #[instrument(skip_all, fields(id = %self.id, %from))]
    async fn execute_from(
        &mut self,
        from: RegistrationStep,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        for step in &RegistrationStep::all()[from.index()..] {
            self.execute_step(*step).await?;
        }

        let outcome = self.outcome()?;
        self.tracker.complete(Some(outcome.message.clone()));
        self.transition()?;
        info!(
            id = %self.id,
            validation_id = %outcome.validation_id,
            "validator registration complete"
        );
        Ok(outcome)
    }

    #[instrument(skip_all, fields(%step))]
    async fn execute_step(&mut self, step: RegistrationStep) -> Result<(), RegistrationError> {
        if let Err(err) = self.tracker.update_status(step, StepStatus::Loading) {
            let err = RegistrationError::from(err);
            self.tracker
                .update_status(step, StepStatus::error(err.to_string()))?;
            self.transition()?;
            return Err(err);
        }
        self.transition()?;

        let res = match step {
            RegistrationStep::InitializeRegistration => self.initialize_registration().await,
            RegistrationStep::SignMessage => self.sign_message().await,
            RegistrationStep::RegisterOnPChain => self.register_on_pchain().await,
            RegistrationStep::AggregatePChainSignature => {
                self.aggregate_pchain_signature().await
            }
            RegistrationStep::FinalizeRegistration => self.finalize_registration().await,
        };

        match res {
            Ok(()) => {
                self.context.invalidate_after(step);
                self.tracker.update_status(step, StepStatus::Success)?;
                self.transition()?;
                debug!(id = %self.id, %step, "step succeeded");
                Ok(())
            }
            Err(err) => {
                self.tracker
                    .update_status(step, StepStatus::error(err.to_string()))?;
                if let Err(persist_err) = self.transition() {
                    warn!(id = %self.id, err = %persist_err, "failed to persist step failure");
                }
                Err(err)
            }
        }
    }

    /// Persists the checkpoint, then publishes progress.
    fn transition(&self) -> Result<(), RegistrationError> {
        self.deps.store.save(&self.checkpoint())?;
        self.progress_tx.send_replace(RegistrationProgress {
            tracker: self.tracker.clone(),
            context: self.context.clone(),
        });
        Ok(())
    }

    fn outcome(&self) -> Result<RegistrationOutcome, RegistrationError> {
        use RegistrationStep::*;

        let validation_id = self.context.validation_id.ok_or_else(|| {
            RegistrationError::missing(FinalizeRegistration, "validation ID", InitializeRegistration)
        })?;
        let pchain_tx_id = self.context.pchain_tx_id.clone().ok_or_else(|| {
            RegistrationError::missing(FinalizeRegistration, "P-Chain transaction ID", RegisterOnPChain)
        })?;
        let finalize_tx_hash = self.context.finalize_tx_hash.ok_or_else(|| {
            RegistrationError::missing(FinalizeRegistration, "finalize transaction", FinalizeRegistration)
        })?;
        Ok(RegistrationOutcome {
            message: format!(
                "validator {} registered with validation ID {validation_id}",
                self.validated.node_id
            ),
            validation_id,
            pchain_tx_id,
            finalize_tx_hash,
        })
    }

    async fn initialize_registration(&mut self) -> Result<(), RegistrationError> {
        let step = RegistrationStep::InitializeRegistration;
        let v = &self.validated;
        let expiry = self.deps.clock.now_unix_secs() + self.config.expiry_window.as_secs();
        let owner = PChainOwner::single(v.pchain_address.to_evm_address());
        let call = InitiateRegistration {
            node_id: v.node_id,
            bls_public_key: v.bls_public_key,
            registration_expiry: expiry,
            remaining_balance_owner: owner.clone(),
            disable_owner: owner,
            weight: v.weight,
        };

        let receipt = self
            .deps
            .validator_manager
            .initiate_validator_registration(v.validator_manager, call)
            .await
            .map_err(|e| RegistrationError::step_failed(step, e.to_string()))?;
        if !receipt.success {
            return Err(RegistrationError::step_failed(
                step,
                format!("transaction {} reverted", receipt.tx_hash),
            ));
        }
        let initiated =
            extract_initiated(&receipt).map_err(|e| RegistrationError::step_failed(step, e))?;

        info!(
            id = %self.id,
            tx = %receipt.tx_hash,
            validation_id = %initiated.validation_id,
            %expiry,
            "registration initiated"
        );
        self.context.initiate_tx_hash = Some(receipt.tx_hash);
        self.context.unsigned_warp_message = Some(initiated.unsigned_warp_message.into());
        self.context.validation_id = Some(initiated.validation_id);
        Ok(())
    }

    async fn sign_message(&mut self) -> Result<(), RegistrationError> {
        use RegistrationStep::*;

        let message = self
            .context
            .unsigned_warp_message
            .clone()
            .ok_or_else(|| {
                RegistrationError::missing(SignMessage, "unsigned warp message", InitializeRegistration)
            })?;

        let signed = self
            .aggregate(SignMessage, message.to_vec(), None)
            .await?;
        self.context.signed_message = Some(signed);
        Ok(())
    }

    async fn register_on_pchain(&mut self) -> Result<(), RegistrationError> {
        use RegistrationStep::*;

        let signed = self.context.signed_message.clone().ok_or_else(|| {
            RegistrationError::missing(RegisterOnPChain, "signed warp message", SignMessage)
        })?;

        if let Some(tx_id) = self.context.pchain_tx_id.clone() {
            match self.deps.pchain.get_tx_status(&tx_id).await {
                Ok(PChainTxStatus::Committed) => {
                    info!(id = %self.id, %tx_id, "p-chain registration already committed");
                    return Ok(());
                }
                Ok(PChainTxStatus::Processing) => {
                    info!(id = %self.id, %tx_id, "waiting on earlier p-chain registration");
                    return poll_until_committed(self.deps.pchain.as_ref(), &tx_id, &self.config.poll)
                        .await;
                }
                Ok(status) => {
                    warn!(id = %self.id, %tx_id, ?status, "earlier p-chain registration not live, resubmitting");
                }
                Err(e) => {
                    warn!(id = %self.id, %tx_id, err = %e, "could not query earlier p-chain registration, resubmitting");
                }
            }
        }

        let tx = RegisterL1ValidatorTx {
            balance_navax: self.validated.balance_navax,
            proof_of_possession: self.validated.bls_proof_of_possession,
            signed_warp_message: signed.to_vec(),
        };
        let tx_id = self
            .deps
            .pchain
            .register_l1_validator(tx)
            .await
            .map_err(|e| RegistrationError::step_failed(RegisterOnPChain, e.to_string()))?;

        info!(id = %self.id, %tx_id, "issued RegisterL1ValidatorTx");
        self.context.pchain_tx_id = Some(tx_id.clone());
        self.transition()?;

        poll_until_committed(self.deps.pchain.as_ref(), &tx_id, &self.config.poll).await
    }

    async fn aggregate_pchain_signature(&mut self) -> Result<(), RegistrationError> {
        use RegistrationStep::*;

        let validation_id = self.context.validation_id.ok_or_else(|| {
            RegistrationError::missing(AggregatePChainSignature, "validation ID", InitializeRegistration)
        })?;
        let justification = self.context.unsigned_warp_message.clone().ok_or_else(|| {
            RegistrationError::missing(
                AggregatePChainSignature,
                "unsigned warp message",
                InitializeRegistration,
            )
        })?;

        let attestation =
            registration_attestation(self.validated.network.network_id(), validation_id).encode();
        let signed = self
            .aggregate(
                AggregatePChainSignature,
                attestation,
                Some(justification.to_vec()),
            )
            .await?;
        self.context.pchain_signed_warp_message = Some(signed);
        Ok(())
    }

    async fn finalize_registration(&mut self) -> Result<(), RegistrationError> {
        use RegistrationStep::*;

        let signed = self
            .context
            .pchain_signed_warp_message
            .clone()
            .ok_or_else(|| {
                RegistrationError::missing(
                    FinalizeRegistration,
                    "P-Chain signed warp message",
                    AggregatePChainSignature,
                )
            })?;

        let access_list = vec![AccessListEntry::warp_predicate(&signed)];
        let receipt = self
            .deps
            .validator_manager
            .complete_validator_registration(
                self.validated.validator_manager,
                FINALIZE_MESSAGE_INDEX,
                access_list,
            )
            .await
            .map_err(|e| RegistrationError::step_failed(FinalizeRegistration, e.to_string()))?;
        if !receipt.success {
            return Err(RegistrationError::step_failed(
                FinalizeRegistration,
                format!("transaction {} reverted", receipt.tx_hash),
            ));
        }

        info!(id = %self.id, tx = %receipt.tx_hash, "registration finalized");
        self.context.finalize_tx_hash = Some(receipt.tx_hash);
        Ok(())
    }

    /// Aggregates signatures over `message` within the L1's subnet, rejecting
    /// a degenerate result.
    async fn aggregate(
        &self,
        step: RegistrationStep,
        message: Vec<u8>,
        justification: Option<Vec<u8>>,
    ) -> Result<Bytes, RegistrationError> {
        let req = AggregateRequest {
            message,
            justification,
            signing_subnet_id: self.validated.subnet_id,
            quorum_percentage: self.config.quorum_percentage,
        };
        let signed = self
            .deps
            .aggregator
            .aggregate_signatures(req)
            .await
            .map_err(|e| RegistrationError::step_failed(step, e.to_string()))?;
        if is_degenerate_signature(&signed) {
            return Err(RegistrationError::step_failed(
                step,
                "invalid signature returned by aggregator",
            ));
        }
        debug!(id = %self.id, %step, len = signed.len(), "signatures aggregated");
        Ok(signed.into())
    }
}

#[cfg(test)]
mod tests {
    use l1_common::FixedClock;

    use super::*;
    use crate::{
        receipt::tests::initiated_receipt,
        request::tests::sample_request,
        store::MemoryCheckpointStore,
        traits::{
            MockPChainClient, MockSignatureAggregator, MockValidatorManager, TxReceipt,
        },
    };

    const NOW: u64 = 1_700_000_000;

    fn signed_bytes(tag: u8) -> Vec<u8> {
        let mut v = vec![tag; 40];
        v.extend([tag; 96]);
        v
    }

    fn deps(
        vm: MockValidatorManager,
        agg: MockSignatureAggregator,
        pchain: MockPChainClient,
    ) -> (RegistrationDeps, Arc<MemoryCheckpointStore>) {
        let store = Arc::new(MemoryCheckpointStore::new());
        let deps = RegistrationDeps {
            validator_manager: Arc::new(vm),
            aggregator: Arc::new(agg),
            pchain: Arc::new(pchain),
            store: store.clone(),
            clock: Arc::new(FixedClock::new(NOW)),
        };
        (deps, store)
    }

    #[test]
    fn test_precondition_failure_leaves_tracker_idle() {
        let (deps, store) = deps(
            MockValidatorManager::new(),
            MockSignatureAggregator::new(),
            MockPChainClient::new(),
        );
        let mut req = sample_request();
        req.weight = "0".into();

        let err = RegistrationOrchestrator::new("r1", req, deps, OrchestratorConfig::default())
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Precondition(_)));
        assert!(store.list().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_calls() {
        let vid = B256::repeat_byte(0x42);
        let mut vm = MockValidatorManager::new();
        vm.expect_initiate_validator_registration()
            .times(1)
            .withf(|_, call| {
                call.weight == 20
                    && call.registration_expiry == NOW + 12 * 3600
                    && call.remaining_balance_owner.threshold == 1
            })
            .returning(move |_, _| Ok(initiated_receipt(b"unsigned", vid)));
        vm.expect_complete_validator_registration()
            .times(1)
            .withf(|_, index, access_list| {
                *index == 0
                    && access_list.len() == 1
                    && access_list[0].address == l1_primitives::WARP_PRECOMPILE_ADDRESS
            })
            .returning(|_, _, _| {
                Ok(TxReceipt {
                    tx_hash: B256::repeat_byte(0xfe),
                    success: true,
                    logs: vec![],
                })
            });

        let mut agg = MockSignatureAggregator::new();
        agg.expect_aggregate_signatures()
            .withf(|req| req.justification.is_none())
            .times(1)
            .returning(|req| {
                assert_eq!(req.message, b"unsigned");
                assert_eq!(req.quorum_percentage, 67);
                Ok(signed_bytes(1))
            });
        agg.expect_aggregate_signatures()
            .withf(|req| req.justification.is_some())
            .times(1)
            .returning(|req| {
                assert_eq!(req.justification.as_deref(), Some(&b"unsigned"[..]));
                Ok(signed_bytes(2))
            });

        let mut pchain = MockPChainClient::new();
        pchain
            .expect_register_l1_validator()
            .times(1)
            .returning(|tx| {
                assert_eq!(tx.signed_warp_message, signed_bytes(1));
                Ok("pchain-tx".into())
            });
        pchain
            .expect_get_tx_status()
            .withf(|tx_id| tx_id == "pchain-tx")
            .times(1)
            .returning(|_| Ok(PChainTxStatus::Committed));

        let (deps, store) = deps(vm, agg, pchain);
        let mut orch =
            RegistrationOrchestrator::new("r1", sample_request(), deps, OrchestratorConfig::default())
                .unwrap();
        let outcome = orch.run().await.unwrap();

        assert_eq!(outcome.validation_id, ValidationId::new([0x42; 32]));
        assert_eq!(outcome.pchain_tx_id, "pchain-tx");
        assert!(orch.tracker().is_complete());
        assert!(orch
            .tracker()
            .steps()
            .all(|(_, status)| status.is_success()));
        assert!(store.load("r1").unwrap().unwrap().is_complete());
    }

    #[tokio::test]
    async fn test_reverted_initiate_fails_step_one() {
        let mut vm = MockValidatorManager::new();
        vm.expect_initiate_validator_registration()
            .returning(|_, _| {
                Ok(TxReceipt {
                    tx_hash: B256::ZERO,
                    success: false,
                    logs: vec![],
                })
            });
        let (deps, _) = deps(vm, MockSignatureAggregator::new(), MockPChainClient::new());
        let mut orch =
            RegistrationOrchestrator::new("r1", sample_request(), deps, OrchestratorConfig::default())
                .unwrap();

        let err = orch.run().await.unwrap_err();
        assert!(err.to_string().contains("reverted"));
        assert!(orch
            .tracker()
            .status(RegistrationStep::InitializeRegistration)
            .error_message()
            .is_some());
        assert!(orch.tracker().error().is_some());
    }

    #[tokio::test]
    async fn test_missing_artifact_names_retry_target() {
        let (deps, _) = deps(
            MockValidatorManager::new(),
            MockSignatureAggregator::new(),
            MockPChainClient::new(),
        );
        let mut orch =
            RegistrationOrchestrator::new("r1", sample_request(), deps, OrchestratorConfig::default())
                .unwrap();

        let err = orch.retry(RegistrationStep::FinalizeRegistration).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::MissingArtifact {
                step: RegistrationStep::FinalizeRegistration,
                retry_from: RegistrationStep::AggregatePChainSignature,
                ..
            }
        ));
    }
}
