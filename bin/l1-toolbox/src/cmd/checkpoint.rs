//! `checkpoint` subcommand: inspects persisted registration checkpoints and
//! optionally checks the P-Chain for the registration tx they reference.

use anyhow::{bail, Context};
use l1_clients::{NoSigner, PChainRpcClient};
use l1_validator_registration::{
    poll::poll_until_committed, CheckpointStore, PChainClient, RegistrationCheckpoint,
    SledCheckpointStore,
};
use tracing::info;

use crate::{args::SubcCheckpoint, config::ToolboxConfig};

pub(super) async fn exec(cmd: SubcCheckpoint, config: &ToolboxConfig) -> anyhow::Result<()> {
    let dir = cmd
        .store
        .clone()
        .unwrap_or_else(|| config.registration.checkpoint_dir.clone());
    let store = SledCheckpointStore::open(&dir)
        .with_context(|| format!("opening checkpoint store {}", dir.display()))?;

    let Some(id) = cmd.id else {
        if cmd.refresh {
            bail!("--refresh needs a registration id");
        }
        for cp in store.list()? {
            println!("{}", summary_line(&cp));
        }
        return Ok(());
    };

    let Some(cp) = store.load(&id)? else {
        bail!("no checkpoint for registration {id}");
    };
    println!("{}", serde_json::to_string_pretty(&cp)?);
    println!();
    for line in step_lines(&cp) {
        println!("{line}");
    }

    if cmd.refresh {
        let Some(tx_id) = cp.context.pchain_tx_id.as_deref() else {
            bail!("registration {id} has not submitted a P-Chain tx");
        };
        let client = PChainRpcClient::new(config.pchain_api_url(), NoSigner)?;
        if cmd.wait {
            info!(%tx_id, "waiting for p-chain commit");
            poll_until_committed(&client, tx_id, &config.poll_config()).await?;
            println!("p-chain tx {tx_id}: committed");
        } else {
            let status = client.get_tx_status(tx_id).await?;
            println!("p-chain tx {tx_id}: {status:?}");
        }
    }

    Ok(())
}

fn summary_line(cp: &RegistrationCheckpoint) -> String {
    let state = if cp.is_complete() {
        "complete".to_owned()
    } else if let Some(err) = cp.tracker.error() {
        format!("failed: {err}")
    } else if !cp.tracker.is_processing() {
        "not started".to_owned()
    } else {
        match cp.tracker.current_step() {
            Some(step) => format!("at {step}"),
            None => "all steps done".to_owned(),
        }
    };
    format!(
        "{}\t{}\t{}\t{state}",
        cp.id, cp.request.node_id, cp.updated_at
    )
}

fn step_lines(cp: &RegistrationCheckpoint) -> Vec<String> {
    cp.tracker
        .steps()
        .map(|(step, status)| format!("{:<28} {status}", step.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use l1_primitives::AvalancheNetwork;
    use l1_step_tracker::StepStatus;
    use l1_validator_registration::{
        RegistrationContext, RegistrationRequest, RegistrationStep,
    };

    use super::*;

    fn checkpoint() -> RegistrationCheckpoint {
        RegistrationCheckpoint {
            id: "reg-1".into(),
            request: RegistrationRequest {
                node_id: "NodeID-7Xhw2mDxuDS44j42TCB6U5579esbSt3Lg".into(),
                bls_public_key: String::new(),
                bls_proof_of_possession: String::new(),
                pchain_address: String::new(),
                weight: "20".into(),
                validator_manager_address: String::new(),
                subnet_id: String::new(),
                network: AvalancheNetwork::Fuji,
                balance_navax: 1,
            },
            context: RegistrationContext::default(),
            tracker: Default::default(),
            updated_at: 42,
        }
    }

    #[test]
    fn test_summary_not_started() {
        let line = summary_line(&checkpoint());
        assert_eq!(
            line,
            "reg-1\tNodeID-7Xhw2mDxuDS44j42TCB6U5579esbSt3Lg\t42\tnot started"
        );
    }

    #[test]
    fn test_summary_failed_step() {
        let mut cp = checkpoint();
        cp.tracker.start();
        cp.tracker
            .update_status(RegistrationStep::InitializeRegistration, StepStatus::Success)
            .unwrap();
        cp.tracker
            .update_status(RegistrationStep::SignMessage, StepStatus::error("quorum"))
            .unwrap();
        assert!(summary_line(&cp).ends_with("failed: quorum"));

        let lines = step_lines(&cp);
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("initialize_registration"));
        assert!(lines[0].ends_with("success"));
        assert!(lines[1].ends_with("error: quorum"));
    }
}
