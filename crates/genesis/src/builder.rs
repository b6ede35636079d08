//! Debounced genesis recomputation.
//!
//! The builder task owns the [`GenesisConfigState`]. Edits arrive over a
//! channel and each one restarts the quiet-period timer; the document is
//! recomputed once the timer fires and published on a watch channel.

use std::{future::Future, sync::Arc, time::Duration};

use l1_common::Clock;
use tokio::{
    sync::{mpsc, watch},
    time::{sleep_until, Instant},
};
use tracing::{debug, info, warn};

use crate::{
    assembler::assemble,
    diagnostics::Diagnostics,
    document::GenesisDocument,
    error::{GenesisError, GenesisResult},
    state::{GenesisConfigState, GenesisEdit},
    validation::validate,
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

const EDIT_CHANNEL_CAPACITY: usize = 64;

/// Result of one recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenesisOutput {
    /// Number of recomputations after the initial one.
    pub generation: u64,
    pub diagnostics: Diagnostics,
    /// Present iff `diagnostics` has no errors.
    pub document: Option<GenesisDocument>,
}

impl GenesisOutput {
    pub fn is_valid(&self) -> bool {
        self.document.is_some()
    }
}

/// Validates `state` and assembles the document when there are no errors.
pub fn recompute(state: &GenesisConfigState, generation: u64, timestamp: u64) -> GenesisOutput {
    let mut diagnostics = validate(state);
    let document = if diagnostics.has_errors() {
        None
    } else {
        match assemble(state, timestamp) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(%e, "assembly failed after validation");
                diagnostics.error("genesis", e.to_string());
                None
            }
        }
    };

    GenesisOutput {
        generation,
        diagnostics,
        document,
    }
}

/// Handle to a running builder task.
#[derive(Debug, Clone)]
pub struct GenesisBuilderHandle {
    edit_tx: mpsc::Sender<GenesisEdit>,
    output_rx: watch::Receiver<GenesisOutput>,
}

impl GenesisBuilderHandle {
    /// Creates the handle and the task future; the caller spawns the future.
    ///
    /// The initial state is computed and published before this returns.
    pub fn create(
        state: GenesisConfigState,
        debounce: Duration,
        clock: Arc<dyn Clock>,
    ) -> (Self, impl Future<Output = ()>) {
        let initial = recompute(&state, 0, clock.now_unix_secs());
        let (output_tx, output_rx) = watch::channel(initial);
        let (edit_tx, edit_rx) = mpsc::channel(EDIT_CHANNEL_CAPACITY);

        let handle = Self { edit_tx, output_rx };
        let task = builder_task(state, edit_rx, output_tx, debounce, clock);
        (handle, task)
    }

    /// Queues an edit.
    pub async fn edit(&self, edit: GenesisEdit) -> GenesisResult<()> {
        self.edit_tx
            .send(edit)
            .await
            .map_err(|_| GenesisError::BuilderClosed)
    }

    pub fn output_watcher(&self) -> watch::Receiver<GenesisOutput> {
        self.output_rx.clone()
    }

    pub fn latest(&self) -> GenesisOutput {
        self.output_rx.borrow().clone()
    }
}

async fn builder_task(
    mut state: GenesisConfigState,
    mut edit_rx: mpsc::Receiver<GenesisEdit>,
    output_tx: watch::Sender<GenesisOutput>,
    debounce: Duration,
    clock: Arc<dyn Clock>,
) {
    let mut generation = 0;
    let mut deadline: Option<Instant> = None;

    loop {
        // Disabled branches still evaluate their future, so this must not
        // depend on `deadline` being set.
        let fire_at = deadline.unwrap_or_else(Instant::now);

        tokio::select! {
            edit = edit_rx.recv() => match edit {
                Some(edit) => {
                    debug!(?edit, "genesis edit");
                    edit.apply(&mut state);
                    deadline = Some(Instant::now() + debounce);
                }
                None => break,
            },
            _ = sleep_until(fire_at), if deadline.is_some() => {
                deadline = None;
                generation += 1;
                publish(&state, generation, clock.as_ref(), &output_tx);
            }
        }
    }

    if deadline.is_some() {
        generation += 1;
        publish(&state, generation, clock.as_ref(), &output_tx);
    }
    info!(%generation, "genesis builder exiting");
}

fn publish(
    state: &GenesisConfigState,
    generation: u64,
    clock: &dyn Clock,
    output_tx: &watch::Sender<GenesisOutput>,
) {
    let output = recompute(state, generation, clock.now_unix_secs());
    info!(
        %generation,
        valid = output.is_valid(),
        errors = output.diagnostics.errors().count(),
        warnings = output.diagnostics.warnings().count(),
        "genesis recomputed"
    );
    output_tx.send_replace(output);
}
