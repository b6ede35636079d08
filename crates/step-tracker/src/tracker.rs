use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{error::StepTrackerError, status::StepStatus};

static PENDING: StepStatus = StepStatus::Pending;

/// An ordered set of workflow steps.
pub trait StepKey: Copy + Eq + Debug + Send + Sync + 'static {
    /// Every step, in execution order.
    fn all() -> &'static [Self];

    /// Position of this step in [`StepKey::all`].
    fn index(self) -> usize {
        Self::all()
            .iter()
            .position(|s| *s == self)
            .unwrap_or(usize::MAX)
    }
}

/// One step and its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepState<K> {
    pub step: K,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// Tracks the status of each step of one workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTracker<K> {
    steps: Vec<StepState<K>>,
    is_processing: bool,
    is_complete: bool,
    error: Option<String>,
    success: Option<String>,
}

impl<K: StepKey> Default for StepTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StepKey> StepTracker<K> {
    /// Creates an idle tracker with every step pending.
    pub fn new() -> Self {
        Self {
            steps: K::all()
                .iter()
                .map(|step| StepState {
                    step: *step,
                    status: StepStatus::Pending,
                })
                .collect(),
            is_processing: false,
            is_complete: false,
            error: None,
            success: None,
        }
    }

    /// Begins a fresh run.
    pub fn start(&mut self) {
        for s in &mut self.steps {
            s.status = StepStatus::Pending;
        }
        self.is_processing = true;
        self.is_complete = false;
        self.error = None;
        self.success = None;
        info!("workflow started");
    }

    /// Sets the status of `step`.
    ///
    /// Loading or success clears the workflow error; an error status sets it.
    /// Only one step may be loading at a time.
    pub fn update_status(&mut self, step: K, status: StepStatus) -> Result<(), StepTrackerError> {
        if status.is_loading() {
            if let Some(active) = self.loading_step().filter(|active| *active != step) {
                return Err(StepTrackerError::ConcurrentLoading {
                    active: format!("{active:?}"),
                    requested: format!("{step:?}"),
                });
            }
        }

        match &status {
            StepStatus::Loading | StepStatus::Success => self.error = None,
            StepStatus::Error { message } => {
                warn!(?step, %message, "step failed");
                self.error = Some(message.clone());
            }
            StepStatus::Pending => {}
        }

        debug!(?step, %status, "step transition");
        if let Some(s) = self.steps.iter_mut().find(|s| s.step == step) {
            s.status = status;
        }
        Ok(())
    }

    /// Resets `step` and every later step to pending and returns `step`, the
    /// point execution should resume from. Earlier steps are left untouched.
    pub fn retry(&mut self, step: K) -> K {
        let from = step.index();
        for s in &mut self.steps {
            if s.step.index() >= from {
                s.status = StepStatus::Pending;
            }
        }
        self.is_processing = true;
        self.is_complete = false;
        self.error = None;
        self.success = None;
        info!(?step, "retrying workflow");
        step
    }

    /// Fails a step left loading by a run that never finished it, for
    /// example one restored from a checkpoint written before a crash.
    /// Returns the step, if there was one.
    pub fn interrupt(&mut self, message: &str) -> Option<K> {
        let step = self.loading_step()?;
        warn!(?step, %message, "step interrupted");
        if let Some(s) = self.steps.iter_mut().find(|s| s.step == step) {
            s.status = StepStatus::error(message);
        }
        self.error = Some(message.to_owned());
        Some(step)
    }

    /// Marks the workflow successfully finished.
    ///
    /// The tracker stays in the processing state until [`reset`](Self::reset).
    pub fn complete(&mut self, success_message: Option<String>) {
        self.is_complete = true;
        self.error = None;
        info!(message = ?success_message, "workflow complete");
        self.success = success_message;
    }

    /// Returns to the idle state.
    pub fn reset(&mut self) {
        *self = Self::new();
        debug!("tracker reset");
    }

    /// First step that has not succeeded, or `None` once all have.
    pub fn current_step(&self) -> Option<K> {
        self.steps
            .iter()
            .find(|s| !s.status.is_success())
            .map(|s| s.step)
    }

    pub fn loading_step(&self) -> Option<K> {
        self.steps
            .iter()
            .find(|s| s.status.is_loading())
            .map(|s| s.step)
    }

    pub fn status(&self, step: K) -> &StepStatus {
        self.steps
            .iter()
            .find(|s| s.step == step)
            .map(|s| &s.status)
            .unwrap_or(&PENDING)
    }

    pub fn steps(&self) -> impl Iterator<Item = (K, &StepStatus)> + '_ {
        self.steps.iter().map(|s| (s.step, &s.status))
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Step {
        A,
        B,
    }

    impl StepKey for Step {
        fn all() -> &'static [Self] {
            &[Step::A, Step::B]
        }
    }

    #[test]
    fn test_new_is_idle() {
        let t = StepTracker::<Step>::new();
        assert!(!t.is_processing());
        assert!(t.steps().all(|(_, s)| s.is_pending()));
        assert_eq!(t.current_step(), Some(Step::A));
    }

    #[test]
    fn test_same_step_loading_twice_is_allowed() {
        let mut t = StepTracker::<Step>::new();
        t.start();
        t.update_status(Step::A, StepStatus::Loading).unwrap();
        t.update_status(Step::A, StepStatus::Loading).unwrap();
        assert_eq!(t.loading_step(), Some(Step::A));
    }

    #[test]
    fn test_index() {
        assert_eq!(Step::A.index(), 0);
        assert_eq!(Step::B.index(), 1);
    }
}
