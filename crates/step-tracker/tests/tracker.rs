//! Workflow-level behavior of the step tracker.

use l1_step_tracker::{StepKey, StepStatus, StepTracker, StepTrackerError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Step {
    Fetch,
    Sign,
    Submit,
    Finalize,
}

impl StepKey for Step {
    fn all() -> &'static [Self] {
        &[Step::Fetch, Step::Sign, Step::Submit, Step::Finalize]
    }
}

fn run_through(t: &mut StepTracker<Step>, steps: &[Step]) {
    for step in steps {
        t.update_status(*step, StepStatus::Loading).unwrap();
        t.update_status(*step, StepStatus::Success).unwrap();
    }
}

#[test]
fn test_start_resets_everything() {
    let mut t = StepTracker::<Step>::new();
    t.start();
    run_through(&mut t, &[Step::Fetch]);
    t.update_status(Step::Sign, StepStatus::error("bad")).unwrap();

    t.start();
    assert!(t.is_processing());
    assert!(!t.is_complete());
    assert_eq!(t.error(), None);
    assert!(t.steps().all(|(_, s)| s.is_pending()));
}

#[test]
fn test_second_loading_step_rejected() {
    let mut t = StepTracker::<Step>::new();
    t.start();
    t.update_status(Step::Fetch, StepStatus::Loading).unwrap();

    let err = t.update_status(Step::Sign, StepStatus::Loading).unwrap_err();
    assert_eq!(
        err,
        StepTrackerError::ConcurrentLoading {
            active: "Fetch".to_string(),
            requested: "Sign".to_string(),
        }
    );
    assert!(t.status(Step::Sign).is_pending());
    assert_eq!(t.loading_step(), Some(Step::Fetch));
}

#[test]
fn test_error_sets_and_loading_clears_workflow_error() {
    let mut t = StepTracker::<Step>::new();
    t.start();
    t.update_status(Step::Fetch, StepStatus::error("rpc down"))
        .unwrap();
    assert_eq!(t.error(), Some("rpc down"));

    t.update_status(Step::Fetch, StepStatus::Loading).unwrap();
    assert_eq!(t.error(), None);
}

#[test]
fn test_retry_resets_from_step_onward() {
    let mut t = StepTracker::<Step>::new();
    t.start();
    run_through(&mut t, &[Step::Fetch, Step::Sign]);
    t.update_status(Step::Submit, StepStatus::error("timeout"))
        .unwrap();

    let resume = t.retry(Step::Sign);
    assert_eq!(resume, Step::Sign);
    assert!(t.status(Step::Fetch).is_success());
    assert!(t.status(Step::Sign).is_pending());
    assert!(t.status(Step::Submit).is_pending());
    assert!(t.status(Step::Finalize).is_pending());
    assert_eq!(t.error(), None);
    assert!(t.is_processing());
    assert_eq!(t.current_step(), Some(Step::Sign));
}

#[test]
fn test_complete_keeps_processing_until_reset() {
    let mut t = StepTracker::<Step>::new();
    t.start();
    run_through(&mut t, Step::all());
    t.complete(Some("done".to_string()));

    assert!(t.is_complete());
    assert!(t.is_processing());
    assert_eq!(t.success_message(), Some("done"));
    assert_eq!(t.current_step(), None);

    t.reset();
    assert!(!t.is_processing());
    assert!(!t.is_complete());
    assert_eq!(t.success_message(), None);
}

#[test]
fn test_checkpoint_round_trip() {
    let mut t = StepTracker::<Step>::new();
    t.start();
    run_through(&mut t, &[Step::Fetch]);
    t.update_status(Step::Sign, StepStatus::error("quorum not reached"))
        .unwrap();

    let json = serde_json::to_value(&t).unwrap();
    assert_eq!(json["steps"][1]["step"], "sign");
    assert_eq!(json["steps"][1]["status"], "error");
    assert_eq!(json["steps"][1]["message"], "quorum not reached");

    let back: StepTracker<Step> = serde_json::from_value(json).unwrap();
    assert_eq!(back, t);
}

#[test]
fn test_interrupt_fails_stale_loading_step() {
    let mut t = StepTracker::<Step>::new();
    t.start();
    run_through(&mut t, &[Step::Fetch]);
    t.update_status(Step::Sign, StepStatus::Loading).unwrap();

    // Restored from storage mid-step.
    let json = serde_json::to_string(&t).unwrap();
    let mut restored: StepTracker<Step> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.interrupt("interrupted"), Some(Step::Sign));
    assert_eq!(restored.loading_step(), None);
    assert_eq!(restored.status(Step::Sign).error_message(), Some("interrupted"));
    assert_eq!(restored.error(), Some("interrupted"));

    restored.retry(Step::Submit);
    restored.update_status(Step::Submit, StepStatus::Loading).unwrap();
    assert!(restored.interrupt("again").is_some());
    assert_eq!(restored.interrupt("idle"), None);
}
