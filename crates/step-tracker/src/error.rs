use thiserror::Error;

/// Errors returned by [`StepTracker`](crate::StepTracker).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepTrackerError {
    /// Another step is already loading.
    #[error("cannot start {requested} while {active} is loading")]
    ConcurrentLoading { active: String, requested: String },
}
