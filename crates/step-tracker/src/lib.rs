//! Progress tracking for multi-step workflows.
//!
//! A [`StepTracker`] owns one [`StepStatus`] per step of an ordered
//! [`StepKey`] enum plus workflow-level flags. It never executes anything
//! itself; the driver reports each transition and asks the tracker where to
//! resume after a failure.

mod error;
mod status;
mod tracker;

pub use error::StepTrackerError;
pub use status::StepStatus;
pub use tracker::{StepKey, StepState, StepTracker};
