//! Shared infrastructure for the L1 toolbox crates: logging setup, a clock
//! abstraction and the per-chain state registry.

pub mod clock;
pub mod logging;
pub mod registry;

pub use clock::{Clock, FixedClock, SystemClock};
pub use registry::{ChainRegistry, RegistryError};
