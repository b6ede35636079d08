//! Subnet-EVM genesis configuration: section state, validators, the
//! deterministic assembler and a debounced builder service.

#[cfg(test)]
use proptest as _;

mod address;
pub mod allowlist;
pub mod assembler;
pub mod builder;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod precompile;
pub mod state;
pub mod validation;

pub use address::parse_address;
pub use allowlist::{AllowlistAddresses, AllowlistEntry, AllowlistPrecompileConfig, AllowlistRole};
pub use assembler::assemble;
pub use builder::{recompute, GenesisBuilderHandle, GenesisOutput, DEFAULT_DEBOUNCE};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use document::GenesisDocument;
pub use error::{GenesisError, GenesisResult};
pub use precompile::AllowlistKind;
pub use state::{
    Allocation, ChainParams, GenesisConfigState, GenesisEdit, Permissions, Predeploy, Tokenomics,
    TransactionFees,
};
pub use validation::{validate, validate_section, Section};
