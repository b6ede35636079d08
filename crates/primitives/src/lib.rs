//! Avalanche identifiers, networks, and wire encodings shared across the
//! toolbox crates.

#[macro_use]
mod macros;

pub mod bls;
pub mod cb58;
pub mod errors;
pub mod ids;
pub mod network;
pub mod pchain_address;
pub mod predicate;
pub mod warp;

pub use bls::{BlsProofOfPossession, BlsPublicKey};
pub use errors::{PredicateError, PrimitiveParseError, WarpCodecError};
pub use ids::{BlockchainId, NodeId, SubnetId, ValidationId};
pub use network::AvalancheNetwork;
pub use pchain_address::PChainAddress;
pub use predicate::{AccessListEntry, WARP_PRECOMPILE_ADDRESS};
