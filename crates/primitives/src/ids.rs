//! CB58-encoded Avalanche identifiers.

/// 20-byte node identifier, displayed as `NodeID-<cb58>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId([u8; 20]);

impl_cb58_id!(NodeId, 20, "NodeID-");

/// 32-byte subnet identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubnetId([u8; 32]);

impl_cb58_id!(SubnetId, 32, "");

/// 32-byte blockchain identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockchainId([u8; 32]);

impl_cb58_id!(BlockchainId, 32, "");

impl BlockchainId {
    /// The P-Chain's blockchain ID is all zeroes.
    pub const P_CHAIN: Self = Self([0; 32]);
}

/// 32-byte validation ID assigned by the validator manager when a
/// registration is initiated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidationId([u8; 32]);

impl_cb58_id!(ValidationId, 32, "");
