//! Errors during parsing/handling/conversion of primitives.

use thiserror::Error;

/// Failure to parse a textual identifier or key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveParseError {
    #[error("expected prefix `{0}`")]
    MissingPrefix(&'static str),

    #[error("invalid base58: {0}")]
    Base58(String),

    #[error("cb58 checksum mismatch")]
    Checksum,

    #[error("invalid hex: {0}")]
    Hex(String),

    #[error("invalid bech32: {0}")]
    Bech32(String),

    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("unknown network `{0}`")]
    UnknownNetwork(String),
}

/// Failure to decode a Warp message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarpCodecError {
    #[error("unexpected end of input at offset {0}")]
    Truncated(usize),

    #[error("unsupported codec version {0}")]
    CodecVersion(u16),

    #[error("unexpected type id {found}, expected {expected}")]
    TypeId { expected: u32, found: u32 },

    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),

    #[error("{0} trailing bytes")]
    TrailingBytes(usize),
}

/// Failure to unpack predicate bytes from storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error("predicate length {0} is not a multiple of 32")]
    Misaligned(usize),

    #[error("predicate delimiter not found")]
    MissingDelimiter,
}
