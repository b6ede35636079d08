//! Predicate packing for Warp messages delivered through an EIP-2930 access
//! list.
//!
//! The signed message gets a `0xff` delimiter, is zero-padded to a multiple
//! of 32 bytes and split into storage keys under the Warp precompile.

use alloy_primitives::{address, Address, B256};
use serde::{Deserialize, Serialize};

use crate::errors::PredicateError;

/// Address of the Warp messenger precompile.
pub const WARP_PRECOMPILE_ADDRESS: Address = address!("0200000000000000000000000000000000000005");

/// Byte appended to predicate payloads before padding.
pub const PREDICATE_DELIMITER: u8 = 0xff;

const WORD: usize = 32;

/// One access list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListEntry {
    pub address: Address,
    pub storage_keys: Vec<B256>,
}

impl AccessListEntry {
    /// Entry carrying `signed_message` as a Warp predicate.
    pub fn warp_predicate(signed_message: &[u8]) -> Self {
        Self {
            address: WARP_PRECOMPILE_ADDRESS,
            storage_keys: to_storage_keys(signed_message),
        }
    }
}

/// Appends the delimiter and zero-pads to a multiple of 32 bytes.
pub fn pack(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity((bytes.len() / WORD + 1) * WORD);
    out.extend_from_slice(bytes);
    out.push(PREDICATE_DELIMITER);
    out.resize(out.len().div_ceil(WORD) * WORD, 0);
    out
}

/// Reverses [`pack`].
pub fn unpack(packed: &[u8]) -> Result<Vec<u8>, PredicateError> {
    if packed.len() % WORD != 0 {
        return Err(PredicateError::Misaligned(packed.len()));
    }

    let end = packed
        .iter()
        .rposition(|b| *b != 0)
        .ok_or(PredicateError::MissingDelimiter)?;
    if packed[end] != PREDICATE_DELIMITER {
        return Err(PredicateError::MissingDelimiter);
    }

    Ok(packed[..end].to_vec())
}

/// Packs `bytes` and splits the result into 32-byte storage keys.
pub fn to_storage_keys(bytes: &[u8]) -> Vec<B256> {
    pack(bytes).chunks_exact(WORD).map(B256::from_slice).collect()
}

/// Joins storage keys and unpacks the predicate they carry.
pub fn from_storage_keys(keys: &[B256]) -> Result<Vec<u8>, PredicateError> {
    let joined: Vec<u8> = keys.iter().flat_map(|k| k.0).collect();
    unpack(&joined)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_pack_short() {
        let packed = pack(&[1, 2, 3]);
        assert_eq!(packed.len(), 32);
        assert_eq!(&packed[..4], &[1, 2, 3, 0xff]);
        assert!(packed[4..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_pack_exact_word_grows() {
        // A full word leaves no room for the delimiter.
        let packed = pack(&[7; 32]);
        assert_eq!(packed.len(), 64);
        assert_eq!(packed[32], 0xff);
    }

    #[test]
    fn test_pack_empty() {
        let packed = pack(&[]);
        assert_eq!(packed.len(), 32);
        assert_eq!(packed[0], 0xff);
    }

    #[test]
    fn test_unpack_errors() {
        assert_eq!(unpack(&[0; 31]), Err(PredicateError::Misaligned(31)));
        assert_eq!(unpack(&[0; 32]), Err(PredicateError::MissingDelimiter));

        let mut bad = [0u8; 32];
        bad[3] = 0x01;
        assert_eq!(unpack(&bad), Err(PredicateError::MissingDelimiter));
    }

    #[test]
    fn test_warp_entry() {
        let entry = AccessListEntry::warp_predicate(&[0xab; 40]);
        assert_eq!(entry.address, WARP_PRECOMPILE_ADDRESS);
        assert_eq!(entry.storage_keys.len(), 2);
        assert_eq!(entry.storage_keys[1][8], 0xff);
    }

    proptest! {
        #[test]
        fn prop_storage_keys_recover_message(msg in proptest::collection::vec(any::<u8>(), 0..512)) {
            let keys = to_storage_keys(&msg);
            prop_assert_eq!(keys.len(), msg.len() / 32 + 1);
            prop_assert_eq!(from_storage_keys(&keys).unwrap(), msg);
        }
    }
}
