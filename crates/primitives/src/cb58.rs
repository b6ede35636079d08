//! CB58: base58 with a trailing 4-byte SHA-256 checksum.

use sha2::{Digest, Sha256};

use crate::errors::PrimitiveParseError;

const CHECKSUM_LEN: usize = 4;

fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(data);
    let mut out = [0; CHECKSUM_LEN];
    out.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    out
}

/// Encodes `data` as CB58.
pub fn encode(data: &[u8]) -> String {
    let mut buf = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    buf.extend_from_slice(data);
    buf.extend_from_slice(&checksum(data));
    bs58::encode(buf).into_string()
}

/// Decodes a CB58 string and verifies its checksum.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitiveParseError> {
    let raw = bs58::decode(s)
        .into_vec()
        .map_err(|e| PrimitiveParseError::Base58(e.to_string()))?;

    if raw.len() < CHECKSUM_LEN {
        return Err(PrimitiveParseError::Length {
            expected: CHECKSUM_LEN,
            actual: raw.len(),
        });
    }

    let (payload, sum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if checksum(payload) != sum {
        return Err(PrimitiveParseError::Checksum);
    }

    Ok(payload.to_vec())
}

/// Decodes a CB58 string into exactly `N` bytes.
pub fn decode_array<const N: usize>(s: &str) -> Result<[u8; N], PrimitiveParseError> {
    let bytes = decode(s)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| PrimitiveParseError::Length {
        expected: N,
        actual: bytes.len(),
    })
}

/// Hex with the same trailing checksum, the `hex` encoding of the
/// Avalanche node APIs.
pub fn encode_hex_checksummed(data: &[u8]) -> String {
    let mut buf = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    buf.extend_from_slice(data);
    buf.extend_from_slice(&checksum(data));
    format!("0x{}", hex::encode(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_id() {
        assert_eq!(encode(&[0; 32]), "11111111111111111111111111111111LpoYY");
        assert_eq!(
            decode_array::<32>("11111111111111111111111111111111LpoYY").unwrap(),
            [0; 32]
        );
    }

    #[test]
    fn test_known_vector() {
        let bytes: Vec<u8> = (1..=32).collect();
        assert_eq!(
            encode(&bytes),
            "SkB92YpWm4Q2ijQHH34cqbKkCZWszsiQgHVjtNeFF2HdvDQU"
        );
    }

    #[test]
    fn test_bad_checksum() {
        // Last character altered.
        assert_eq!(
            decode("11111111111111111111111111111111LpoYZ"),
            Err(PrimitiveParseError::Checksum)
        );
    }

    #[test]
    fn test_wrong_length() {
        let err = decode_array::<32>(&encode(&[7; 20])).unwrap_err();
        assert_eq!(
            err,
            PrimitiveParseError::Length {
                expected: 32,
                actual: 20
            }
        );
    }

    #[test]
    fn test_hex_checksummed() {
        assert_eq!(encode_hex_checksummed(&[0, 1, 2]), "0x000102b85b53fc");
    }

    #[test]
    fn test_invalid_alphabet() {
        assert!(matches!(decode("0OIl"), Err(PrimitiveParseError::Base58(_))));
    }
}
