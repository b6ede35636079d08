//! BLS key material supplied with a validator registration.
//!
//! Only the byte lengths are checked here; curve membership is verified by
//! the P-Chain when the registration transaction is accepted.

/// Compressed BLS12-381 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlsPublicKey([u8; 48]);

impl_hex_bytes!(BlsPublicKey, 48);

/// BLS proof of possession (a signature over the public key).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlsProofOfPossession([u8; 96]);

impl_hex_bytes!(BlsProofOfPossession, 96);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrimitiveParseError;

    #[test]
    fn test_parse_public_key() {
        let s = format!("0x{}", "ab".repeat(48));
        let key: BlsPublicKey = s.parse().unwrap();
        assert_eq!(key.as_bytes(), &[0xab; 48]);
        assert_eq!(key.to_string(), s);

        // Prefix is optional.
        let bare: BlsPublicKey = "ab".repeat(48).parse().unwrap();
        assert_eq!(bare, key);
    }

    #[test]
    fn test_pop_wrong_length() {
        let err = "cd".repeat(48).parse::<BlsProofOfPossession>().unwrap_err();
        assert_eq!(
            err,
            PrimitiveParseError::Length {
                expected: 96,
                actual: 48
            }
        );
    }

    #[test]
    fn test_bad_hex() {
        let err = "zz".repeat(48).parse::<BlsPublicKey>().unwrap_err();
        assert!(matches!(err, PrimitiveParseError::Hex(_)));
    }
}
