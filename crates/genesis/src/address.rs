use alloy_primitives::Address;

const ADDRESS_HEX_LEN: usize = 40;

/// Parses a `0x`-prefixed 20-byte hex address. Mixed case is accepted
/// without checksum verification.
pub fn parse_address(s: &str) -> Result<Address, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| "address must start with 0x".to_string())?;

    if digits.len() != ADDRESS_HEX_LEN {
        return Err(format!(
            "address must have {ADDRESS_HEX_LEN} hex digits, got {}",
            digits.len()
        ));
    }

    let mut out = [0u8; 20];
    hex::decode_to_slice(digits, &mut out).map_err(|e| format!("invalid address: {e}"))?;
    Ok(Address::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        let a = parse_address("0x8db97C7cEcE249c2b98bDC0226Cc4C2A57BF52FC").unwrap();
        assert_eq!(hex::encode(a), "8db97c7cece249c2b98bdc0226cc4c2a57bf52fc");
    }

    #[test]
    fn test_rejects_short() {
        let err = parse_address(&format!("0x{}", "a".repeat(39))).unwrap_err();
        assert!(err.contains("got 39"));
    }

    #[test]
    fn test_rejects_missing_prefix() {
        assert!(parse_address(&"a".repeat(40)).is_err());
        assert!(parse_address(&format!("0x{}", "g".repeat(40))).is_err());
    }
}
