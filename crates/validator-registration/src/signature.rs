/// Length of a compressed BLS signature.
pub const BLS_SIGNATURE_LEN: usize = 96;

/// Whether an aggregated warp message carries no usable signature: empty,
/// all zero, or ending in an all-zero signature.
pub fn is_degenerate_signature(signed_message: &[u8]) -> bool {
    if signed_message.iter().all(|b| *b == 0) {
        return true;
    }
    signed_message.len() >= BLS_SIGNATURE_LEN
        && signed_message[signed_message.len() - BLS_SIGNATURE_LEN..]
            .iter()
            .all(|b| *b == 0)
}
