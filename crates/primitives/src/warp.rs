//! Avalanche Warp message encodings.
//!
//! All types use the Avalanche linear codec: a `u16` codec version followed
//! by big-endian fixed-width integers, with byte slices length-prefixed by a
//! `u32`. Interface-typed payloads additionally carry a `u32` type ID after
//! the codec version.

use std::mem;

use crate::{
    errors::WarpCodecError,
    ids::{BlockchainId, ValidationId},
};

/// The only codec version in use.
pub const CODEC_VERSION: u16 = 0;

/// Type ID of [`AddressedCall`] within the Warp payload codec.
pub const ADDRESSED_CALL_TYPE_ID: u32 = 1;

/// Type ID of [`L1ValidatorRegistration`] within the P-Chain message codec.
pub const L1_VALIDATOR_REGISTRATION_TYPE_ID: u32 = 2;

#[derive(Debug, Default)]
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn fixed(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    fn var_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        // Lengths above u32::MAX cannot occur for in-memory Warp payloads.
        self.u32(bytes.len() as u32).fixed(bytes)
    }

    fn finish(&mut self) -> Vec<u8> {
        mem::take(&mut self.buf)
    }
}

#[derive(Debug)]
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], WarpCodecError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or(WarpCodecError::Truncated(self.pos))?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], WarpCodecError> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, WarpCodecError> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, WarpCodecError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32, WarpCodecError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    fn bool(&mut self) -> Result<bool, WarpCodecError> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(WarpCodecError::InvalidBool(b)),
        }
    }

    fn var_bytes(&mut self) -> Result<Vec<u8>, WarpCodecError> {
        let len = self.u32()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    fn codec_version(&mut self) -> Result<(), WarpCodecError> {
        match self.u16()? {
            CODEC_VERSION => Ok(()),
            v => Err(WarpCodecError::CodecVersion(v)),
        }
    }

    fn type_id(&mut self, expected: u32) -> Result<(), WarpCodecError> {
        let found = self.u32()?;
        if found != expected {
            return Err(WarpCodecError::TypeId { expected, found });
        }
        Ok(())
    }

    fn finish(self) -> Result<(), WarpCodecError> {
        match self.buf.len() - self.pos {
            0 => Ok(()),
            n => Err(WarpCodecError::TrailingBytes(n)),
        }
    }
}

/// An unsigned Warp message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedMessage {
    pub network_id: u32,
    pub source_chain_id: BlockchainId,
    pub payload: Vec<u8>,
}

impl UnsignedMessage {
    pub fn new(network_id: u32, source_chain_id: BlockchainId, payload: Vec<u8>) -> Self {
        Self {
            network_id,
            source_chain_id,
            payload,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        Writer::default()
            .u16(CODEC_VERSION)
            .u32(self.network_id)
            .fixed(self.source_chain_id.as_bytes())
            .var_bytes(&self.payload)
            .finish()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WarpCodecError> {
        let mut r = Reader::new(bytes);
        r.codec_version()?;
        let network_id = r.u32()?;
        let source_chain_id = BlockchainId::new(r.array()?);
        let payload = r.var_bytes()?;
        r.finish()?;
        Ok(Self {
            network_id,
            source_chain_id,
            payload,
        })
    }
}

/// A Warp payload attributed to a source address on the source chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressedCall {
    pub source_address: Vec<u8>,
    pub payload: Vec<u8>,
}

impl AddressedCall {
    pub fn encode(&self) -> Vec<u8> {
        Writer::default()
            .u16(CODEC_VERSION)
            .u32(ADDRESSED_CALL_TYPE_ID)
            .var_bytes(&self.source_address)
            .var_bytes(&self.payload)
            .finish()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WarpCodecError> {
        let mut r = Reader::new(bytes);
        r.codec_version()?;
        r.type_id(ADDRESSED_CALL_TYPE_ID)?;
        let source_address = r.var_bytes()?;
        let payload = r.var_bytes()?;
        r.finish()?;
        Ok(Self {
            source_address,
            payload,
        })
    }
}

/// P-Chain attestation that a validation ID is (or is not) registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L1ValidatorRegistration {
    pub validation_id: ValidationId,
    pub registered: bool,
}

impl L1ValidatorRegistration {
    pub fn encode(&self) -> Vec<u8> {
        Writer::default()
            .u16(CODEC_VERSION)
            .u32(L1_VALIDATOR_REGISTRATION_TYPE_ID)
            .fixed(self.validation_id.as_bytes())
            .u8(self.registered as u8)
            .finish()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WarpCodecError> {
        let mut r = Reader::new(bytes);
        r.codec_version()?;
        r.type_id(L1_VALIDATOR_REGISTRATION_TYPE_ID)?;
        let validation_id = ValidationId::new(r.array()?);
        let registered = r.bool()?;
        r.finish()?;
        Ok(Self {
            validation_id,
            registered,
        })
    }
}

/// Builds the unsigned P-Chain message attesting that `validation_id` was
/// registered, ready to be signed by the aggregator.
pub fn registration_attestation(network_id: u32, validation_id: ValidationId) -> UnsignedMessage {
    let inner = L1ValidatorRegistration {
        validation_id,
        registered: true,
    };
    let call = AddressedCall {
        source_address: Vec::new(),
        payload: inner.encode(),
    };
    UnsignedMessage::new(network_id, BlockchainId::P_CHAIN, call.encode())
}
