// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Binary encoders used to build request payloads
//!
//! All fixed-width integers are big-endian. 64-bit values arrive as decimal
//! strings (amounts routinely exceed the range of a double) and are parsed
//! exactly, never via floating point.

use byteorder::{BigEndian, ByteOrder};

use crate::MAX_PATH_LEN;

/// Encoding errors
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// Value exceeds the width of the target field
    #[error("value out of range for {bits}-bit field")]
    OutOfRange { bits: u8 },

    /// Not a valid decimal integer string
    #[error("invalid decimal integer string")]
    InvalidNumber,

    /// Odd length or non-hex characters
    #[error("invalid hex string")]
    InvalidHex,

    /// Buffer length does not match the expected length
    #[error("invalid length (expected {expected}, actual {actual})")]
    InvalidLength { expected: usize, actual: usize },

    /// BIP32 path exceeds the maximum supported depth
    #[error("bip32 path too long ({0} > {MAX_PATH_LEN})")]
    PathTooLong(usize),

    /// Credential source not representable in the spending slot
    #[error("credential tag 0x{0:02x} not valid in the spending slot")]
    InvalidSpendingSource(u8),

    /// Failure inside a derived encoder
    #[error("encode / decode failed: {0:?}")]
    Codec(encdec::Error),
}

impl From<encdec::Error> for EncodingError {
    fn from(e: encdec::Error) -> Self {
        EncodingError::Codec(e)
    }
}

/// Encode an 8-bit unsigned integer
pub fn uint8(n: u64) -> Result<[u8; 1], EncodingError> {
    let v = u8::try_from(n).map_err(|_| EncodingError::OutOfRange { bits: 8 })?;
    Ok([v])
}

/// Encode a 16-bit unsigned integer (big-endian)
pub fn uint16(n: u64) -> Result<[u8; 2], EncodingError> {
    let v = u16::try_from(n).map_err(|_| EncodingError::OutOfRange { bits: 16 })?;
    let mut b = [0u8; 2];
    BigEndian::write_u16(&mut b, v);
    Ok(b)
}

/// Encode a 32-bit unsigned integer (big-endian)
pub fn uint32(n: u64) -> Result<[u8; 4], EncodingError> {
    let v = u32::try_from(n).map_err(|_| EncodingError::OutOfRange { bits: 32 })?;
    let mut b = [0u8; 4];
    BigEndian::write_u32(&mut b, v);
    Ok(b)
}

/// Encode an unsigned 64-bit decimal string (big-endian)
pub fn uint64(s: &str) -> Result<[u8; 8], EncodingError> {
    let v = parse_uint64(s)?;
    let mut b = [0u8; 8];
    BigEndian::write_u64(&mut b, v);
    Ok(b)
}

/// Encode a signed 64-bit decimal string (big-endian two's complement)
pub fn int64(s: &str) -> Result<[u8; 8], EncodingError> {
    let v = parse_int64(s)?;
    let mut b = [0u8; 8];
    BigEndian::write_i64(&mut b, v);
    Ok(b)
}

/// Parse an unsigned decimal string into a u64
pub fn parse_uint64(s: &str) -> Result<u64, EncodingError> {
    if s.is_empty() || !s.bytes().all(|c| c.is_ascii_digit()) {
        return Err(EncodingError::InvalidNumber);
    }

    s.parse::<u64>()
        .map_err(|_| EncodingError::OutOfRange { bits: 64 })
}

/// Parse an (optionally negative) decimal string into an i64
pub fn parse_int64(s: &str) -> Result<i64, EncodingError> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
        return Err(EncodingError::InvalidNumber);
    }

    s.parse::<i64>()
        .map_err(|_| EncodingError::OutOfRange { bits: 64 })
}

/// Decode a big-endian u64 into its decimal string form
pub fn decode_uint64(b: &[u8]) -> Result<String, EncodingError> {
    check_len(b, 8)?;
    Ok(BigEndian::read_u64(b).to_string())
}

/// Decode a big-endian two's complement i64 into its decimal string form
pub fn decode_int64(b: &[u8]) -> Result<String, EncodingError> {
    check_len(b, 8)?;
    Ok(BigEndian::read_i64(b).to_string())
}

/// Decode a hex string into bytes
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, EncodingError> {
    hex::decode(s).map_err(|_| EncodingError::InvalidHex)
}

/// Decode a hex string into a fixed-size array
pub fn hex_to_array<const N: usize>(s: &str) -> Result<[u8; N], EncodingError> {
    let v = hex_to_bytes(s)?;
    check_len(&v, N)?;

    let mut b = [0u8; N];
    b.copy_from_slice(&v);
    Ok(b)
}

/// Encode bytes as a lower-case hex string
pub fn bytes_to_hex(b: &[u8]) -> String {
    hex::encode(b)
}

/// Encode a BIP32 path as `u8(len) ++ u32(index) × len`
///
/// Hardening (`index + 0x80000000`) is already applied by the caller.
pub fn bip32_path(path: &[u32]) -> Result<Vec<u8>, EncodingError> {
    if path.len() > MAX_PATH_LEN {
        return Err(EncodingError::PathTooLong(path.len()));
    }

    let mut b = Vec::with_capacity(1 + 4 * path.len());
    b.push(path.len() as u8);
    for i in path {
        b.extend_from_slice(&i.to_be_bytes());
    }

    Ok(b)
}

fn check_len(b: &[u8], expected: usize) -> Result<(), EncodingError> {
    match b.len() == expected {
        true => Ok(()),
        false => Err(EncodingError::InvalidLength {
            expected,
            actual: b.len(),
        }),
    }
}

/// Payload builder over the fixed-width encoders
///
/// Typed values have already been range-checked during request parsing,
/// only collection counts (from `usize`) may still overflow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Builder(Vec<u8>);

impl Builder {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }

    pub fn u16(mut self, v: u16) -> Self {
        let mut b = [0u8; 2];
        BigEndian::write_u16(&mut b, v);
        self.0.extend_from_slice(&b);
        self
    }

    pub fn u32(mut self, v: u32) -> Self {
        let mut b = [0u8; 4];
        BigEndian::write_u32(&mut b, v);
        self.0.extend_from_slice(&b);
        self
    }

    pub fn u64(mut self, v: u64) -> Self {
        let mut b = [0u8; 8];
        BigEndian::write_u64(&mut b, v);
        self.0.extend_from_slice(&b);
        self
    }

    pub fn i64(mut self, v: i64) -> Self {
        let mut b = [0u8; 8];
        BigEndian::write_i64(&mut b, v);
        self.0.extend_from_slice(&b);
        self
    }

    pub fn bytes(mut self, b: &[u8]) -> Self {
        self.0.extend_from_slice(b);
        self
    }

    /// Collection length as a u32
    pub fn count(self, n: usize) -> Result<Self, EncodingError> {
        let b = uint32(n as u64)?;
        Ok(self.bytes(&b))
    }

    /// Length-prefixed BIP32 path
    pub fn path(self, p: &[u32]) -> Result<Self, EncodingError> {
        let b = bip32_path(p)?;
        Ok(self.bytes(&b))
    }

    /// Optional-field presence flag (`0x01` absent, `0x02` present)
    pub fn flag(self, present: bool) -> Self {
        self.u8(crate::tx::option_flag(present))
    }

    pub fn finish(self) -> Vec<u8> {
        self.0
    }
}
