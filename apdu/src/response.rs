// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Fixed-layout response payloads
//!
//! Decoders receive the payload with the status word already stripped.

use byteorder::{BigEndian, ByteOrder};
use encdec::DecodeOwned;

use crate::{
    tx::{AUX_DATA_HASH_LEN, REGISTRATION_SIGNATURE_LEN},
    EncodingError,
};

/// Ed25519 signature length
pub const SIGNATURE_LEN: usize = 64;

/// Public key length
pub const PUBLIC_KEY_LEN: usize = 32;

/// Chain code length
pub const CHAIN_CODE_LEN: usize = 32;

/// Device serial length
pub const SERIAL_LEN: usize = 7;

/// Extended public key response
///
/// ## Encoding
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                    PUBLIC_KEY (32 bytes)                      /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                    CHAIN_CODE (32 bytes)                      /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPublicKeyResp {
    pub public_key: [u8; PUBLIC_KEY_LEN],
    pub chain_code: [u8; CHAIN_CODE_LEN],
}

impl ExtendedPublicKeyResp {
    pub const LEN: usize = PUBLIC_KEY_LEN + CHAIN_CODE_LEN;
}

impl DecodeOwned for ExtendedPublicKeyResp {
    type Output = Self;

    type Error = EncodingError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        check_len(buff, Self::LEN)?;

        let mut public_key = [0u8; PUBLIC_KEY_LEN];
        public_key.copy_from_slice(&buff[..PUBLIC_KEY_LEN]);

        let mut chain_code = [0u8; CHAIN_CODE_LEN];
        chain_code.copy_from_slice(&buff[PUBLIC_KEY_LEN..]);

        Ok((
            Self {
                public_key,
                chain_code,
            },
            Self::LEN,
        ))
    }
}

/// Fixed-size byte response (hashes, signatures, serial)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedResp<const N: usize>(pub [u8; N]);

impl<const N: usize> DecodeOwned for FixedResp<N> {
    type Output = Self;

    type Error = EncodingError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        check_len(buff, N)?;

        let mut b = [0u8; N];
        b.copy_from_slice(buff);

        Ok((Self(b), N))
    }
}

impl<const N: usize> FixedResp<N> {
    pub const LEN: usize = N;

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// 64-byte Ed25519 signature response
pub type SignatureResp = FixedResp<SIGNATURE_LEN>;

/// 32-byte hash response
pub type HashResp = FixedResp<32>;

/// 7-byte device serial response
pub type SerialResp = FixedResp<SERIAL_LEN>;

/// Voting registration confirmation, aux data hash and signature
///
/// ## Encoding
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                  AUX_DATA_HASH (32 bytes)                     /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                    SIGNATURE (64 bytes)                       /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegistrationResp {
    pub aux_data_hash: [u8; AUX_DATA_HASH_LEN],
    pub signature: [u8; REGISTRATION_SIGNATURE_LEN],
}

impl RegistrationResp {
    pub const LEN: usize = AUX_DATA_HASH_LEN + REGISTRATION_SIGNATURE_LEN;
}

impl DecodeOwned for RegistrationResp {
    type Output = Self;

    type Error = EncodingError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        check_len(buff, Self::LEN)?;

        let mut aux_data_hash = [0u8; AUX_DATA_HASH_LEN];
        aux_data_hash.copy_from_slice(&buff[..AUX_DATA_HASH_LEN]);

        let mut signature = [0u8; REGISTRATION_SIGNATURE_LEN];
        signature.copy_from_slice(&buff[AUX_DATA_HASH_LEN..]);

        Ok((
            Self {
                aux_data_hash,
                signature,
            },
            Self::LEN,
        ))
    }
}

/// Message signing confirmation
///
/// ## Encoding
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                    SIGNATURE (64 bytes)                       /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                   PUBLIC_KEY (32 bytes)                       /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      ADDRESS_FIELD_LEN                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                 ADDRESS_FIELD (variable length)               /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageSignatureResp {
    pub signature: [u8; SIGNATURE_LEN],
    pub public_key: [u8; PUBLIC_KEY_LEN],
    pub address_field: Vec<u8>,
}

impl DecodeOwned for MessageSignatureResp {
    type Output = Self;

    type Error = EncodingError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        const HEADER_LEN: usize = SIGNATURE_LEN + PUBLIC_KEY_LEN + 4;

        if buff.len() < HEADER_LEN {
            return Err(EncodingError::InvalidLength {
                expected: HEADER_LEN,
                actual: buff.len(),
            });
        }

        let mut signature = [0u8; SIGNATURE_LEN];
        signature.copy_from_slice(&buff[..SIGNATURE_LEN]);

        let mut public_key = [0u8; PUBLIC_KEY_LEN];
        public_key.copy_from_slice(&buff[SIGNATURE_LEN..][..PUBLIC_KEY_LEN]);

        let n = BigEndian::read_u32(&buff[SIGNATURE_LEN + PUBLIC_KEY_LEN..]) as usize;
        check_len(&buff[HEADER_LEN..], n)?;

        Ok((
            Self {
                signature,
                public_key,
                address_field: buff[HEADER_LEN..].to_vec(),
            },
            HEADER_LEN + n,
        ))
    }
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
