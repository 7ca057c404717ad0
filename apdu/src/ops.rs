// Copyright (c) 2022-2023 The MobileCoin Foundation

//! `P1` codes and request objects for the non-transaction instructions

use encdec::Encode;
use num_enum::TryFromPrimitive;

use crate::{
    helpers::{be_u32, be_u64, path},
    EncodingError,
};

/// KES public key length
pub const KES_PUBLIC_KEY_LEN: usize = 32;

/// Extended public key export steps
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ExtPublicKeyP1 {
    /// First path, with the remaining key count when exporting several
    Init = 0x00,
    Next = 0x01,
}

/// Address derivation modes
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum DeriveAddressP1 {
    /// Respond with the address bytes
    Return = 0x01,
    /// Show the address on the device, empty response
    Display = 0x02,
}

/// Message signing steps
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum SignMessageP1 {
    Init = 0x01,
    Chunk = 0x02,
    Confirm = 0x03,
}

/// Address field kinds for message signing
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum MessageAddressFieldType {
    /// Derived address shown and returned in the signed header
    Address = 0x01,
    /// Key hash of the signing key
    KeyHash = 0x02,
}

/// Vote signing steps
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum SignVoteP1 {
    /// Total length and first chunk
    Init = 0x01,
    Chunk = 0x02,
    /// Responds with the vote-cast body hash
    Confirm = 0x03,
    /// Responds with the signature for the provided path
    Witness = 0x04,
}

/// Bare BIP32 path request, used for single key exports and witnesses
///
/// ```text
/// +---------+-------------------+
/// | LEN(u8) | INDEX (u32) * LEN |
/// +---------+-------------------+
/// ```
#[derive(Clone, Debug, PartialEq, Encode)]
#[encdec(error = "EncodingError")]
pub struct PathReq {
    #[encdec(with = "path")]
    pub path: Vec<u32>,
}

impl PathReq {
    pub fn new(path: &[u32]) -> Self {
        Self {
            path: path.to_vec(),
        }
    }
}

/// First request of a bulk key export
///
/// ```text
/// +------+-----------------+
/// | PATH | REMAINING (u32) |
/// +------+-----------------+
/// ```
#[derive(Clone, Debug, PartialEq, Encode)]
#[encdec(error = "EncodingError")]
pub struct ExtPublicKeyInitReq {
    #[encdec(with = "path")]
    pub path: Vec<u32>,

    /// Keys still to be requested after this one
    #[encdec(with = "be_u32")]
    pub remaining: u32,
}

/// Operational certificate signing request
///
/// ```text
/// +--------------------+------------------+---------------------+-----------+
/// | KES_PUBLIC_KEY(32) | KES_PERIOD (u64) | ISSUE_COUNTER (u64) | COLD_PATH |
/// +--------------------+------------------+---------------------+-----------+
/// ```
#[derive(Clone, Debug, PartialEq, Encode)]
#[encdec(error = "EncodingError")]
pub struct OpCertReq {
    pub kes_public_key: [u8; KES_PUBLIC_KEY_LEN],

    #[encdec(with = "be_u64")]
    pub kes_period: u64,

    #[encdec(with = "be_u64")]
    pub issue_counter: u64,

    #[encdec(with = "path")]
    pub cold_key_path: Vec<u32>,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{helpers::to_vec, HARDENED};

    #[test]
    fn ext_public_key_init() {
        let r = ExtPublicKeyInitReq {
            path: vec![1852 | HARDENED, 1815 | HARDENED],
            remaining: 3,
        };

        assert_eq!(
            to_vec(&r).unwrap(),
            vec![0x02, 0x80, 0x00, 0x07, 0x3c, 0x80, 0x00, 0x07, 0x17, 0x00, 0x00, 0x00, 0x03]
        );
    }

    #[test]
    fn op_cert() {
        let r = OpCertReq {
            kes_public_key: [0x3d; KES_PUBLIC_KEY_LEN],
            kes_period: 47,
            issue_counter: 0x0102_0304_0506_0708,
            cold_key_path: vec![1853 | HARDENED, 1815 | HARDENED, HARDENED, HARDENED],
        };

        let b = to_vec(&r).unwrap();
        assert_eq!(b.len(), 32 + 8 + 8 + 1 + 16);
        assert_eq!(&b[..32], &[0x3d; 32]);
        assert_eq!(&b[32..40], &[0, 0, 0, 0, 0, 0, 0, 47]);
        assert_eq!(&b[40..48], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&b[48..53], &[0x04, 0x80, 0x00, 0x07, 0x3d]);
    }
}
