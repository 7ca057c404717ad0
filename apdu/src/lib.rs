// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Protocol / APDU definitions for Cardano app communication
//!
//! This crate provides the wire-level vocabulary used to talk to the Cardano
//! hardware wallet application: instruction codes, status words, the binary
//! encoders every request payload is built from, firmware version decoding
//! and the capability matrix that gates version-dependent encodings.
//!
//! Unlike many Ledger applications all multi-byte integers are big-endian,
//! matching the firmware parser. Numeric tags (address types, credential
//! sources, certificate types, …) are part of the wire contract and are
//! declared with explicit discriminants.

use core::fmt::Debug;

pub mod address;
pub mod compat;
pub mod encode;
pub mod helpers;
pub mod ops;
pub mod prelude;
pub mod response;
pub mod status;
pub mod tx;
pub mod version;

pub use encode::EncodingError;
pub use status::{DeviceStatusCode, DeviceStatusError, SW_OK};
pub use version::{AppFlags, Version};

/// Cardano APDU Class
pub const ADA_APDU_CLA: u8 = 0xd7;

/// Hardened derivation offset for BIP32 indices
pub const HARDENED: u32 = 0x8000_0000;

/// Maximum supported BIP32 path length
pub const MAX_PATH_LEN: usize = 10;

/// Cardano APDU instruction codes
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display, num_enum::TryFromPrimitive)]
#[repr(u8)]
pub enum Instruction {
    /// Fetch application version
    GetVersion = 0x00,

    /// Fetch device serial
    GetSerial = 0x01,

    /// Export extended public keys
    GetExtPublicKey = 0x10,

    /// Derive (and optionally display) an address
    DeriveAddress = 0x11,

    /// Sign a transaction
    SignTx = 0x21,

    /// Sign a pool operational certificate
    SignOperationalCertificate = 0x22,

    /// Sign a CIP-36 vote
    SignCip36Vote = 0x23,

    /// Sign an arbitrary message (CIP-8)
    SignMessage = 0x24,

    /// Run on-device tests (debug builds only)
    RunTests = 0xf0,
}

/// A single request frame, data is the stage payload
///
/// `expected_len` is the exact payload length (status word stripped) the
/// caller requires, where known in advance.
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
    pub ins: Instruction,
    pub p1: u8,
    pub p2: u8,
    pub data: Vec<u8>,
    pub expected_len: Option<usize>,
}

impl Request {
    /// Create a new request with no response length expectation
    pub fn new(ins: Instruction, p1: u8, p2: u8, data: Vec<u8>) -> Self {
        Self {
            ins,
            p1,
            p2,
            data,
            expected_len: None,
        }
    }

    /// Require the (stripped) response payload to be exactly `n` bytes
    pub fn expect(mut self, n: usize) -> Self {
        self.expected_len = Some(n);
        self
    }
}

impl Debug for Request {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Request {{ ins: {}, p1: 0x{:02x}, p2: 0x{:02x}, data: {}, expected_len: {:?} }}",
            self.ins,
            self.p1,
            self.p2,
            hex::encode(&self.data),
            self.expected_len
        )
    }
}
