// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Certificate, withdrawal and pool registration tags

use encdec::Encode;
use num_enum::TryFromPrimitive;
use strum::Display;

use crate::{
    helpers::{be_u32, be_u64},
    EncodingError,
};

/// Pool key / VRF key hash length
pub const POOL_KEY_HASH_LEN: usize = 28;

/// VRF key hash length
pub const VRF_KEY_HASH_LEN: usize = 32;

/// Reward account (address bytes) length
pub const REWARD_ACCOUNT_LEN: usize = 29;

/// Pool metadata hash length
pub const POOL_METADATA_HASH_LEN: usize = 32;

/// Certificate kinds
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum CertificateType {
    StakeRegistration = 0x00,
    StakeDeregistration = 0x01,
    StakeDelegation = 0x02,
    StakePoolRegistration = 0x03,
    StakePoolRetirement = 0x04,
}

/// Stake credential kinds in certificates and withdrawals
///
/// Firmware without multisig support takes a bare path with no tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum StakeCredentialTag {
    KeyPath = 0x00,
    ScriptHash = 0x01,
    KeyHash = 0x02,
}

/// Pool registration sub-request roles, sent as `P2`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum PoolRole {
    Init = 0x30,
    PoolKey = 0x31,
    VrfKey = 0x32,
    Financials = 0x33,
    RewardAccount = 0x34,
    Owners = 0x35,
    Relays = 0x36,
    Metadata = 0x37,
    Confirmation = 0x38,
}

/// Pool key, owner and reward account kinds
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum PoolEntityType {
    /// Derivation path, the device holds the key
    DeviceOwned = 0x01,
    /// Raw hash / address bytes
    ThirdParty = 0x02,
}

/// Pool relay kinds
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum RelayType {
    SingleHostIpAddr = 0x00,
    SingleHostHostname = 0x01,
    MultiHost = 0x02,
}

/// Pool registration init, announcing the entries to follow
///
/// ```text
/// +---------------------+---------------------+
/// | OWNER_COUNT (u32)   | RELAY_COUNT (u32)   |
/// +---------------------+---------------------+
/// ```
#[derive(Clone, Debug, PartialEq, Encode)]
#[encdec(error = "EncodingError")]
pub struct PoolInitReq {
    #[encdec(with = "be_u32")]
    pub owner_count: u32,

    #[encdec(with = "be_u32")]
    pub relay_count: u32,
}

/// Pool financial parameters, all in lovelace except the margin
///
/// ```text
/// +--------------+------------+-------------------+---------------------+
/// | PLEDGE (u64) | COST (u64) | MARGIN_NUM (u64)  | MARGIN_DENOM (u64)  |
/// +--------------+------------+-------------------+---------------------+
/// ```
#[derive(Clone, Debug, PartialEq, Encode)]
#[encdec(error = "EncodingError")]
pub struct PoolFinancialsReq {
    #[encdec(with = "be_u64")]
    pub pledge: u64,

    #[encdec(with = "be_u64")]
    pub cost: u64,

    #[encdec(with = "be_u64")]
    pub margin_numerator: u64,

    #[encdec(with = "be_u64")]
    pub margin_denominator: u64,
}
