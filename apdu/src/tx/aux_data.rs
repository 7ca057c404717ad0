// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Auxiliary data and governance voting registration tags

use num_enum::TryFromPrimitive;
use strum::Display;

/// Vote / staking public key length
pub const VOTE_KEY_LEN: usize = 32;

/// Registration signature length
pub const REGISTRATION_SIGNATURE_LEN: usize = 64;

/// Auxiliary data kinds (current aux data flow only)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum AuxDataType {
    ArbitraryHash = 0x00,
    /// Followed by the registration sub-sequence
    VoteRegistration = 0x01,
}

/// Governance voting registration sub-request roles, sent as `P2`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum RegistrationRole {
    VoteKey = 0x30,
    StakingKey = 0x31,
    PaymentAddress = 0x32,
    Nonce = 0x33,
    /// Responds with the aux data hash and registration signature
    Confirm = 0x34,
    VotingPurpose = 0x35,
    /// Format and delegation count, CIP-36 capable firmware only
    Init = 0x36,
    Delegation = 0x37,
}

/// Registration formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum RegistrationFormat {
    Cip15 = 0x01,
    Cip36 = 0x02,
}

/// Vote key kinds (vote key or delegation target)
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum VoteKeyType {
    Key = 0x01,
    Path = 0x02,
}
