// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Address types and credential sources, as encoded for address derivation

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::encode::{bip32_path, Builder, EncodingError};

/// Length of key / script hashes in credentials
pub const KEY_HASH_LEN: usize = 28;

/// Shelley address types, the discriminant is the address header nibble
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Display,
    EnumIter,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum AddressType {
    BasePaymentKeyStakeKey = 0x00,
    BasePaymentScriptStakeKey = 0x01,
    BasePaymentKeyStakeScript = 0x02,
    BasePaymentScriptStakeScript = 0x03,
    PointerKey = 0x04,
    PointerScript = 0x05,
    EnterpriseKey = 0x06,
    EnterpriseScript = 0x07,
    Byron = 0x08,
    RewardKey = 0x0e,
    RewardScript = 0x0f,
}

impl AddressType {
    /// Byron-family addresses carry a protocol magic in place of a network id
    pub fn is_byron(&self) -> bool {
        matches!(self, AddressType::Byron)
    }
}

/// Certificate pointer to a stake key registration
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainPointer {
    pub block_index: u32,
    pub tx_index: u32,
    pub certificate_index: u32,
}

/// Credential source tags, fixed by the wire contract
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum CredentialTag {
    None = 0x11,
    KeyPath = 0x22,
    KeyHash = 0x33,
    Pointer = 0x44,
    ScriptHash = 0x55,
}

/// Source of a spending or staking credential
///
/// Exactly one variant is populated, which combinations are legal for an
/// address type is enforced when parsing address parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    None,
    Path(Vec<u32>),
    KeyHash([u8; KEY_HASH_LEN]),
    Pointer(BlockchainPointer),
    ScriptHash([u8; KEY_HASH_LEN]),
}

impl CredentialSource {
    pub fn tag(&self) -> CredentialTag {
        match self {
            CredentialSource::None => CredentialTag::None,
            CredentialSource::Path(_) => CredentialTag::KeyPath,
            CredentialSource::KeyHash(_) => CredentialTag::KeyHash,
            CredentialSource::Pointer(_) => CredentialTag::Pointer,
            CredentialSource::ScriptHash(_) => CredentialTag::ScriptHash,
        }
    }

    pub fn path(&self) -> Option<&[u32]> {
        match self {
            CredentialSource::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Encode the spending slot
    ///
    /// The address type fixes the shape of the spending credential, so no
    /// tag is sent. Reward addresses leave the slot empty.
    pub fn encode_spending(&self) -> Result<Vec<u8>, EncodingError> {
        match self {
            CredentialSource::None => Ok(vec![]),
            CredentialSource::Path(p) => bip32_path(p),
            CredentialSource::ScriptHash(h) => Ok(h.to_vec()),
            CredentialSource::KeyHash(_) | CredentialSource::Pointer(_) => {
                Err(EncodingError::InvalidSpendingSource(self.tag() as u8))
            }
        }
    }

    /// Encode the staking slot as `tag ++ payload`
    pub fn encode_staking(&self) -> Result<Vec<u8>, EncodingError> {
        let b = Builder::new().u8(self.tag() as u8);

        let b = match self {
            CredentialSource::None => b,
            CredentialSource::Path(p) => b.path(p)?,
            CredentialSource::KeyHash(h) | CredentialSource::ScriptHash(h) => b.bytes(h),
            CredentialSource::Pointer(p) => b
                .u32(p.block_index)
                .u32(p.tx_index)
                .u32(p.certificate_index),
        };

        Ok(b.finish())
    }
}
