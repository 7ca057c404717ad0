// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Address derivation parameters
//!
//! Caller-supplied [DeviceOwnedAddress] requests are parsed into
//! [ParsedAddressParams], which fixes exactly one credential source per slot
//! for the address type, then encoded per the connected app version.

use serde::{Deserialize, Serialize};

use ledger_ada_apdu::{
    address::{AddressType, BlockchainPointer, CredentialSource, KEY_HASH_LEN},
    compat::{Capabilities, VersionUnsupported},
    encode::{hex_to_array, Builder},
    Version,
};

use crate::{Error, InvalidDataReason};

/// Maximum Shelley network id (header nibble)
pub const MAX_NETWORK_ID: u8 = 0x0f;

/// Network identification
///
/// Shelley addresses carry the network id, Byron addresses the protocol
/// magic, so both are always supplied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub network_id: u8,
    pub protocol_magic: u32,
}

impl Network {
    pub const MAINNET: Network = Network {
        network_id: 0x01,
        protocol_magic: 764_824_073,
    };

    pub const TESTNET: Network = Network {
        network_id: 0x00,
        protocol_magic: 1_097_911_063,
    };

    pub(crate) fn parse(&self) -> Result<Self, Error> {
        if self.network_id > MAX_NETWORK_ID {
            return Err(InvalidDataReason::NetworkInvalidNetworkId.into());
        }
        Ok(*self)
    }
}

/// Address derivation request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceOwnedAddress {
    #[serde(rename = "type")]
    pub address_type: AddressType,
    pub params: AddressParams,
}

/// Credential fields for address derivation, which are required depends
/// on the address type
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spending_path: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spending_script_hash_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staking_path: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staking_key_hash_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staking_script_hash_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staking_blockchain_pointer: Option<BlockchainPointer>,
}

/// Network slot of encoded address parameters
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NetworkSlot {
    ProtocolMagic(u32),
    NetworkId(u8),
}

/// Validated address parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedAddressParams {
    pub address_type: AddressType,
    pub network: NetworkSlot,
    pub spending: CredentialSource,
    pub staking: CredentialSource,
}

/// Spending slot requirements per address type
enum Spending {
    Path,
    ScriptHash,
    None,
}

/// Staking slot requirements per address type
enum Staking {
    /// Path or key hash
    Key,
    ScriptHash,
    Pointer,
    None,
}

/// Validate a BIP32 path
pub(crate) fn parse_path(path: &[u32], reason: InvalidDataReason) -> Result<Vec<u32>, Error> {
    if path.len() > ledger_ada_apdu::MAX_PATH_LEN {
        return Err(reason.into());
    }
    Ok(path.to_vec())
}

/// Parse a fixed-length hex value
pub(crate) fn parse_hex<const N: usize>(
    s: &str,
    reason: InvalidDataReason,
) -> Result<[u8; N], Error> {
    hex_to_array::<N>(s).map_err(|_| reason.into())
}

impl DeviceOwnedAddress {
    /// Validate address parameters for the provided network
    pub fn parse(&self, network: &Network) -> Result<ParsedAddressParams, Error> {
        use AddressType::*;

        let network = network.parse()?;
        let p = &self.params;

        let (spending, staking) = match self.address_type {
            BasePaymentKeyStakeKey => (Spending::Path, Staking::Key),
            BasePaymentScriptStakeKey => (Spending::ScriptHash, Staking::Key),
            BasePaymentKeyStakeScript => (Spending::Path, Staking::ScriptHash),
            BasePaymentScriptStakeScript => (Spending::ScriptHash, Staking::ScriptHash),
            PointerKey => (Spending::Path, Staking::Pointer),
            PointerScript => (Spending::ScriptHash, Staking::Pointer),
            EnterpriseKey | Byron => (Spending::Path, Staking::None),
            EnterpriseScript => (Spending::ScriptHash, Staking::None),
            RewardKey => (Spending::None, Staking::Key),
            RewardScript => (Spending::None, Staking::ScriptHash),
        };

        let spending = match (spending, &p.spending_path, &p.spending_script_hash_hex) {
            (Spending::Path, Some(path), None) => CredentialSource::Path(parse_path(
                path,
                InvalidDataReason::AddressInvalidSpendingInfo,
            )?),
            (Spending::ScriptHash, None, Some(h)) => CredentialSource::ScriptHash(parse_hex::<
                KEY_HASH_LEN,
            >(
                h,
                InvalidDataReason::AddressInvalidSpendingInfo,
            )?),
            (Spending::None, None, None) => CredentialSource::None,
            _ => return Err(InvalidDataReason::AddressInvalidSpendingInfo.into()),
        };

        let reason = InvalidDataReason::AddressInvalidStakingInfo;
        let staking = match (
            staking,
            &p.staking_path,
            &p.staking_key_hash_hex,
            &p.staking_script_hash_hex,
            &p.staking_blockchain_pointer,
        ) {
            (Staking::Key, Some(path), None, None, None) => {
                CredentialSource::Path(parse_path(path, reason)?)
            }
            (Staking::Key, None, Some(h), None, None) => {
                CredentialSource::KeyHash(parse_hex::<KEY_HASH_LEN>(h, reason)?)
            }
            (Staking::ScriptHash, None, None, Some(h), None) => {
                CredentialSource::ScriptHash(parse_hex::<KEY_HASH_LEN>(h, reason)?)
            }
            (Staking::Pointer, None, None, None, Some(ptr)) => CredentialSource::Pointer(*ptr),
            (Staking::None, None, None, None, None) => CredentialSource::None,
            (Staking::Pointer, ..) => {
                return Err(InvalidDataReason::AddressInvalidBlockchainPointer.into())
            }
            _ => return Err(reason.into()),
        };

        let network = match self.address_type {
            Byron => NetworkSlot::ProtocolMagic(network.protocol_magic),
            _ => NetworkSlot::NetworkId(network.network_id),
        };

        Ok(ParsedAddressParams {
            address_type: self.address_type,
            network,
            spending,
            staking,
        })
    }
}

impl ParsedAddressParams {
    /// Encode for the connected app version
    ///
    /// ```text
    /// +------+-------------------------+----------+---------+
    /// | TYPE | MAGIC (u32) / NET (u8)  | SPENDING | STAKING |
    /// +------+-------------------------+----------+---------+
    /// ```
    ///
    /// The spending slot is untagged, its shape following from the address
    /// type. Staking credentials are tagged by source.
    ///
    /// Firmware predating multisig support only understands reward addresses
    /// with the staking path moved into the spending slot. Script-based
    /// spending and script reward addresses have no such legacy form.
    pub fn encode(&self, version: &Version) -> Result<Vec<u8>, Error> {
        let caps = Capabilities::of(version);

        let b = Builder::new().u8(self.address_type as u8);
        let b = match self.network {
            NetworkSlot::ProtocolMagic(m) => b.u32(m),
            NetworkSlot::NetworkId(n) => b.u8(n),
        };

        let (spending, staking) = match caps.supports_multisig_transaction {
            true => (self.spending.clone(), self.staking.clone()),
            false => self.legacy_slots(version)?,
        };

        Ok(b.bytes(&spending.encode_spending()?)
            .bytes(&staking.encode_staking()?)
            .finish())
    }

    fn legacy_slots(
        &self,
        version: &Version,
    ) -> Result<(CredentialSource, CredentialSource), Error> {
        match (self.address_type, &self.spending, &self.staking) {
            (AddressType::RewardKey, CredentialSource::None, CredentialSource::Path(p)) => {
                Ok((CredentialSource::Path(p.clone()), CredentialSource::None))
            }
            (AddressType::RewardKey, ..) => {
                Err(VersionUnsupported::new(version, "reward address from a key hash").into())
            }
            (AddressType::RewardScript, ..) => {
                Err(VersionUnsupported::new(version, "script reward address").into())
            }
            (_, CredentialSource::Path(_), _) => Ok((self.spending.clone(), self.staking.clone())),
            _ => Err(VersionUnsupported::new(version, "script spending credential").into()),
        }
    }
}
