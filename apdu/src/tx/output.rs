// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Output and mint roles

use encdec::Encode;
use num_enum::TryFromPrimitive;
use strum::Display;

use crate::{address::KEY_HASH_LEN, helpers::be_u32, EncodingError};

/// Output / mint sub-request roles, sent as `P2`
///
/// Mint reuses `BasicData`, `AssetGroup`, `Token` and `Confirm`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum OutputRole {
    BasicData = 0x30,
    AssetGroup = 0x31,
    Token = 0x32,
    Confirm = 0x33,
    /// Datum hash, or the first inline datum chunk
    Datum = 0x34,
    DatumChunk = 0x35,
    /// First reference script chunk
    Script = 0x36,
    ScriptChunk = 0x37,
}

/// Output serialization format
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum OutputFormat {
    /// `[address, amount, ?datum_hash]`
    ArrayLegacy = 0x00,
    /// `{0: address, 1: amount, ?2: datum_option, ?3: script_ref}`
    MapBabbage = 0x01,
}

/// Datum option kinds for map-format outputs
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum DatumType {
    Hash = 0x00,
    Inline = 0x01,
}

/// Output destination kinds
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum DestinationType {
    /// Raw address bytes
    ThirdParty = 0x01,
    /// Address derivation parameters, shown to the user as owned
    DeviceOwned = 0x02,
}

/// Asset group header, tokens follow as separate requests
///
/// ```text
/// +----------------+-------------------+
/// | POLICY_ID (28) | TOKEN_COUNT (u32) |
/// +----------------+-------------------+
/// ```
#[derive(Clone, Debug, PartialEq, Encode)]
#[encdec(error = "EncodingError")]
pub struct AssetGroupReq {
    pub policy_id: [u8; KEY_HASH_LEN],

    #[encdec(with = "be_u32")]
    pub token_count: u32,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::helpers::to_vec;

    #[test]
    fn asset_group() {
        let r = AssetGroupReq {
            policy_id: [0x95; KEY_HASH_LEN],
            token_count: 3,
        };

        let b = to_vec(&r).unwrap();
        assert_eq!(&b[..KEY_HASH_LEN], &[0x95; KEY_HASH_LEN]);
        assert_eq!(&b[KEY_HASH_LEN..], &[0, 0, 0, 3]);
    }
}
