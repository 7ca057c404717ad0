// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Extended public key export
//!
//! Keys are exported one path per request. For bulk exports the first
//! request carries the number of keys to follow so the device confirms the
//! export once.

use encdec::DecodeOwned;
use serde::{Deserialize, Serialize};

use ledger_ada_apdu::{
    helpers::to_vec,
    ops::{ExtPublicKeyInitReq, ExtPublicKeyP1, PathReq},
    response::ExtendedPublicKeyResp,
    EncodingError, Instruction, Request,
};

use crate::{
    address::parse_path,
    interaction::{Call, Sequence},
    Error, InvalidDataReason,
};

/// Maximum number of keys exported in a single call
pub const MAX_KEYS: usize = 1000;

/// Extended public key (ed25519 public key and BIP32 chain code)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedPublicKey {
    pub public_key_hex: String,
    pub chain_code_hex: String,
}

impl From<ExtendedPublicKeyResp> for ExtendedPublicKey {
    fn from(r: ExtendedPublicKeyResp) -> Self {
        Self {
            public_key_hex: hex::encode(r.public_key),
            chain_code_hex: hex::encode(r.chain_code),
        }
    }
}

/// Build the export sequence for the provided paths
pub fn get_extended_public_keys(
    paths: &[Vec<u32>],
) -> Result<Sequence<Vec<ExtendedPublicKey>, Vec<ExtendedPublicKey>>, Error> {
    if paths.len() > MAX_KEYS {
        return Err(InvalidDataReason::TooManyKeys.into());
    }

    let mut calls = Vec::with_capacity(paths.len());

    for (i, p) in paths.iter().enumerate() {
        let p = parse_path(p, InvalidDataReason::InvalidPath)?;

        // Remaining count is only sent for bulk exports
        let (p1, data) = match (i, paths.len()) {
            (0, 1) => (ExtPublicKeyP1::Init, to_vec(&PathReq { path: p })?),
            (0, n) => {
                let remaining =
                    u32::try_from(n - 1).map_err(|_| EncodingError::OutOfRange { bits: 32 })?;
                (
                    ExtPublicKeyP1::Init,
                    to_vec(&ExtPublicKeyInitReq { path: p, remaining })?,
                )
            }
            _ => (ExtPublicKeyP1::Next, to_vec(&PathReq { path: p })?),
        };

        let req = Request::new(Instruction::GetExtPublicKey, p1 as u8, 0x00, data)
            .expect(ExtendedPublicKeyResp::LEN);

        calls.push(Call::new(req, |keys: &mut Vec<ExtendedPublicKey>, r: &[u8]| {
            let (k, _) = ExtendedPublicKeyResp::decode_owned(r)?;
            keys.push(k.into());
            Ok(())
        }));
    }

    Ok(Sequence::new(Vec::with_capacity(paths.len()), calls, Ok))
}
