// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Pool operational certificate signing

use encdec::DecodeOwned;
use serde::{Deserialize, Serialize};

use ledger_ada_apdu::{
    encode::{hex_to_array, parse_uint64},
    helpers::to_vec,
    ops::OpCertReq,
    response::{SignatureResp, SIGNATURE_LEN},
    Instruction, Request,
};

pub use ledger_ada_apdu::ops::KES_PUBLIC_KEY_LEN;

use crate::{
    address::parse_path,
    interaction::{Call, Sequence},
    Error, InvalidDataReason,
};

/// Operational certificate, signed with the pool cold key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalCertificate {
    pub kes_public_key_hex: String,
    pub kes_period: String,
    pub issue_counter: String,
    pub cold_key_path: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalCertificateSignature {
    pub signature_hex: String,
}

/// Build the operational certificate signing sequence
///
/// ```text
/// +--------------------+------------------+---------------------+-----------+
/// | KES_PUBLIC_KEY(32) | KES_PERIOD (u64) | ISSUE_COUNTER (u64) | COLD_PATH |
/// +--------------------+------------------+---------------------+-----------+
/// ```
pub fn sign_operational_certificate(
    cert: &OperationalCertificate,
) -> Result<Sequence<Option<OperationalCertificateSignature>, OperationalCertificateSignature>, Error>
{
    let reason = InvalidDataReason::OperationalCertificateInvalid;

    let data = to_vec(&OpCertReq {
        kes_public_key: hex_to_array::<KES_PUBLIC_KEY_LEN>(&cert.kes_public_key_hex)
            .map_err(|_| reason)?,
        kes_period: parse_uint64(&cert.kes_period).map_err(|_| reason)?,
        issue_counter: parse_uint64(&cert.issue_counter).map_err(|_| reason)?,
        cold_key_path: parse_path(&cert.cold_key_path, reason)?,
    })?;

    let req = Request::new(Instruction::SignOperationalCertificate, 0x00, 0x00, data)
        .expect(SIGNATURE_LEN);

    Ok(Sequence::new(
        None,
        [Call::new(
            req,
            |s: &mut Option<OperationalCertificateSignature>, r: &[u8]| {
                let (sig, _) = SignatureResp::decode_owned(r)?;
                *s = Some(OperationalCertificateSignature {
                    signature_hex: sig.to_hex(),
                });
                Ok(())
            },
        )],
        |s| s.ok_or(crate::error::ProtocolError::InvalidResponse.into()),
    ))
}
