// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Message signing (CIP-8)
//!
//! The message is streamed in chunks after an init request naming the
//! signing key and the address field to include in the signed header.
//! Messages that are not hashed are shown to the user in full, so must fit
//! a single chunk.
//!
//! ```text
//! INIT ─> CHUNK+ ─> CONFIRM
//! ```

use encdec::DecodeOwned;
use serde::{Deserialize, Serialize};

use ledger_ada_apdu::{
    encode::{hex_to_bytes, Builder},
    ops::{MessageAddressFieldType, SignMessageP1},
    response::MessageSignatureResp,
    Instruction, Request,
};

use crate::{
    address::{parse_path, DeviceOwnedAddress, Network},
    interaction::{Call, Sequence},
    Error, InvalidDataReason,
};

/// Chunk size for hashed messages
pub const MAX_HASHED_CHUNK_SIZE: usize = 250;

/// Maximum length of an unhashed message shown as ASCII
pub const MAX_ASCII_DISPLAY_LEN: usize = 198;

/// Maximum length of an unhashed message shown as hex
pub const MAX_HEX_DISPLAY_LEN: usize = 99;

/// Message signing request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMessageRequest {
    pub message_hex: String,
    pub signing_path: Vec<u32>,
    /// Sign the blake2b-224 hash of the message rather than the message
    pub hash_payload: bool,
    /// Show the message as hex even when it is printable ASCII
    #[serde(default)]
    pub prefer_hex_display: bool,
    pub address_field: MessageAddressField,
}

/// Address field for the signed header
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageAddressField {
    /// Key hash of the signing key
    KeyHash,
    /// Device-derived address
    Address {
        address: DeviceOwnedAddress,
        network: Network,
    },
}

/// Message signature with the signing public key and address field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedMessageData {
    pub signature_hex: String,
    pub signing_public_key_hex: String,
    pub address_field_hex: String,
}

fn is_printable_ascii(b: &[u8]) -> bool {
    b.iter().all(|c| (0x20..=0x7e).contains(c))
}

/// Build the message signing sequence
pub fn sign_message(
    version: &ledger_ada_apdu::Version,
    req: &SignMessageRequest,
) -> Result<Sequence<Option<SignedMessageData>, SignedMessageData>, Error> {
    let msg = hex_to_bytes(&req.message_hex).map_err(|_| InvalidDataReason::MessageInvalid)?;
    let path = parse_path(&req.signing_path, InvalidDataReason::InvalidPath)?;

    let is_ascii = !req.prefer_hex_display && is_printable_ascii(&msg);

    let chunk_size = match (req.hash_payload, is_ascii) {
        (true, _) => MAX_HASHED_CHUNK_SIZE,
        (false, true) => MAX_ASCII_DISPLAY_LEN,
        (false, false) => MAX_HEX_DISPLAY_LEN,
    };
    if !req.hash_payload && msg.len() > chunk_size {
        return Err(InvalidDataReason::MessageInvalid.into());
    }

    let mut init = Builder::new()
        .count(msg.len())?
        .path(&path)?
        .u8(req.hash_payload as u8)
        .u8(is_ascii as u8);

    init = match &req.address_field {
        MessageAddressField::KeyHash => init.u8(MessageAddressFieldType::KeyHash as u8),
        MessageAddressField::Address { address, network } => init
            .u8(MessageAddressFieldType::Address as u8)
            .bytes(&address.parse(network)?.encode(version)?),
    };

    let mut calls = vec![Call::ack(Request::new(
        Instruction::SignMessage,
        SignMessageP1::Init as u8,
        0x00,
        init.finish(),
    ))];

    // An empty message is sent as a single empty chunk
    let chunks: Vec<&[u8]> = match msg.is_empty() {
        true => vec![&msg[..]],
        false => msg.chunks(chunk_size).collect(),
    };
    for c in chunks {
        let data = Builder::new().count(c.len())?.bytes(c).finish();
        calls.push(Call::ack(Request::new(
            Instruction::SignMessage,
            SignMessageP1::Chunk as u8,
            0x00,
            data,
        )));
    }

    calls.push(Call::new(
        Request::new(
            Instruction::SignMessage,
            SignMessageP1::Confirm as u8,
            0x00,
            vec![],
        ),
        |s: &mut Option<SignedMessageData>, r: &[u8]| {
            let (m, _) = MessageSignatureResp::decode_owned(r)?;
            *s = Some(SignedMessageData {
                signature_hex: hex::encode(m.signature),
                signing_public_key_hex: hex::encode(m.public_key),
                address_field_hex: hex::encode(m.address_field),
            });
            Ok(())
        },
    ));

    Ok(Sequence::new(None, calls, |s| {
        s.ok_or(crate::error::ProtocolError::InvalidResponse.into())
    }))
}
