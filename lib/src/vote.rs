// Copyright (c) 2022-2023 The MobileCoin Foundation

//! CIP-36 vote signing
//!
//! The vote-cast body is streamed in chunks, confirmed by the user, then
//! witnessed with the provided voting key path.
//!
//! ```text
//! INIT(total, chunk) ─> CHUNK* ─> CONFIRM ─> WITNESS
//! ```

use encdec::DecodeOwned;
use serde::{Deserialize, Serialize};

use ledger_ada_apdu::{
    encode::{hex_to_bytes, Builder},
    helpers::to_vec,
    ops::{PathReq, SignVoteP1},
    response::{HashResp, SignatureResp, SIGNATURE_LEN},
    tx::MAX_CHUNK_SIZE,
    Instruction, Request,
};

use crate::{
    address::parse_path,
    interaction::{Call, Sequence},
    Error, InvalidDataReason,
};

/// Vote-cast body and witness path
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cip36Vote {
    pub vote_cast_data_hex: String,
    pub witness_path: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedCip36VoteData {
    pub data_hash_hex: String,
    pub witness_path: Vec<u32>,
    pub witness_signature_hex: String,
}

#[derive(Debug, Default)]
pub struct VoteState {
    witness_path: Vec<u32>,
    hash: Option<[u8; 32]>,
    signature: Option<[u8; SIGNATURE_LEN]>,
}

fn request(p1: SignVoteP1, data: Vec<u8>) -> Request {
    Request::new(Instruction::SignCip36Vote, p1 as u8, 0x00, data)
}

/// Build the vote signing sequence
pub fn sign_cip36_vote(
    vote: &Cip36Vote,
) -> Result<Sequence<VoteState, SignedCip36VoteData>, Error> {
    let data =
        hex_to_bytes(&vote.vote_cast_data_hex).map_err(|_| InvalidDataReason::VoteInvalid)?;
    if data.is_empty() {
        return Err(InvalidDataReason::VoteInvalid.into());
    }
    let witness = to_vec(&PathReq {
        path: parse_path(&vote.witness_path, InvalidDataReason::VoteInvalid)?,
    })?;

    let n = data.len().min(MAX_CHUNK_SIZE);
    let mut calls = vec![Call::ack(request(
        SignVoteP1::Init,
        Builder::new().count(data.len())?.bytes(&data[..n]).finish(),
    ))];

    for c in data[n..].chunks(MAX_CHUNK_SIZE) {
        calls.push(Call::ack(request(SignVoteP1::Chunk, c.to_vec())));
    }

    calls.push(Call::new(
        request(SignVoteP1::Confirm, vec![]).expect(HashResp::LEN),
        |s: &mut VoteState, r: &[u8]| {
            let (h, _) = HashResp::decode_owned(r)?;
            s.hash = Some(h.0);
            Ok(())
        },
    ));

    calls.push(Call::new(
        request(SignVoteP1::Witness, witness).expect(SIGNATURE_LEN),
        |s: &mut VoteState, r: &[u8]| {
            let (sig, _) = SignatureResp::decode_owned(r)?;
            s.signature = Some(sig.0);
            Ok(())
        },
    ));

    let state = VoteState {
        witness_path: vote.witness_path.clone(),
        ..Default::default()
    };

    Ok(Sequence::new(state, calls, finish))
}

fn finish(s: VoteState) -> Result<SignedCip36VoteData, Error> {
    match (s.hash, s.signature) {
        (Some(h), Some(sig)) => Ok(SignedCip36VoteData {
            data_hash_hex: hex::encode(h),
            witness_path: s.witness_path,
            witness_signature_hex: hex::encode(sig),
        }),
        _ => Err(crate::error::ProtocolError::InvalidResponse.into()),
    }
}
