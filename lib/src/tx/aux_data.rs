// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Auxiliary data request sequence
//!
//! Apps with voting registration support take auxiliary data directly after
//! init, tagged by kind. A registration is then streamed role by role and
//! confirmed, the device responding with the auxiliary data hash and the
//! registration signature. Older apps take only a raw hash, after
//! withdrawals.
//!
//! ```text
//! AUX_DATA(type) ─> [INIT] ─> VOTE_KEY | DELEGATION* ─> STAKING_KEY ─> PAYMENT_ADDRESS
//!                ─> NONCE ─> [VOTING_PURPOSE] ─> CONFIRM
//! ```

use encdec::DecodeOwned;
use ledger_ada_apdu::{
    encode::Builder,
    helpers::to_vec,
    ops::PathReq,
    response::RegistrationResp,
    tx::{
        AuxDataType, RegistrationFormat, RegistrationRole, SignTxStage, TxUint64Req, VoteKeyType,
    },
    Instruction, Request,
};

use crate::{interaction::Call, Error};

use super::{parsed::*, serialize::Encoder, SignTxState, TxAuxiliaryDataSupplement};

fn request(role: RegistrationRole, data: Vec<u8>) -> Request {
    Request::new(
        Instruction::SignTx,
        SignTxStage::AuxData as u8,
        role as u8,
        data,
    )
}

fn vote_key(b: Builder, k: &ParsedVoteKey) -> Result<Builder, Error> {
    let b = match k {
        ParsedVoteKey::Key(k) => b.u8(VoteKeyType::Key as u8).bytes(k),
        ParsedVoteKey::Path(p) => b.u8(VoteKeyType::Path as u8).path(p)?,
    };
    Ok(b)
}

impl Encoder {
    /// Auxiliary data calls for apps with voting registration support
    pub fn aux_data(&self, a: &ParsedAuxData) -> Result<Vec<Call<SignTxState>>, Error> {
        let data = match a {
            ParsedAuxData::ArbitraryHash(h) => Builder::new()
                .u8(AuxDataType::ArbitraryHash as u8)
                .bytes(h)
                .finish(),
            ParsedAuxData::VoteRegistration(_) => {
                Builder::new().u8(AuxDataType::VoteRegistration as u8).finish()
            }
        };

        let mut calls = vec![Call::ack(Request::new(
            Instruction::SignTx,
            SignTxStage::AuxData as u8,
            0x00,
            data,
        ))];

        if let ParsedAuxData::VoteRegistration(r) = a {
            calls.extend(self.registration(r)?.into_iter().map(Call::ack));

            let confirm = request(RegistrationRole::Confirm, vec![]).expect(RegistrationResp::LEN);
            calls.push(Call::new(confirm, |s: &mut SignTxState, resp: &[u8]| {
                let (r, _) = RegistrationResp::decode_owned(resp)?;
                s.aux_data_supplement = Some(TxAuxiliaryDataSupplement {
                    auxiliary_data_hash_hex: hex::encode(r.aux_data_hash),
                    cip36_vote_registration_signature_hex: hex::encode(r.signature),
                });
                Ok(())
            }));
        }

        Ok(calls)
    }

    /// Raw auxiliary data hash for apps predating voting registration
    pub fn legacy_aux_data(&self, a: &ParsedAuxData) -> Result<Vec<Call<SignTxState>>, Error> {
        match a {
            ParsedAuxData::ArbitraryHash(h) => Ok(vec![Call::ack(Request::new(
                Instruction::SignTx,
                SignTxStage::AuxData as u8,
                0x00,
                h.to_vec(),
            ))]),
            ParsedAuxData::VoteRegistration(_) => Err(self.unsupported("voting registration")),
        }
    }

    /// Registration requests up to (not including) confirmation
    fn registration(&self, r: &ParsedVoteRegistration) -> Result<Vec<Request>, Error> {
        let cip36 = self.caps.supports_cip36;
        let mut reqs = vec![];

        if cip36 {
            reqs.push(request(
                RegistrationRole::Init,
                Builder::new()
                    .u8(r.format as u8)
                    .count(r.delegations.len())?
                    .finish(),
            ));
        } else if r.format == RegistrationFormat::Cip36 {
            return Err(self.unsupported("CIP-36 voting registration"));
        }

        match (&r.vote_key, cip36) {
            (Some(k), true) => reqs.push(request(
                RegistrationRole::VoteKey,
                vote_key(Builder::new(), k)?.finish(),
            )),
            (Some(ParsedVoteKey::Key(k)), false) => {
                reqs.push(request(RegistrationRole::VoteKey, k.to_vec()))
            }
            (Some(ParsedVoteKey::Path(_)), false) => {
                return Err(self.unsupported("vote key derivation path"))
            }
            (None, _) => (),
        }

        for (k, weight) in &r.delegations {
            if !cip36 {
                return Err(self.unsupported("vote delegations"));
            }
            reqs.push(request(
                RegistrationRole::Delegation,
                vote_key(Builder::new(), k)?.u32(*weight).finish(),
            ));
        }

        reqs.push(request(
            RegistrationRole::StakingKey,
            to_vec(&PathReq::new(&r.staking_path))?,
        ));

        let payment = match (&r.payment_destination, cip36) {
            (d, true) => self.destination(d)?,
            (ParsedDestination::DeviceOwned(params), false) => params.encode(&self.version)?,
            (ParsedDestination::ThirdParty(_), false) => {
                return Err(self.unsupported("third-party payment address"))
            }
        };
        reqs.push(request(RegistrationRole::PaymentAddress, payment));

        reqs.push(request(
            RegistrationRole::Nonce,
            to_vec(&TxUint64Req::new(r.nonce))?,
        ));

        if cip36 {
            let b = match r.voting_purpose {
                Some(p) => Builder::new().flag(true).u64(p),
                None => Builder::new().flag(false),
            };
            reqs.push(request(RegistrationRole::VotingPurpose, b.finish()));
        } else if r.voting_purpose.is_some() {
            return Err(self.unsupported("voting purpose"));
        }

        Ok(reqs)
    }
}
