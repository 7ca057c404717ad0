// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction signing
//!
//! A [SignTransactionRequest] is validated, gated against the connected app
//! version and serialized into a complete plan of calls before anything is
//! sent. [SignTx] then streams this plan stage by stage, collecting the
//! transaction hash and witness signatures as the device responds.
//!
//! ```text
//! INIT ─> [AUX_DATA] ─> INPUTS ─> OUTPUTS ─> FEE ─> [TTL] ─> [CERTIFICATES] ─> [WITHDRAWALS]
//!      ─> [LEGACY_AUX_DATA] ─> [VALIDITY_START] ─> [MINT] ─> [SCRIPT_DATA_HASH]
//!      ─> [COLLATERAL_INPUTS] ─> [REQUIRED_SIGNERS] ─> [COLLATERAL_OUTPUT]
//!      ─> [TOTAL_COLLATERAL] ─> [REFERENCE_INPUTS] ─> CONFIRM ─> WITNESS*
//! ```
//!
//! Stages in brackets are omitted when the transaction has no such element.

use std::collections::VecDeque;

use encdec::DecodeOwned;
use log::debug;
use strum::{Display, EnumIter, IntoEnumIterator};

use ledger_ada_apdu::{
    helpers::to_vec,
    ops::PathReq,
    response::{HashResp, SignatureResp, SIGNATURE_LEN},
    tx::{SignTxStage, TxUint64Req, TX_HASH_LEN},
    Instruction, Request, Version,
};

use crate::{
    error::ProtocolError,
    interaction::{Call, Calls, Interaction, Step},
    Error,
};

mod aux_data;
mod output;
mod pool;
mod serialize;

mod parse;
pub use parse::{check_capabilities, parse_sign_tx_request};

mod parsed;
pub use parsed::*;

mod types;
pub use types::*;

mod witness;
pub use witness::witness_paths;

use serialize::Encoder;

/// Transaction signing stages, in the order they are sent
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumIter)]
pub enum Stage {
    Init,
    /// Auxiliary data for apps supporting voting registration
    AuxData,
    Inputs,
    Outputs,
    Fee,
    Ttl,
    Certificates,
    Withdrawals,
    /// Auxiliary data hash for apps predating voting registration
    LegacyAuxData,
    ValidityIntervalStart,
    Mint,
    ScriptDataHash,
    CollateralInputs,
    RequiredSigners,
    CollateralOutput,
    TotalCollateral,
    ReferenceInputs,
    Confirm,
    Witnesses,
}

/// Results accumulated over the signing interaction
#[derive(Debug, Default)]
pub struct SignTxState {
    tx_hash: Option<[u8; TX_HASH_LEN]>,
    witnesses: Vec<Witness>,
    aux_data_supplement: Option<TxAuxiliaryDataSupplement>,
}

impl SignTxState {
    fn finish(self) -> Result<SignedTransactionData, Error> {
        let tx_hash = self.tx_hash.ok_or(ProtocolError::InvalidResponse)?;

        Ok(SignedTransactionData {
            tx_hash_hex: hex::encode(tx_hash),
            witnesses: self.witnesses,
            auxiliary_data_supplement: self.aux_data_supplement,
        })
    }
}

/// Transaction signing interaction
pub struct SignTx {
    state: Option<SignTxState>,
    plan: VecDeque<(Stage, Vec<Call<SignTxState>>)>,
    calls: Calls<SignTxState>,
}

fn request(stage: SignTxStage, data: Vec<u8>) -> Request {
    Request::new(Instruction::SignTx, stage as u8, 0x00, data)
}

fn ack(stage: SignTxStage, data: Vec<u8>) -> Vec<Call<SignTxState>> {
    vec![Call::ack(request(stage, data))]
}

fn acks(reqs: Vec<Request>) -> Vec<Call<SignTxState>> {
    reqs.into_iter().map(Call::ack).collect()
}

fn inputs(stage: SignTxStage, inputs: &[ParsedInput]) -> Result<Vec<Call<SignTxState>>, Error> {
    inputs
        .iter()
        .map(|i| Ok(Call::ack(request(stage, serialize::input(i)?))))
        .collect()
}

fn uint64(stage: SignTxStage, v: u64) -> Result<Vec<Call<SignTxState>>, Error> {
    Ok(ack(stage, to_vec(&TxUint64Req::new(v))?))
}

impl SignTx {
    /// Validate a signing request for the provided app version and build
    /// the complete request plan
    pub fn new(version: &Version, req: &SignTransactionRequest) -> Result<Self, Error> {
        let req = parse_sign_tx_request(req)?;
        check_capabilities(&req, version)?;

        let paths = witness_paths(&req);
        let enc = Encoder::new(*version);

        let mut plan = VecDeque::new();
        for stage in Stage::iter() {
            let calls = stage_calls(&enc, stage, &req, &paths)?;
            if !calls.is_empty() {
                plan.push_back((stage, calls));
            }
        }

        Ok(Self {
            state: Some(SignTxState::default()),
            plan,
            calls: Calls::default(),
        })
    }

    /// Stages to be sent, with the number of requests in each
    pub fn stages(&self) -> Vec<(Stage, usize)> {
        self.plan.iter().map(|(s, c)| (*s, c.len())).collect()
    }
}

fn stage_calls(
    enc: &Encoder,
    stage: Stage,
    req: &ParsedSignTxRequest,
    witness_paths: &[Path],
) -> Result<Vec<Call<SignTxState>>, Error> {
    let tx = &req.tx;
    let catalyst = enc.caps.supports_catalyst_registration;

    let calls = match stage {
        Stage::Init => ack(SignTxStage::Init, enc.init(req, witness_paths.len())?),
        Stage::AuxData => match &tx.auxiliary_data {
            Some(a) if catalyst => enc.aux_data(a)?,
            _ => vec![],
        },
        Stage::Inputs => inputs(SignTxStage::Inputs, &tx.inputs)?,
        Stage::Outputs => {
            let mut calls = vec![];
            for o in &tx.outputs {
                calls.extend(acks(enc.output(SignTxStage::Outputs, o)?));
            }
            calls
        }
        Stage::Fee => uint64(SignTxStage::Fee, tx.fee)?,
        Stage::Ttl => match tx.ttl {
            Some(t) => uint64(SignTxStage::Ttl, t)?,
            None => vec![],
        },
        Stage::Certificates => {
            let mut calls = vec![];
            for c in &tx.certificates {
                calls.push(Call::ack(request(
                    SignTxStage::Certificates,
                    enc.certificate(c)?,
                )));
                if let ParsedCertificate::StakePoolRegistration(p) = c {
                    calls.extend(acks(enc.pool_registration(p)?));
                }
            }
            calls
        }
        Stage::Withdrawals => {
            let mut calls = vec![];
            for w in &tx.withdrawals {
                calls.extend(ack(SignTxStage::Withdrawals, enc.withdrawal(w)?));
            }
            calls
        }
        Stage::LegacyAuxData => match &tx.auxiliary_data {
            Some(a) if !catalyst => enc.legacy_aux_data(a)?,
            _ => vec![],
        },
        Stage::ValidityIntervalStart => match tx.validity_interval_start {
            Some(v) => uint64(SignTxStage::ValidityIntervalStart, v)?,
            None => vec![],
        },
        Stage::Mint => match &tx.mint {
            Some(m) => acks(enc.mint(m)?),
            None => vec![],
        },
        Stage::ScriptDataHash => match &tx.script_data_hash {
            Some(h) => ack(SignTxStage::ScriptDataHash, h.to_vec()),
            None => vec![],
        },
        Stage::CollateralInputs => inputs(SignTxStage::CollateralInputs, &tx.collateral_inputs)?,
        Stage::RequiredSigners => {
            let mut calls = vec![];
            for s in &tx.required_signers {
                calls.extend(ack(
                    SignTxStage::RequiredSigners,
                    serialize::required_signer(s)?,
                ));
            }
            calls
        }
        Stage::CollateralOutput => match &tx.collateral_output {
            Some(o) => acks(enc.output(SignTxStage::CollateralOutput, o)?),
            None => vec![],
        },
        Stage::TotalCollateral => match tx.total_collateral {
            Some(t) => uint64(SignTxStage::TotalCollateral, t)?,
            None => vec![],
        },
        Stage::ReferenceInputs => inputs(SignTxStage::ReferenceInputs, &tx.reference_inputs)?,
        Stage::Confirm => vec![Call::new(
            request(SignTxStage::Confirm, vec![]).expect(TX_HASH_LEN),
            |s: &mut SignTxState, r: &[u8]| {
                let (h, _) = HashResp::decode_owned(r)?;
                s.tx_hash = Some(h.0);
                Ok(())
            },
        )],
        Stage::Witnesses => {
            let mut calls = vec![];
            for p in witness_paths {
                let data = to_vec(&PathReq::new(p))?;
                let path = p.clone();

                calls.push(Call::new(
                    request(SignTxStage::Witnesses, data).expect(SIGNATURE_LEN),
                    move |s: &mut SignTxState, r: &[u8]| {
                        let (sig, _) = SignatureResp::decode_owned(r)?;
                        s.witnesses.push(Witness {
                            path,
                            witness_signature_hex: sig.to_hex(),
                        });
                        Ok(())
                    },
                ));
            }
            calls
        }
    };

    Ok(calls)
}

impl Interaction for SignTx {
    type Output = SignedTransactionData;

    fn resume(&mut self, response: Option<&[u8]>) -> Result<Step<Self::Output>, Error> {
        let state = self
            .state
            .as_mut()
            .ok_or(ProtocolError::ResumedAfterCompletion)?;

        self.calls.complete(state, response)?;

        loop {
            if let Some(req) = self.calls.next_request() {
                return Ok(Step::Send(req));
            }

            match self.plan.pop_front() {
                Some((stage, calls)) => {
                    debug!("Sign transaction stage: {} ({} requests)", stage, calls.len());
                    self.calls.extend(calls);
                }
                None => break,
            }
        }

        let state = self
            .state
            .take()
            .ok_or(ProtocolError::ResumedAfterCompletion)?;

        Ok(Step::Done(state.finish()?))
    }
}
