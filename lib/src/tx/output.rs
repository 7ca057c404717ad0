// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Output and mint request sequences
//!
//! An output is streamed as basic data, then each asset group followed by
//! its tokens, then datum and reference script chunks, then a confirmation.
//!
//! ```text
//! BASIC ─> [ASSET_GROUP ─> TOKEN*]* ─> [DATUM ─> DATUM_CHUNK*] ─> [SCRIPT ─> SCRIPT_CHUNK*] ─> CONFIRM
//! ```

use ledger_ada_apdu::{
    encode::Builder,
    helpers::to_vec,
    tx::{AssetGroupReq, DatumType, OutputFormat, OutputRole, SignTxStage, MAX_CHUNK_SIZE},
    EncodingError, Instruction, Request,
};

use crate::Error;

use super::{parsed::*, serialize::Encoder};

/// Token amounts, unsigned in outputs and signed in mint
pub trait TokenAmount {
    fn put(&self, b: Builder) -> Builder;
}

impl TokenAmount for u64 {
    fn put(&self, b: Builder) -> Builder {
        b.u64(*self)
    }
}

impl TokenAmount for i64 {
    fn put(&self, b: Builder) -> Builder {
        b.i64(*self)
    }
}

fn request(stage: SignTxStage, role: OutputRole, data: Vec<u8>) -> Request {
    Request::new(Instruction::SignTx, stage as u8, role as u8, data)
}

/// Asset group and token requests for a bundle
fn token_bundle<T: TokenAmount>(
    stage: SignTxStage,
    groups: &[ParsedAssetGroup<T>],
) -> Result<Vec<Request>, Error> {
    let mut reqs = vec![];

    for g in groups {
        let group = AssetGroupReq {
            policy_id: g.policy_id,
            token_count: u32::try_from(g.tokens.len())
                .map_err(|_| EncodingError::OutOfRange { bits: 32 })?,
        };
        reqs.push(request(stage, OutputRole::AssetGroup, to_vec(&group)?));

        for t in &g.tokens {
            let b = Builder::new()
                .count(t.asset_name.len())?
                .bytes(&t.asset_name);
            reqs.push(request(stage, OutputRole::Token, t.amount.put(b).finish()));
        }
    }

    Ok(reqs)
}

/// Split into the first chunk and the remainder in `MAX_CHUNK_SIZE` pieces
fn chunks(b: &[u8]) -> (&[u8], std::slice::Chunks<'_, u8>) {
    let n = b.len().min(MAX_CHUNK_SIZE);
    (&b[..n], b[n..].chunks(MAX_CHUNK_SIZE))
}

/// Chunked payload, `[total, first_len, first]` then `[len, chunk]` per chunk
fn chunked(
    stage: SignTxStage,
    first_role: OutputRole,
    next_role: OutputRole,
    prefix: Builder,
    data: &[u8],
) -> Result<Vec<Request>, Error> {
    let (first, rest) = chunks(data);

    let mut reqs = vec![request(
        stage,
        first_role,
        prefix
            .count(data.len())?
            .count(first.len())?
            .bytes(first)
            .finish(),
    )];

    for c in rest {
        let b = Builder::new().count(c.len())?.bytes(c).finish();
        reqs.push(request(stage, next_role, b));
    }

    Ok(reqs)
}

impl Encoder {
    /// Requests for a single output, in the `Outputs` or `CollateralOutput` stage
    pub fn output(&self, stage: SignTxStage, o: &ParsedOutput) -> Result<Vec<Request>, Error> {
        let caps = &self.caps;

        let mut b = Builder::new();
        if caps.supports_babbage {
            b = b.u8(o.format as u8);
        } else if o.format == OutputFormat::MapBabbage {
            return Err(self.unsupported("map format outputs"));
        }

        b = b
            .bytes(&self.destination(&o.destination)?)
            .u64(o.amount)
            .count(o.token_bundle.len())?;

        if caps.supports_babbage {
            b = b.flag(o.datum.is_some()).flag(o.reference_script.is_some());
        } else if caps.supports_alonzo {
            b = b.flag(o.datum.is_some());
        }

        let mut reqs = vec![request(stage, OutputRole::BasicData, b.finish())];

        reqs.extend(token_bundle(stage, &o.token_bundle)?);

        match (&o.datum, caps.supports_babbage, caps.supports_alonzo) {
            (None, ..) => (),
            (Some(ParsedDatum::Hash(h)), true, _) => {
                let b = Builder::new().u8(DatumType::Hash as u8).bytes(h).finish();
                reqs.push(request(stage, OutputRole::Datum, b));
            }
            (Some(ParsedDatum::Hash(h)), false, true) => {
                reqs.push(request(stage, OutputRole::Datum, h.to_vec()));
            }
            (Some(ParsedDatum::Inline(d)), true, _) => reqs.extend(chunked(
                stage,
                OutputRole::Datum,
                OutputRole::DatumChunk,
                Builder::new().u8(DatumType::Inline as u8),
                d,
            )?),
            (Some(_), ..) => return Err(self.unsupported("output datums")),
        }

        if let Some(s) = &o.reference_script {
            reqs.extend(chunked(
                stage,
                OutputRole::Script,
                OutputRole::ScriptChunk,
                Builder::new(),
                s,
            )?);
        }

        reqs.push(request(stage, OutputRole::Confirm, vec![]));

        Ok(reqs)
    }

    /// Requests for the mint bundle
    pub fn mint(&self, groups: &[ParsedAssetGroup<i64>]) -> Result<Vec<Request>, Error> {
        let stage = SignTxStage::Mint;

        let mut reqs = vec![request(
            stage,
            OutputRole::BasicData,
            Builder::new().count(groups.len())?.finish(),
        )];
        reqs.extend(token_bundle(stage, groups)?);
        reqs.push(request(stage, OutputRole::Confirm, vec![]));

        Ok(reqs)
    }
}
