// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Witness path resolution
//!
//! Collects the signing paths a transaction requires, in body order, with
//! duplicates removed (first occurrence wins). Multisig transactions are
//! witnessed by script, so only explicitly requested paths are signed.

use super::{
    parsed::{ParsedCertificate, ParsedRequiredSigner, ParsedSignTxRequest, Path},
    TransactionSigningMode,
};

/// Resolve the ordered, de-duplicated witness paths for a request
pub fn witness_paths(req: &ParsedSignTxRequest) -> Vec<Path> {
    let tx = &req.tx;

    let mut paths: Vec<&Path> = vec![];

    if req.signing_mode != TransactionSigningMode::MultisigTransaction {
        paths.extend(tx.inputs.iter().filter_map(|i| i.path.as_ref()));

        for c in &tx.certificates {
            match c {
                // Registration carries no signature
                ParsedCertificate::StakeRegistration(_) => (),
                ParsedCertificate::StakeDeregistration(c)
                | ParsedCertificate::StakeDelegation { credential: c, .. } => {
                    paths.extend(c.path())
                }
                ParsedCertificate::StakePoolRegistration(p) => {
                    paths.extend(p.owners.iter().filter_map(|o| o.path()));
                    paths.extend(p.pool_key.path());
                }
                ParsedCertificate::StakePoolRetirement { path, .. } => paths.push(path),
            }
        }

        paths.extend(tx.withdrawals.iter().filter_map(|w| w.credential.path()));

        paths.extend(tx.required_signers.iter().filter_map(|s| match s {
            ParsedRequiredSigner::Path(p) => Some(p),
            ParsedRequiredSigner::Hash(_) => None,
        }));

        paths.extend(tx.collateral_inputs.iter().filter_map(|i| i.path.as_ref()));
    }

    paths.extend(req.additional_witness_paths.iter());

    let mut unique: Vec<Path> = Vec::with_capacity(paths.len());
    for p in paths {
        if !unique.contains(p) {
            unique.push(p.clone());
        }
    }

    unique
}
