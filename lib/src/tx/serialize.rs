// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Stage payload serialization
//!
//! Payloads for single-request stages. Layouts vary with the connected app
//! version, so each encoder is evaluated against an [Encoder] context.

use ledger_ada_apdu::{
    compat::{Capabilities, VersionUnsupported},
    encode::Builder,
    helpers::to_vec,
    ops::PathReq,
    tx::{
        CertificateType, DestinationType, RequiredSignerTag, SigningModeTag, StakeCredentialTag,
        TxInputReq,
    },
    Version,
};

use crate::Error;

use super::{parsed::*, TransactionSigningMode};

/// Version context for payload encoding
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Encoder {
    pub version: Version,
    pub caps: Capabilities,
}

impl Encoder {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            caps: Capabilities::of(&version),
        }
    }

    pub(crate) fn unsupported(&self, feature: &'static str) -> Error {
        VersionUnsupported::new(&self.version, feature).into()
    }

    /// Transaction init payload
    ///
    /// ```text
    /// +--------+--------------+---------------------+------+-----------------+
    /// | NET u8 | MAGIC (u32)  | OPTION FLAGS (u8..) | MODE | COUNTS (u32...) |
    /// +--------+--------------+---------------------+------+-----------------+
    /// ```
    ///
    /// Flags and counts for features the app does not support are omitted.
    pub fn init(&self, req: &ParsedSignTxRequest, witness_count: usize) -> Result<Vec<u8>, Error> {
        let tx = &req.tx;
        let caps = &self.caps;

        let mut b = Builder::new()
            .u8(tx.network.network_id)
            .u32(tx.network.protocol_magic)
            .flag(tx.ttl.is_some())
            .flag(tx.auxiliary_data.is_some())
            .flag(tx.validity_interval_start.is_some());

        if caps.supports_mint {
            b = b.flag(tx.mint.is_some());
        }
        if caps.supports_alonzo {
            b = b
                .flag(tx.script_data_hash.is_some())
                .flag(tx.include_network_id);
        }
        if caps.supports_babbage {
            b = b
                .flag(tx.collateral_output.is_some())
                .flag(tx.total_collateral.is_some());
        }

        let mode = match req.signing_mode {
            TransactionSigningMode::OrdinaryTransaction => SigningModeTag::Ordinary,
            TransactionSigningMode::PoolRegistrationAsOwner => SigningModeTag::PoolRegistrationAsOwner,
            TransactionSigningMode::PoolRegistrationAsOperator => {
                SigningModeTag::PoolRegistrationAsOperator
            }
            TransactionSigningMode::MultisigTransaction => SigningModeTag::Multisig,
            TransactionSigningMode::PlutusTransaction => SigningModeTag::Plutus,
        };

        b = b
            .u8(mode as u8)
            .count(tx.inputs.len())?
            .count(tx.outputs.len())?
            .count(tx.certificates.len())?
            .count(tx.withdrawals.len())?;

        if caps.supports_alonzo {
            b = b
                .count(tx.collateral_inputs.len())?
                .count(tx.required_signers.len())?;
        }
        if caps.supports_babbage {
            b = b.count(tx.reference_inputs.len())?;
        }

        Ok(b.count(witness_count)?.finish())
    }

    /// Output destination, tagged by ownership
    pub fn destination(&self, d: &ParsedDestination) -> Result<Vec<u8>, Error> {
        let b = match d {
            ParsedDestination::ThirdParty(addr) => Builder::new()
                .u8(DestinationType::ThirdParty as u8)
                .count(addr.len())?
                .bytes(addr),
            ParsedDestination::DeviceOwned(params) => Builder::new()
                .u8(DestinationType::DeviceOwned as u8)
                .bytes(&params.encode(&self.version)?),
        };
        Ok(b.finish())
    }

    /// Stake credential, a bare path for apps predating script credentials
    pub fn stake_credential(&self, c: &ParsedCredential) -> Result<Vec<u8>, Error> {
        if !self.caps.supports_multisig_transaction {
            return match c {
                ParsedCredential::KeyPath(p) => Ok(to_vec(&PathReq::new(p))?),
                _ => Err(self.unsupported("script / key hash stake credentials")),
            };
        }

        let b = match c {
            ParsedCredential::KeyPath(p) => Builder::new()
                .u8(StakeCredentialTag::KeyPath as u8)
                .path(p)?,
            ParsedCredential::KeyHash(h) => Builder::new()
                .u8(StakeCredentialTag::KeyHash as u8)
                .bytes(h),
            ParsedCredential::ScriptHash(h) => Builder::new()
                .u8(StakeCredentialTag::ScriptHash as u8)
                .bytes(h),
        };
        Ok(b.finish())
    }

    /// Certificate basic data, pool registration parameters follow separately
    pub fn certificate(&self, c: &ParsedCertificate) -> Result<Vec<u8>, Error> {
        let b = match c {
            ParsedCertificate::StakeRegistration(cred) => Builder::new()
                .u8(CertificateType::StakeRegistration as u8)
                .bytes(&self.stake_credential(cred)?),
            ParsedCertificate::StakeDeregistration(cred) => Builder::new()
                .u8(CertificateType::StakeDeregistration as u8)
                .bytes(&self.stake_credential(cred)?),
            ParsedCertificate::StakeDelegation {
                credential,
                pool_key_hash,
            } => Builder::new()
                .u8(CertificateType::StakeDelegation as u8)
                .bytes(&self.stake_credential(credential)?)
                .bytes(pool_key_hash),
            ParsedCertificate::StakePoolRegistration(_) => {
                Builder::new().u8(CertificateType::StakePoolRegistration as u8)
            }
            ParsedCertificate::StakePoolRetirement { path, epoch } => Builder::new()
                .u8(CertificateType::StakePoolRetirement as u8)
                .path(path)?
                .u64(*epoch),
        };
        Ok(b.finish())
    }

    pub fn withdrawal(&self, w: &ParsedWithdrawal) -> Result<Vec<u8>, Error> {
        Ok(Builder::new()
            .u64(w.amount)
            .bytes(&self.stake_credential(&w.credential)?)
            .finish())
    }
}

/// Transaction input, also used for collateral and reference inputs
pub fn input(i: &ParsedInput) -> Result<Vec<u8>, Error> {
    let r = TxInputReq {
        tx_hash: i.tx_hash,
        output_index: i.output_index,
    };
    Ok(to_vec(&r)?)
}

pub fn required_signer(s: &ParsedRequiredSigner) -> Result<Vec<u8>, Error> {
    let b = match s {
        ParsedRequiredSigner::Path(p) => Builder::new().u8(RequiredSignerTag::Path as u8).path(p)?,
        ParsedRequiredSigner::Hash(h) => Builder::new().u8(RequiredSignerTag::Hash as u8).bytes(h),
    };
    Ok(b.finish())
}
