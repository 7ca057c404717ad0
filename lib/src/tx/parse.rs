// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction request validation
//!
//! Runs in three passes, all before anything is sent to the device:
//! structural parsing into the [parsed][super::parsed] model, signing mode
//! rules, then per-feature capability checks against the connected app.

use std::net::{Ipv4Addr, Ipv6Addr};

use ledger_ada_apdu::{
    address::KEY_HASH_LEN,
    compat::{require, Capabilities},
    encode::{hex_to_bytes, parse_int64, parse_uint64},
    tx::{
        OutputFormat, RegistrationFormat, AUX_DATA_HASH_LEN, DATUM_HASH_LEN,
        POOL_KEY_HASH_LEN, POOL_METADATA_HASH_LEN, SCRIPT_DATA_HASH_LEN, TX_HASH_LEN,
        VOTE_KEY_LEN, VRF_KEY_HASH_LEN,
    },
    Version,
};

use crate::{
    address::{parse_hex, parse_path, Network},
    Error, InvalidDataReason as R,
};

use super::{parsed::*, types::*};

/// Total lovelace supply, upper bound for all ADA amounts
pub const MAX_LOVELACE_SUPPLY: u64 = 45_000_000_000_000_000;

/// Maximum address length accepted for third-party destinations
pub const MAX_ADDRESS_LEN: usize = 128;

/// Maximum asset name length
pub const MAX_ASSET_NAME_LEN: usize = 32;

/// Maximum pool owners / relays
pub const MAX_POOL_OWNERS: usize = 1000;
pub const MAX_POOL_RELAYS: usize = 1000;

/// Maximum DNS name / metadata URL length
pub const MAX_DNS_NAME_LEN: usize = 64;
pub const MAX_URL_LEN: usize = 64;

/// Maximum pool margin denominator
pub const MAX_MARGIN_DENOMINATOR: u64 = 1_000_000_000_000_000_000;

/// Parse and validate a signing request, checking signing mode rules
pub fn parse_sign_tx_request(req: &SignTransactionRequest) -> Result<ParsedSignTxRequest, Error> {
    let tx = parse_tx(&req.tx)?;

    let additional_witness_paths = req
        .additional_witness_paths
        .iter()
        .map(|p| parse_path(p, R::AdditionalWitnessInvalidPath))
        .collect::<Result<Vec<_>, _>>()?;

    validate_signing_mode(&tx, req.signing_mode)?;

    Ok(ParsedSignTxRequest {
        tx,
        signing_mode: req.signing_mode,
        additional_witness_paths,
    })
}

fn parse_u64(s: &str, max: u64, reason: R) -> Result<u64, Error> {
    match parse_uint64(s) {
        Ok(v) if v <= max => Ok(v),
        _ => Err(reason.into()),
    }
}

fn parse_ada(s: &str, reason: R) -> Result<u64, Error> {
    parse_u64(s, MAX_LOVELACE_SUPPLY, reason)
}

fn parse_bytes(s: &str, reason: R) -> Result<Vec<u8>, Error> {
    hex_to_bytes(s).map_err(|_| reason.into())
}

/// Printable ASCII of bounded length (DNS names, URLs)
fn parse_ascii(s: &str, max: usize, reason: R) -> Result<String, Error> {
    let valid = !s.is_empty() && s.len() <= max && s.bytes().all(|c| (0x21..=0x7e).contains(&c));
    match valid {
        true => Ok(s.to_string()),
        false => Err(reason.into()),
    }
}

fn parse_tx(tx: &Transaction) -> Result<ParsedTransaction, Error> {
    let network = tx.network.parse()?;

    let parse_inputs = |inputs: &[TxInput]| {
        inputs
            .iter()
            .map(parse_input)
            .collect::<Result<Vec<_>, _>>()
    };

    let outputs = tx
        .outputs
        .iter()
        .map(|o| parse_output(o, &network))
        .collect::<Result<Vec<_>, _>>()?;

    let certificates = tx
        .certificates
        .iter()
        .map(parse_certificate)
        .collect::<Result<Vec<_>, _>>()?;

    let withdrawals = tx
        .withdrawals
        .iter()
        .map(|w| {
            Ok(ParsedWithdrawal {
                credential: parse_credential(&w.stake_credential, R::WithdrawalInvalidCredential)?,
                amount: parse_ada(&w.amount, R::WithdrawalInvalidAmount)?,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let auxiliary_data = match &tx.auxiliary_data {
        Some(a) => Some(parse_aux_data(a, &network)?),
        None => None,
    };

    let mint = match &tx.mint {
        Some(m) => Some(parse_token_bundle(m, R::MintInvalid, R::MintNotCanonical, |s| {
            parse_int64(s).map_err(|_| R::MintInvalid.into())
        })?),
        None => None,
    };

    let required_signers = tx
        .required_signers
        .iter()
        .map(|s| match s {
            RequiredSigner::Path { path } => Ok(ParsedRequiredSigner::Path(parse_path(
                path,
                R::RequiredSignerInvalid,
            )?)),
            RequiredSigner::Hash { hash_hex } => Ok(ParsedRequiredSigner::Hash(parse_hex::<
                KEY_HASH_LEN,
            >(
                hash_hex,
                R::RequiredSignerInvalid,
            )?)),
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(ParsedTransaction {
        network,
        inputs: parse_inputs(&tx.inputs)?,
        outputs,
        fee: parse_ada(&tx.fee, R::FeeInvalid)?,
        ttl: match &tx.ttl {
            Some(t) => Some(parse_u64(t, u64::MAX, R::TtlInvalid)?),
            None => None,
        },
        certificates,
        withdrawals,
        auxiliary_data,
        validity_interval_start: match &tx.validity_interval_start {
            Some(v) => Some(parse_u64(v, u64::MAX, R::ValidityIntervalStartInvalid)?),
            None => None,
        },
        mint,
        script_data_hash: match &tx.script_data_hash_hex {
            Some(h) => Some(parse_hex::<SCRIPT_DATA_HASH_LEN>(h, R::ScriptDataHashInvalid)?),
            None => None,
        },
        collateral_inputs: parse_inputs(&tx.collateral_inputs)?,
        required_signers,
        include_network_id: tx.include_network_id,
        collateral_output: match &tx.collateral_output {
            Some(o) => Some(parse_output(o, &network)?),
            None => None,
        },
        total_collateral: match &tx.total_collateral {
            Some(t) => Some(parse_ada(t, R::TotalCollateralInvalid)?),
            None => None,
        },
        reference_inputs: parse_inputs(&tx.reference_inputs)?,
    })
}

fn parse_input(i: &TxInput) -> Result<ParsedInput, Error> {
    Ok(ParsedInput {
        tx_hash: parse_hex::<TX_HASH_LEN>(&i.tx_hash_hex, R::InputInvalidTxHash)?,
        output_index: i.output_index,
        path: match &i.path {
            Some(p) => Some(parse_path(p, R::InputInvalidPath)?),
            None => None,
        },
    })
}

pub(crate) fn parse_destination(
    d: &TxOutputDestination,
    network: &Network,
    reason: R,
) -> Result<ParsedDestination, Error> {
    match d {
        TxOutputDestination::ThirdParty { address_hex } => {
            let b = parse_bytes(address_hex, reason)?;
            if b.is_empty() || b.len() > MAX_ADDRESS_LEN {
                return Err(reason.into());
            }
            Ok(ParsedDestination::ThirdParty(b))
        }
        TxOutputDestination::DeviceOwned(a) => Ok(ParsedDestination::DeviceOwned(a.parse(network)?)),
    }
}

fn parse_output(o: &TxOutput, network: &Network) -> Result<ParsedOutput, Error> {
    let format = match o.format {
        TxOutputFormat::ArrayLegacy => OutputFormat::ArrayLegacy,
        TxOutputFormat::MapBabbage => OutputFormat::MapBabbage,
    };

    let datum = match (&o.datum_hash_hex, &o.inline_datum_hex) {
        (Some(h), None) => Some(ParsedDatum::Hash(parse_hex::<DATUM_HASH_LEN>(
            h,
            R::OutputInvalidDatum,
        )?)),
        (None, Some(d)) => {
            let b = parse_bytes(d, R::OutputInvalidDatum)?;
            if b.is_empty() {
                return Err(R::OutputInvalidDatum.into());
            }
            Some(ParsedDatum::Inline(b))
        }
        (None, None) => None,
        (Some(_), Some(_)) => return Err(R::OutputInvalidDatum.into()),
    };

    let reference_script = match &o.reference_script_hex {
        Some(s) => {
            let b = parse_bytes(s, R::OutputInvalidReferenceScript)?;
            if b.is_empty() {
                return Err(R::OutputInvalidReferenceScript.into());
            }
            Some(b)
        }
        None => None,
    };

    // Legacy array outputs carry at most a datum hash
    if format == OutputFormat::ArrayLegacy
        && (matches!(datum, Some(ParsedDatum::Inline(_))) || reference_script.is_some())
    {
        return Err(R::OutputFormatMismatch.into());
    }

    Ok(ParsedOutput {
        format,
        destination: parse_destination(&o.destination, network, R::OutputAddressInvalid)?,
        amount: parse_ada(&o.amount, R::OutputInvalidAmount)?,
        token_bundle: parse_token_bundle(
            &o.token_bundle,
            R::OutputInvalidTokenBundle,
            R::OutputTokenBundleNotCanonical,
            |s| parse_uint64(s).map_err(|_| R::OutputInvalidTokenBundle.into()),
        )?,
        datum,
        reference_script,
    })
}

/// Parse a token bundle, which must already be in canonical order
///
/// Policy ids and, within each group, asset names must be strictly
/// ascending by byte value. Bundles are never reordered here as the order
/// is what the user confirms on the device.
fn parse_token_bundle<T>(
    groups: &[AssetGroup],
    invalid: R,
    not_canonical: R,
    parse_amount: impl Fn(&str) -> Result<T, Error>,
) -> Result<Vec<ParsedAssetGroup<T>>, Error> {
    let mut parsed: Vec<ParsedAssetGroup<T>> = Vec::with_capacity(groups.len());

    for g in groups {
        let policy_id = parse_hex::<KEY_HASH_LEN>(&g.policy_id_hex, invalid)?;

        if g.tokens.is_empty() {
            return Err(invalid.into());
        }

        if let Some(prev) = parsed.last() {
            if prev.policy_id >= policy_id {
                return Err(not_canonical.into());
            }
        }

        let mut tokens: Vec<ParsedToken<T>> = Vec::with_capacity(g.tokens.len());
        for t in &g.tokens {
            let asset_name = parse_bytes(&t.asset_name_hex, invalid)?;
            if asset_name.len() > MAX_ASSET_NAME_LEN {
                return Err(R::OutputInvalidAssetName.into());
            }

            if let Some(prev) = tokens.last() {
                if prev.asset_name.as_slice() >= asset_name.as_slice() {
                    return Err(not_canonical.into());
                }
            }

            tokens.push(ParsedToken {
                asset_name,
                amount: parse_amount(&t.amount)?,
            });
        }

        parsed.push(ParsedAssetGroup { policy_id, tokens });
    }

    Ok(parsed)
}

fn parse_credential(c: &StakeCredential, reason: R) -> Result<ParsedCredential, Error> {
    match c {
        StakeCredential::KeyPath { key_path } => {
            Ok(ParsedCredential::KeyPath(parse_path(key_path, reason)?))
        }
        StakeCredential::KeyHash { key_hash_hex } => Ok(ParsedCredential::KeyHash(
            parse_hex::<KEY_HASH_LEN>(key_hash_hex, reason)?,
        )),
        StakeCredential::ScriptHash { script_hash_hex } => Ok(ParsedCredential::ScriptHash(
            parse_hex::<KEY_HASH_LEN>(script_hash_hex, reason)?,
        )),
    }
}

fn parse_certificate(c: &Certificate) -> Result<ParsedCertificate, Error> {
    let reason = R::CertificateInvalidStakeCredential;

    let c = match c {
        Certificate::StakeRegistration { stake_credential } => {
            ParsedCertificate::StakeRegistration(parse_credential(stake_credential, reason)?)
        }
        Certificate::StakeDeregistration { stake_credential } => {
            ParsedCertificate::StakeDeregistration(parse_credential(stake_credential, reason)?)
        }
        Certificate::StakeDelegation {
            stake_credential,
            pool_key_hash_hex,
        } => ParsedCertificate::StakeDelegation {
            credential: parse_credential(stake_credential, reason)?,
            pool_key_hash: parse_hex::<POOL_KEY_HASH_LEN>(
                pool_key_hash_hex,
                R::CertificateInvalidPoolKeyHash,
            )?,
        },
        Certificate::StakePoolRegistration { pool_params } => match pool_params {
            Some(p) => ParsedCertificate::StakePoolRegistration(Box::new(parse_pool_params(p)?)),
            None => return Err(R::CertificatePoolParamsMissing.into()),
        },
        Certificate::StakePoolRetirement {
            pool_key_path,
            retirement_epoch,
        } => ParsedCertificate::StakePoolRetirement {
            path: parse_path(pool_key_path, R::CertificateInvalidPoolKeyPath)?,
            epoch: parse_u64(retirement_epoch, u64::MAX, R::CertificateInvalidEpoch)?,
        },
    };

    Ok(c)
}

fn parse_pool_params(p: &PoolRegistrationParams) -> Result<ParsedPoolParams, Error> {
    let pool_key = match &p.pool_key {
        PoolKey::DeviceOwned { path } => {
            PoolEntity::DeviceOwned(parse_path(path, R::PoolInvalidPoolKey)?)
        }
        PoolKey::ThirdParty { key_hash_hex } => {
            PoolEntity::ThirdParty(parse_hex(key_hash_hex, R::PoolInvalidPoolKey)?)
        }
    };

    let margin_numerator = parse_u64(
        &p.margin.numerator,
        MAX_MARGIN_DENOMINATOR,
        R::PoolInvalidMargin,
    )?;
    let margin_denominator = parse_u64(
        &p.margin.denominator,
        MAX_MARGIN_DENOMINATOR,
        R::PoolInvalidMargin,
    )?;
    if margin_denominator == 0 || margin_numerator > margin_denominator {
        return Err(R::PoolInvalidMargin.into());
    }

    let reward_account = match &p.reward_account {
        PoolRewardAccount::DeviceOwned { path } => {
            PoolEntity::DeviceOwned(parse_path(path, R::PoolInvalidRewardAccount)?)
        }
        PoolRewardAccount::ThirdParty { reward_account_hex } => {
            PoolEntity::ThirdParty(parse_hex(reward_account_hex, R::PoolInvalidRewardAccount)?)
        }
    };

    if p.pool_owners.len() > MAX_POOL_OWNERS {
        return Err(R::PoolTooManyOwners.into());
    }
    let owners = p
        .pool_owners
        .iter()
        .map(|o| match o {
            PoolOwner::DeviceOwned { staking_path } => Ok(PoolEntity::DeviceOwned(parse_path(
                staking_path,
                R::PoolInvalidOwner,
            )?)),
            PoolOwner::ThirdParty {
                staking_key_hash_hex,
            } => Ok(PoolEntity::ThirdParty(parse_hex(
                staking_key_hash_hex,
                R::PoolInvalidOwner,
            )?)),
        })
        .collect::<Result<Vec<_>, Error>>()?;

    if p.relays.len() > MAX_POOL_RELAYS {
        return Err(R::PoolTooManyRelays.into());
    }
    let relays = p
        .relays
        .iter()
        .map(parse_relay)
        .collect::<Result<Vec<_>, _>>()?;

    let metadata = match &p.metadata {
        Some(m) => Some(ParsedPoolMetadata {
            url: parse_ascii(&m.metadata_url, MAX_URL_LEN, R::PoolInvalidMetadata)?,
            hash: parse_hex::<POOL_METADATA_HASH_LEN>(&m.metadata_hash_hex, R::PoolInvalidMetadata)?,
        }),
        None => None,
    };

    Ok(ParsedPoolParams {
        pool_key,
        vrf_key_hash: parse_hex::<VRF_KEY_HASH_LEN>(&p.vrf_key_hash_hex, R::PoolInvalidVrfKeyHash)?,
        pledge: parse_ada(&p.pledge, R::PoolInvalidPledge)?,
        cost: parse_ada(&p.cost, R::PoolInvalidCost)?,
        margin_numerator,
        margin_denominator,
        reward_account,
        owners,
        relays,
        metadata,
    })
}

fn parse_relay(r: &Relay) -> Result<ParsedRelay, Error> {
    let reason = R::PoolInvalidRelay;

    let r = match r {
        Relay::SingleHostIpAddr { port, ipv4, ipv6 } => {
            if ipv4.is_none() && ipv6.is_none() {
                return Err(reason.into());
            }

            let ipv4 = match ipv4 {
                Some(s) => Some(
                    s.parse::<Ipv4Addr>()
                        .map_err(|_| Error::from(reason))?
                        .octets(),
                ),
                None => None,
            };
            let ipv6 = match ipv6 {
                Some(s) => Some(
                    s.parse::<Ipv6Addr>()
                        .map_err(|_| Error::from(reason))?
                        .octets(),
                ),
                None => None,
            };

            ParsedRelay::SingleHostIpAddr {
                port: *port,
                ipv4,
                ipv6,
            }
        }
        Relay::SingleHostHostname { port, dns_name } => ParsedRelay::SingleHostHostname {
            port: *port,
            dns_name: parse_ascii(dns_name, MAX_DNS_NAME_LEN, reason)?,
        },
        Relay::MultiHost { dns_name } => ParsedRelay::MultiHost {
            dns_name: parse_ascii(dns_name, MAX_DNS_NAME_LEN, reason)?,
        },
    };

    Ok(r)
}

fn parse_vote_key(k: &VoteKey, reason: R) -> Result<ParsedVoteKey, Error> {
    match k {
        VoteKey::Key { vote_key_hex } => Ok(ParsedVoteKey::Key(parse_hex::<VOTE_KEY_LEN>(
            vote_key_hex,
            reason,
        )?)),
        VoteKey::Path { vote_key_path } => Ok(ParsedVoteKey::Path(parse_path(vote_key_path, reason)?)),
    }
}

fn parse_aux_data(a: &TxAuxiliaryData, network: &Network) -> Result<ParsedAuxData, Error> {
    let r = match a {
        TxAuxiliaryData::ArbitraryHash { hash_hex } => {
            return Ok(ParsedAuxData::ArbitraryHash(parse_hex::<AUX_DATA_HASH_LEN>(
                hash_hex,
                R::AuxiliaryDataInvalid,
            )?))
        }
        TxAuxiliaryData::Cip36Registration(r) => r,
    };

    let format = match r.format {
        VoteRegistrationFormat::Cip15 => RegistrationFormat::Cip15,
        VoteRegistrationFormat::Cip36 => RegistrationFormat::Cip36,
    };

    let vote_key = match &r.vote_key {
        Some(k) => Some(parse_vote_key(k, R::RegistrationInvalidVoteKey)?),
        None => None,
    };

    let delegations = r
        .delegations
        .iter()
        .map(|d| {
            Ok((
                parse_vote_key(&d.vote_key, R::RegistrationInvalidDelegation)?,
                d.weight,
            ))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    // Exactly one vote key source, delegations are CIP-36 only
    match (format, &vote_key, delegations.is_empty()) {
        (_, Some(_), true) => (),
        (RegistrationFormat::Cip36, None, false) => (),
        (_, _, false) => return Err(R::RegistrationInvalidDelegation.into()),
        (_, None, true) => return Err(R::RegistrationInvalidVoteKey.into()),
    }

    if format == RegistrationFormat::Cip15 && r.voting_purpose.is_some() {
        return Err(R::RegistrationInvalidVotingPurpose.into());
    }

    Ok(ParsedAuxData::VoteRegistration(ParsedVoteRegistration {
        format,
        vote_key,
        delegations,
        staking_path: parse_path(&r.staking_path, R::RegistrationInvalidStakingPath)?,
        payment_destination: parse_destination(
            &r.payment_destination,
            network,
            R::RegistrationInvalidPaymentDestination,
        )?,
        nonce: parse_u64(&r.nonce, u64::MAX, R::RegistrationInvalidNonce)?,
        voting_purpose: match &r.voting_purpose {
            Some(p) => Some(parse_u64(p, u64::MAX, R::RegistrationInvalidVotingPurpose)?),
            None => None,
        },
    }))
}

/// Check the transaction elements permitted by the signing mode
fn validate_signing_mode(tx: &ParsedTransaction, mode: TransactionSigningMode) -> Result<(), Error> {
    use TransactionSigningMode::*;

    let pool_registrations = tx
        .certificates
        .iter()
        .filter(|c| matches!(c, ParsedCertificate::StakePoolRegistration(_)))
        .count();

    let has_plutus_elements = tx.script_data_hash.is_some()
        || !tx.collateral_inputs.is_empty()
        || tx.collateral_output.is_some()
        || tx.total_collateral.is_some()
        || !tx.reference_inputs.is_empty();

    let stake_credentials = || {
        tx.certificates
            .iter()
            .filter_map(|c| match c {
                ParsedCertificate::StakeRegistration(c)
                | ParsedCertificate::StakeDeregistration(c)
                | ParsedCertificate::StakeDelegation { credential: c, .. } => Some(c),
                _ => None,
            })
            .chain(tx.withdrawals.iter().map(|w| &w.credential))
    };

    match mode {
        OrdinaryTransaction => {
            if pool_registrations > 0 {
                return Err(R::PoolRegistrationNotAllowed.into());
            }
            if stake_credentials().any(|c| c.path().is_none()) {
                return Err(R::OrdinaryScriptCredentialNotAllowed.into());
            }
            if has_plutus_elements {
                return Err(R::PlutusElementNotAllowed.into());
            }
        }
        MultisigTransaction => {
            if pool_registrations > 0 {
                return Err(R::PoolRegistrationNotAllowed.into());
            }
            if tx.inputs.iter().any(|i| i.path.is_some()) {
                return Err(R::MultisigInputPathNotAllowed.into());
            }
            if stake_credentials().any(|c| !matches!(c, ParsedCredential::ScriptHash(_))) {
                return Err(R::MultisigKeyCredentialNotAllowed.into());
            }
            if tx
                .certificates
                .iter()
                .any(|c| matches!(c, ParsedCertificate::StakePoolRetirement { .. }))
            {
                return Err(R::PoolRetirementNotAllowed.into());
            }
            if tx
                .required_signers
                .iter()
                .any(|s| matches!(s, ParsedRequiredSigner::Path(_)))
            {
                return Err(R::MultisigRequiredSignerPathNotAllowed.into());
            }
            if has_plutus_elements {
                return Err(R::PlutusElementNotAllowed.into());
            }
        }
        PoolRegistrationAsOwner | PoolRegistrationAsOperator => {
            let pool = match (tx.certificates.len(), tx.pool_registration()) {
                (1, Some(p)) => p,
                _ => return Err(R::PoolRegistrationSingleCertificateRequired.into()),
            };
            if !tx.withdrawals.is_empty() {
                return Err(R::PoolRegistrationWithdrawalsNotAllowed.into());
            }
            if tx.mint.is_some() {
                return Err(R::PoolRegistrationMintNotAllowed.into());
            }
            if has_plutus_elements || !tx.required_signers.is_empty() {
                return Err(R::PlutusElementNotAllowed.into());
            }
            if tx.outputs.iter().any(|o| o.datum.is_some() || o.reference_script.is_some()) {
                return Err(R::PlutusElementNotAllowed.into());
            }

            let device_owners = pool.owners.iter().filter(|o| o.path().is_some()).count();

            if mode == PoolRegistrationAsOwner {
                if device_owners != 1 {
                    return Err(R::PoolOwnerSingleDeviceOwnerRequired.into());
                }
                if pool.pool_key.path().is_some() {
                    return Err(R::PoolOwnerThirdPartyPoolKeyRequired.into());
                }
                if tx.inputs.iter().any(|i| i.path.is_some()) {
                    return Err(R::PoolOwnerInputPathNotAllowed.into());
                }
                if tx
                    .outputs
                    .iter()
                    .any(|o| matches!(o.destination, ParsedDestination::DeviceOwned(_)))
                {
                    return Err(R::PoolOwnerDeviceOwnedOutputNotAllowed.into());
                }
            } else {
                if pool.pool_key.path().is_none() {
                    return Err(R::PoolOperatorDeviceOwnedPoolKeyRequired.into());
                }
                if device_owners != 0 {
                    return Err(R::PoolOperatorOwnerPathNotAllowed.into());
                }
            }
        }
        PlutusTransaction => {
            if pool_registrations > 0 {
                return Err(R::PoolRegistrationNotAllowed.into());
            }
        }
    }

    Ok(())
}

/// Check every feature used by the transaction against the connected app
///
/// A transaction may be structurally valid yet target an app version too old
/// to parse one of its elements.
pub fn check_capabilities(req: &ParsedSignTxRequest, version: &Version) -> Result<(), Error> {
    use TransactionSigningMode::*;

    let caps = Capabilities::of(version);
    let tx = &req.tx;
    let check = |supported: bool, feature: &'static str| require(version, supported, feature);

    match req.signing_mode {
        PoolRegistrationAsOperator => check(
            caps.supports_pool_registration_as_operator,
            "pool registration as operator",
        )?,
        MultisigTransaction => check(caps.supports_multisig_transaction, "multisig transactions")?,
        PlutusTransaction => check(caps.supports_alonzo, "Plutus transactions")?,
        OrdinaryTransaction | PoolRegistrationAsOwner => (),
    }

    if tx.ttl == Some(0) {
        check(caps.supports_zero_ttl, "zero TTL")?;
    }

    if let Some(ParsedAuxData::VoteRegistration(r)) = &tx.auxiliary_data {
        check(caps.supports_catalyst_registration, "voting registration")?;

        let cip36 = r.format == RegistrationFormat::Cip36
            || !r.delegations.is_empty()
            || r.voting_purpose.is_some()
            || matches!(r.vote_key, Some(ParsedVoteKey::Path(_)))
            || matches!(r.payment_destination, ParsedDestination::ThirdParty(_));
        if cip36 {
            check(caps.supports_cip36, "CIP-36 voting registration")?;
        }
    }

    for o in tx.outputs.iter().chain(tx.collateral_output.iter()) {
        if !o.token_bundle.is_empty() {
            check(caps.supports_mary, "multi-asset outputs")?;
        }
        if o.format == OutputFormat::MapBabbage
            || matches!(o.datum, Some(ParsedDatum::Inline(_)))
            || o.reference_script.is_some()
        {
            check(caps.supports_babbage, "map format outputs")?;
        }
        if o.datum.is_some() {
            check(caps.supports_alonzo, "output datums")?;
        }
    }

    for c in &tx.certificates {
        if let ParsedCertificate::StakePoolRetirement { .. } = c {
            check(caps.supports_pool_retirement, "pool retirement")?;
        }
    }

    let non_path_credentials = tx
        .certificates
        .iter()
        .filter_map(|c| match c {
            ParsedCertificate::StakeRegistration(c)
            | ParsedCertificate::StakeDeregistration(c)
            | ParsedCertificate::StakeDelegation { credential: c, .. } => Some(c),
            _ => None,
        })
        .chain(tx.withdrawals.iter().map(|w| &w.credential))
        .any(|c| c.path().is_none());
    if non_path_credentials {
        check(caps.supports_multisig_transaction, "script / key hash stake credentials")?;
    }

    if tx.mint.is_some() {
        check(caps.supports_mint, "mint")?;
    }
    if tx.script_data_hash.is_some() {
        check(caps.supports_alonzo, "script data hash")?;
    }
    if !tx.collateral_inputs.is_empty() {
        check(caps.supports_alonzo, "collateral inputs")?;
    }
    if !tx.required_signers.is_empty() {
        check(caps.supports_alonzo, "required signers")?;
        if req.signing_mode == OrdinaryTransaction {
            check(
                caps.supports_req_signers_in_ordinary_tx,
                "required signers in ordinary transactions",
            )?;
        }
    }
    if tx.include_network_id {
        check(caps.supports_alonzo, "network id in transaction body")?;
    }
    if tx.collateral_output.is_some() {
        check(caps.supports_babbage, "collateral return output")?;
    }
    if tx.total_collateral.is_some() {
        check(caps.supports_babbage, "total collateral")?;
    }
    if !tx.reference_inputs.is_empty() {
        check(caps.supports_babbage, "reference inputs")?;
    }

    Ok(())
}
