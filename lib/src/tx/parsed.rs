// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Validated transaction model
//!
//! Produced once from a [SignTransactionRequest][super::SignTransactionRequest],
//! immutable thereafter. All values are decoded and range-checked so
//! serialization can not fail on caller input.

use ledger_ada_apdu::{
    address::KEY_HASH_LEN,
    tx::{
        OutputFormat, RegistrationFormat, AUX_DATA_HASH_LEN, DATUM_HASH_LEN, POOL_KEY_HASH_LEN,
        POOL_METADATA_HASH_LEN, REWARD_ACCOUNT_LEN, SCRIPT_DATA_HASH_LEN, TX_HASH_LEN,
        VOTE_KEY_LEN, VRF_KEY_HASH_LEN,
    },
};

use crate::address::{Network, ParsedAddressParams};

use super::TransactionSigningMode;

pub type Path = Vec<u32>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedSignTxRequest {
    pub tx: ParsedTransaction,
    pub signing_mode: TransactionSigningMode,
    pub additional_witness_paths: Vec<Path>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedTransaction {
    pub network: Network,
    pub inputs: Vec<ParsedInput>,
    pub outputs: Vec<ParsedOutput>,
    pub fee: u64,
    pub ttl: Option<u64>,
    pub certificates: Vec<ParsedCertificate>,
    pub withdrawals: Vec<ParsedWithdrawal>,
    pub auxiliary_data: Option<ParsedAuxData>,
    pub validity_interval_start: Option<u64>,
    pub mint: Option<Vec<ParsedAssetGroup<i64>>>,
    pub script_data_hash: Option<[u8; SCRIPT_DATA_HASH_LEN]>,
    pub collateral_inputs: Vec<ParsedInput>,
    pub required_signers: Vec<ParsedRequiredSigner>,
    pub include_network_id: bool,
    pub collateral_output: Option<ParsedOutput>,
    pub total_collateral: Option<u64>,
    pub reference_inputs: Vec<ParsedInput>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedInput {
    pub tx_hash: [u8; TX_HASH_LEN],
    pub output_index: u32,
    pub path: Option<Path>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedDestination {
    ThirdParty(Vec<u8>),
    DeviceOwned(ParsedAddressParams),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedDatum {
    Hash([u8; DATUM_HASH_LEN]),
    Inline(Vec<u8>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedOutput {
    pub format: OutputFormat,
    pub destination: ParsedDestination,
    pub amount: u64,
    pub token_bundle: Vec<ParsedAssetGroup<u64>>,
    pub datum: Option<ParsedDatum>,
    pub reference_script: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedAssetGroup<T> {
    pub policy_id: [u8; KEY_HASH_LEN],
    pub tokens: Vec<ParsedToken<T>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedToken<T> {
    pub asset_name: Vec<u8>,
    pub amount: T,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedCredential {
    KeyPath(Path),
    KeyHash([u8; KEY_HASH_LEN]),
    ScriptHash([u8; KEY_HASH_LEN]),
}

impl ParsedCredential {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ParsedCredential::KeyPath(p) => Some(p),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedCertificate {
    StakeRegistration(ParsedCredential),
    StakeDeregistration(ParsedCredential),
    StakeDelegation {
        credential: ParsedCredential,
        pool_key_hash: [u8; POOL_KEY_HASH_LEN],
    },
    StakePoolRegistration(Box<ParsedPoolParams>),
    StakePoolRetirement {
        path: Path,
        epoch: u64,
    },
}

/// Pool key, owner or reward account, held by the device or by a third party
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolEntity<const N: usize> {
    DeviceOwned(Path),
    ThirdParty([u8; N]),
}

impl<const N: usize> PoolEntity<N> {
    pub fn path(&self) -> Option<&Path> {
        match self {
            PoolEntity::DeviceOwned(p) => Some(p),
            PoolEntity::ThirdParty(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedPoolParams {
    pub pool_key: PoolEntity<POOL_KEY_HASH_LEN>,
    pub vrf_key_hash: [u8; VRF_KEY_HASH_LEN],
    pub pledge: u64,
    pub cost: u64,
    pub margin_numerator: u64,
    pub margin_denominator: u64,
    pub reward_account: PoolEntity<REWARD_ACCOUNT_LEN>,
    pub owners: Vec<PoolEntity<KEY_HASH_LEN>>,
    pub relays: Vec<ParsedRelay>,
    pub metadata: Option<ParsedPoolMetadata>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedRelay {
    SingleHostIpAddr {
        port: Option<u16>,
        ipv4: Option<[u8; 4]>,
        ipv6: Option<[u8; 16]>,
    },
    SingleHostHostname {
        port: Option<u16>,
        dns_name: String,
    },
    MultiHost {
        dns_name: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedPoolMetadata {
    pub url: String,
    pub hash: [u8; POOL_METADATA_HASH_LEN],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedWithdrawal {
    pub credential: ParsedCredential,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedRequiredSigner {
    Path(Path),
    Hash([u8; KEY_HASH_LEN]),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedAuxData {
    ArbitraryHash([u8; AUX_DATA_HASH_LEN]),
    VoteRegistration(ParsedVoteRegistration),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedVoteKey {
    Key([u8; VOTE_KEY_LEN]),
    Path(Path),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedVoteRegistration {
    pub format: RegistrationFormat,
    /// Exactly one of `vote_key` or a non-empty `delegations`
    pub vote_key: Option<ParsedVoteKey>,
    pub delegations: Vec<(ParsedVoteKey, u32)>,
    pub staking_path: Path,
    pub payment_destination: ParsedDestination,
    pub nonce: u64,
    pub voting_purpose: Option<u64>,
}

impl ParsedTransaction {
    /// Pool registration certificate, if present
    pub fn pool_registration(&self) -> Option<&ParsedPoolParams> {
        self.certificates.iter().find_map(|c| match c {
            ParsedCertificate::StakePoolRegistration(p) => Some(p.as_ref()),
            _ => None,
        })
    }
}
