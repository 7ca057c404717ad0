// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction signing request and result types
//!
//! These mirror the JSON request shape accepted by integrators. 64-bit
//! values are decimal strings, hashes / keys / addresses are hex strings and
//! paths are `u32` indices with hardening applied.

use serde::{Deserialize, Serialize};

use crate::address::{DeviceOwnedAddress, Network};

/// Transaction signing request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignTransactionRequest {
    pub signing_mode: TransactionSigningMode,
    pub tx: Transaction,
    /// Extra paths to witness, the only witness source for multisig
    #[serde(default)]
    pub additional_witness_paths: Vec<Vec<u32>>,
}

/// Signing mode, determines which transaction elements are permitted
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionSigningMode {
    OrdinaryTransaction,
    PoolRegistrationAsOwner,
    PoolRegistrationAsOperator,
    MultisigTransaction,
    PlutusTransaction,
}

/// Transaction body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub network: Network,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub fee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<Certificate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub withdrawals: Vec<Withdrawal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_data: Option<TxAuxiliaryData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_interval_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint: Option<Vec<AssetGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_data_hash_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collateral_inputs: Vec<TxInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_signers: Vec<RequiredSigner>,
    #[serde(default)]
    pub include_network_id: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral_output: Option<TxOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_collateral: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_inputs: Vec<TxInput>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInput {
    pub tx_hash_hex: String,
    pub output_index: u32,
    /// Spending key path, witnessed when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<u32>>,
}

/// Output serialization format
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxOutputFormat {
    #[default]
    ArrayLegacy,
    MapBabbage,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutput {
    #[serde(default)]
    pub format: TxOutputFormat,
    pub destination: TxOutputDestination,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub token_bundle: Vec<AssetGroup>,
    /// Datum hash, either format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum_hash_hex: Option<String>,
    /// Inline datum, map format only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_datum_hex: Option<String>,
    /// Reference script, map format only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_script_hex: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxOutputDestination {
    #[serde(rename_all = "camelCase")]
    ThirdParty { address_hex: String },
    DeviceOwned(DeviceOwnedAddress),
}

/// Tokens under a single policy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGroup {
    pub policy_id_hex: String,
    pub tokens: Vec<Token>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub asset_name_hex: String,
    /// Unsigned for outputs, signed for mint
    pub amount: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StakeCredential {
    #[serde(rename_all = "camelCase")]
    KeyPath { key_path: Vec<u32> },
    #[serde(rename_all = "camelCase")]
    KeyHash { key_hash_hex: String },
    #[serde(rename_all = "camelCase")]
    ScriptHash { script_hash_hex: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Certificate {
    #[serde(rename_all = "camelCase")]
    StakeRegistration { stake_credential: StakeCredential },
    #[serde(rename_all = "camelCase")]
    StakeDeregistration { stake_credential: StakeCredential },
    #[serde(rename_all = "camelCase")]
    StakeDelegation {
        stake_credential: StakeCredential,
        pool_key_hash_hex: String,
    },
    #[serde(rename_all = "camelCase")]
    StakePoolRegistration {
        #[serde(default)]
        pool_params: Option<PoolRegistrationParams>,
    },
    #[serde(rename_all = "camelCase")]
    StakePoolRetirement {
        pool_key_path: Vec<u32>,
        retirement_epoch: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRegistrationParams {
    pub pool_key: PoolKey,
    pub vrf_key_hash_hex: String,
    pub pledge: String,
    pub cost: String,
    pub margin: Margin,
    pub reward_account: PoolRewardAccount,
    pub pool_owners: Vec<PoolOwner>,
    pub relays: Vec<Relay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PoolMetadata>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolKey {
    #[serde(rename_all = "camelCase")]
    DeviceOwned { path: Vec<u32> },
    #[serde(rename_all = "camelCase")]
    ThirdParty { key_hash_hex: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolRewardAccount {
    #[serde(rename_all = "camelCase")]
    DeviceOwned { path: Vec<u32> },
    #[serde(rename_all = "camelCase")]
    ThirdParty { reward_account_hex: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolOwner {
    #[serde(rename_all = "camelCase")]
    DeviceOwned { staking_path: Vec<u32> },
    #[serde(rename_all = "camelCase")]
    ThirdParty { staking_key_hash_hex: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub numerator: String,
    pub denominator: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relay {
    #[serde(rename_all = "camelCase")]
    SingleHostIpAddr {
        #[serde(default)]
        port: Option<u16>,
        #[serde(default)]
        ipv4: Option<String>,
        #[serde(default)]
        ipv6: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SingleHostHostname {
        #[serde(default)]
        port: Option<u16>,
        dns_name: String,
    },
    #[serde(rename_all = "camelCase")]
    MultiHost { dns_name: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMetadata {
    pub metadata_url: String,
    pub metadata_hash_hex: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub stake_credential: StakeCredential,
    pub amount: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequiredSigner {
    #[serde(rename_all = "camelCase")]
    Path { path: Vec<u32> },
    #[serde(rename_all = "camelCase")]
    Hash { hash_hex: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxAuxiliaryData {
    #[serde(rename_all = "camelCase")]
    ArbitraryHash { hash_hex: String },
    Cip36Registration(VoteRegistrationParams),
}

/// Governance voting registration format
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteRegistrationFormat {
    #[serde(rename = "CIP_15")]
    Cip15,
    #[serde(rename = "CIP_36")]
    Cip36,
}

/// Governance voting (CIP-15 / CIP-36) registration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRegistrationParams {
    pub format: VoteRegistrationFormat,
    /// Single vote key, exclusive with `delegations`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_key: Option<VoteKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delegations: Vec<VoteDelegation>,
    pub staking_path: Vec<u32>,
    pub payment_destination: TxOutputDestination,
    pub nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_purpose: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteKey {
    #[serde(rename_all = "camelCase")]
    Key { vote_key_hex: String },
    #[serde(rename_all = "camelCase")]
    Path { vote_key_path: Vec<u32> },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteDelegation {
    pub vote_key: VoteKey,
    pub weight: u32,
}

/// Signed transaction result
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransactionData {
    pub tx_hash_hex: String,
    pub witnesses: Vec<Witness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_data_supplement: Option<TxAuxiliaryDataSupplement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Witness {
    pub path: Vec<u32>,
    pub witness_signature_hex: String,
}

/// Auxiliary data hash and registration signature, returned for voting
/// registrations so the caller can assemble the auxiliary data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxAuxiliaryDataSupplement {
    pub auxiliary_data_hash_hex: String,
    pub cip36_vote_registration_signature_hex: String,
}
