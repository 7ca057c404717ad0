// Copyright (c) 2022-2023 The MobileCoin Foundation

use ledger_ada_apdu::{compat::VersionUnsupported, DeviceStatusError, EncodingError};
use strum::{Display, EnumIter, IntoStaticStr};
use tokio::time::error::Elapsed;

/// Ledger Cardano API Error Type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request failed local validation, nothing was sent to the device
    #[error("Invalid data: {0}")]
    InvalidData(InvalidDataReason),

    /// Connected application version lacks a required capability
    #[error(transparent)]
    DeviceVersionUnsupported(#[from] VersionUnsupported),

    /// Device returned a non-success status word
    #[error(transparent)]
    DeviceStatus(#[from] DeviceStatusError),

    /// Device response violated the protocol
    #[error("Protocol error: {0}")]
    Protocol(ProtocolError),

    /// Value could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Transport error
    #[error("Transport error: {0}")]
    Transport(anyhow::Error),

    /// Request timeout, fatal to the whole interaction
    #[error("Timeout waiting for device response")]
    RequestTimeout,
}

impl Error {
    /// Helper to check for device status errors with a given code
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::DeviceStatus(s) => Some(s.code),
            _ => None,
        }
    }
}

impl From<InvalidDataReason> for Error {
    fn from(r: InvalidDataReason) -> Self {
        Error::InvalidData(r)
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Error::Protocol(e)
    }
}

impl From<Elapsed> for Error {
    fn from(_: Elapsed) -> Self {
        Error::RequestTimeout
    }
}

#[cfg(feature = "transport_hid")]
impl From<ledger_transport_hid::LedgerHIDError> for Error {
    fn from(e: ledger_transport_hid::LedgerHIDError) -> Self {
        Error::Transport(anyhow::anyhow!("HID: {}", e))
    }
}

#[cfg(feature = "transport_hid")]
impl From<hidapi::HidError> for Error {
    fn from(e: hidapi::HidError) -> Self {
        Error::Transport(anyhow::anyhow!("HID init: {}", e))
    }
}

/// Protocol violations, these indicate a bug rather than bad input
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("unexpected response length (expected {expected}, actual {actual})")]
    UnexpectedResponseLength { expected: usize, actual: usize },

    #[error("interaction resumed after completion")]
    ResumedAfterCompletion,

    #[error("interaction resumed without a pending request")]
    UnexpectedResume,

    #[error("malformed response")]
    InvalidResponse,
}

/// Stable reason codes for local validation failures
///
/// Message text is informational, the variant is the contract.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum InvalidDataReason {
    // Common
    InvalidPath,
    TooManyKeys,

    // Network / address parameters
    NetworkInvalidNetworkId,
    AddressInvalidSpendingInfo,
    AddressInvalidStakingInfo,
    AddressInvalidBlockchainPointer,

    // Inputs / outputs
    InputInvalidTxHash,
    InputInvalidPath,
    OutputInvalidAmount,
    OutputAddressInvalid,
    OutputInvalidTokenBundle,
    OutputTokenBundleNotCanonical,
    OutputInvalidAssetName,
    OutputInvalidDatum,
    OutputInvalidReferenceScript,
    OutputFormatMismatch,

    // Transaction body
    FeeInvalid,
    TtlInvalid,
    ValidityIntervalStartInvalid,
    MintInvalid,
    MintNotCanonical,
    ScriptDataHashInvalid,
    TotalCollateralInvalid,
    WithdrawalInvalidAmount,
    WithdrawalInvalidCredential,
    RequiredSignerInvalid,
    AuxiliaryDataInvalid,

    // Certificates
    CertificateInvalidStakeCredential,
    CertificateInvalidPoolKeyHash,
    CertificateInvalidPoolKeyPath,
    CertificateInvalidEpoch,
    CertificatePoolParamsMissing,
    PoolInvalidPoolKey,
    PoolInvalidVrfKeyHash,
    PoolInvalidPledge,
    PoolInvalidCost,
    PoolInvalidMargin,
    PoolInvalidRewardAccount,
    PoolInvalidOwner,
    PoolTooManyOwners,
    PoolInvalidRelay,
    PoolTooManyRelays,
    PoolInvalidMetadata,

    // Voting registration
    RegistrationInvalidVoteKey,
    RegistrationInvalidStakingPath,
    RegistrationInvalidPaymentDestination,
    RegistrationInvalidNonce,
    RegistrationInvalidVotingPurpose,
    RegistrationInvalidDelegation,

    // Signing mode rules
    PoolRegistrationNotAllowed,
    PoolRetirementNotAllowed,
    PlutusElementNotAllowed,
    OrdinaryScriptCredentialNotAllowed,
    MultisigInputPathNotAllowed,
    MultisigKeyCredentialNotAllowed,
    MultisigRequiredSignerPathNotAllowed,
    PoolRegistrationSingleCertificateRequired,
    PoolRegistrationWithdrawalsNotAllowed,
    PoolRegistrationMintNotAllowed,
    PoolOwnerSingleDeviceOwnerRequired,
    PoolOwnerThirdPartyPoolKeyRequired,
    PoolOwnerInputPathNotAllowed,
    PoolOwnerDeviceOwnedOutputNotAllowed,
    PoolOperatorDeviceOwnedPoolKeyRequired,
    PoolOperatorOwnerPathNotAllowed,

    // Additional witness paths
    AdditionalWitnessInvalidPath,

    // Other operations
    OperationalCertificateInvalid,
    MessageInvalid,
    VoteInvalid,
}
