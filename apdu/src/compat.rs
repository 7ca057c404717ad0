// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Firmware compatibility matrix
//!
//! [Capabilities::of] maps an application [Version] to a fixed set of named
//! capabilities. Each is enabled over `[min, MAX_TESTED_MAJOR.x]`, several are
//! additionally unavailable on app-XS builds. The matrix is computed once per
//! call and checked before any version-dependent bytes are produced.

use crate::Version;

/// Highest application major version validated against this library
pub const MAX_TESTED_MAJOR: u8 = 7;

/// Minimum supported application version
pub const MIN_SUPPORTED: (u8, u8) = (2, 2);

/// Named capabilities of a connected application version
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Base floor, all other capabilities require this
    pub is_compatible: bool,
    pub supports_byron_address_derivation: bool,
    /// Multi-asset outputs
    pub supports_mary: bool,
    /// CIP-15 registration in auxiliary data (and the current aux data flow)
    pub supports_catalyst_registration: bool,
    pub supports_zero_ttl: bool,
    pub supports_pool_registration_as_operator: bool,
    pub supports_pool_retirement: bool,
    pub supports_multisig_transaction: bool,
    pub supports_mint: bool,
    /// Script data hash, collateral inputs, required signers, network id
    pub supports_alonzo: bool,
    pub supports_req_signers_in_ordinary_tx: bool,
    /// Map-format outputs, inline datums, reference scripts, collateral
    /// return, total collateral and reference inputs
    pub supports_babbage: bool,
    pub supports_cip36: bool,
    pub supports_cip36_vote: bool,
    pub supports_operational_certificate: bool,
    pub supports_message_signing: bool,
}

impl Capabilities {
    /// Compute capabilities for the provided version
    pub fn of(version: &Version) -> Self {
        let within = |major, minor| version.at_least(major, minor) && version.at_most(MAX_TESTED_MAJOR);
        let xs = version.is_app_xs();

        let v2_2 = within(MIN_SUPPORTED.0, MIN_SUPPORTED.1);
        let v2_3 = within(2, 3);
        let v2_4 = within(2, 4);
        let v3_0 = within(3, 0);
        let v4_0 = within(4, 0);
        let v4_1 = within(4, 1);
        let v5_0 = within(5, 0);
        let v6_0 = within(6, 0);
        let v7_0 = within(7, 0);

        Self {
            is_compatible: v2_2,
            supports_byron_address_derivation: v2_2 && !xs,
            supports_mary: v2_2,
            supports_catalyst_registration: v2_3,
            supports_zero_ttl: v2_3,
            supports_pool_registration_as_operator: v2_4 && !xs,
            supports_pool_retirement: v2_4 && !xs,
            supports_multisig_transaction: v3_0,
            supports_mint: v3_0,
            supports_alonzo: v4_0,
            supports_req_signers_in_ordinary_tx: v4_1,
            supports_babbage: v5_0,
            supports_cip36: v6_0,
            supports_cip36_vote: v6_0 && !xs,
            supports_operational_certificate: v5_0 && !xs,
            supports_message_signing: v7_0 && !xs,
        }
    }

    /// Recommended minimum `(major, minor)` where the connected app is unsupported
    pub fn recommended_version(&self) -> Option<(u8, u8)> {
        match self.is_compatible {
            true => None,
            false => Some(MIN_SUPPORTED),
        }
    }

    /// Named list of capabilities, used for logging and tests
    pub fn list(&self) -> [(&'static str, bool); 16] {
        [
            ("isCompatible", self.is_compatible),
            ("supportsByronAddressDerivation", self.supports_byron_address_derivation),
            ("supportsMary", self.supports_mary),
            ("supportsCatalystRegistration", self.supports_catalyst_registration),
            ("supportsZeroTtl", self.supports_zero_ttl),
            ("supportsPoolRegistrationAsOperator", self.supports_pool_registration_as_operator),
            ("supportsPoolRetirement", self.supports_pool_retirement),
            ("supportsMultisigTransaction", self.supports_multisig_transaction),
            ("supportsMint", self.supports_mint),
            ("supportsAlonzo", self.supports_alonzo),
            ("supportsReqSignersInOrdinaryTx", self.supports_req_signers_in_ordinary_tx),
            ("supportsBabbage", self.supports_babbage),
            ("supportsCIP36", self.supports_cip36),
            ("supportsCIP36Vote", self.supports_cip36_vote),
            ("supportsOperationalCertificate", self.supports_operational_certificate),
            ("supportsMessageSigning", self.supports_message_signing),
        ]
    }
}

/// Connected application version lacks a required capability
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("device app version {version} does not support {feature}")]
pub struct VersionUnsupported {
    pub version: Version,
    pub feature: &'static str,
}

impl VersionUnsupported {
    pub fn new(version: &Version, feature: &'static str) -> Self {
        Self {
            version: *version,
            feature,
        }
    }
}

/// Check the base compatibility floor, returning the capability set
pub fn ensure_compatible(version: &Version) -> Result<Capabilities, VersionUnsupported> {
    let caps = Capabilities::of(version);

    if !caps.is_compatible {
        log::warn!(
            "Device app version {} unsupported, recommended: {:?}",
            version,
            caps.recommended_version()
        );
        return Err(VersionUnsupported::new(
            version,
            "this library (app version too old or untested)",
        ));
    }

    Ok(caps)
}

/// Require a specific capability, naming the feature on failure
pub fn require(
    version: &Version,
    supported: bool,
    feature: &'static str,
) -> Result<(), VersionUnsupported> {
    match supported {
        true => Ok(()),
        false => Err(VersionUnsupported::new(version, feature)),
    }
}
