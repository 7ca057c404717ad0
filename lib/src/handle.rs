// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Handle for connected ledger devices
//!
//! This provides methods for interacting with the Cardano application
//! and is generic over [Exchange] transports. Each operation queries the
//! application version first, checks the operation is supported, then runs
//! the full interaction with exclusive use of the transport.

use std::{fmt::Display, sync::Arc, time::Duration};

use ledger_transport::Exchange;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use ledger_ada_apdu::{
    compat::{ensure_compatible, require, Capabilities, VersionUnsupported},
    Version,
};

use crate::{
    address::{DeviceOwnedAddress, Network},
    derive::{self, DerivedAddress},
    info,
    interaction::{run_interaction, Interaction},
    keys::{self, ExtendedPublicKey},
    message::{self, SignMessageRequest, SignedMessageData},
    opcert::{self, OperationalCertificate, OperationalCertificateSignature},
    tx::{SignTransactionRequest, SignTx, SignedTransactionData},
    vote::{self, Cip36Vote, SignedCip36VoteData},
    Error,
};

/// Device handle timeouts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Timeout for requests not requiring user interaction
    pub request_timeout_s: u64,
    /// Timeout for requests awaiting user approval
    pub user_timeout_s: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            request_timeout_s: 2,
            user_timeout_s: 60,
        }
    }
}

/// Cardano handle for a connected ledger device.
///
/// This is generic over [Exchange] types to support different
/// underlying transports / providers
pub struct DeviceHandle<T> {
    /// Transport, locked for the duration of each interaction
    t: Arc<Mutex<T>>,
    config: DeviceConfig,
}

impl<T> Clone for DeviceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            t: self.t.clone(),
            config: self.config.clone(),
        }
    }
}

/// Create a [DeviceHandle] wrapper from a type implementing [Exchange]
impl<T> From<T> for DeviceHandle<T> {
    fn from(t: T) -> Self {
        Self::with_config(t, DeviceConfig::default())
    }
}

impl<T> DeviceHandle<T> {
    /// Create a handle with custom timeouts
    pub fn with_config(t: T, config: DeviceConfig) -> Self {
        Self {
            t: Arc::new(Mutex::new(t)),
            config,
        }
    }

    /// Helper to fetch user interaction timeout
    fn user_timeout(&self) -> Duration {
        Duration::from_secs(self.config.user_timeout_s)
    }

    /// Helper to fetch APDU request timeout
    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_s)
    }
}

impl<T> DeviceHandle<T>
where
    T: Exchange + Send + Sync,
    T::Error: Display,
{
    /// Fetch the application version
    pub async fn get_version(&self) -> Result<Version, Error> {
        let t = self.t.lock().await;

        debug!("Requesting app version");

        run_interaction(&*t, info::get_version(), self.request_timeout()).await
    }

    /// Fetch the device serial, hex encoded
    pub async fn get_serial(&self) -> Result<String, Error> {
        self.execute("serial", self.request_timeout(), |_, _| Ok(info::get_serial()))
            .await
    }

    /// Export extended public keys for the provided paths
    pub async fn get_extended_public_keys(
        &self,
        paths: &[Vec<u32>],
    ) -> Result<Vec<ExtendedPublicKey>, Error> {
        debug!("Requesting {} extended public keys", paths.len());

        self.execute("extended public keys", self.user_timeout(), |_, _| {
            keys::get_extended_public_keys(paths)
        })
        .await
    }

    /// Export a single extended public key
    pub async fn get_extended_public_key(&self, path: &[u32]) -> Result<ExtendedPublicKey, Error> {
        let mut keys = self.get_extended_public_keys(&[path.to_vec()]).await?;

        keys.pop()
            .ok_or(crate::error::ProtocolError::InvalidResponse.into())
    }

    /// Derive an address without displaying it
    pub async fn derive_address(
        &self,
        network: &Network,
        address: &DeviceOwnedAddress,
    ) -> Result<DerivedAddress, Error> {
        self.execute("derive address", self.user_timeout(), |v, _| {
            derive::derive_address(v, network, address)
        })
        .await
    }

    /// Display an address on the device
    pub async fn show_address(
        &self,
        network: &Network,
        address: &DeviceOwnedAddress,
    ) -> Result<(), Error> {
        self.execute("show address", self.user_timeout(), |v, _| {
            derive::show_address(v, network, address)
        })
        .await
    }

    /// Sign a transaction, returning the transaction hash and witnesses
    pub async fn sign_transaction(
        &self,
        req: &SignTransactionRequest,
    ) -> Result<SignedTransactionData, Error> {
        debug!("Starting {} transaction", req.signing_mode);

        self.execute("sign transaction", self.user_timeout(), |v, _| {
            SignTx::new(v, req)
        })
        .await
    }

    /// Sign a pool operational certificate
    pub async fn sign_operational_certificate(
        &self,
        cert: &OperationalCertificate,
    ) -> Result<OperationalCertificateSignature, Error> {
        self.execute("operational certificate", self.user_timeout(), |v, c| {
            require(v, c.supports_operational_certificate, "operational certificate")?;
            opcert::sign_operational_certificate(cert)
        })
        .await
    }

    /// Sign a CIP-36 vote
    pub async fn sign_cip36_vote(&self, v: &Cip36Vote) -> Result<SignedCip36VoteData, Error> {
        self.execute("cip36 vote", self.user_timeout(), |version, c| {
            require(version, c.supports_cip36_vote, "cip36 vote")?;
            vote::sign_cip36_vote(v)
        })
        .await
    }

    /// Sign an arbitrary message (CIP-8)
    pub async fn sign_message(&self, req: &SignMessageRequest) -> Result<SignedMessageData, Error> {
        self.execute("sign message", self.user_timeout(), |v, c| {
            require(v, c.supports_message_signing, "message signing")?;
            message::sign_message(v, req)
        })
        .await
    }

    /// Run on-device self tests (debug application builds only)
    pub async fn run_tests(&self) -> Result<(), Error> {
        self.execute("run tests", self.user_timeout(), |v, _| {
            if !v.is_debug() {
                return Err(VersionUnsupported::new(v, "device tests").into());
            }
            Ok(info::run_tests())
        })
        .await
    }

    /// Helper to execute an operation
    ///
    /// Holds the transport for the whole operation so interactions from
    /// concurrent callers are never interleaved. The interaction is built
    /// (and so validated) before any of its requests are sent.
    async fn execute<I: Interaction>(
        &self,
        name: &str,
        timeout: Duration,
        build: impl FnOnce(&Version, &Capabilities) -> Result<I, Error>,
    ) -> Result<I::Output, Error> {
        let t = self.t.lock().await;

        let version = run_interaction(&*t, info::get_version(), self.request_timeout()).await?;
        let caps = ensure_compatible(&version)?;

        debug!("Executing {} (app version {})", name, version);

        let i = build(&version, &caps)?;

        run_interaction(&*t, i, timeout).await
    }
}
