// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Device discovery and connection
//!

#[cfg(feature = "transport_hid")]
pub use ledger_transport_hid::{LedgerHIDError, TransportNativeHID};

use async_trait::async_trait;
use ledger_transport::Exchange;
use log::debug;

#[cfg(feature = "transport_hid")]
use hidapi::HidApi;

use crate::{DeviceConfig, DeviceHandle, Error};

/// Ledger provider manages ledger devices and connections
pub struct LedgerProvider {
    #[cfg(feature = "transport_hid")]
    hid_api: HidApi,
}

/// Ledger device information for listing, used by connect
#[derive(Debug)]
#[non_exhaustive]
pub enum LedgerInfo {
    #[cfg(feature = "transport_hid")]
    Hid(hidapi::DeviceInfo),
}

impl LedgerProvider {
    /// Create a new ledger provider
    /// NOTE: only one provider may exist at a time (global HID context)
    pub fn new() -> Result<Self, Error> {
        #[cfg(feature = "transport_hid")]
        return Ok(Self {
            hid_api: HidApi::new()?,
        });

        #[cfg(not(feature = "transport_hid"))]
        return Ok(Self {});
    }

    /// List available ledger devices
    pub fn list_devices(&self) -> Vec<LedgerInfo> {
        #[allow(unused_mut)]
        let mut devices = vec![];

        #[cfg(feature = "transport_hid")]
        TransportNativeHID::list_ledgers(&self.hid_api)
            .cloned()
            .for_each(|d| devices.push(LedgerInfo::Hid(d)));

        debug!("Found {} devices: {:?}", devices.len(), devices);

        devices
    }
}

#[cfg(feature = "transport_hid")]
impl std::fmt::Display for LedgerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerInfo::Hid(hid_info) => write!(
                f,
                "{:16} (USB, {:04x}:{:04x}, {})",
                hid_info.product_string().unwrap_or("UNKNOWN"),
                hid_info.vendor_id(),
                hid_info.product_id(),
                hid_info.serial_number().unwrap_or("UNKNOWN"),
            ),
        }
    }
}

/// Connect trait for supported transports
#[async_trait]
pub trait Connect<T: Exchange> {
    type Options: std::fmt::Debug;

    /// Connect to the specified device
    async fn connect(
        &self,
        opts: &Self::Options,
        config: DeviceConfig,
    ) -> Result<DeviceHandle<T>, Error>;
}

/// Connect implementation for HID devices
#[cfg(feature = "transport_hid")]
#[async_trait]
impl Connect<TransportNativeHID> for LedgerProvider {
    type Options = hidapi::DeviceInfo;

    async fn connect(
        &self,
        opts: &Self::Options,
        config: DeviceConfig,
    ) -> Result<DeviceHandle<TransportNativeHID>, Error> {
        debug!("Connecting to {:?}", opts.path());

        let t = TransportNativeHID::open_device(&self.hid_api, opts)?;

        Ok(DeviceHandle::with_config(t, config))
    }
}
