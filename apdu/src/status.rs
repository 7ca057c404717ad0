// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Device status words
//!
//! Every response ends with a big-endian status word. Numeric values are part
//! of the wire contract and must never be renumbered.

use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, IntoStaticStr};

/// Success status word
pub const SW_OK: u16 = 0x9000;

/// Named device status codes
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Display, EnumIter, IntoStaticStr, TryFromPrimitive,
)]
#[repr(u16)]
pub enum DeviceStatusCode {
    #[strum(serialize = "ERR_MALFORMED_REQUEST_HEADER")]
    MalformedRequestHeader = 0x6e01,

    #[strum(serialize = "ERR_BAD_CLA")]
    BadCla = 0x6e02,

    #[strum(serialize = "ERR_UNKNOWN_INS")]
    UnknownIns = 0x6e03,

    /// Device still processing a previous call, resets on this error
    #[strum(serialize = "ERR_STILL_IN_CALL")]
    StillInCall = 0x6e04,

    #[strum(serialize = "ERR_INVALID_REQUEST_PARAMETERS")]
    InvalidRequestParameters = 0x6e05,

    #[strum(serialize = "ERR_INVALID_STATE")]
    InvalidState = 0x6e06,

    #[strum(serialize = "ERR_INVALID_DATA")]
    InvalidData = 0x6e07,

    #[strum(serialize = "ERR_INVALID_BIP_PATH")]
    InvalidBipPath = 0x6e08,

    #[strum(serialize = "ERR_REJECTED_BY_USER")]
    RejectedByUser = 0x6e09,

    #[strum(serialize = "ERR_REJECTED_BY_POLICY")]
    RejectedByPolicy = 0x6e10,

    #[strum(serialize = "ERR_DEVICE_LOCKED")]
    DeviceLocked = 0x6e11,

    #[strum(serialize = "ERR_UNSUPPORTED_ADDRESS_TYPE")]
    UnsupportedAddressType = 0x6e12,

    /// Returned by the dashboard or another app, not the Cardano app
    #[strum(serialize = "ERR_CLA_NOT_SUPPORTED")]
    ClaNotSupported = 0x6e00,

    #[strum(serialize = "ERR_ASSERT")]
    Assert = 0x4700,

    /// Device OS lock screen
    #[strum(serialize = "ERR_OS_LOCKED")]
    OsLocked = 0x5515,
}

impl DeviceStatusCode {
    /// Short human-readable description
    pub fn message(&self) -> &'static str {
        use DeviceStatusCode::*;

        match self {
            MalformedRequestHeader => "Malformed request header",
            BadCla => "Bad request class",
            UnknownIns => "Unknown instruction",
            StillInCall => "Device is still processing a previous call",
            InvalidRequestParameters => "Invalid request parameters",
            InvalidState => "Invalid device state",
            InvalidData => "Invalid data supplied to the device",
            InvalidBipPath => "Invalid derivation path",
            RejectedByUser => "Action rejected by user",
            RejectedByPolicy => "Action rejected by the device security policy",
            DeviceLocked => "Device is locked",
            UnsupportedAddressType => "Unsupported address type",
            ClaNotSupported => "Wrong app open on the device",
            Assert => "Device assertion failed",
            OsLocked => "Device is locked",
        }
    }
}

/// Non-success status word received from the device
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("device returned {} (0x{code:04x}): {}", self.name(), self.message())]
pub struct DeviceStatusError {
    /// Raw status word, preserved verbatim
    pub code: u16,
}

impl DeviceStatusError {
    pub fn new(code: u16) -> Self {
        Self { code }
    }

    /// Named status code, if this is a known value
    pub fn status(&self) -> Option<DeviceStatusCode> {
        DeviceStatusCode::try_from(self.code).ok()
    }

    pub fn name(&self) -> &'static str {
        self.status().map(|s| s.into()).unwrap_or("UNKNOWN")
    }

    pub fn message(&self) -> &'static str {
        self.status()
            .map(|s| s.message())
            .unwrap_or("Unknown device error")
    }

    /// Check whether this is the transient "still in previous call" status
    pub fn is_still_in_call(&self) -> bool {
        self.code == DeviceStatusCode::StillInCall as u16
    }
}
