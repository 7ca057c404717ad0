// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Ledger Cardano API Library
//!
//! Host side driver for the Cardano ledger application. Operations are
//! expressed as [interaction::Interaction]s, fully validated and encoded
//! before the first request is sent, and executed over any
//! [Exchange] transport via [DeviceHandle].

pub use ledger_transport::Exchange;

/// Re-export `ledger-ada-apdu` for consumers
pub use ledger_ada_apdu::{self as apdu};

/// Device discovery and connection
pub mod transport;

mod channel;

pub mod address;
pub mod derive;
pub mod info;
pub mod interaction;
pub mod keys;
pub mod message;
pub mod opcert;
pub mod tx;
pub mod vote;

mod handle;
pub use handle::{DeviceConfig, DeviceHandle};

mod error;
pub use error::{Error, InvalidDataReason, ProtocolError};
