// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Tests for Cardano wallet integration.
//!
//! Generic over [ledger_transport::Exchange] for reuse, with a simulated
//! application ([mock::MockDevice]) for running without hardware.
//!

pub mod sim;

pub mod mock;

pub mod transaction;
