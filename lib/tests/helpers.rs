// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::str::FromStr;

use log::{debug, LevelFilter};
use simplelog::SimpleLogger;

use ledger_ada::apdu::{AppFlags, Version};
use ledger_ada_tests::mock::MockDevice;

/// Setup logging, level from `LOG_LEVEL`
#[allow(unused)]
pub fn init_logging() {
    let log_level = match std::env::var("LOG_LEVEL").map(|v| LevelFilter::from_str(&v)) {
        Ok(Ok(l)) => l,
        _ => LevelFilter::Debug,
    };

    let _ = SimpleLogger::init(log_level, simplelog::Config::default());
}

/// Setup logging and a simulated device reporting the provided version
#[allow(unused)]
pub fn setup(major: u8, minor: u8, flags: AppFlags) -> MockDevice {
    init_logging();

    let version = Version::new(major, minor, 0, flags);
    debug!("Using simulated app {}", version);

    MockDevice::new(version)
}

/// Simulated device with no build flags set
#[allow(unused)]
pub fn setup_release(major: u8, minor: u8) -> MockDevice {
    setup(major, minor, AppFlags::empty())
}
