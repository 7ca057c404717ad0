// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Application version APDUs

use encdec::DecodeOwned;

use crate::EncodingError;

bitflags::bitflags! {
    /// Application build flags
    pub struct AppFlags: u8 {
        /// Debug build, enables `RUN_TESTS`
        const IS_DEBUG = 1 << 0;

        /// Reduced-capability build for memory constrained devices
        const IS_APP_XS = 1 << 1;
    }
}

/// Application version, fetched once per call and threaded through every
/// capability check.
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     MAJOR     |     MINOR     |     PATCH     |     FLAGS     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub flags: AppFlags,
}

/// Length of a version response
pub const VERSION_RESP_LEN: usize = 4;

impl Version {
    pub const fn new(major: u8, minor: u8, patch: u8, flags: AppFlags) -> Self {
        Self {
            major,
            minor,
            patch,
            flags,
        }
    }

    pub fn is_debug(&self) -> bool {
        self.flags.contains(AppFlags::IS_DEBUG)
    }

    pub fn is_app_xs(&self) -> bool {
        self.flags.contains(AppFlags::IS_APP_XS)
    }

    /// Version is at least `major.minor` (patch is ignored)
    pub fn at_least(&self, major: u8, minor: u8) -> bool {
        (self.major, self.minor) >= (major, minor)
    }

    /// Version major is no newer than `major`
    pub fn at_most(&self, major: u8) -> bool {
        self.major <= major
    }
}

impl core::fmt::Display for Version {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.is_app_xs() {
            write!(f, "-xs")?;
        }
        if self.is_debug() {
            write!(f, " (debug)")?;
        }
        Ok(())
    }
}

impl DecodeOwned for Version {
    type Output = Self;

    type Error = EncodingError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        if buff.len() != VERSION_RESP_LEN {
            return Err(EncodingError::InvalidLength {
                expected: VERSION_RESP_LEN,
                actual: buff.len(),
            });
        }

        let v = Self {
            major: buff[0],
            minor: buff[1],
            patch: buff[2],
            flags: AppFlags::from_bits_truncate(buff[3]),
        };

        Ok((v, VERSION_RESP_LEN))
    }
}
