// Copyright (c) 2022-2023 The MobileCoin Foundation

//! encdec helpers for request payloads
//!
//! encdec's integer encodings are little-endian, the Cardano app parses
//! big-endian, so fixed-width fields in derived request objects are routed
//! through the modules below with `#[encdec(with = "...")]`.

use encdec::Encode;

use crate::EncodingError;

/// Encode an object into a freshly allocated buffer
pub fn to_vec<E: Encode>(e: &E) -> Result<Vec<u8>, E::Error> {
    let mut buff = vec![0u8; e.encode_len()?];
    let n = e.encode(&mut buff)?;
    buff.truncate(n);
    Ok(buff)
}

fn write(d: &[u8], buff: &mut [u8]) -> Result<usize, EncodingError> {
    if buff.len() < d.len() {
        return Err(EncodingError::InvalidLength {
            expected: d.len(),
            actual: buff.len(),
        });
    }

    buff[..d.len()].copy_from_slice(d);

    Ok(d.len())
}

macro_rules! be_int {
    ($name:ident, $t:ty) => {
        #[doc = concat!("encdec helper module for big-endian `", stringify!($t), "`")]
        pub(crate) mod $name {
            use crate::EncodingError;

            pub fn enc(v: &$t, buff: &mut [u8]) -> Result<usize, EncodingError> {
                super::write(&v.to_be_bytes(), buff)
            }

            pub fn enc_len(_v: &$t) -> Result<usize, EncodingError> {
                Ok(core::mem::size_of::<$t>())
            }
        }
    };
}

be_int!(be_u32, u32);
be_int!(be_u64, u64);

/// encdec helper module for BIP32 paths (`len:u8 ++ u32be*`)
pub(crate) mod path {
    use crate::{encode::bip32_path, EncodingError, MAX_PATH_LEN};

    pub fn enc(p: &[u32], buff: &mut [u8]) -> Result<usize, EncodingError> {
        super::write(&bip32_path(p)?, buff)
    }

    pub fn enc_len(p: &[u32]) -> Result<usize, EncodingError> {
        if p.len() > MAX_PATH_LEN {
            return Err(EncodingError::PathTooLong(p.len()));
        }
        Ok(1 + p.len() * 4)
    }
}
