// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction signing wire definitions
//!
//! A transaction is streamed to the device as a fixed sequence of stages,
//! each selected by `P1` under [Instruction::SignTx][crate::Instruction::SignTx].
//! Stages with sub-structure (outputs, mint, pool registration, voting
//! registration) select a role via `P2`.
//!
//! See `ledger_ada::tx` for the state machine driving these stages.

use encdec::Encode;
use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter};

use crate::{
    helpers::{be_u32, be_u64},
    EncodingError,
};

mod aux_data;
pub use aux_data::*;

mod certificate;
pub use certificate::*;

mod output;
pub use output::*;

/// Optional field absent
pub const OPTION_NO: u8 = 0x01;

/// Optional field present
pub const OPTION_YES: u8 = 0x02;

/// Encode an optional-field presence flag
pub const fn option_flag(present: bool) -> u8 {
    match present {
        true => OPTION_YES,
        false => OPTION_NO,
    }
}

/// Maximum chunk size for streamed datums, scripts and messages
pub const MAX_CHUNK_SIZE: usize = 240;

/// Transaction hash length
pub const TX_HASH_LEN: usize = 32;

/// Auxiliary data hash length
pub const AUX_DATA_HASH_LEN: usize = 32;

/// Script data hash length
pub const SCRIPT_DATA_HASH_LEN: usize = 32;

/// Datum hash length
pub const DATUM_HASH_LEN: usize = 32;

/// Sign transaction stages, sent as `P1`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumIter, TryFromPrimitive)]
#[repr(u8)]
pub enum SignTxStage {
    Init = 0x01,
    Inputs = 0x02,
    Outputs = 0x03,
    Fee = 0x04,
    Ttl = 0x05,
    Certificates = 0x06,
    Withdrawals = 0x07,
    /// Auxiliary data, both current and legacy forms
    AuxData = 0x08,
    ValidityIntervalStart = 0x09,
    /// Body complete, responds with the transaction hash
    Confirm = 0x0a,
    Mint = 0x0b,
    ScriptDataHash = 0x0c,
    CollateralInputs = 0x0d,
    RequiredSigners = 0x0e,
    /// One request per witness path, responds with a signature
    Witnesses = 0x0f,
    TotalCollateral = 0x10,
    ReferenceInputs = 0x11,
    CollateralOutput = 0x12,
}

/// Transaction signing modes, as tagged in the init stage
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumIter, TryFromPrimitive)]
#[repr(u8)]
pub enum SigningModeTag {
    Ordinary = 0x03,
    PoolRegistrationAsOwner = 0x04,
    PoolRegistrationAsOperator = 0x05,
    Multisig = 0x06,
    Plutus = 0x07,
}

/// Required signer kinds
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum RequiredSignerTag {
    Path = 0x00,
    Hash = 0x01,
}

/// Transaction input, also used for collateral and reference inputs
///
/// ```text
/// +--------------+--------------------+
/// | TX_HASH (32) | OUTPUT_INDEX (u32) |
/// +--------------+--------------------+
/// ```
#[derive(Clone, Debug, PartialEq, Encode)]
#[encdec(error = "EncodingError")]
pub struct TxInputReq {
    pub tx_hash: [u8; TX_HASH_LEN],

    #[encdec(with = "be_u32")]
    pub output_index: u32,
}

/// Single integer stage payload (fee, TTL, validity interval start,
/// total collateral)
///
/// ```text
/// +-------------+
/// | VALUE (u64) |
/// +-------------+
/// ```
#[derive(Clone, Debug, PartialEq, Encode)]
#[encdec(error = "EncodingError")]
pub struct TxUint64Req {
    #[encdec(with = "be_u64")]
    pub value: u64,
}

impl TxUint64Req {
    pub fn new(value: u64) -> Self {
        Self { value }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::helpers::to_vec;

    #[test]
    fn option_flags() {
        assert_eq!(option_flag(true), 0x02);
        assert_eq!(option_flag(false), 0x01);
    }

    #[test]
    fn stage_codes() {
        assert_eq!(SignTxStage::Confirm as u8, 0x0a);
        assert_eq!(SignTxStage::Witnesses as u8, 0x0f);
        assert_eq!(
            SignTxStage::try_from(0x12).ok(),
            Some(SignTxStage::CollateralOutput)
        );
        assert!(SignTxStage::try_from(0x13).is_err());
    }

    #[test]
    fn input_layout() {
        let r = TxInputReq {
            tx_hash: [0x3b; TX_HASH_LEN],
            output_index: 0x0102,
        };

        let b = to_vec(&r).unwrap();
        assert_eq!(b.len(), TX_HASH_LEN + 4);
        assert_eq!(&b[..TX_HASH_LEN], &[0x3b; TX_HASH_LEN]);
        assert_eq!(&b[TX_HASH_LEN..], &[0x00, 0x00, 0x01, 0x02]);
    }

    #[test]
    fn uint64_big_endian() {
        // 45_000_000_000_000_000 lovelace, above the f64 mantissa
        let r = TxUint64Req::new(45_000_000_000_000_000);
        assert_eq!(
            to_vec(&r).unwrap(),
            45_000_000_000_000_000u64.to_be_bytes().to_vec()
        );
        assert_eq!(to_vec(&TxUint64Req::new(42)).unwrap(), [0, 0, 0, 0, 0, 0, 0, 42]);
    }
}
