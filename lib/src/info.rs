// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Application information requests

use encdec::DecodeOwned;

use ledger_ada_apdu::{
    response::{SerialResp, SERIAL_LEN},
    version::VERSION_RESP_LEN,
    Instruction, Request, Version,
};

use crate::interaction::{Call, Sequence};

/// Fetch the application version
pub fn get_version() -> Sequence<Option<Version>, Version> {
    let req = Request::new(Instruction::GetVersion, 0x00, 0x00, vec![]).expect(VERSION_RESP_LEN);

    Sequence::new(
        None,
        [Call::new(req, |v: &mut Option<Version>, r: &[u8]| {
            let (version, _) = Version::decode_owned(r)?;
            *v = Some(version);
            Ok(())
        })],
        finish_some,
    )
}

/// Fetch the device serial, hex encoded
pub fn get_serial() -> Sequence<Option<String>, String> {
    let req = Request::new(Instruction::GetSerial, 0x00, 0x00, vec![]).expect(SERIAL_LEN);

    Sequence::new(
        None,
        [Call::new(req, |s: &mut Option<String>, r: &[u8]| {
            let (serial, _) = SerialResp::decode_owned(r)?;
            *s = Some(serial.to_hex());
            Ok(())
        })],
        finish_some,
    )
}

/// Run on-device self tests, debug builds only
pub fn run_tests() -> Sequence<(), ()> {
    let req = Request::new(Instruction::RunTests, 0x00, 0x00, vec![]);

    Sequence::new((), [Call::ack(req)], |_| Ok(()))
}

fn finish_some<R>(v: Option<R>) -> Result<R, crate::Error> {
    v.ok_or(crate::error::ProtocolError::InvalidResponse.into())
}
