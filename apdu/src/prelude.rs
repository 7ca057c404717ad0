// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::{
    address::{AddressType, BlockchainPointer, CredentialSource, CredentialTag, KEY_HASH_LEN},
    compat::{ensure_compatible, require, Capabilities, VersionUnsupported},
    encode::{Builder, EncodingError},
    ops::{DeriveAddressP1, ExtPublicKeyP1, MessageAddressFieldType, SignMessageP1, SignVoteP1},
    response::{
        ExtendedPublicKeyResp, FixedResp, HashResp, MessageSignatureResp, RegistrationResp,
        SerialResp, SignatureResp,
    },
    status::{DeviceStatusCode, DeviceStatusError, SW_OK},
    tx::*,
    version::{AppFlags, Version},
    Instruction, Request, ADA_APDU_CLA, HARDENED, MAX_PATH_LEN,
};
