// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::fmt::Display;

use ledger_transport::Exchange;
use log::{debug, info, trace};

use ledger_ada::{
    apdu::{AppFlags, Version, HARDENED as H},
    tx::{SignTransactionRequest, SignedTransactionData},
    DeviceHandle,
};

use crate::{mock::MockDevice, sim};

pub struct TransactionExpectation<'a> {
    pub name: &'a str,
    /// App version (major, minor, patch) to sign with
    pub version: (u8, u8, u8),
    pub request: &'a str,
    /// Expected transaction hash, where known independently
    pub tx_hash: Option<&'a str>,
    /// Expected witness paths, in order
    pub witness_paths: &'a [&'a [u32]],
}

impl<'a> TransactionExpectation<'a> {
    pub fn version(&self) -> Version {
        let (major, minor, patch) = self.version;
        Version::new(major, minor, patch, AppFlags::empty())
    }

    pub fn tx_req(&self) -> SignTransactionRequest {
        serde_json::from_str(self.request).unwrap()
    }
}

const BYRON_PATH: &[u32] = &[44 | H, 1815 | H, H, 0, 0];
const SPENDING_PATH: &[u32] = &[1852 | H, 1815 | H, H, 0, 0];
const CHANGE_PATH: &[u32] = &[1852 | H, 1815 | H, H, 1, 0];
const STAKING_PATH: &[u32] = &[1852 | H, 1815 | H, H, 2, 0];

const BYRON_TX_HASH: &str = "73e09bdebf98a9e0f17f86a2d11e0f14f4f8dae77cdf26ff1678e821f20c8db6";

pub const TRANSACTIONS: &[TransactionExpectation<'static>] = &[
    TransactionExpectation {
        name: "byron input, legacy app",
        version: (2, 2, 0),
        request: include_str!("../vectors/tx1.json"),
        tx_hash: Some(BYRON_TX_HASH),
        witness_paths: &[BYRON_PATH],
    },
    TransactionExpectation {
        name: "byron input",
        version: (7, 0, 0),
        request: include_str!("../vectors/tx1.json"),
        tx_hash: Some(BYRON_TX_HASH),
        witness_paths: &[BYRON_PATH],
    },
    TransactionExpectation {
        name: "staking with tokens and mint",
        version: (7, 0, 0),
        request: include_str!("../vectors/tx2.json"),
        tx_hash: None,
        witness_paths: &[SPENDING_PATH, STAKING_PATH],
    },
    TransactionExpectation {
        name: "pool registration as owner",
        version: (7, 0, 0),
        request: include_str!("../vectors/tx3.json"),
        tx_hash: None,
        witness_paths: &[STAKING_PATH],
    },
    TransactionExpectation {
        name: "plutus",
        version: (7, 0, 0),
        request: include_str!("../vectors/tx4.json"),
        tx_hash: None,
        witness_paths: &[SPENDING_PATH, STAKING_PATH, CHANGE_PATH],
    },
    TransactionExpectation {
        name: "cip36 registration",
        version: (7, 0, 0),
        request: include_str!("../vectors/tx5.json"),
        tx_hash: None,
        witness_paths: &[SPENDING_PATH],
    },
];

/// Sign a transaction and check the result against expectations
pub async fn test<'a, T>(
    t: T,
    tx: &TransactionExpectation<'a>,
) -> anyhow::Result<SignedTransactionData>
where
    T: Exchange + Send + Sync,
    T::Error: Display,
{
    let req = tx.tx_req();

    trace!("Request: {:?}", req);

    let d = DeviceHandle::from(t);

    info!("Signing transaction: {}", tx.name);

    let signed = d.sign_transaction(&req).await?;

    debug!("Transaction hash: {}", signed.tx_hash_hex);

    if let Some(h) = tx.tx_hash {
        assert_eq!(signed.tx_hash_hex, h, "transaction hash mismatch");
    }

    let paths: Vec<_> = signed.witnesses.iter().map(|w| w.path.as_slice()).collect();
    assert_eq!(paths, tx.witness_paths, "witness path mismatch");

    Ok(signed)
}

/// Sign a transaction against the simulated app, checking signatures
/// cover the hash the app computed
pub async fn test_mock<'a>(tx: &TransactionExpectation<'a>) -> anyhow::Result<MockDevice> {
    let mock = MockDevice::new(tx.version());

    let signed = test(mock.clone(), tx).await?;

    let hash = mock
        .tx_hash()
        .ok_or_else(|| anyhow::anyhow!("transaction not confirmed"))?;
    assert_eq!(signed.tx_hash_hex, hex::encode(hash));

    for w in &signed.witnesses {
        assert_eq!(
            w.witness_signature_hex,
            hex::encode(sim::sign(&w.path, &hash)),
            "invalid witness for path {:?}",
            w.path
        );
    }

    Ok(mock)
}
