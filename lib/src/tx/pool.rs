// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Pool registration request sequence
//!
//! Follows the basic data of a pool registration certificate, all requests
//! share the `Certificates` stage with the role in `P2`.
//!
//! ```text
//! INIT ─> POOL_KEY ─> VRF ─> FINANCIALS ─> REWARD_ACCOUNT ─> OWNER* ─> RELAY* ─> METADATA ─> CONFIRM
//! ```

use ledger_ada_apdu::{
    encode::Builder,
    helpers::to_vec,
    tx::{PoolEntityType, PoolFinancialsReq, PoolInitReq, PoolRole, RelayType, SignTxStage},
    EncodingError, Instruction, Request,
};

use crate::Error;

use super::{parsed::*, serialize::Encoder};

fn request(role: PoolRole, data: Vec<u8>) -> Request {
    Request::new(
        Instruction::SignTx,
        SignTxStage::Certificates as u8,
        role as u8,
        data,
    )
}

/// Device-owned / third-party entity as `type ++ (path | bytes)`
fn entity<const N: usize>(e: &PoolEntity<N>) -> Result<Vec<u8>, Error> {
    let b = match e {
        PoolEntity::DeviceOwned(p) => Builder::new().u8(PoolEntityType::DeviceOwned as u8).path(p)?,
        PoolEntity::ThirdParty(b) => Builder::new().u8(PoolEntityType::ThirdParty as u8).bytes(b),
    };
    Ok(b.finish())
}

/// Optional relay port
fn port(b: Builder, port: Option<u16>) -> Builder {
    match port {
        Some(p) => b.flag(true).u16(p),
        None => b.flag(false),
    }
}

fn relay(r: &ParsedRelay) -> Vec<u8> {
    match r {
        ParsedRelay::SingleHostIpAddr { port: p, ipv4, ipv6 } => {
            let mut b = port(Builder::new().u8(RelayType::SingleHostIpAddr as u8), *p);
            b = match ipv4 {
                Some(ip) => b.flag(true).bytes(ip),
                None => b.flag(false),
            };
            b = match ipv6 {
                Some(ip) => b.flag(true).bytes(ip),
                None => b.flag(false),
            };
            b.finish()
        }
        ParsedRelay::SingleHostHostname { port: p, dns_name } => {
            port(Builder::new().u8(RelayType::SingleHostHostname as u8), *p)
                .bytes(dns_name.as_bytes())
                .finish()
        }
        ParsedRelay::MultiHost { dns_name } => Builder::new()
            .u8(RelayType::MultiHost as u8)
            .bytes(dns_name.as_bytes())
            .finish(),
    }
}

impl Encoder {
    /// Requests for pool registration parameters
    ///
    /// Apps predating operator support take the pool key and reward account
    /// as raw third-party values.
    pub fn pool_registration(&self, p: &ParsedPoolParams) -> Result<Vec<Request>, Error> {
        let operator_layout = self.caps.supports_pool_registration_as_operator;

        let count =
            |n: usize| u32::try_from(n).map_err(|_| EncodingError::OutOfRange { bits: 32 });
        let init = PoolInitReq {
            owner_count: count(p.owners.len())?,
            relay_count: count(p.relays.len())?,
        };
        let mut reqs = vec![request(PoolRole::Init, to_vec(&init)?)];

        let pool_key = match (&p.pool_key, operator_layout) {
            (k, true) => entity(k)?,
            (PoolEntity::ThirdParty(h), false) => h.to_vec(),
            (PoolEntity::DeviceOwned(_), false) => {
                return Err(self.unsupported("device-owned pool key"))
            }
        };
        reqs.push(request(PoolRole::PoolKey, pool_key));

        reqs.push(request(PoolRole::VrfKey, p.vrf_key_hash.to_vec()));

        let financials = PoolFinancialsReq {
            pledge: p.pledge,
            cost: p.cost,
            margin_numerator: p.margin_numerator,
            margin_denominator: p.margin_denominator,
        };
        reqs.push(request(PoolRole::Financials, to_vec(&financials)?));

        let reward_account = match (&p.reward_account, operator_layout) {
            (a, true) => entity(a)?,
            (PoolEntity::ThirdParty(a), false) => a.to_vec(),
            (PoolEntity::DeviceOwned(_), false) => {
                return Err(self.unsupported("device-owned reward account"))
            }
        };
        reqs.push(request(PoolRole::RewardAccount, reward_account));

        for o in &p.owners {
            reqs.push(request(PoolRole::Owners, entity(o)?));
        }

        for r in &p.relays {
            reqs.push(request(PoolRole::Relays, relay(r)));
        }

        let metadata = match &p.metadata {
            Some(m) => Builder::new()
                .flag(true)
                .bytes(&m.hash)
                .bytes(m.url.as_bytes())
                .finish(),
            None => Builder::new().flag(false).finish(),
        };
        reqs.push(request(PoolRole::Metadata, metadata));

        reqs.push(request(PoolRole::Confirmation, vec![]));

        Ok(reqs)
    }
}
