// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction body simulator
//!
//! Rebuilds the CBOR transaction body from the sign-tx request stream the
//! way the device application does, so transaction hashes can be checked
//! against known vectors.
//!
//! Keys are derived from paths by hashing. They are stable across runs but
//! are not real BIP32-Ed25519 keys, signatures are likewise placeholders.

use std::collections::BTreeMap;

use blake2::{
    digest::consts::{U28, U32},
    Blake2b, Blake2b512, Digest,
};
use log::{debug, trace};
use serde_cbor::Value;

use ledger_ada_apdu::{
    compat::Capabilities,
    tx::{
        AuxDataType, CertificateType, DatumType, DestinationType, OutputRole, PoolEntityType,
        PoolRole, RegistrationRole, RelayType, RequiredSignerTag, SignTxStage, StakeCredentialTag,
        OPTION_YES,
    },
    DeviceStatusCode, Version,
};

/// Status returned for payloads the simulator cannot parse
pub const INVALID_DATA: u16 = DeviceStatusCode::InvalidData as u16;

/// Status returned for requests out of order
pub const INVALID_STATE: u16 = DeviceStatusCode::InvalidState as u16;

type Blake2b224 = Blake2b<U28>;
type Blake2b256 = Blake2b<U32>;

fn digest<D: Digest, const N: usize>(parts: &[&[u8]]) -> [u8; N] {
    let mut d = D::new();
    for p in parts {
        d.update(p);
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&d.finalize());
    out
}

pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    digest::<Blake2b256, 32>(&[data])
}

fn path_bytes(path: &[u32]) -> Vec<u8> {
    path.iter().flat_map(|i| i.to_be_bytes()).collect()
}

/// Simulated public key for a path
pub fn public_key(path: &[u32]) -> [u8; 32] {
    digest::<Blake2b256, 32>(&[b"public", &path_bytes(path)])
}

/// Simulated chain code for a path
pub fn chain_code(path: &[u32]) -> [u8; 32] {
    digest::<Blake2b256, 32>(&[b"chain", &path_bytes(path)])
}

/// Key hash of the simulated public key for a path
pub fn key_hash(path: &[u32]) -> [u8; 28] {
    digest::<Blake2b224, 28>(&[&public_key(path)])
}

/// Simulated signature over a message with the key for a path
pub fn sign(path: &[u32], msg: &[u8]) -> [u8; 64] {
    digest::<Blake2b512, 64>(&[&public_key(path), msg])
}

/// Simulated address for device-owned address parameters
pub fn address(params: &[u8]) -> Vec<u8> {
    let mut a = vec![0x01];
    a.extend_from_slice(&digest::<Blake2b224, 28>(&[params]));
    a
}

fn int(v: impl Into<i128>) -> Value {
    Value::Integer(v.into())
}

fn bytes(b: &[u8]) -> Value {
    Value::Bytes(b.to_vec())
}

/// Cursor over a request payload
pub struct Reader<'a>(&'a [u8]);

impl<'a> Reader<'a> {
    pub fn new(b: &'a [u8]) -> Self {
        Self(b)
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], u16> {
        if self.0.len() < n {
            return Err(INVALID_DATA);
        }
        let (a, b) = self.0.split_at(n);
        self.0 = b;
        Ok(a)
    }

    pub fn u8(&mut self) -> Result<u8, u16> {
        Ok(self.take(1)?[0])
    }

    pub fn flag(&mut self) -> Result<bool, u16> {
        Ok(self.u8()? == OPTION_YES)
    }

    pub fn u16(&mut self) -> Result<u16, u16> {
        let mut b = [0u8; 2];
        b.copy_from_slice(self.take(2)?);
        Ok(u16::from_be_bytes(b))
    }

    pub fn u32(&mut self) -> Result<u32, u16> {
        let mut b = [0u8; 4];
        b.copy_from_slice(self.take(4)?);
        Ok(u32::from_be_bytes(b))
    }

    pub fn u64(&mut self) -> Result<u64, u16> {
        let mut b = [0u8; 8];
        b.copy_from_slice(self.take(8)?);
        Ok(u64::from_be_bytes(b))
    }

    pub fn i64(&mut self) -> Result<i64, u16> {
        Ok(self.u64()? as i64)
    }

    pub fn path(&mut self) -> Result<Vec<u32>, u16> {
        let n = self.u8()?;
        (0..n).map(|_| self.u32()).collect()
    }

    pub fn rest(&mut self) -> &'a [u8] {
        let r = self.0;
        self.0 = &[];
        r
    }
}

/// Output under construction
#[derive(Default)]
struct OutputSim {
    map_format: bool,
    address: Vec<u8>,
    amount: u64,
    assets: Assets,
    datum_hash: Option<Vec<u8>>,
    inline_datum: Option<Vec<u8>>,
    script: Option<Vec<u8>>,
}

impl OutputSim {
    fn value(&self) -> Value {
        match self.assets.groups.is_empty() {
            true => int(self.amount),
            false => Value::Array(vec![int(self.amount), self.assets.value()]),
        }
    }

    fn finish(self) -> Value {
        if !self.map_format {
            let mut a = vec![bytes(&self.address), self.value()];
            if let Some(h) = &self.datum_hash {
                a.push(bytes(h));
            }
            return Value::Array(a);
        }

        let mut m = BTreeMap::new();
        m.insert(int(0), bytes(&self.address));
        m.insert(int(1), self.value());

        match (&self.datum_hash, &self.inline_datum) {
            (Some(h), _) => {
                m.insert(int(2), Value::Array(vec![int(0), bytes(h)]));
            }
            (None, Some(d)) => {
                m.insert(
                    int(2),
                    Value::Array(vec![int(1), Value::Tag(24, Box::new(bytes(d)))]),
                );
            }
            _ => (),
        }
        if let Some(s) = &self.script {
            m.insert(int(3), Value::Tag(24, Box::new(bytes(s))));
        }

        Value::Map(m)
    }
}

/// Multi-asset value, policy id to asset name to amount
#[derive(Default)]
struct Assets {
    groups: BTreeMap<Vec<u8>, BTreeMap<Vec<u8>, i128>>,
    policy: Option<Vec<u8>>,
}

impl Assets {
    fn group(&mut self, r: &mut Reader) -> Result<(), u16> {
        let policy = r.take(28)?.to_vec();
        let _count = r.u32()?;
        self.groups.insert(policy.clone(), BTreeMap::new());
        self.policy = Some(policy);
        Ok(())
    }

    fn token(&mut self, name: Vec<u8>, amount: i128) -> Result<(), u16> {
        let policy = self.policy.as_ref().ok_or(INVALID_STATE)?;
        let group = self.groups.get_mut(policy).ok_or(INVALID_STATE)?;
        group.insert(name, amount);
        Ok(())
    }

    fn value(&self) -> Value {
        let groups = self
            .groups
            .iter()
            .map(|(p, tokens)| {
                let tokens = tokens.iter().map(|(n, a)| (bytes(n), int(*a))).collect();
                (bytes(p), Value::Map(tokens))
            })
            .collect();
        Value::Map(groups)
    }
}

/// Pool registration certificate under construction
#[derive(Default)]
struct PoolSim {
    fields: BTreeMap<u8, Value>,
    owners: Vec<Value>,
    relays: Vec<Value>,
}

/// Transaction body simulator
pub struct TxSim {
    version: Version,
    caps: Capabilities,
    network_id: u8,
    include_network_id: bool,

    inputs: Vec<Value>,
    outputs: Vec<Value>,
    certificates: Vec<Value>,
    withdrawals: BTreeMap<Value, Value>,
    collateral_inputs: Vec<Value>,
    required_signers: Vec<Value>,
    reference_inputs: Vec<Value>,
    scalars: BTreeMap<Value, Value>,

    output: Option<OutputSim>,
    mint: Option<Assets>,
    pool: Option<PoolSim>,
    registration: Option<(Vec<u8>, Vec<u32>)>,

    hash: Option<[u8; 32]>,
}

impl TxSim {
    pub fn new(version: &Version) -> Self {
        Self {
            version: *version,
            caps: Capabilities::of(version),
            network_id: 0,
            include_network_id: false,
            inputs: vec![],
            outputs: vec![],
            certificates: vec![],
            withdrawals: BTreeMap::new(),
            collateral_inputs: vec![],
            required_signers: vec![],
            reference_inputs: vec![],
            scalars: BTreeMap::new(),
            output: None,
            mint: None,
            pool: None,
            registration: None,
            hash: None,
        }
    }

    /// Transaction hash, available once confirmed
    pub fn hash(&self) -> Option<[u8; 32]> {
        self.hash
    }

    /// Handle a sign-tx request, returning the response payload
    pub fn update(&mut self, p1: u8, p2: u8, data: &[u8]) -> Result<Vec<u8>, u16> {
        let stage = SignTxStage::try_from(p1).map_err(|_| INVALID_DATA)?;
        let mut r = Reader::new(data);

        trace!("sim stage: {} role: 0x{:02x}", stage, p2);

        if stage != SignTxStage::Init && stage != SignTxStage::Witnesses && self.hash.is_some() {
            return Err(INVALID_STATE);
        }

        match stage {
            SignTxStage::Init => self.init(&mut r)?,
            SignTxStage::Inputs => self.inputs.push(input(&mut r)?),
            SignTxStage::CollateralInputs => self.collateral_inputs.push(input(&mut r)?),
            SignTxStage::ReferenceInputs => self.reference_inputs.push(input(&mut r)?),
            SignTxStage::Outputs | SignTxStage::CollateralOutput => {
                if let Some(o) = self.output(p2, &mut r)? {
                    match stage {
                        SignTxStage::Outputs => self.outputs.push(o),
                        _ => {
                            self.scalars.insert(int(16), o);
                        }
                    }
                }
            }
            SignTxStage::Fee => self.scalar(2, int(r.u64()?)),
            SignTxStage::Ttl => self.scalar(3, int(r.u64()?)),
            SignTxStage::ValidityIntervalStart => self.scalar(8, int(r.u64()?)),
            SignTxStage::TotalCollateral => self.scalar(17, int(r.u64()?)),
            SignTxStage::ScriptDataHash => self.scalar(11, bytes(r.take(32)?)),
            SignTxStage::Certificates => self.certificate(p2, &mut r)?,
            SignTxStage::Withdrawals => {
                let amount = r.u64()?;
                let (script, hash) = self.credential(&mut r)?;
                let header = (if script { 0xf0 } else { 0xe0 }) | self.network_id;
                let account = [&[header][..], &hash].concat();
                self.withdrawals.insert(bytes(&account), int(amount));
            }
            SignTxStage::AuxData => return self.aux_data(p2, &mut r),
            SignTxStage::Mint => self.mint(p2, &mut r)?,
            SignTxStage::RequiredSigners => {
                let hash = match RequiredSignerTag::try_from(r.u8()?) {
                    Ok(RequiredSignerTag::Path) => key_hash(&r.path()?).to_vec(),
                    Ok(RequiredSignerTag::Hash) => r.take(28)?.to_vec(),
                    Err(_) => return Err(INVALID_DATA),
                };
                self.required_signers.push(bytes(&hash));
            }
            SignTxStage::Confirm => return self.confirm().map(|h| h.to_vec()),
            SignTxStage::Witnesses => {
                let hash = self.hash.ok_or(INVALID_STATE)?;
                return Ok(sign(&r.path()?, &hash).to_vec());
            }
        }

        Ok(vec![])
    }

    fn scalar(&mut self, key: u8, v: Value) {
        self.scalars.insert(int(key), v);
    }

    fn init(&mut self, r: &mut Reader) -> Result<(), u16> {
        *self = Self::new(&self.version);

        self.network_id = r.u8()?;
        let _magic = r.u32()?;
        // ttl, aux data, validity interval start
        r.take(3)?;
        if self.caps.supports_mint {
            r.take(1)?;
        }
        if self.caps.supports_alonzo {
            let _script_data_hash = r.flag()?;
            self.include_network_id = r.flag()?;
        }

        debug!("sim init, network {}", self.network_id);

        Ok(())
    }

    fn output(&mut self, role: u8, r: &mut Reader) -> Result<Option<Value>, u16> {
        let role = OutputRole::try_from(role).map_err(|_| INVALID_DATA)?;

        if role == OutputRole::BasicData {
            let mut o = OutputSim::default();
            if self.caps.supports_babbage {
                o.map_format = r.u8()? == 1;
            }

            // Trailer: amount, asset group count, datum / script flags
            let flags = match (self.caps.supports_babbage, self.caps.supports_alonzo) {
                (true, _) => 2,
                (false, true) => 1,
                _ => 0,
            };
            let rest = r.rest();
            if rest.len() < 1 + 12 + flags {
                return Err(INVALID_DATA);
            }
            let (dest, trailer) = rest.split_at(rest.len() - 12 - flags);
            let mut trailer = Reader::new(trailer);

            o.address = match DestinationType::try_from(dest[0]) {
                Ok(DestinationType::ThirdParty) => {
                    let mut d = Reader::new(&dest[1..]);
                    let n = d.u32()? as usize;
                    d.take(n)?.to_vec()
                }
                Ok(DestinationType::DeviceOwned) => address(&dest[1..]),
                Err(_) => return Err(INVALID_DATA),
            };
            o.amount = trailer.u64()?;

            self.output = Some(o);
            return Ok(None);
        }

        let o = self.output.as_mut().ok_or(INVALID_STATE)?;

        match role {
            OutputRole::AssetGroup => o.assets.group(r)?,
            OutputRole::Token => {
                let n = r.u32()? as usize;
                let name = r.take(n)?.to_vec();
                o.assets.token(name, r.u64()? as i128)?;
            }
            OutputRole::Datum if !self.caps.supports_babbage => {
                o.datum_hash = Some(r.take(32)?.to_vec());
            }
            OutputRole::Datum => match DatumType::try_from(r.u8()?) {
                Ok(DatumType::Hash) => o.datum_hash = Some(r.take(32)?.to_vec()),
                Ok(DatumType::Inline) => o.inline_datum = Some(first_chunk(r)?),
                Err(_) => return Err(INVALID_DATA),
            },
            OutputRole::DatumChunk => {
                let d = o.inline_datum.as_mut().ok_or(INVALID_STATE)?;
                d.extend_from_slice(next_chunk(r)?);
            }
            OutputRole::Script => o.script = Some(first_chunk(r)?),
            OutputRole::ScriptChunk => {
                let s = o.script.as_mut().ok_or(INVALID_STATE)?;
                s.extend_from_slice(next_chunk(r)?);
            }
            OutputRole::Confirm => {
                let o = self.output.take().ok_or(INVALID_STATE)?;
                return Ok(Some(o.finish()));
            }
            OutputRole::BasicData => return Err(INVALID_STATE),
        }

        Ok(None)
    }

    /// Stake credential as `(is_script, hash)`
    fn credential(&self, r: &mut Reader) -> Result<(bool, Vec<u8>), u16> {
        if !self.caps.supports_multisig_transaction {
            return Ok((false, key_hash(&r.path()?).to_vec()));
        }

        match StakeCredentialTag::try_from(r.u8()?) {
            Ok(StakeCredentialTag::KeyPath) => Ok((false, key_hash(&r.path()?).to_vec())),
            Ok(StakeCredentialTag::KeyHash) => Ok((false, r.take(28)?.to_vec())),
            Ok(StakeCredentialTag::ScriptHash) => Ok((true, r.take(28)?.to_vec())),
            Err(_) => Err(INVALID_DATA),
        }
    }

    fn credential_value(&self, r: &mut Reader) -> Result<Value, u16> {
        let (script, hash) = self.credential(r)?;
        Ok(Value::Array(vec![int(script as u8), bytes(&hash)]))
    }

    fn certificate(&mut self, role: u8, r: &mut Reader) -> Result<(), u16> {
        if role != 0 {
            return self.pool(role, r);
        }

        let cert = match CertificateType::try_from(r.u8()?) {
            Ok(CertificateType::StakeRegistration) => {
                Value::Array(vec![int(0), self.credential_value(r)?])
            }
            Ok(CertificateType::StakeDeregistration) => {
                Value::Array(vec![int(1), self.credential_value(r)?])
            }
            Ok(CertificateType::StakeDelegation) => {
                let c = self.credential_value(r)?;
                Value::Array(vec![int(2), c, bytes(r.take(28)?)])
            }
            Ok(CertificateType::StakePoolRegistration) => {
                self.pool = Some(PoolSim::default());
                return Ok(());
            }
            Ok(CertificateType::StakePoolRetirement) => {
                let path = r.path()?;
                Value::Array(vec![int(4), bytes(&key_hash(&path)), int(r.u64()?)])
            }
            Err(_) => return Err(INVALID_DATA),
        };

        self.certificates.push(cert);
        Ok(())
    }

    fn pool_entity(&self, r: &mut Reader, len: usize) -> Result<Vec<u8>, u16> {
        match PoolEntityType::try_from(r.u8()?) {
            Ok(PoolEntityType::DeviceOwned) if len == 29 => {
                let h = key_hash(&r.path()?);
                Ok([&[0xe0 | self.network_id][..], &h].concat())
            }
            Ok(PoolEntityType::DeviceOwned) => Ok(key_hash(&r.path()?).to_vec()),
            Ok(PoolEntityType::ThirdParty) => Ok(r.take(len)?.to_vec()),
            Err(_) => Err(INVALID_DATA),
        }
    }

    fn pool(&mut self, role: u8, r: &mut Reader) -> Result<(), u16> {
        let role = PoolRole::try_from(role).map_err(|_| INVALID_DATA)?;
        let operator_layout = self.caps.supports_pool_registration_as_operator;

        let value = match role {
            PoolRole::Init => {
                let _owners = r.u32()?;
                let _relays = r.u32()?;
                return Ok(());
            }
            PoolRole::PoolKey if operator_layout => bytes(&self.pool_entity(r, 28)?),
            PoolRole::PoolKey => bytes(r.take(28)?),
            PoolRole::VrfKey => bytes(r.take(32)?),
            PoolRole::Financials => {
                let (pledge, cost) = (r.u64()?, r.u64()?);
                let (n, d) = (r.u64()?, r.u64()?);
                let margin = Value::Tag(30, Box::new(Value::Array(vec![int(n), int(d)])));
                Value::Array(vec![int(pledge), int(cost), margin])
            }
            PoolRole::RewardAccount if operator_layout => bytes(&self.pool_entity(r, 29)?),
            PoolRole::RewardAccount => bytes(r.take(29)?),
            PoolRole::Owners => {
                let o = bytes(&self.pool_entity(r, 28)?);
                self.pool.as_mut().ok_or(INVALID_STATE)?.owners.push(o);
                return Ok(());
            }
            PoolRole::Relays => {
                let relay = relay(r)?;
                self.pool.as_mut().ok_or(INVALID_STATE)?.relays.push(relay);
                return Ok(());
            }
            PoolRole::Metadata => match r.flag()? {
                true => {
                    let hash = bytes(r.take(32)?);
                    let url = String::from_utf8_lossy(r.rest()).to_string();
                    Value::Array(vec![Value::Text(url), hash])
                }
                false => Value::Null,
            },
            PoolRole::Confirmation => {
                let p = self.pool.take().ok_or(INVALID_STATE)?;
                let field = |k: u8| p.fields.get(&k).cloned().unwrap_or(Value::Null);

                let mut cert = vec![
                    int(3),
                    field(PoolRole::PoolKey as u8),
                    field(PoolRole::VrfKey as u8),
                ];
                if let Value::Array(f) = field(PoolRole::Financials as u8) {
                    cert.extend(f);
                }
                cert.extend([
                    field(PoolRole::RewardAccount as u8),
                    Value::Array(p.owners.clone()),
                    Value::Array(p.relays.clone()),
                    field(PoolRole::Metadata as u8),
                ]);

                self.certificates.push(Value::Array(cert));
                return Ok(());
            }
        };

        let p = self.pool.as_mut().ok_or(INVALID_STATE)?;
        p.fields.insert(role as u8, value);
        Ok(())
    }

    fn aux_data(&mut self, role: u8, r: &mut Reader) -> Result<Vec<u8>, u16> {
        if !self.caps.supports_catalyst_registration {
            self.scalar(7, bytes(r.take(32)?));
            return Ok(vec![]);
        }

        if role == 0 {
            match AuxDataType::try_from(r.u8()?) {
                Ok(AuxDataType::ArbitraryHash) => self.scalar(7, bytes(r.take(32)?)),
                Ok(AuxDataType::VoteRegistration) => self.registration = Some((vec![], vec![])),
                Err(_) => return Err(INVALID_DATA),
            }
            return Ok(vec![]);
        }

        let role = RegistrationRole::try_from(role).map_err(|_| INVALID_DATA)?;
        let (payload, staking_path) = self.registration.as_mut().ok_or(INVALID_STATE)?;

        let data = r.rest();
        if role == RegistrationRole::StakingKey {
            *staking_path = Reader::new(data).path()?;
        }

        if role != RegistrationRole::Confirm {
            payload.push(role as u8);
            payload.extend_from_slice(data);
            return Ok(vec![]);
        }

        let (payload, staking_path) = self.registration.take().ok_or(INVALID_STATE)?;
        let hash = blake2b_256(&payload);
        self.scalar(7, bytes(&hash));

        Ok([&hash[..], &sign(&staking_path, &hash)].concat())
    }

    fn mint(&mut self, role: u8, r: &mut Reader) -> Result<(), u16> {
        match OutputRole::try_from(role).map_err(|_| INVALID_DATA)? {
            OutputRole::BasicData => {
                let _groups = r.u32()?;
                self.mint = Some(Assets::default());
            }
            OutputRole::AssetGroup => self.mint.as_mut().ok_or(INVALID_STATE)?.group(r)?,
            OutputRole::Token => {
                let n = r.u32()? as usize;
                let name = r.take(n)?.to_vec();
                let amount = r.i64()? as i128;
                self.mint
                    .as_mut()
                    .ok_or(INVALID_STATE)?
                    .token(name, amount)?;
            }
            OutputRole::Confirm => {
                let m = self.mint.take().ok_or(INVALID_STATE)?;
                self.scalar(9, m.value());
            }
            _ => return Err(INVALID_DATA),
        }
        Ok(())
    }

    fn confirm(&mut self) -> Result<[u8; 32], u16> {
        let mut body = self.scalars.clone();

        body.insert(int(0), Value::Array(self.inputs.clone()));
        body.insert(int(1), Value::Array(self.outputs.clone()));

        let lists = [
            (4, &self.certificates),
            (13, &self.collateral_inputs),
            (14, &self.required_signers),
            (18, &self.reference_inputs),
        ];
        for (k, l) in lists {
            if !l.is_empty() {
                body.insert(int(k), Value::Array(l.clone()));
            }
        }
        if !self.withdrawals.is_empty() {
            body.insert(int(5), Value::Map(self.withdrawals.clone()));
        }
        if self.include_network_id {
            body.insert(int(15), int(self.network_id));
        }

        let encoded = serde_cbor::to_vec(&Value::Map(body)).map_err(|_| INVALID_DATA)?;
        trace!("sim body: {}", hex::encode(&encoded));

        let hash = blake2b_256(&encoded);
        debug!("sim tx hash: {}", hex::encode(hash));

        self.hash = Some(hash);
        Ok(hash)
    }
}

fn input(r: &mut Reader) -> Result<Value, u16> {
    let hash = r.take(32)?;
    Ok(Value::Array(vec![bytes(hash), int(r.u32()?)]))
}

fn first_chunk(r: &mut Reader) -> Result<Vec<u8>, u16> {
    let _total = r.u32()?;
    let n = r.u32()? as usize;
    Ok(r.take(n)?.to_vec())
}

fn next_chunk<'a>(r: &mut Reader<'a>) -> Result<&'a [u8], u16> {
    let n = r.u32()? as usize;
    r.take(n)
}

fn relay(r: &mut Reader) -> Result<Value, u16> {
    let port = |r: &mut Reader| -> Result<Value, u16> {
        match r.flag()? {
            true => Ok(int(r.u16()?)),
            false => Ok(Value::Null),
        }
    };

    let relay = match RelayType::try_from(r.u8()?) {
        Ok(RelayType::SingleHostIpAddr) => {
            let p = port(r)?;
            let ipv4 = match r.flag()? {
                true => bytes(r.take(4)?),
                false => Value::Null,
            };
            let ipv6 = match r.flag()? {
                true => bytes(r.take(16)?),
                false => Value::Null,
            };
            vec![int(0), p, ipv4, ipv6]
        }
        Ok(RelayType::SingleHostHostname) => {
            let p = port(r)?;
            let dns = String::from_utf8_lossy(r.rest()).to_string();
            vec![int(1), p, Value::Text(dns)]
        }
        Ok(RelayType::MultiHost) => {
            let dns = String::from_utf8_lossy(r.rest()).to_string();
            vec![int(2), Value::Text(dns)]
        }
        Err(_) => return Err(INVALID_DATA),
    };

    Ok(Value::Array(relay))
}

#[cfg(test)]
mod test {
    use ledger_ada_apdu::AppFlags;

    use super::*;

    #[test]
    fn fixture_body_hash() {
        let mut sim = TxSim::new(&Version::new(2, 2, 0, AppFlags::empty()));

        // Mainnet, ttl set, no aux data / validity start, ordinary, 1 in 1 out
        let init = hex::decode("01".to_owned() + "2d964a09" + "020101" + "03" + "00000001000000010000000000000000" + "00000001").unwrap();
        sim.update(0x01, 0x00, &init).unwrap();

        let input = hex::decode(
            "1af8fa0b754ff99253d983894e63a2b09cbb56c833ba18c3384210163f63dcfc00000000",
        )
        .unwrap();
        sim.update(0x02, 0x00, &input).unwrap();

        let addr = hex::decode("82d818582183581c9e1c71de652ec8b85fec296f0685ca3988781c94a2e1a5d89d92f45fa0001a0d0c2561").unwrap();
        let mut output = vec![0x01];
        output.extend_from_slice(&(addr.len() as u32).to_be_bytes());
        output.extend_from_slice(&addr);
        output.extend_from_slice(&3003112u64.to_be_bytes());
        output.extend_from_slice(&0u32.to_be_bytes());
        sim.update(0x03, 0x30, &output).unwrap();
        sim.update(0x03, 0x33, &[]).unwrap();

        sim.update(0x04, 0x00, &42u64.to_be_bytes()).unwrap();
        sim.update(0x05, 0x00, &10u64.to_be_bytes()).unwrap();

        let hash = sim.update(0x0a, 0x00, &[]).unwrap();
        assert_eq!(
            hex::encode(hash),
            "73e09bdebf98a9e0f17f86a2d11e0f14f4f8dae77cdf26ff1678e821f20c8db6"
        );
    }

    #[test]
    fn rejects_after_confirm() {
        let mut sim = TxSim::new(&Version::new(2, 2, 0, AppFlags::empty()));
        sim.update(0x0a, 0x00, &[]).unwrap();

        assert_eq!(
            sim.update(0x04, 0x00, &42u64.to_be_bytes()),
            Err(INVALID_STATE)
        );
        assert!(sim.update(0x0f, 0x00, &[1, 0, 0, 0, 0]).is_ok());
    }
}
