// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Mock Cardano application for transport-level tests
//!
//! Implements [Exchange] over a simulated application, recording every
//! command and allowing status words or delays to be injected at a given
//! command index.

use std::{
    collections::HashMap,
    ops::Deref,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use ledger_apdu::{APDUAnswer, APDUCommand};
use ledger_transport::Exchange;
use log::{debug, trace};

use ledger_ada_apdu::prelude::*;

use crate::sim::{self, Reader, TxSim, INVALID_DATA, INVALID_STATE};

/// Recorded command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: Vec<u8>,
}

/// Simulated application state
pub struct Engine {
    version: Version,
    serial: [u8; 7],
    tx: TxSim,
    vote: Vec<u8>,
    vote_hash: Option<[u8; 32]>,
    message: Option<(Vec<u32>, Vec<u8>, Vec<u8>)>,

    commands: Vec<Command>,
    faults: HashMap<usize, u16>,
    delays: HashMap<usize, Duration>,
}

impl Engine {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            serial: [0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10],
            tx: TxSim::new(&version),
            vote: vec![],
            vote_hash: None,
            message: None,
            commands: vec![],
            faults: HashMap::new(),
            delays: HashMap::new(),
        }
    }

    /// Handle a command, returning the response payload and status word
    pub fn update(&mut self, cmd: &Command) -> (Vec<u8>, u16) {
        let n = self.commands.len();
        self.commands.push(cmd.clone());

        if let Some(code) = self.faults.remove(&n) {
            debug!("injecting status 0x{:04x} at command {}", code, n);
            return (vec![], code);
        }

        match self.handle(cmd) {
            Ok(r) => (r, SW_OK),
            Err(code) => (vec![], code),
        }
    }

    fn handle(&mut self, cmd: &Command) -> Result<Vec<u8>, u16> {
        let ins = Instruction::try_from(cmd.ins)
            .map_err(|_| DeviceStatusCode::UnknownIns as u16)?;
        let mut r = Reader::new(&cmd.data);

        match ins {
            Instruction::GetVersion => {
                let v = &self.version;
                Ok(vec![v.major, v.minor, v.patch, v.flags.bits()])
            }
            Instruction::GetSerial => Ok(self.serial.to_vec()),
            Instruction::GetExtPublicKey => {
                let path = r.path()?;
                Ok([sim::public_key(&path), sim::chain_code(&path)].concat())
            }
            Instruction::DeriveAddress => match DeriveAddressP1::try_from(cmd.p1) {
                Ok(DeriveAddressP1::Return) => Ok(sim::address(&cmd.data)),
                Ok(DeriveAddressP1::Display) => Ok(vec![]),
                Err(_) => Err(INVALID_DATA),
            },
            Instruction::SignTx => self.tx.update(cmd.p1, cmd.p2, &cmd.data),
            Instruction::SignOperationalCertificate => {
                let body = r.take(48)?;
                let path = r.path()?;
                Ok(sim::sign(&path, body).to_vec())
            }
            Instruction::SignCip36Vote => self.vote(cmd.p1, &mut r),
            Instruction::SignMessage => self.message(cmd.p1, &mut r),
            Instruction::RunTests if self.version.is_debug() => Ok(vec![]),
            Instruction::RunTests => Err(DeviceStatusCode::UnknownIns as u16),
        }
    }

    fn vote(&mut self, p1: u8, r: &mut Reader) -> Result<Vec<u8>, u16> {
        match SignVoteP1::try_from(p1).map_err(|_| INVALID_DATA)? {
            SignVoteP1::Init => {
                let _total = r.u32()?;
                self.vote = r.rest().to_vec();
                self.vote_hash = None;
                Ok(vec![])
            }
            SignVoteP1::Chunk => {
                self.vote.extend_from_slice(r.rest());
                Ok(vec![])
            }
            SignVoteP1::Confirm => {
                let h = sim::blake2b_256(&self.vote);
                self.vote_hash = Some(h);
                Ok(h.to_vec())
            }
            SignVoteP1::Witness => {
                let h = self.vote_hash.ok_or(INVALID_STATE)?;
                Ok(sim::sign(&r.path()?, &h).to_vec())
            }
        }
    }

    fn message(&mut self, p1: u8, r: &mut Reader) -> Result<Vec<u8>, u16> {
        match SignMessageP1::try_from(p1).map_err(|_| INVALID_DATA)? {
            SignMessageP1::Init => {
                let _len = r.u32()?;
                let path = r.path()?;
                let _hash = r.u8()?;
                let _ascii = r.u8()?;

                let field = match MessageAddressFieldType::try_from(r.u8()?) {
                    Ok(MessageAddressFieldType::KeyHash) => sim::key_hash(&path).to_vec(),
                    Ok(MessageAddressFieldType::Address) => sim::address(r.rest()),
                    Err(_) => return Err(INVALID_DATA),
                };
                self.message = Some((path, field, vec![]));
                Ok(vec![])
            }
            SignMessageP1::Chunk => {
                let (_, _, msg) = self.message.as_mut().ok_or(INVALID_STATE)?;
                let n = r.u32()? as usize;
                msg.extend_from_slice(r.take(n)?);
                Ok(vec![])
            }
            SignMessageP1::Confirm => {
                let (path, field, msg) = self.message.take().ok_or(INVALID_STATE)?;

                let mut resp = sim::sign(&path, &msg).to_vec();
                resp.extend_from_slice(&sim::public_key(&path));
                resp.extend_from_slice(&(field.len() as u32).to_be_bytes());
                resp.extend_from_slice(&field);
                Ok(resp)
            }
        }
    }
}

/// Mock device wrapping a simulated application
#[derive(Clone)]
pub struct MockDevice {
    pub engine: Arc<Mutex<Engine>>,
}

impl MockDevice {
    pub fn new(version: Version) -> Self {
        Self {
            engine: Arc::new(Mutex::new(Engine::new(version))),
        }
    }

    /// Version reported by the simulated app
    pub fn version(&self) -> Version {
        let e = self.engine.lock().unwrap();
        e.version
    }

    /// Respond with the provided status to the command at index `n`
    pub fn fail_at(&self, n: usize, code: u16) {
        let mut e = self.engine.lock().unwrap();
        e.faults.insert(n, code);
    }

    /// Delay the response to the command at index `n`
    pub fn delay_at(&self, n: usize, d: Duration) {
        let mut e = self.engine.lock().unwrap();
        e.delays.insert(n, d);
    }

    /// Commands received so far
    pub fn commands(&self) -> Vec<Command> {
        let e = self.engine.lock().unwrap();
        e.commands.clone()
    }

    /// Commands received for a given instruction
    pub fn commands_for(&self, ins: Instruction) -> Vec<Command> {
        self.commands()
            .into_iter()
            .filter(|c| c.ins == ins as u8)
            .collect()
    }

    /// Hash of the last confirmed transaction
    pub fn tx_hash(&self) -> Option<[u8; 32]> {
        let e = self.engine.lock().unwrap();
        e.tx.hash()
    }
}

#[async_trait]
impl Exchange for MockDevice {
    type Error = anyhow::Error;
    type AnswerType = Vec<u8>;

    async fn exchange<I>(
        &self,
        command: &APDUCommand<I>,
    ) -> Result<APDUAnswer<Self::AnswerType>, Self::Error>
    where
        I: Deref<Target = [u8]> + Send + Sync,
    {
        assert_eq!(command.cla, ADA_APDU_CLA, "unexpected CLA");
        assert!(
            command.data.len() <= 255,
            "command data exceeds APDU limit ({} bytes)",
            command.data.len()
        );

        let cmd = Command {
            ins: command.ins,
            p1: command.p1,
            p2: command.p2,
            data: command.data.to_vec(),
        };

        trace!("cmd: {:02x?}", cmd);

        // Engine lock is not held across the delay
        let (delay, (mut resp, code)) = {
            let mut e = self.engine.lock().unwrap();
            let n = e.commands.len();
            let delay = e.delays.remove(&n);
            (delay, e.update(&cmd))
        };

        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }

        trace!("resp: {} (0x{:04x})", hex::encode(&resp), code);

        resp.extend_from_slice(&code.to_be_bytes());

        APDUAnswer::from_answer(resp).map_err(|e| anyhow::anyhow!("invalid answer: {:?}", e))
    }
}

#[cfg(test)]
mod test {
    use ledger_ada_apdu::AppFlags;

    use super::*;

    #[test]
    fn injected_fault_is_single_use() {
        let mut e = Engine::new(Version::new(7, 0, 0, AppFlags::empty()));
        e.faults.insert(0, 0x6e04);

        let cmd = Command {
            ins: 0x00,
            p1: 0,
            p2: 0,
            data: vec![],
        };
        assert_eq!(e.update(&cmd), (vec![], 0x6e04));
        assert_eq!(e.update(&cmd), (vec![7, 0, 0, 0], SW_OK));
        assert_eq!(e.commands.len(), 2);
    }
}
