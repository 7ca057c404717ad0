// Copyright (c) 2022-2023 The MobileCoin Foundation

//! APDU channel, executes a single request / response exchange
//!
//! Responses are checked for a success status word and, where the request
//! declares one, an exact payload length. A request that is the first of an
//! interaction is replayed exactly once if the device reports it is still
//! in a previous call, as the device resets itself on that status. Later
//! requests are never replayed as the device may have already accumulated
//! their effects.

use std::{fmt::Display, time::Duration};

use ledger_apdu::APDUCommand;
use ledger_transport::Exchange;
use log::{trace, warn};

use ledger_ada_apdu::{DeviceStatusError, Request, ADA_APDU_CLA, SW_OK};

use crate::{error::ProtocolError, Error};

/// Channel over a borrowed transport, one request in flight at a time
pub(crate) struct Channel<'a, T> {
    t: &'a T,
    timeout: Duration,
}

impl<'a, T> Channel<'a, T>
where
    T: Exchange + Send + Sync,
    T::Error: Display,
{
    pub fn new(t: &'a T, timeout: Duration) -> Self {
        Self { t, timeout }
    }

    /// Send a request, replaying it once on a busy status when `first` is set
    pub async fn send(&self, req: &Request, first: bool) -> Result<Vec<u8>, Error> {
        match self.exchange(req).await {
            Err(Error::DeviceStatus(s)) if first && s.is_still_in_call() => {
                warn!("Device still in previous call, retrying {}", req.ins);
                self.exchange(req).await
            }
            r => r,
        }
    }

    /// Execute a single exchange with no retry
    async fn exchange(&self, req: &Request) -> Result<Vec<u8>, Error> {
        let cmd = APDUCommand {
            cla: ADA_APDU_CLA,
            ins: req.ins as u8,
            p1: req.p1,
            p2: req.p2,
            data: req.data.as_slice(),
        };

        trace!("TX: {:?}", req);

        let resp = tokio::time::timeout(self.timeout, self.t.exchange(&cmd))
            .await?
            .map_err(|e| Error::Transport(anyhow::anyhow!("{}", e)))?;

        let code = resp.retcode();
        let data = resp.data();

        trace!("RX: {} (0x{:04x})", hex::encode(data), code);

        if code != SW_OK {
            return Err(Error::DeviceStatus(DeviceStatusError::new(code)));
        }

        if let Some(expected) = req.expected_len {
            if data.len() != expected {
                return Err(Error::Protocol(ProtocolError::UnexpectedResponseLength {
                    expected,
                    actual: data.len(),
                }));
            }
        }

        Ok(data.to_vec())
    }
}
