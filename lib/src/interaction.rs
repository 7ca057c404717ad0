// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Interaction engine
//!
//! An [Interaction] is a resumable, single-use computation. Each call to
//! [Interaction::resume] is fed the response to the previously yielded
//! request (or `None` to start) and yields either the next [Request] or the
//! final output. [run_interaction] drives one to completion over an APDU
//! channel, one round trip per step.
//!
//! ```text
//!  resume(None) ──> Send(req0) ──> channel (busy retry) ──> resp0
//!  resume(resp0) ─> Send(req1) ──> channel ──────────────> resp1
//!  ...
//!  resume(respN) ─> Done(output)
//! ```

use std::{collections::VecDeque, fmt::Display, time::Duration};

use ledger_transport::Exchange;
use log::debug;

use ledger_ada_apdu::Request;

use crate::{channel::Channel, error::ProtocolError, Error};

/// Interaction step
#[derive(Debug)]
pub enum Step<R> {
    /// Send this request and resume with its response
    Send(Request),
    /// Interaction complete
    Done(R),
}

/// Resumable request / response computation
pub trait Interaction {
    type Output;

    /// Resume with the response to the last request, `None` to start
    fn resume(&mut self, response: Option<&[u8]>) -> Result<Step<Self::Output>, Error>;
}

/// Drive an interaction to completion over the provided transport
///
/// Only the first request of the interaction may be replayed on a busy
/// status, a timeout on any request is fatal.
pub async fn run_interaction<T, I>(t: &T, mut i: I, timeout: Duration) -> Result<I::Output, Error>
where
    T: Exchange + Send + Sync,
    T::Error: Display,
    I: Interaction,
{
    let channel = Channel::new(t, timeout);

    let mut step = i.resume(None)?;
    let mut first = true;
    let mut n = 0;

    loop {
        match step {
            Step::Done(r) => {
                debug!("Interaction complete after {} requests", n);
                return Ok(r);
            }
            Step::Send(req) => {
                let resp = channel.send(&req, first).await?;

                first = false;
                n += 1;

                step = i.resume(Some(&resp))?;
            }
        }
    }
}

/// Response handler, applied to an accumulator
pub type Handler<A> = Box<dyn FnOnce(&mut A, &[u8]) -> Result<(), Error> + Send>;

/// A request paired with the handler for its response
pub struct Call<A> {
    pub req: Request,
    handler: Handler<A>,
}

impl<A> Call<A> {
    pub fn new(
        req: Request,
        handler: impl FnOnce(&mut A, &[u8]) -> Result<(), Error> + Send + 'static,
    ) -> Self {
        Self {
            req,
            handler: Box::new(handler),
        }
    }

    /// Request with no response content of interest
    pub fn ack(req: Request) -> Self {
        Self::new(req, |_, _| Ok(()))
    }
}

/// Queue of calls with at most one awaiting a response
pub struct Calls<A> {
    queue: VecDeque<Call<A>>,
    pending: Option<Handler<A>>,
}

impl<A> Default for Calls<A> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            pending: None,
        }
    }
}

impl<A> Calls<A> {
    pub fn new(calls: impl IntoIterator<Item = Call<A>>) -> Self {
        Self {
            queue: calls.into_iter().collect(),
            pending: None,
        }
    }

    pub fn extend(&mut self, calls: impl IntoIterator<Item = Call<A>>) {
        self.queue.extend(calls)
    }

    /// Apply a response to the awaiting handler
    ///
    /// A response without an awaiting handler (or the reverse) means the
    /// interaction is out of step with the driver.
    pub fn complete(&mut self, acc: &mut A, response: Option<&[u8]>) -> Result<(), Error> {
        match (self.pending.take(), response) {
            (Some(h), Some(r)) => h(acc, r),
            (None, None) => Ok(()),
            _ => Err(Error::Protocol(ProtocolError::UnexpectedResume)),
        }
    }

    /// Pop the next request, its handler then awaits the response
    pub fn next_request(&mut self) -> Option<Request> {
        let c = self.queue.pop_front()?;
        self.pending = Some(c.handler);
        Some(c.req)
    }
}

/// Fixed sequence of calls folding responses into an accumulator
pub struct Sequence<A, R> {
    acc: Option<A>,
    calls: Calls<A>,
    finish: fn(A) -> Result<R, Error>,
}

impl<A, R> Sequence<A, R> {
    pub fn new(
        acc: A,
        calls: impl IntoIterator<Item = Call<A>>,
        finish: fn(A) -> Result<R, Error>,
    ) -> Self {
        Self {
            acc: Some(acc),
            calls: Calls::new(calls),
            finish,
        }
    }
}

impl<A, R> Interaction for Sequence<A, R> {
    type Output = R;

    fn resume(&mut self, response: Option<&[u8]>) -> Result<Step<R>, Error> {
        let acc = self
            .acc
            .as_mut()
            .ok_or(Error::Protocol(ProtocolError::ResumedAfterCompletion))?;

        self.calls.complete(acc, response)?;

        if let Some(req) = self.calls.next_request() {
            return Ok(Step::Send(req));
        }

        match self.acc.take() {
            Some(acc) => Ok(Step::Done((self.finish)(acc)?)),
            None => Err(Error::Protocol(ProtocolError::ResumedAfterCompletion)),
        }
    }
}
