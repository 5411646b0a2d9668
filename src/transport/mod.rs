//! Byte/frame-oriented transports a [`crate::driver::Driver`] talks through.
//!
//! Concrete hardware transports (USB, serial-line DALI interfaces) are the
//! caller's responsibility; this crate only defines the trait and ships a
//! logging adapter plus an in-memory bus for tests.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};

use crate::error::Result;
use crate::frame::{Backward, Forward, Frame};

pub mod mock;

/// A frame-oriented DALI transport.
///
/// `send` transmits one forward frame and, if `response_window` is
/// non-zero, waits up to that long for a backward frame. Implementors
/// report a framing error (bus collision) as `Ok(Some(frame))` with
/// `frame.is_error()` true, and a clean timeout as `Ok(None)`.
#[async_trait]
pub trait Transport: Send {
    async fn send(
        &mut self,
        frame: Frame<Forward>,
        response_window: Duration,
    ) -> Result<Option<Frame<Backward>>>;

    /// `true` once the underlying connection is usable. The Driver awaits
    /// this before every `send`.
    fn is_connected(&self) -> bool {
        true
    }
}

/// Wraps another transport, logging every frame sent and received through
/// the `log` facade at debug/trace level.
pub struct TraceTransport<T> {
    inner: T,
}

impl<T> TraceTransport<T> {
    pub fn new(inner: T) -> Self {
        TraceTransport { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for TraceTransport<T> {
    async fn send(
        &mut self,
        frame: Frame<Forward>,
        response_window: Duration,
    ) -> Result<Option<Frame<Backward>>> {
        debug!("-> {:08x} ({} bit)", frame.as_integer(), frame.width());
        let response = self.inner.send(frame, response_window).await?;
        match &response {
            Some(f) if f.is_error() => trace!("<- framing error"),
            Some(f) => trace!("<- {:02x}", f.as_integer()),
            None => trace!("<- (no response)"),
        }
        Ok(response)
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }
}
