//! The top-level entry point: serializes commands onto a [`Transport`],
//! handles `EnableDeviceType` bookkeeping and send-twice config commands,
//! and runs [`Sequence`]s under a single transaction lock.

use std::time::Duration;

use log::{debug, warn};
use tokio::sync::Mutex;

use crate::codec::Command;
use crate::command::GearCommand;
use crate::error::{DaliError, Result};
use crate::frame::BackwardFrame;
use crate::response::{parse_response, Response};
use crate::sequence::{ProgressReport, Sequence, SequenceStep};
use crate::transport::Transport;

/// Timing knobs the Driver needs and no other component does.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// How long to wait for a query's backward frame.
    pub response_window: Duration,
    /// Grace period [`crate::bus_watch::BusWatch`] allows a send-twice config
    /// command's repeat to arrive in, for traffic this driver did not send.
    pub repeat_window: Duration,
    /// Settle time after `Randomise` before the first `Compare`.
    pub randomise_settle: Duration,
    /// How long `BusWatch::on_timeout` may be deferred before idle bus
    /// traffic is assumed to have no more frames in flight.
    pub bus_watch_idle_timeout: Duration,
    /// How long to wait for the transport to report itself connected.
    pub connect_timeout: Duration,
    /// If true, a transport error is raised to the caller; if false, `send`
    /// treats it as a missing response and keeps going.
    pub exceptions_on_send: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            response_window: Duration::from_millis(25),
            repeat_window: Duration::from_millis(100),
            randomise_settle: Duration::from_millis(100),
            bus_watch_idle_timeout: Duration::from_millis(200),
            connect_timeout: Duration::from_secs(1),
            exceptions_on_send: true,
        }
    }
}

/// Drives a single DALI bus over one [`Transport`]. Holding
/// `transport`'s lock for the whole of a `send` or [`Driver::run_sequence`]
/// call is what makes it the transaction lock: nothing else can interleave
/// a frame onto the bus while either is in progress.
pub struct Driver<T> {
    transport: Mutex<T>,
    last_enable_device_type: Mutex<u8>,
    config: DriverConfig,
}

impl<T: Transport> Driver<T> {
    pub fn new(transport: T, config: DriverConfig) -> Self {
        Driver { transport: Mutex::new(transport), last_enable_device_type: Mutex::new(0), config }
    }

    /// Sends one command, awaiting its response if it is a query.
    pub async fn send(&self, command: Command) -> Result<Response> {
        let mut transport = self.transport.lock().await;
        self.await_connected(&transport).await?;
        self.send_on(&mut transport, command).await
    }

    /// Polls [`Transport::is_connected`] until it reports ready or
    /// `connect_timeout` elapses.
    async fn await_connected(&self, transport: &T) -> Result<()> {
        tokio::time::timeout(self.config.connect_timeout, async {
            while !transport.is_connected() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .map_err(|_| DaliError::NotConnected)
    }

    async fn send_on(&self, transport: &mut T, command: Command) -> Result<Response> {
        let device_type = command.device_type();
        if device_type != 0 {
            let needs_enable = *self.last_enable_device_type.lock().await != device_type;
            if needs_enable {
                let enable = Command::Gear(GearCommand::EnableDeviceType(device_type));
                self.transmit_once(transport, enable.encode()?).await?;
                *self.last_enable_device_type.lock().await = device_type;
            }
        }

        let frame = command.encode()?;
        self.transmit_once(transport, frame).await?;

        if command.send_twice() {
            self.transmit_once(transport, frame).await?;
            self.clear_enable_device_type(&command).await;
            return Ok(Response::YesNo(true));
        }
        self.clear_enable_device_type(&command).await;

        let Some(kind) = command.response_kind() else {
            return Ok(Response::YesNo(false));
        };

        let backward = transport.send(frame, self.config.response_window).await;
        let backward = self.handle_transport_result(backward)?;
        debug!("{command:?} -> {backward:?}");
        Ok(parse_response(kind, backward))
    }

    async fn clear_enable_device_type(&self, command: &Command) {
        if !matches!(command, Command::Gear(GearCommand::EnableDeviceType(_))) {
            *self.last_enable_device_type.lock().await = 0;
        }
    }

    async fn transmit_once(&self, transport: &mut T, frame: crate::frame::ForwardFrame) -> Result<()> {
        let result = transport.send(frame, Duration::ZERO).await;
        self.handle_transport_result(result)?;
        Ok(())
    }

    fn handle_transport_result(&self, result: Result<Option<BackwardFrame>>) -> Result<Option<BackwardFrame>> {
        match result {
            Ok(frame) => Ok(frame),
            Err(e) if self.config.exceptions_on_send => Err(e),
            Err(e) => {
                warn!("transport error treated as missing response: {e}");
                Ok(None)
            }
        }
    }

    /// Runs a [`Sequence`] to completion, holding the transaction lock for
    /// its entire duration so no unrelated command interleaves.
    pub async fn run_sequence<S: Sequence>(
        &self,
        mut sequence: S,
        mut progress: Option<&mut dyn FnMut(ProgressReport)>,
    ) -> Result<S::Output> {
        let mut transport = self.transport.lock().await;
        self.await_connected(&transport).await?;
        let mut last = None;
        loop {
            match sequence.advance(last.take()) {
                SequenceStep::SendCommand(command) => {
                    last = Some(self.send_on(&mut transport, command).await?);
                }
                SequenceStep::Sleep(d) => {
                    tokio::time::sleep(d).await;
                }
                SequenceStep::Progress(report) => {
                    if let Some(cb) = progress.as_deref_mut() {
                        cb(report);
                    }
                }
                SequenceStep::Finished(result) => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::GearAddress;
    use crate::command::GearCommand;
    use crate::sequences::commissioning::GearCommissioning;
    use crate::transport::mock::{FakeGear, MockBus};

    fn driver(gear: Vec<FakeGear>) -> Driver<MockBus> {
        Driver::new(MockBus::new(gear), DriverConfig::default())
    }

    #[tokio::test]
    async fn send_query_returns_parsed_response() {
        let driver = driver(vec![FakeGear::new(Some(3))]);
        let response = driver
            .send(Command::Gear(GearCommand::QueryControlGearPresent(GearAddress::Short(3))))
            .await
            .unwrap();
        assert_eq!(response, Response::YesNo(true));
    }

    #[tokio::test]
    async fn send_non_query_returns_false_yes_no() {
        let driver = driver(vec![FakeGear::new(Some(3))]);
        let response =
            driver.send(Command::Gear(GearCommand::Dapc(GearAddress::Short(3), 100))).await.unwrap();
        assert_eq!(response, Response::YesNo(false));
    }

    #[tokio::test]
    async fn run_sequence_commissions_one_preloaded_gear() {
        let gear = FakeGear::new(None).with_random_preload(0x00aaaa);
        let driver = driver(vec![gear]);
        let assigned = driver.run_sequence(GearCommissioning::new(false, false), None).await.unwrap();
        assert_eq!(assigned, vec![0]);
    }
}
