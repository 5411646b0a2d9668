//! Builds the instance-type map: for each device short address, checks its
//! status and records the type of every enabled instance it reports.

use crate::address::{DeviceAddress, InstanceAddress};
use crate::codec::Command;
use crate::command::{DeviceCommand, InstanceCommand};
use crate::error::DaliError;
#[cfg(test)]
use crate::response::BitmapResponse;
use crate::response::Response;
use crate::sequence::{Sequence, SequenceStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    StartQuiescent,
    QueryStatus,
    QueryInstanceCount,
    QueryInstanceEnabled(u8),
    QueryInstanceType(u8),
    StopQuiescent,
    Done,
}

/// One discovered instance: its number and its reported type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveredInstance {
    pub number: u8,
    pub instance_type: u8,
}

/// Probes every instance on one device and records enabled ones' types.
pub struct InstanceDiscovery {
    addr: DeviceAddress,
    phase: Phase,
    instance_count: u8,
    found: Vec<DiscoveredInstance>,
}

impl InstanceDiscovery {
    pub fn new(short: u8) -> Self {
        InstanceDiscovery {
            addr: DeviceAddress::short(short).expect("short address in range"),
            phase: Phase::Start,
            instance_count: 0,
            found: Vec::new(),
        }
    }
}

impl Sequence for InstanceDiscovery {
    type Output = Vec<DiscoveredInstance>;

    fn advance(&mut self, last: Option<Response>) -> SequenceStep<Vec<DiscoveredInstance>> {
        match self.phase {
            Phase::Start => {
                self.phase = Phase::StartQuiescent;
                self.advance(None)
            }
            Phase::StartQuiescent => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Device(DeviceCommand::StartQuiescentMode(self.addr)));
                }
                self.phase = Phase::QueryStatus;
                self.advance(None)
            }
            Phase::QueryStatus => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Device(DeviceCommand::QueryDeviceStatus(self.addr)));
                }
                const RESET_STATE: usize = 0;
                const SHORT_ADDRESS_IS_MASK: usize = 4;
                const INPUT_DEVICE_ERROR: usize = 6;
                match last {
                    Some(Response::Bitmap(Some(ref status)))
                        if !status.is_set(INPUT_DEVICE_ERROR)
                            && !status.is_set(RESET_STATE)
                            && !status.is_set(SHORT_ADDRESS_IS_MASK) =>
                    {
                        self.phase = Phase::QueryInstanceCount;
                        self.advance(None)
                    }
                    Some(Response::Bitmap(_)) => {
                        self.phase = Phase::StopQuiescent;
                        self.advance(None)
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to QueryDeviceStatus: {other:?}"
                    )))),
                }
            }
            Phase::QueryInstanceCount => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Device(DeviceCommand::QueryNumberOfInstances(
                        self.addr,
                    )));
                }
                match last {
                    Some(Response::Numeric(Some(n))) => {
                        self.instance_count = n;
                        self.phase = Phase::QueryInstanceEnabled(0);
                        self.advance(None)
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to QueryNumberOfInstances: {other:?}"
                    )))),
                }
            }
            Phase::QueryInstanceEnabled(n) => {
                if n >= self.instance_count {
                    self.phase = Phase::StopQuiescent;
                    return self.advance(None);
                }
                if last.is_none() {
                    let instance = InstanceAddress::number(n).expect("instance number in range");
                    return SequenceStep::SendCommand(Command::Instance(InstanceCommand::QueryInstanceEnabled(
                        self.addr, instance,
                    )));
                }
                self.phase = match last {
                    Some(Response::YesNo(true)) => Phase::QueryInstanceType(n),
                    _ => Phase::QueryInstanceEnabled(n + 1),
                };
                self.advance(None)
            }
            Phase::QueryInstanceType(n) => {
                if last.is_none() {
                    let instance = InstanceAddress::number(n).expect("instance number in range");
                    return SequenceStep::SendCommand(Command::Instance(InstanceCommand::QueryInstanceType(
                        self.addr, instance,
                    )));
                }
                match last {
                    Some(Response::Numeric(Some(t))) => {
                        self.found.push(DiscoveredInstance { number: n, instance_type: t });
                        self.phase = Phase::QueryInstanceEnabled(n + 1);
                        self.advance(None)
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to QueryInstanceType: {other:?}"
                    )))),
                }
            }
            Phase::StopQuiescent => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Device(DeviceCommand::StopQuiescentMode(self.addr)));
                }
                self.phase = Phase::Done;
                self.advance(None)
            }
            Phase::Done => SequenceStep::Finished(Ok(std::mem::take(&mut self.found))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_single_enabled_instance() {
        let mut seq = InstanceDiscovery::new(3);
        seq.advance(None); // StartQuiescent
        seq.advance(None); // QueryStatus
        seq.advance(Some(Response::Bitmap(Some(BitmapResponse { raw: 0, flags: &[] }))));
        seq.advance(Some(Response::Numeric(Some(1))));
        seq.advance(Some(Response::YesNo(true)));
        seq.advance(Some(Response::Numeric(Some(2))));
        match seq.advance(None) {
            SequenceStep::Finished(Ok(found)) => {
                assert_eq!(found, vec![DiscoveredInstance { number: 0, instance_type: 2 }]);
            }
            _ => panic!("expected finish"),
        }
    }
}
