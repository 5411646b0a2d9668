//! Event scheme and filter configuration: loads the desired value into the
//! DTR register pair (or triple) before issuing the corresponding `SetEvent*`
//! command, and reconstructs multi-byte filter values from the `QueryEvent*`
//! readback commands.

use crate::address::{DeviceAddress, InstanceAddress};
use crate::codec::Command;
use crate::command::{EventScheme, InstanceCommand, SpecialDeviceCommand};
use crate::error::DaliError;
use crate::response::Response;
use crate::sequence::{Sequence, SequenceStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemePhase {
    SetDtr0,
    SetScheme,
    Done,
}

/// Assigns an instance's event-addressing scheme (IEC 62386-103 §9.12.6).
pub struct SetEventScheme {
    addr: DeviceAddress,
    instance: InstanceAddress,
    scheme: EventScheme,
    phase: SchemePhase,
}

impl SetEventScheme {
    pub fn new(addr: DeviceAddress, instance: InstanceAddress, scheme: EventScheme) -> Self {
        SetEventScheme { addr, instance, scheme, phase: SchemePhase::SetDtr0 }
    }
}

impl Sequence for SetEventScheme {
    type Output = ();

    fn advance(&mut self, _last: Option<Response>) -> SequenceStep<()> {
        match self.phase {
            SchemePhase::SetDtr0 => {
                self.phase = SchemePhase::SetScheme;
                SequenceStep::SendCommand(Command::SpecialDevice(SpecialDeviceCommand::Dtr0(self.scheme as u8)))
            }
            SchemePhase::SetScheme => {
                self.phase = SchemePhase::Done;
                SequenceStep::SendCommand(Command::Instance(InstanceCommand::SetEventScheme(
                    self.addr,
                    self.instance,
                )))
            }
            SchemePhase::Done => SequenceStep::Finished(Ok(())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterWidth {
    Bits8,
    Bits16,
    Bits24,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetFilterPhase {
    SetDtr0,
    SetDtr1,
    SetDtr2,
    SetFilter,
    Done,
}

/// Writes an 8, 16, or 24-bit event filter mask into an instance.
pub struct SetEventFilter {
    addr: DeviceAddress,
    instance: InstanceAddress,
    value: u32,
    width: FilterWidth,
    phase: SetFilterPhase,
}

impl SetEventFilter {
    pub fn bits8(addr: DeviceAddress, instance: InstanceAddress, value: u8) -> Self {
        SetEventFilter { addr, instance, value: value as u32, width: FilterWidth::Bits8, phase: SetFilterPhase::SetDtr0 }
    }

    pub fn bits16(addr: DeviceAddress, instance: InstanceAddress, value: u16) -> Self {
        SetEventFilter {
            addr,
            instance,
            value: value as u32,
            width: FilterWidth::Bits16,
            phase: SetFilterPhase::SetDtr0,
        }
    }

    pub fn bits24(addr: DeviceAddress, instance: InstanceAddress, value: u32) -> Self {
        SetEventFilter { addr, instance, value, width: FilterWidth::Bits24, phase: SetFilterPhase::SetDtr0 }
    }
}

impl Sequence for SetEventFilter {
    type Output = ();

    fn advance(&mut self, _last: Option<Response>) -> SequenceStep<()> {
        match self.phase {
            SetFilterPhase::SetDtr0 => {
                self.phase = match self.width {
                    FilterWidth::Bits8 => SetFilterPhase::SetFilter,
                    _ => SetFilterPhase::SetDtr1,
                };
                SequenceStep::SendCommand(Command::SpecialDevice(SpecialDeviceCommand::Dtr0(
                    (self.value & 0xff) as u8,
                )))
            }
            SetFilterPhase::SetDtr1 => {
                self.phase = match self.width {
                    FilterWidth::Bits24 => SetFilterPhase::SetDtr2,
                    _ => SetFilterPhase::SetFilter,
                };
                SequenceStep::SendCommand(Command::SpecialDevice(SpecialDeviceCommand::Dtr1(
                    ((self.value >> 8) & 0xff) as u8,
                )))
            }
            SetFilterPhase::SetDtr2 => {
                self.phase = SetFilterPhase::SetFilter;
                SequenceStep::SendCommand(Command::SpecialDevice(SpecialDeviceCommand::Dtr2(
                    ((self.value >> 16) & 0xff) as u8,
                )))
            }
            SetFilterPhase::SetFilter => {
                self.phase = SetFilterPhase::Done;
                SequenceStep::SendCommand(Command::Instance(InstanceCommand::SetEventFilter(
                    self.addr,
                    self.instance,
                )))
            }
            SetFilterPhase::Done => SequenceStep::Finished(Ok(())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryFilterPhase {
    QueryL,
    QueryM { low: u8 },
    QueryH { low: u8, mid: u8 },
    Done,
}

/// Reads back a 24-bit event filter as `QueryEventFilterL/M/H` low, mid, and
/// high bytes and reassembles them into one value.
pub struct QueryEventFilter {
    addr: DeviceAddress,
    instance: InstanceAddress,
    phase: QueryFilterPhase,
    result: u32,
}

impl QueryEventFilter {
    pub fn new(addr: DeviceAddress, instance: InstanceAddress) -> Self {
        QueryEventFilter { addr, instance, phase: QueryFilterPhase::QueryL, result: 0 }
    }
}

impl Sequence for QueryEventFilter {
    type Output = u32;

    fn advance(&mut self, last: Option<Response>) -> SequenceStep<u32> {
        match self.phase {
            QueryFilterPhase::QueryL => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Instance(InstanceCommand::QueryEventFilterL(
                        self.addr,
                        self.instance,
                    )));
                }
                match last {
                    Some(Response::Numeric(Some(low))) => {
                        self.phase = QueryFilterPhase::QueryM { low };
                        self.advance(None)
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to QueryEventFilterL: {other:?}"
                    )))),
                }
            }
            QueryFilterPhase::QueryM { low } => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Instance(InstanceCommand::QueryEventFilterM(
                        self.addr,
                        self.instance,
                    )));
                }
                match last {
                    Some(Response::Numeric(Some(mid))) => {
                        self.phase = QueryFilterPhase::QueryH { low, mid };
                        self.advance(None)
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to QueryEventFilterM: {other:?}"
                    )))),
                }
            }
            QueryFilterPhase::QueryH { low, mid } => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Instance(InstanceCommand::QueryEventFilterH(
                        self.addr,
                        self.instance,
                    )));
                }
                match last {
                    Some(Response::Numeric(Some(high))) => {
                        self.result = (low as u32) | ((mid as u32) << 8) | ((high as u32) << 16);
                        self.phase = QueryFilterPhase::Done;
                        SequenceStep::Finished(Ok(self.result))
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to QueryEventFilterH: {other:?}"
                    )))),
                }
            }
            QueryFilterPhase::Done => SequenceStep::Finished(Ok(self.result)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_event_scheme_loads_dtr0_first() {
        let addr = DeviceAddress::short(1).unwrap();
        let instance = InstanceAddress::number(0).unwrap();
        let mut seq = SetEventScheme::new(addr, instance, EventScheme::DeviceInstance);
        assert!(matches!(
            seq.advance(None),
            SequenceStep::SendCommand(Command::SpecialDevice(SpecialDeviceCommand::Dtr0(2)))
        ));
        assert!(matches!(
            seq.advance(None),
            SequenceStep::SendCommand(Command::Instance(InstanceCommand::SetEventScheme(_, _)))
        ));
    }

    #[test]
    fn set_event_filter_16bit_skips_dtr2() {
        let addr = DeviceAddress::short(1).unwrap();
        let instance = InstanceAddress::number(0).unwrap();
        let mut seq = SetEventFilter::bits16(addr, instance, 0xabcd);
        assert!(matches!(
            seq.advance(None),
            SequenceStep::SendCommand(Command::SpecialDevice(SpecialDeviceCommand::Dtr0(0xcd)))
        ));
        assert!(matches!(
            seq.advance(None),
            SequenceStep::SendCommand(Command::SpecialDevice(SpecialDeviceCommand::Dtr1(0xab)))
        ));
        assert!(matches!(
            seq.advance(None),
            SequenceStep::SendCommand(Command::Instance(InstanceCommand::SetEventFilter(_, _)))
        ));
    }

    #[test]
    fn query_event_filter_reassembles_little_endian_bytes() {
        let addr = DeviceAddress::short(1).unwrap();
        let instance = InstanceAddress::number(0).unwrap();
        let mut seq = QueryEventFilter::new(addr, instance);
        seq.advance(None);
        seq.advance(Some(Response::Numeric(Some(0x34))));
        seq.advance(Some(Response::Numeric(Some(0x12))));
        match seq.advance(Some(Response::Numeric(Some(0x00)))) {
            SequenceStep::Finished(Ok(v)) => assert_eq!(v, 0x001234),
            _ => panic!("expected finish"),
        }
    }
}
