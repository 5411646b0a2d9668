//! DT8 (IEC 62386-209) colour Mired temperature transfer: the 16-bit Mired
//! value goes through the DTR1:DTR0 pair, `SetTemporaryColourTemperature`
//! copies it into the temporary colour data structure, and `Activate` makes
//! it take effect.

use crate::address::GearAddress;
use crate::codec::Command;
use crate::command::GearCommand;
use crate::error::DaliError;
use crate::response::Response;
use crate::sequence::{Sequence, SequenceStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    SetDtr0,
    SetDtr1,
    SetTemporary,
    Activate,
    Done,
}

/// Sets a DT8 control gear's colour temperature, in Mired, and activates it.
pub struct SetColourTemperature {
    addr: GearAddress,
    mired: u16,
    phase: Phase,
}

impl SetColourTemperature {
    pub fn new(addr: GearAddress, mired: u16) -> Self {
        SetColourTemperature { addr, mired, phase: Phase::SetDtr0 }
    }
}

impl Sequence for SetColourTemperature {
    type Output = ();

    fn advance(&mut self, _last: Option<Response>) -> SequenceStep<()> {
        match self.phase {
            Phase::SetDtr0 => {
                self.phase = Phase::SetDtr1;
                SequenceStep::SendCommand(Command::Gear(GearCommand::Dtr0((self.mired & 0xff) as u8)))
            }
            Phase::SetDtr1 => {
                self.phase = Phase::SetTemporary;
                SequenceStep::SendCommand(Command::Gear(GearCommand::Dtr1(((self.mired >> 8) & 0xff) as u8)))
            }
            Phase::SetTemporary => {
                self.phase = Phase::Activate;
                SequenceStep::SendCommand(Command::Gear(GearCommand::SetTemporaryColourTemperature(self.addr)))
            }
            Phase::Activate => {
                self.phase = Phase::Done;
                SequenceStep::SendCommand(Command::Gear(GearCommand::Activate(self.addr)))
            }
            Phase::Done => SequenceStep::Finished(Ok(())),
        }
    }
}

/// Reads back a DT8 control gear's current Mired colour temperature through
/// `QueryColourValue`, whose content is selected by the prior `Dtr0` write
/// (IEC 62386-209 §9.29.2: content type 2 selects the Mired report).
pub struct QueryColourTemperature {
    addr: GearAddress,
    phase: QueryPhase,
    mired: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryPhase {
    SelectContent,
    QueryHigh,
    QueryLow { high: u8 },
    Done,
}

const COLOUR_TEMPERATURE_CONTENT: u8 = 2;

impl QueryColourTemperature {
    pub fn new(addr: GearAddress) -> Self {
        QueryColourTemperature { addr, phase: QueryPhase::SelectContent, mired: 0 }
    }
}

impl Sequence for QueryColourTemperature {
    type Output = u16;

    fn advance(&mut self, last: Option<Response>) -> SequenceStep<u16> {
        match self.phase {
            QueryPhase::SelectContent => {
                self.phase = QueryPhase::QueryHigh;
                SequenceStep::SendCommand(Command::Gear(GearCommand::Dtr0(COLOUR_TEMPERATURE_CONTENT)))
            }
            QueryPhase::QueryHigh => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Gear(GearCommand::QueryColourValue(self.addr)));
                }
                match last {
                    Some(Response::Numeric(Some(high))) => {
                        self.phase = QueryPhase::QueryLow { high };
                        self.advance(None)
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to QueryColourValue (high byte): {other:?}"
                    )))),
                }
            }
            QueryPhase::QueryLow { high } => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Gear(GearCommand::QueryColourValue(self.addr)));
                }
                match last {
                    Some(Response::Numeric(Some(low))) => {
                        self.mired = ((high as u16) << 8) | low as u16;
                        self.phase = QueryPhase::Done;
                        SequenceStep::Finished(Ok(self.mired))
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to QueryColourValue (low byte): {other:?}"
                    )))),
                }
            }
            QueryPhase::Done => SequenceStep::Finished(Ok(self.mired)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_colour_temperature_chains_dtr_then_activates() {
        let mut seq = SetColourTemperature::new(GearAddress::Short(2), 0x01f4);
        assert!(matches!(
            seq.advance(None),
            SequenceStep::SendCommand(Command::Gear(GearCommand::Dtr0(0xf4)))
        ));
        assert!(matches!(
            seq.advance(None),
            SequenceStep::SendCommand(Command::Gear(GearCommand::Dtr1(0x01)))
        ));
        assert!(matches!(
            seq.advance(None),
            SequenceStep::SendCommand(Command::Gear(GearCommand::SetTemporaryColourTemperature(_)))
        ));
        assert!(matches!(
            seq.advance(None),
            SequenceStep::SendCommand(Command::Gear(GearCommand::Activate(_)))
        ));
        assert!(matches!(seq.advance(None), SequenceStep::Finished(Ok(()))));
    }

    #[test]
    fn query_colour_temperature_combines_two_bytes() {
        let mut seq = QueryColourTemperature::new(GearAddress::Short(2));
        seq.advance(None);
        seq.advance(None);
        seq.advance(Some(Response::Numeric(Some(0x01))));
        match seq.advance(Some(Response::Numeric(Some(0xf4)))) {
            SequenceStep::Finished(Ok(v)) => assert_eq!(v, 0x01f4),
            _ => panic!("expected finish"),
        }
    }
}
