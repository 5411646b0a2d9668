//! Enumerates every part-2xx device type a piece of gear implements.

use crate::address::GearAddress;
use crate::codec::Command;
use crate::command::GearCommand;
use crate::error::DaliError;
use crate::response::Response;
use crate::sequence::{Sequence, SequenceStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    QueryFirst,
    QueryNext,
    Done,
}

/// `QueryDeviceType` followed, if the gear reports "more than one type"
/// (255), by repeated `QueryNextDeviceType` until the 254 sentinel.
pub struct QueryDeviceTypes {
    addr: GearAddress,
    phase: Phase,
    types: Vec<u8>,
}

impl QueryDeviceTypes {
    pub fn new(addr: GearAddress) -> Self {
        QueryDeviceTypes { addr, phase: Phase::QueryFirst, types: Vec::new() }
    }
}

impl Sequence for QueryDeviceTypes {
    type Output = Vec<u8>;

    fn advance(&mut self, last: Option<Response>) -> SequenceStep<Vec<u8>> {
        match self.phase {
            Phase::QueryFirst => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Gear(GearCommand::QueryDeviceType(self.addr)));
                }
                match last {
                    Some(Response::Numeric(Some(254))) => {
                        self.types.push(0);
                        self.phase = Phase::Done;
                    }
                    Some(Response::Numeric(Some(255))) => {
                        self.phase = Phase::QueryNext;
                    }
                    Some(Response::Numeric(Some(t))) => {
                        self.types.push(t);
                        self.phase = Phase::Done;
                    }
                    other => {
                        return SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                            "unexpected response to QueryDeviceType: {other:?}"
                        ))))
                    }
                }
                self.advance(None)
            }
            Phase::QueryNext => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Gear(GearCommand::QueryNextDeviceType(self.addr)));
                }
                match last {
                    Some(Response::Numeric(Some(254))) => {
                        self.phase = Phase::Done;
                        self.advance(None)
                    }
                    Some(Response::Numeric(Some(t))) => {
                        if let Some(&last_seen) = self.types.last() {
                            if t < last_seen {
                                return SequenceStep::Finished(Err(DaliError::DaliSequence(
                                    "device types reported out of order".into(),
                                )));
                            }
                        }
                        self.types.push(t);
                        self.phase = Phase::QueryNext;
                        self.advance(None)
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to QueryNextDeviceType: {other:?}"
                    )))),
                }
            }
            Phase::Done => SequenceStep::Finished(Ok(std::mem::take(&mut self.types))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_type_terminates_immediately() {
        let mut seq = QueryDeviceTypes::new(GearAddress::Broadcast);
        seq.advance(None);
        match seq.advance(Some(Response::Numeric(Some(6)))) {
            SequenceStep::Finished(Ok(types)) => assert_eq!(types, vec![6]),
            _ => panic!("expected finish"),
        }
    }

    #[test]
    fn multiple_types_chain_until_sentinel() {
        let mut seq = QueryDeviceTypes::new(GearAddress::Broadcast);
        seq.advance(None);
        seq.advance(Some(Response::Numeric(Some(255))));
        seq.advance(Some(Response::Numeric(Some(6))));
        match seq.advance(Some(Response::Numeric(Some(254)))) {
            SequenceStep::Finished(Ok(types)) => assert_eq!(types, vec![6]),
            _ => panic!("expected finish"),
        }
    }
}
