//! Generalized multi-byte input-value read for a part-103 instance
//! (IEC 62386-103:2014 §9.7.2): chains `QueryInputValueLatch` while more
//! than 8 bits of resolution remain, then discards the repeated trailing
//! bits. The DT8 colour Mired transfer is the 16-bit special case of this.

use crate::address::{DeviceAddress, InstanceAddress};
use crate::codec::Command;
use crate::command::InstanceCommand;
use crate::error::DaliError;
use crate::response::Response;
use crate::sequence::{Sequence, SequenceStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    QueryResolution,
    QueryValue,
    QueryLatch,
    Done,
}

/// Reads a (possibly multi-byte) instance input value, resolving its
/// resolution first unless the caller already knows it.
pub struct QueryInputValue {
    addr: DeviceAddress,
    instance: InstanceAddress,
    resolution: Option<u8>,
    remaining: u8,
    accumulated: u32,
    phase: Phase,
}

impl QueryInputValue {
    pub fn new(addr: DeviceAddress, instance: InstanceAddress, resolution: Option<u8>) -> Self {
        let phase = if resolution.is_some() { Phase::QueryValue } else { Phase::QueryResolution };
        QueryInputValue { addr, instance, resolution, remaining: resolution.unwrap_or(8), accumulated: 0, phase }
    }
}

impl Sequence for QueryInputValue {
    type Output = u32;

    fn advance(&mut self, last: Option<Response>) -> SequenceStep<u32> {
        match self.phase {
            Phase::QueryResolution => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Instance(InstanceCommand::QueryResolution(
                        self.addr,
                        self.instance,
                    )));
                }
                match last {
                    Some(Response::Numeric(Some(r))) => {
                        self.resolution = Some(r);
                        self.remaining = r;
                        self.phase = Phase::QueryValue;
                        self.advance(None)
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to QueryResolution: {other:?}"
                    )))),
                }
            }
            Phase::QueryValue => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Instance(InstanceCommand::QueryInputValue(
                        self.addr,
                        self.instance,
                    )));
                }
                match last {
                    Some(Response::Numeric(Some(v))) => {
                        self.accumulated = v as u32;
                        self.remaining = self.remaining.saturating_sub(8);
                        self.phase = if self.remaining > 0 { Phase::QueryLatch } else { Phase::Done };
                        self.advance(None)
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to QueryInputValue: {other:?}"
                    )))),
                }
            }
            Phase::QueryLatch => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Instance(InstanceCommand::QueryInputValueLatch(
                        self.addr,
                        self.instance,
                    )));
                }
                match last {
                    Some(Response::Numeric(Some(v))) => {
                        self.accumulated = (self.accumulated << 8) | v as u32;
                        self.remaining = self.remaining.saturating_sub(8);
                        self.phase = if self.remaining > 0 { Phase::QueryLatch } else { Phase::Done };
                        self.advance(None)
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to QueryInputValueLatch: {other:?}"
                    )))),
                }
            }
            Phase::Done => {
                let resolution = self.resolution.unwrap_or(8) as u32;
                let bytes_fetched = resolution.div_ceil(8);
                let shift = bytes_fetched * 8 - resolution;
                SequenceStep::Finished(Ok(self.accumulated >> shift))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte_resolution_needs_no_latch() {
        let mut seq = QueryInputValue::new(
            DeviceAddress::short(1).unwrap(),
            InstanceAddress::number(0).unwrap(),
            Some(8),
        );
        seq.advance(None);
        match seq.advance(Some(Response::Numeric(Some(200)))) {
            SequenceStep::Finished(Ok(v)) => assert_eq!(v, 200),
            _ => panic!("expected finish"),
        }
    }

    #[test]
    fn sixteen_bit_resolution_chains_latch_and_shifts() {
        let mut seq = QueryInputValue::new(
            DeviceAddress::short(1).unwrap(),
            InstanceAddress::number(0).unwrap(),
            Some(12),
        );
        seq.advance(None);
        seq.advance(Some(Response::Numeric(Some(0xab))));
        match seq.advance(Some(Response::Numeric(Some(0xc0)))) {
            SequenceStep::Finished(Ok(v)) => assert_eq!(v, 0xabc0u32 >> 4),
            _ => panic!("expected finish"),
        }
    }
}
