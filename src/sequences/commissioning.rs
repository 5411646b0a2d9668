//! Random-address enumeration ("commissioning"): assigns short addresses to
//! every control gear on the bus by iterative binary search over the 24-bit
//! random-address space, per IEC 62386-102 §9.2 Annex. A device (24-bit)
//! flavor covers the -103 device bus equivalently.

use crate::address::GearAddress;
use crate::codec::Command;
use crate::command::GearCommand;
use crate::error::DaliError;
use crate::response::Response;
use crate::sequence::{ProgressReport, Sequence, SequenceStep};
use std::time::Duration;

const RANDOMISE_SETTLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    ProbeAddress(u8),
    Terminate,
    Initialise,
    Randomise,
    SettleAfterRandomise,
    SearchH { mid: u32, confirming: bool },
    SearchM { mid: u32, confirming: bool },
    SearchL { mid: u32, confirming: bool },
    Compare { mid: u32, confirming: bool },
    ProgramAddress { short: u8, wire: u8 },
    VerifyAddress { short: u8, wire: u8 },
    Withdraw,
    FinalTerminate,
    Done,
}

/// Assigns short addresses to every un-addressed control gear on the bus.
pub struct GearCommissioning {
    phase: Phase,
    available: [bool; 64],
    readdress: bool,
    dry_run: bool,
    low: u32,
    high: u32,
    assigned: Vec<u8>,
}

impl GearCommissioning {
    /// `readdress`: when true, re-commission every device regardless of
    /// whether it already has a short address. `dry_run`: when true, the
    /// search runs to completion but no `ProgramShortAddress` is sent.
    pub fn new(readdress: bool, dry_run: bool) -> Self {
        GearCommissioning {
            phase: if readdress { Phase::Terminate } else { Phase::ProbeAddress(0) },
            available: [true; 64],
            readdress,
            dry_run,
            low: 0,
            high: 0x00ff_ffff,
            assigned: Vec::new(),
        }
    }

    fn next_free_short(&self) -> Option<u8> {
        (0u8..64).find(|&a| self.available[a as usize])
    }

    fn mid(&self) -> u32 {
        self.low + (self.high - self.low) / 2
    }
}

impl Sequence for GearCommissioning {
    type Output = Vec<u8>;

    fn advance(&mut self, last: Option<Response>) -> SequenceStep<Vec<u8>> {
        match self.phase {
            Phase::ProbeAddress(addr) => {
                // `addr` is one past the address just queried; its response
                // arrives here before we send the next query.
                if let Some(Response::YesNo(true)) = last {
                    self.available[(addr - 1) as usize] = false;
                }
                if addr == 64 {
                    self.phase = Phase::Terminate;
                    return self.advance(None);
                }
                self.phase = Phase::ProbeAddress(addr + 1);
                SequenceStep::SendCommand(Command::Gear(GearCommand::QueryControlGearPresent(
                    GearAddress::Short(addr),
                )))
            }
            Phase::Terminate => {
                self.phase = Phase::Initialise;
                SequenceStep::SendCommand(Command::Gear(GearCommand::Terminate))
            }
            Phase::Initialise => {
                self.phase = Phase::Randomise;
                let param = if self.readdress { 0xff } else { 0x00 };
                SequenceStep::SendCommand(Command::Gear(GearCommand::Initialise(param)))
            }
            Phase::Randomise => {
                self.low = 0;
                self.high = 0x00ff_ffff;
                self.phase = Phase::SettleAfterRandomise;
                SequenceStep::SendCommand(Command::Gear(GearCommand::Randomise))
            }
            Phase::SettleAfterRandomise => {
                let mid = self.mid();
                self.phase = Phase::SearchH { mid, confirming: false };
                SequenceStep::Sleep(RANDOMISE_SETTLE)
            }
            Phase::SearchH { mid, confirming } => {
                self.phase = Phase::SearchM { mid, confirming };
                SequenceStep::SendCommand(Command::Gear(GearCommand::SearchAddrH(((mid >> 16) & 0xff) as u8)))
            }
            Phase::SearchM { mid, confirming } => {
                self.phase = Phase::SearchL { mid, confirming };
                SequenceStep::SendCommand(Command::Gear(GearCommand::SearchAddrM(((mid >> 8) & 0xff) as u8)))
            }
            Phase::SearchL { mid, confirming } => {
                self.phase = Phase::Compare { mid, confirming };
                SequenceStep::SendCommand(Command::Gear(GearCommand::SearchAddrL((mid & 0xff) as u8)))
            }
            Phase::Compare { mid, confirming } => {
                self.phase = Phase::Compare { mid, confirming };
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Gear(GearCommand::Compare));
                }
                match last {
                    Some(Response::FramingError) => {
                        self.phase = Phase::Randomise;
                        SequenceStep::Progress(ProgressReport {
                            message: "address collision, restarting search with a new random address"
                                .into(),
                            completed: self.assigned.len() as u32,
                            size: 64,
                        })
                    }
                    Some(Response::YesNo(true)) if confirming => {
                        let short = match self.next_free_short() {
                            Some(s) => s,
                            None => {
                                self.phase = Phase::FinalTerminate;
                                return self.advance(None);
                            }
                        };
                        let wire = (short << 1) | 1;
                        self.phase = Phase::ProgramAddress { short, wire };
                        self.advance(None)
                    }
                    Some(Response::YesNo(false)) if confirming => {
                        self.phase = Phase::FinalTerminate;
                        self.advance(None)
                    }
                    Some(Response::YesNo(true)) => {
                        self.high = mid;
                        if self.low == self.high {
                            self.phase = Phase::Compare { mid, confirming: true };
                            self.advance(None)
                        } else {
                            let next_mid = self.mid();
                            self.phase = Phase::SearchH { mid: next_mid, confirming: false };
                            self.advance(None)
                        }
                    }
                    Some(Response::YesNo(false)) => {
                        self.low = mid + 1;
                        if self.low >= self.high {
                            self.low = self.high;
                            self.phase = Phase::Compare { mid: self.low, confirming: true };
                            self.advance(None)
                        } else {
                            let next_mid = self.mid();
                            self.phase = Phase::SearchH { mid: next_mid, confirming: false };
                            self.advance(None)
                        }
                    }
                    other => SequenceStep::Finished(Err(DaliError::DaliSequence(format!(
                        "unexpected response to Compare: {other:?}"
                    )))),
                }
            }
            Phase::ProgramAddress { short, wire } => {
                if self.dry_run {
                    self.phase = Phase::Withdraw;
                    return self.advance(None);
                }
                self.phase = Phase::VerifyAddress { short, wire };
                SequenceStep::SendCommand(Command::Gear(GearCommand::ProgramShortAddress(wire)))
            }
            Phase::VerifyAddress { short, wire } => {
                if last.is_none() {
                    return SequenceStep::SendCommand(Command::Gear(GearCommand::VerifyShortAddress(wire)));
                }
                match last {
                    Some(Response::YesNo(true)) => {
                        self.available[short as usize] = false;
                        self.assigned.push(short);
                        self.phase = Phase::Withdraw;
                        SequenceStep::Progress(ProgressReport {
                            message: format!("assigned short address {short}"),
                            completed: self.assigned.len() as u32,
                            size: 64,
                        })
                    }
                    _ => SequenceStep::Finished(Err(DaliError::ProgramShortAddressFailure(short))),
                }
            }
            Phase::Withdraw => {
                let found = self.low;
                self.low = found.saturating_add(1);
                self.high = 0x00ff_ffff;
                if self.low > self.high {
                    self.high = self.low;
                }
                let mid = self.mid();
                self.phase = Phase::SearchH { mid, confirming: false };
                SequenceStep::SendCommand(Command::Gear(GearCommand::Withdraw))
            }
            Phase::FinalTerminate => {
                self.phase = Phase::Done;
                SequenceStep::SendCommand(Command::Gear(GearCommand::Terminate))
            }
            Phase::Done => SequenceStep::Finished(Ok(std::mem::take(&mut self.assigned))),
            Phase::Start => unreachable!("Phase::Start is never constructed; GearCommissioning::new starts in ProbeAddress or Terminate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_probe_when_not_readdressing() {
        let mut seq = GearCommissioning::new(false, false);
        assert!(matches!(
            seq.advance(None),
            SequenceStep::SendCommand(Command::Gear(GearCommand::QueryControlGearPresent(GearAddress::Short(0))))
        ));
    }

    #[test]
    fn readdress_skips_probing() {
        let mut seq = GearCommissioning::new(true, false);
        assert!(matches!(
            seq.advance(None),
            SequenceStep::SendCommand(Command::Gear(GearCommand::Terminate))
        ));
    }

    #[test]
    fn compare_collision_reports_progress_and_restarts_randomise() {
        let mut seq = GearCommissioning::new(true, false);
        seq.phase = Phase::Compare { mid: 0x00_8000, confirming: false };
        match seq.advance(Some(Response::FramingError)) {
            SequenceStep::Progress(report) => assert!(report.message.contains("restart")),
            _ => panic!("expected a progress report"),
        }
        assert!(matches!(seq.phase, Phase::Randomise));
        assert!(matches!(
            seq.advance(None),
            SequenceStep::SendCommand(Command::Gear(GearCommand::Randomise))
        ));
    }
}
