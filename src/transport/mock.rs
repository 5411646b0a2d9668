//! An in-memory DALI bus: a set of [`FakeGear`] instances that answer
//! decoded commands the way real control gear would, for driving
//! integration tests without hardware.

use std::time::Duration;

use async_trait::async_trait;

use crate::address::GearAddress;
use crate::codec::decode_gear;
use crate::command::GearCommand;
use crate::error::Result;
use crate::frame::{Backward, Forward, Frame};

use super::Transport;

const YES: u8 = 0xff;

/// One piece of fake control gear: enough state to answer commissioning,
/// addressing, and actual-level queries.
pub struct FakeGear {
    short_address: Option<u8>,
    groups: Vec<u8>,
    device_types: Vec<u8>,
    level: u8,
    level_max: u8,
    level_min: u8,
    random_address: u32,
    search_address: u32,
    random_preload: Vec<u32>,
    initialising: bool,
    withdrawn: bool,
    dtr0: u8,
}

impl FakeGear {
    pub fn new(short_address: Option<u8>) -> Self {
        FakeGear {
            short_address,
            groups: Vec::new(),
            device_types: Vec::new(),
            level: 0,
            level_max: 254,
            level_min: 1,
            random_address: 0,
            search_address: 0,
            random_preload: Vec::new(),
            initialising: false,
            withdrawn: false,
            dtr0: 0,
        }
    }

    pub fn with_random_preload(mut self, addr: u32) -> Self {
        self.random_preload.push(addr);
        self
    }

    pub fn with_device_type(mut self, device_type: u8) -> Self {
        self.device_types.push(device_type);
        self
    }

    fn next_random_address(&mut self) -> u32 {
        if !self.random_preload.is_empty() {
            self.random_preload.remove(0)
        } else {
            // A real gear would draw this from a true RNG; fakes never need
            // collision coverage beyond what `random_preload` supplies.
            0x00aa_aaaa
        }
    }

    fn accepts(&self, addr: GearAddress) -> bool {
        match addr {
            GearAddress::Broadcast => true,
            GearAddress::BroadcastUnaddressed => self.short_address.is_none(),
            GearAddress::Short(a) => self.short_address == Some(a),
            GearAddress::Group(g) => self.groups.contains(&g),
        }
    }

    /// Processes one decoded command, returning `Some(byte)` for a backward
    /// frame or `None` for no reply.
    fn handle(&mut self, cmd: &GearCommand) -> Option<u8> {
        use GearCommand::*;
        match *cmd {
            Dapc(addr, level) if self.accepts(addr) => {
                self.level = level.clamp(self.level_min, self.level_max);
                None
            }
            QueryControlGearPresent(addr) if self.accepts(addr) => Some(YES),
            QueryActualLevel(addr) if self.accepts(addr) => Some(self.level),
            Dtr0(v) => {
                self.dtr0 = v;
                None
            }
            QueryDeviceType(addr) if self.accepts(addr) => match self.device_types.len() {
                0 => Some(254),
                1 => Some(self.device_types[0]),
                _ => Some(255),
            },
            Terminate => {
                self.initialising = false;
                self.withdrawn = false;
                None
            }
            Initialise(param) => {
                if param == 0xff || self.short_address.is_none() {
                    self.initialising = true;
                    self.withdrawn = false;
                }
                None
            }
            Randomise => {
                self.random_address = self.next_random_address();
                None
            }
            Compare => {
                if self.initialising && !self.withdrawn && self.random_address <= self.search_address {
                    Some(YES)
                } else {
                    None
                }
            }
            Withdraw => {
                if self.initialising && self.random_address == self.search_address {
                    self.withdrawn = true;
                }
                None
            }
            SearchAddrH(b) => {
                self.search_address = (self.search_address & 0x00ff_ff) | ((b as u32) << 16);
                None
            }
            SearchAddrM(b) => {
                self.search_address = (self.search_address & 0xff00_ff) | ((b as u32) << 8);
                None
            }
            SearchAddrL(b) => {
                self.search_address = (self.search_address & 0xffff_00) | b as u32;
                None
            }
            ProgramShortAddress(wire) => {
                if self.initialising && self.random_address == self.search_address {
                    self.short_address = if wire == 0xff { None } else { Some((wire & 0x7e) >> 1) };
                }
                None
            }
            VerifyShortAddress(wire) => {
                let addr = (wire & 0x7e) >> 1;
                if self.initialising && self.short_address == Some(addr) {
                    Some(YES)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// A fake DALI bus over a fixed population of [`FakeGear`]. Multiple
/// simultaneous responses become a framing error, mirroring a real bus
/// collision.
pub struct MockBus {
    gear: Vec<FakeGear>,
    device_type: u8,
}

impl MockBus {
    pub fn new(gear: Vec<FakeGear>) -> Self {
        MockBus { gear, device_type: 0 }
    }
}

#[async_trait]
impl Transport for MockBus {
    async fn send(
        &mut self,
        frame: Frame<Forward>,
        _response_window: Duration,
    ) -> Result<Option<Frame<Backward>>> {
        let command = decode_gear(frame, self.device_type);
        if let GearCommand::EnableDeviceType(dt) = command {
            self.device_type = dt;
        }
        let responses: Vec<u8> =
            self.gear.iter_mut().filter_map(|g| g.handle(&command)).collect();
        let response = match responses.len() {
            0 => None,
            1 => Some(Frame::<Backward>::new(8, responses[0] as u64)?),
            _ => Some(Frame::<Backward>::with_error(8, responses[0] as u64)?),
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::GearAddress;

    #[tokio::test]
    async fn query_control_gear_present_replies_yes() {
        let mut bus = MockBus::new(vec![FakeGear::new(Some(3))]);
        let frame = GearCommand::QueryControlGearPresent(GearAddress::Short(3)).encode().unwrap();
        let response = bus.send(frame, Duration::from_millis(25)).await.unwrap();
        assert_eq!(response.unwrap().as_integer(), YES as u32);
    }

    #[tokio::test]
    async fn two_gear_colliding_on_compare_reports_framing_error() {
        let mut gear_a = FakeGear::new(None);
        gear_a.initialising = true;
        gear_a.random_address = 5;
        gear_a.search_address = 10;
        let mut gear_b = FakeGear::new(None);
        gear_b.initialising = true;
        gear_b.random_address = 7;
        gear_b.search_address = 10;
        let mut bus = MockBus::new(vec![gear_a, gear_b]);
        let frame = GearCommand::Compare.encode().unwrap();
        let response = bus.send(frame, Duration::from_millis(25)).await.unwrap();
        assert!(response.unwrap().is_error());
    }
}
