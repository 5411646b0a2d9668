//! Observes forward/backward frames the Driver did not itself originate
//! (e.g. another master on the same bus) and reports completed exchanges.
//! Decoupled from the Driver's own send path so it is testable by feeding it
//! a sequence of decoded frames and timer ticks without a live transport.

use std::time::Duration;

use crate::codec::{decode, Command, InstanceTypeMap};
use crate::frame::{Backward, Forward, Frame};

/// 62386-103 §9.3: config commands must be repeated within this window to
/// count as a valid send-twice pair; a bare query gets the same grace period
/// to receive its backward frame.
pub const REPEAT_WINDOW: Duration = Duration::from_millis(200);

/// One observed bus exchange, as reported to the bus-traffic callback.
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    /// A one-shot command with no reply expected.
    Command(Command),
    /// A send-twice config command whose repeat arrived in time.
    ConfigConfirmed(Command),
    /// A send-twice config command whose repeat did not arrive, or arrived
    /// wrong.
    ConfigFailed(Command),
    /// A query and the backward frame it received.
    Response(Command, Frame<Backward>),
    /// A query that timed out with no backward frame.
    NoResponse(Command),
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Idle,
    AwaitingRepeat { command: Command, frame: Frame<Forward> },
    AwaitingResponse { command: Command },
}

/// Standalone send-twice/query correlation state machine for frames observed
/// on the bus but not originated by this driver.
pub struct BusWatch {
    state: State,
    device_type: u8,
    last_enable_device_type: u8,
}

impl Default for BusWatch {
    fn default() -> Self {
        BusWatch::new()
    }
}

impl BusWatch {
    pub fn new() -> Self {
        BusWatch { state: State::Idle, device_type: 0, last_enable_device_type: 0 }
    }

    fn decode(&self, frame: Frame<Forward>, instance_types: Option<&dyn InstanceTypeMap>) -> Command {
        decode(frame, self.device_type, instance_types)
    }

    /// A forward frame arrived on the bus.
    pub fn on_forward_frame(
        &mut self,
        frame: Frame<Forward>,
        instance_types: Option<&dyn InstanceTypeMap>,
    ) -> Vec<BusEvent> {
        let command = self.decode(frame, instance_types);
        let mut events = Vec::new();

        match std::mem::replace(&mut self.state, State::Idle) {
            State::AwaitingRepeat { command: first, frame: first_frame } => {
                if frame.as_integer() == first_frame.as_integer() && frame.width() == first_frame.width() {
                    events.push(BusEvent::ConfigConfirmed(first));
                    self.state = State::Idle;
                    self.advance_enable_device_type(&command);
                    self.process_new(command, frame, &mut events);
                    return events;
                }
                events.push(BusEvent::ConfigFailed(first));
                self.process_new(command, frame, &mut events);
                return events;
            }
            State::AwaitingResponse { command: pending } => {
                events.push(BusEvent::NoResponse(pending));
            }
            State::Idle => {}
        }

        self.advance_enable_device_type(&command);
        self.process_new(command, frame, &mut events);
        events
    }

    fn process_new(&mut self, command: Command, frame: Frame<Forward>, events: &mut Vec<BusEvent>) {
        if command.send_twice() {
            self.state = State::AwaitingRepeat { command, frame };
        } else if command.is_query() {
            self.state = State::AwaitingResponse { command };
        } else {
            events.push(BusEvent::Command(command));
        }
    }

    fn advance_enable_device_type(&mut self, command: &Command) {
        if let Command::Gear(crate::command::GearCommand::EnableDeviceType(dt)) = command {
            self.last_enable_device_type = *dt;
            self.device_type = *dt;
        } else {
            self.last_enable_device_type = 0;
        }
    }

    /// A backward frame arrived while awaiting a query's response.
    pub fn on_backward_frame(&mut self, frame: Frame<Backward>) -> Vec<BusEvent> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::AwaitingResponse { command } => vec![BusEvent::Response(command, frame)],
            State::AwaitingRepeat { command, .. } => vec![BusEvent::ConfigFailed(command)],
            State::Idle => Vec::new(),
        }
    }

    /// The repeat/response timer elapsed with nothing new arriving.
    pub fn on_timeout(&mut self) -> Vec<BusEvent> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::AwaitingRepeat { command, .. } => vec![BusEvent::ConfigFailed(command)],
            State::AwaitingResponse { command } => vec![BusEvent::NoResponse(command)],
            State::Idle => Vec::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::GearAddress;
    use crate::command::GearCommand;

    #[test]
    fn query_without_reply_times_out_as_no_response() {
        let mut watch = BusWatch::new();
        let frame = GearCommand::QueryActualLevel(GearAddress::Short(1)).encode().unwrap();
        let events = watch.on_forward_frame(frame, None);
        assert!(events.is_empty());
        let events = watch.on_timeout();
        assert!(matches!(events.as_slice(), [BusEvent::NoResponse(_)]));
        assert!(watch.is_idle());
    }

    #[test]
    fn matching_repeat_confirms_config_command() {
        let mut watch = BusWatch::new();
        let frame = GearCommand::Randomise.encode().unwrap();
        assert!(watch.on_forward_frame(frame, None).is_empty());
        let events = watch.on_forward_frame(frame, None);
        assert!(matches!(events.as_slice(), [BusEvent::ConfigConfirmed(_)]));
    }

    #[test]
    fn mismatched_repeat_fails_the_config_command() {
        let mut watch = BusWatch::new();
        let first = GearCommand::Randomise.encode().unwrap();
        let second = GearCommand::Terminate.encode().unwrap();
        assert!(watch.on_forward_frame(first, None).is_empty());
        let events = watch.on_forward_frame(second, None);
        assert!(matches!(events.as_slice(), [BusEvent::ConfigFailed(_)]));
    }
}
