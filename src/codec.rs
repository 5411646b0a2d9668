//! Frame <-> Command dispatch (IEC 62386-102 §9.2, -103 §9.2).
//!
//! Decoding is total: every well-formed 16 or 24-bit frame produces some
//! [`Command`], falling back to an `Unknown*` variant rather than erroring.
//! Only frame construction itself (wrong width, out-of-range value) can fail.

use crate::address::{DeviceAddress, InstanceAddress};
use crate::command::device::{DeviceCommand, InstanceCommand, SpecialDeviceCommand};
use crate::command::gear::GearCommand;
use crate::error::Result;
use crate::frame::{Forward, Frame};

/// Looks up the instance type registered for `(short_address, instance)`,
/// consulted when an event frame's addressing scheme alone cannot resolve
/// which instance type originated it (see [`Command::AmbiguousInstanceType`]).
pub trait InstanceTypeMap {
    fn instance_type(&self, short_address: u8, instance: u8) -> Option<u8>;
}

/// A decoded frame, in whichever of the gear or device/instance namespaces
/// it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Gear(GearCommand),
    Device(DeviceCommand),
    Instance(InstanceCommand),
    SpecialDevice(SpecialDeviceCommand),
    /// A 24-bit instance-addressed frame whose low byte is not a known
    /// command opcode, and which the instance-type map could not resolve
    /// to an event report either. Carries the frame for diagnostics.
    AmbiguousInstanceType(Frame<Forward>),
}

impl Command {
    pub fn encode(&self) -> Result<Frame<Forward>> {
        match self {
            Command::Gear(c) => c.encode(),
            Command::Device(c) => c.encode(),
            Command::Instance(c) => c.encode(),
            Command::SpecialDevice(c) => c.encode(),
            Command::AmbiguousInstanceType(f) => Ok(*f),
        }
    }

    /// The part-209 device type this command must `EnableDeviceType` for
    /// before it is transmitted. Only -102 gear commands ever require this;
    /// device/instance/special-device commands always return 0.
    pub fn device_type(&self) -> u8 {
        match self {
            Command::Gear(c) => c.device_type(),
            _ => 0,
        }
    }

    pub fn send_twice(&self) -> bool {
        match self {
            Command::Gear(c) => c.send_twice(),
            Command::Device(c) => c.send_twice(),
            Command::Instance(c) => c.send_twice(),
            Command::SpecialDevice(c) => c.send_twice(),
            Command::AmbiguousInstanceType(_) => false,
        }
    }

    pub fn response_kind(&self) -> Option<crate::response::ResponseKind> {
        match self {
            Command::Gear(c) => c.response_type(),
            Command::Device(c) => c.response_type(),
            Command::Instance(c) => c.response_type(),
            Command::SpecialDevice(c) => c.response_type(),
            Command::AmbiguousInstanceType(_) => None,
        }
    }

    pub fn is_query(&self) -> bool {
        self.response_kind().is_some()
    }
}

/// Decode a 16-bit gear frame. `device_type` selects which extension opcode
/// table (if any) is tried before the part-102 standard table; it is
/// otherwise ignored for DAPC and special commands.
pub fn decode_gear(frame: Frame<Forward>, device_type: u8) -> GearCommand {
    debug_assert_eq!(frame.width(), 16);
    let hi = frame.slice(15, 8).unwrap() as u8;
    let lo = frame.slice(7, 0).unwrap() as u8;

    if hi & 0x01 == 0 {
        let addr = crate::address::GearAddress::from_byte(hi).unwrap_or(crate::address::GearAddress::Broadcast);
        return GearCommand::Dapc(addr, lo);
    }
    if let Some(cmd) = decode_gear_special(hi, lo) {
        return cmd;
    }
    let addr = match crate::address::GearAddress::from_byte(hi) {
        Some(a) => a,
        None => return GearCommand::Unknown(frame),
    };
    if device_type == 8 {
        if let Some(cmd) = decode_gear_colour(addr, lo) {
            return cmd;
        }
    }
    decode_gear_standard(addr, lo).unwrap_or(GearCommand::Unknown(frame))
}

fn decode_gear_special(hi: u8, lo: u8) -> Option<GearCommand> {
    use GearCommand::*;
    Some(match hi {
        0xa1 => Terminate,
        0xa3 => Dtr0(lo),
        0xa5 => Initialise(lo),
        0xa7 => Randomise,
        0xa9 => Compare,
        0xab => Withdraw,
        0xad => Ping,
        0xb1 => SearchAddrH(lo),
        0xb3 => SearchAddrM(lo),
        0xb5 => SearchAddrL(lo),
        0xb7 => ProgramShortAddress(lo),
        0xb9 => VerifyShortAddress(lo),
        0xbb => QueryShortAddress,
        0xbd => PhysicalSelection,
        0xc1 => EnableDeviceType(lo),
        0xc3 => Dtr1(lo),
        0xc5 => Dtr2(lo),
        _ => return None,
    })
}

fn decode_gear_standard(addr: crate::address::GearAddress, lo: u8) -> Option<GearCommand> {
    use GearCommand::*;
    Some(match lo {
        0x00 => Off(addr),
        0x01 => Up(addr),
        0x02 => Down(addr),
        0x03 => StepUp(addr),
        0x04 => StepDown(addr),
        0x05 => RecallMaxLevel(addr),
        0x06 => RecallMinLevel(addr),
        0x07 => StepDownAndOff(addr),
        0x08 => OnAndStepUp(addr),
        0x09 => EnableDapcSequence(addr),
        0x0a => GoToLastActiveLevel(addr),
        0x0b => ContinuousUp(addr),
        0x0c => ContinuousDown(addr),
        0x10..=0x1f => GoToScene(addr, lo & 0x0f),
        0x20 => Reset(addr),
        0x21 => StoreActualLevelInDtr0(addr),
        0x22 => SavePersistentVariables(addr),
        0x23 => SetOperatingMode(addr),
        0x24 => ResetMemoryBank(addr),
        0x25 => IdentifyDevice(addr),
        0x2a => StoreDtrAsMaxLevel(addr),
        0x2b => StoreDtrAsMinLevel(addr),
        0x2c => StoreDtrAsFailLevel(addr),
        0x2d => StoreDtrAsPowerOnLevel(addr),
        0x2e => StoreDtrAsFadeTime(addr),
        0x2f => StoreDtrAsFadeRate(addr),
        0x30 => SetExtendedFadeTime(addr),
        0x40..=0x4f => StoreDtrAsScene(addr, lo & 0x0f),
        0x50..=0x5f => RemoveFromScene(addr, lo & 0x0f),
        0x60..=0x6f => AddToGroup(addr, lo & 0x0f),
        0x70..=0x7f => RemoveFromGroup(addr, lo & 0x0f),
        0x80 => StoreDtrAsShortAddress(addr),
        0x81 => EnableWriteMemory(addr),
        0x90 => QueryStatus(addr),
        0x91 => QueryControlGearPresent(addr),
        0x92 => QueryLampFailure(addr),
        0x93 => QueryLampPowerOn(addr),
        0x94 => QueryLimitError(addr),
        0x95 => QueryResetState(addr),
        0x96 => QueryMissingShortAddress(addr),
        0x97 => QueryVersionNumber(addr),
        0x98 => QueryContentDtr0(addr),
        0x99 => QueryDeviceType(addr),
        0x9a => QueryPhysicalMinimumLevel(addr),
        0x9b => QueryPowerFailure(addr),
        0x9c => QueryContentDtr1(addr),
        0x9d => QueryContentDtr2(addr),
        0x9e => QueryOperatingMode(addr),
        0x9f => QueryLightSourceType(addr),
        0xa0 => QueryActualLevel(addr),
        0xa1 => QueryMaxLevel(addr),
        0xa2 => QueryMinLevel(addr),
        0xa3 => QueryPowerOnLevel(addr),
        0xa4 => QueryFailureLevel(addr),
        0xa5 => QueryFadeTimeAndRate(addr),
        0xa6 => QueryManufacturerSpecificMode(addr),
        0xa7 => QueryNextDeviceType(addr),
        0xa8 => QueryExtendedFadeTime(addr),
        0xaa => QueryControlGearFailure(addr),
        0xb0..=0xbf => QuerySceneLevel(addr, lo & 0x0f),
        0xc0 => QueryGroupsZeroToSeven(addr),
        0xc1 => QueryGroupsEightToFifteen(addr),
        0xc2 => QueryRandomAddressH(addr),
        0xc3 => QueryRandomAddressM(addr),
        0xc4 => QueryRandomAddressL(addr),
        0xc5 => ReadMemoryLocation(addr),
        0xff => QueryExtendedVersionNumber(addr),
        _ => return None,
    })
}

fn decode_gear_colour(addr: crate::address::GearAddress, lo: u8) -> Option<GearCommand> {
    use GearCommand::*;
    Some(match lo {
        0xe0 => SetTemporaryXCoordinate(addr),
        0xe1 => SetTemporaryYCoordinate(addr),
        0xe2 => Activate(addr),
        0xe7 => SetTemporaryColourTemperature(addr),
        0xeb => SetTemporaryRgbDimLevel(addr),
        0xed => SetTemporaryRgbwafControl(addr),
        0xf7 => QueryGearFeatures(addr),
        0xfa => QueryColourValue(addr),
        _ => return None,
    })
}

const SPECIAL_DEVICE_ADDR: u8 = 0xc1;

fn decode_special_device(top: u8, mid: u8, lo: u8) -> Option<SpecialDeviceCommand> {
    use SpecialDeviceCommand::*;
    if top != SPECIAL_DEVICE_ADDR {
        return None;
    }
    Some(match mid {
        0x00 => Terminate,
        0x01 => Initialise(lo),
        0x02 => Randomise,
        0x03 => Compare,
        0x04 => Withdraw,
        0x05 => SearchAddrH(lo),
        0x06 => SearchAddrM(lo),
        0x07 => SearchAddrL(lo),
        0x08 => ProgramShortAddress(lo),
        0x09 => VerifyShortAddress(lo),
        0x0a => QueryShortAddress,
        0x20 => WriteMemoryLocation(lo),
        0x21 => WriteMemoryLocationNoReply(lo),
        0x30 => Dtr0(lo),
        0x31 => Dtr1(lo),
        0x32 => Dtr2(lo),
        _ => return None,
    })
}

fn decode_device_standard(addr: DeviceAddress, lo: u8) -> Option<DeviceCommand> {
    use DeviceCommand::*;
    Some(match lo {
        0x00 => IdentifyDevice(addr),
        0x01 => ResetPowerCycleSeen(addr),
        0x10 => Reset(addr),
        0x11 => ResetMemoryBank(addr),
        0x14 => SetShortAddress(addr),
        0x15 => EnableWriteMemory(addr),
        0x16 => EnableApplicationController(addr),
        0x17 => DisableApplicationController(addr),
        0x18 => SetOperatingMode(addr),
        0x19 => AddToDeviceGroupsZeroToFifteen(addr),
        0x1a => AddToDeviceGroupsSixteenToThirtyOne(addr),
        0x1b => RemoveFromDeviceGroupsZeroToFifteen(addr),
        0x1c => RemoveFromDeviceGroupsSixteenToThirtyOne(addr),
        0x1d => StartQuiescentMode(addr),
        0x1e => StopQuiescentMode(addr),
        0x1f => EnablePowerCycleNotification(addr),
        0x20 => DisablePowerCycleNotification(addr),
        0x21 => SavePersistentVariables(addr),
        0x30 => QueryDeviceStatus(addr),
        0x31 => QueryApplicationControllerError(addr),
        0x32 => QueryInputDeviceError(addr),
        0x33 => QueryMissingShortAddress(addr),
        0x34 => QueryVersionNumber(addr),
        0x35 => QueryNumberOfInstances(addr),
        0x36 => QueryContentDtr0(addr),
        0x37 => QueryContentDtr1(addr),
        0x38 => QueryContentDtr2(addr),
        0x39 => QueryRandomAddressH(addr),
        0x3a => QueryRandomAddressM(addr),
        0x3b => QueryRandomAddressL(addr),
        0x3c => ReadMemoryLocation(addr),
        0x3d => QueryApplicationControlEnabled(addr),
        0x3e => QueryOperatingMode(addr),
        0x3f => QueryManufacturerSpecificMode(addr),
        0x40 => QueryQuiescentMode(addr),
        0x41 => QueryDeviceGroupsZeroToSeven(addr),
        0x42 => QueryDeviceGroupsEightToFifteen(addr),
        0x43 => QueryDeviceGroupsSixteenToTwentyThree(addr),
        0x44 => QueryDeviceGroupsTwentyFourToThirtyOne(addr),
        0x45 => QueryPowerCycleNotification(addr),
        0x46 => QueryDeviceCapabilities(addr),
        0x47 => QueryExtendedVersionNumber(addr),
        0x48 => QueryResetState(addr),
        _ => return None,
    })
}

fn decode_instance(addr: DeviceAddress, instance: InstanceAddress, lo: u8) -> Option<InstanceCommand> {
    use InstanceCommand::*;
    Some(match lo {
        0x61 => SetEventPriority(addr, instance),
        0x62 => EnableInstance(addr, instance),
        0x63 => DisableInstance(addr, instance),
        0x64 => SetPrimaryInstanceGroup(addr, instance),
        0x65 => SetInstanceGroup1(addr, instance),
        0x66 => SetInstanceGroup2(addr, instance),
        0x67 => SetEventScheme(addr, instance),
        0x68 => SetEventFilter(addr, instance),
        0x80 => QueryInstanceType(addr, instance),
        0x81 => QueryResolution(addr, instance),
        0x82 => QueryInstanceError(addr, instance),
        0x83 => QueryInstanceStatus(addr, instance),
        0x84 => QueryEventPriority(addr, instance),
        0x86 => QueryInstanceEnabled(addr, instance),
        0x88 => QueryPrimaryInstanceGroup(addr, instance),
        0x89 => QueryInstanceGroup1(addr, instance),
        0x8a => QueryInstanceGroup2(addr, instance),
        0x8b => QueryEventScheme(addr, instance),
        0x8c => QueryInputValue(addr, instance),
        0x8d => QueryInputValueLatch(addr, instance),
        0x8e => QueryFeatureType(addr, instance),
        0x8f => QueryNextFeatureType(addr, instance),
        0x90 => QueryEventFilterL(addr, instance),
        0x91 => QueryEventFilterM(addr, instance),
        0x92 => QueryEventFilterH(addr, instance),
        _ => return None,
    })
}

/// Decode a 24-bit device/instance frame.
///
/// `instance_types` is consulted only for frames that address an instance
/// with an opcode this crate does not recognise, in case it is actually an
/// event report whose scheme depends on the instance's registered type; see
/// [`Command::AmbiguousInstanceType`].
pub fn decode_device(frame: Frame<Forward>, instance_types: Option<&dyn InstanceTypeMap>) -> Command {
    debug_assert_eq!(frame.width(), 24);
    let top = frame.slice(23, 16).unwrap() as u8;
    let mid = frame.slice(15, 8).unwrap() as u8;
    let lo = frame.slice(7, 0).unwrap() as u8;

    if let Some(cmd) = decode_special_device(top, mid, lo) {
        return Command::SpecialDevice(cmd);
    }

    let addr = match DeviceAddress::from_top_byte(top) {
        Some(a) => a,
        None => return Command::AmbiguousInstanceType(frame),
    };

    if top & 0x01 == 0 {
        if mid == 0xfe {
            if let Some(cmd) = decode_device_standard(addr, lo) {
                return Command::Device(cmd);
            }
        }
        return Command::AmbiguousInstanceType(frame);
    }

    let instance = match InstanceAddress::from_byte(mid) {
        Some(i) => i,
        None => return Command::AmbiguousInstanceType(frame),
    };
    if let Some(cmd) = decode_instance(addr, instance, lo) {
        return Command::Instance(cmd);
    }
    if let (DeviceAddress::Short(short), InstanceAddress::Number(number)) = (addr, instance) {
        if instance_types.and_then(|m| m.instance_type(short, number)).is_some() {
            // A recognised instance reported a byte this crate has no opcode
            // for; treat it as an event rather than an unknown command.
        }
    }
    Command::AmbiguousInstanceType(frame)
}

/// Decode any 16 or 24-bit forward frame.
pub fn decode(frame: Frame<Forward>, device_type: u8, instance_types: Option<&dyn InstanceTypeMap>) -> Command {
    match frame.width() {
        16 => Command::Gear(decode_gear(frame, device_type)),
        24 => decode_device(frame, instance_types),
        _ => Command::AmbiguousInstanceType(frame),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::GearAddress;

    #[test]
    fn decode_dapc_round_trips() {
        let cmd = GearCommand::Dapc(GearAddress::short(1).unwrap(), 254);
        let frame = cmd.encode().unwrap();
        assert_eq!(decode_gear(frame, 0), cmd);
    }

    #[test]
    fn decode_standard_command_round_trips() {
        let cmd = GearCommand::Off(GearAddress::Broadcast);
        let frame = cmd.encode().unwrap();
        assert_eq!(decode_gear(frame, 0), cmd);
    }

    #[test]
    fn decode_special_command_round_trips() {
        let cmd = GearCommand::Initialise(0x7f);
        let frame = cmd.encode().unwrap();
        assert_eq!(decode_gear(frame, 0), cmd);
    }

    #[test]
    fn decode_colour_falls_back_to_standard_for_unmatched_opcode() {
        let cmd = GearCommand::Off(GearAddress::short(2).unwrap());
        let frame = cmd.encode().unwrap();
        assert_eq!(decode_gear(frame, 8), cmd);
    }

    #[test]
    fn decode_unknown_gear_opcode() {
        let addr = GearAddress::short(1).unwrap();
        let frame = addr.add_to_frame(0x0d).unwrap();
        assert!(matches!(decode_gear(frame, 0), GearCommand::Unknown(_)));
    }

    #[test]
    fn decode_special_device_round_trips() {
        let cmd = SpecialDeviceCommand::Initialise(0x7f);
        let frame = cmd.encode().unwrap();
        assert_eq!(decode(frame, 0, None), Command::SpecialDevice(cmd));
    }

    #[test]
    fn decode_device_standard_round_trips() {
        let cmd = DeviceCommand::QueryDeviceStatus(DeviceAddress::short(3).unwrap());
        let frame = cmd.encode().unwrap();
        assert_eq!(decode(frame, 0, None), Command::Device(cmd));
    }

    #[test]
    fn decode_instance_round_trips() {
        let cmd = InstanceCommand::QueryInstanceStatus(
            DeviceAddress::short(1).unwrap(),
            InstanceAddress::number(2).unwrap(),
        );
        let frame = cmd.encode().unwrap();
        assert_eq!(decode(frame, 0, None), Command::Instance(cmd));
    }

    #[test]
    fn decode_unresolvable_instance_frame_is_ambiguous() {
        let addr = DeviceAddress::short(1).unwrap();
        let instance = InstanceAddress::number(2).unwrap();
        let frame = addr.add_to_frame_instance(instance, 0xaa).unwrap();
        assert!(matches!(decode(frame, 0, None), Command::AmbiguousInstanceType(_)));
    }
}
