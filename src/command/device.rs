//! 24-bit device and instance commands (IEC 62386-103).

use crate::address::{DeviceAddress, InstanceAddress};
use crate::error::Result;
use crate::frame::{Forward, Frame};
use crate::response::ResponseKind;

const DEVICE_STATUS_FLAGS: &[&str] = &[
    "reset state",
    "power cycle seen",
    "application controller error",
    "application controller active",
    "short address is mask",
    "quiescent mode enabled",
    "input device error",
];

const CAPABILITIES_FLAGS: &[&str] = &[
    "",
    "",
    "",
    "",
    "",
    "application controller always active",
    "number of instances greater than zero",
    "application controller present",
];

/// A 24-bit device-addressed standard command (no specific instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    IdentifyDevice(DeviceAddress),
    ResetPowerCycleSeen(DeviceAddress),
    Reset(DeviceAddress),
    ResetMemoryBank(DeviceAddress),
    SetShortAddress(DeviceAddress),
    EnableWriteMemory(DeviceAddress),
    EnableApplicationController(DeviceAddress),
    DisableApplicationController(DeviceAddress),
    SetOperatingMode(DeviceAddress),
    AddToDeviceGroupsZeroToFifteen(DeviceAddress),
    AddToDeviceGroupsSixteenToThirtyOne(DeviceAddress),
    RemoveFromDeviceGroupsZeroToFifteen(DeviceAddress),
    RemoveFromDeviceGroupsSixteenToThirtyOne(DeviceAddress),
    StartQuiescentMode(DeviceAddress),
    StopQuiescentMode(DeviceAddress),
    EnablePowerCycleNotification(DeviceAddress),
    DisablePowerCycleNotification(DeviceAddress),
    SavePersistentVariables(DeviceAddress),

    QueryDeviceStatus(DeviceAddress),
    QueryApplicationControllerError(DeviceAddress),
    QueryInputDeviceError(DeviceAddress),
    QueryMissingShortAddress(DeviceAddress),
    QueryVersionNumber(DeviceAddress),
    QueryNumberOfInstances(DeviceAddress),
    QueryContentDtr0(DeviceAddress),
    QueryContentDtr1(DeviceAddress),
    QueryContentDtr2(DeviceAddress),
    QueryRandomAddressH(DeviceAddress),
    QueryRandomAddressM(DeviceAddress),
    QueryRandomAddressL(DeviceAddress),
    ReadMemoryLocation(DeviceAddress),
    QueryApplicationControlEnabled(DeviceAddress),
    QueryOperatingMode(DeviceAddress),
    QueryManufacturerSpecificMode(DeviceAddress),
    QueryQuiescentMode(DeviceAddress),
    QueryDeviceGroupsZeroToSeven(DeviceAddress),
    QueryDeviceGroupsEightToFifteen(DeviceAddress),
    QueryDeviceGroupsSixteenToTwentyThree(DeviceAddress),
    QueryDeviceGroupsTwentyFourToThirtyOne(DeviceAddress),
    QueryPowerCycleNotification(DeviceAddress),
    QueryDeviceCapabilities(DeviceAddress),
    QueryExtendedVersionNumber(DeviceAddress),
    QueryResetState(DeviceAddress),

    Unknown(Frame<Forward>),
}

impl DeviceCommand {
    pub fn is_config(&self) -> bool {
        use DeviceCommand::*;
        matches!(
            self,
            IdentifyDevice(_)
                | ResetPowerCycleSeen(_)
                | Reset(_)
                | ResetMemoryBank(_)
                | SetShortAddress(_)
                | EnableWriteMemory(_)
                | EnableApplicationController(_)
                | DisableApplicationController(_)
                | SetOperatingMode(_)
                | AddToDeviceGroupsZeroToFifteen(_)
                | AddToDeviceGroupsSixteenToThirtyOne(_)
                | RemoveFromDeviceGroupsZeroToFifteen(_)
                | RemoveFromDeviceGroupsSixteenToThirtyOne(_)
                | StartQuiescentMode(_)
                | StopQuiescentMode(_)
                | EnablePowerCycleNotification(_)
                | DisablePowerCycleNotification(_)
                | SavePersistentVariables(_)
        )
    }

    pub fn send_twice(&self) -> bool {
        self.is_config()
    }

    pub fn uses_dtr0(&self) -> bool {
        matches!(
            self,
            DeviceCommand::SetShortAddress(_)
                | DeviceCommand::SetOperatingMode(_)
                | DeviceCommand::ResetMemoryBank(_)
                | DeviceCommand::QueryContentDtr0(_)
                | DeviceCommand::ReadMemoryLocation(_)
                | DeviceCommand::QueryExtendedVersionNumber(_)
        )
    }

    pub fn uses_dtr1(&self) -> bool {
        matches!(self, DeviceCommand::QueryContentDtr1(_) | DeviceCommand::ReadMemoryLocation(_))
    }

    pub fn uses_dtr2(&self) -> bool {
        matches!(self, DeviceCommand::QueryContentDtr2(_))
    }

    pub fn response_type(&self) -> Option<ResponseKind> {
        use DeviceCommand::*;
        Some(match self {
            QueryDeviceStatus(_) => ResponseKind::Bitmap(DEVICE_STATUS_FLAGS),
            QueryDeviceCapabilities(_) => ResponseKind::Bitmap(CAPABILITIES_FLAGS),
            QueryApplicationControllerError(_) | QueryInputDeviceError(_)
            | QueryMissingShortAddress(_) | QueryApplicationControlEnabled(_)
            | QueryManufacturerSpecificMode(_) | QueryQuiescentMode(_)
            | QueryResetState(_) => ResponseKind::YesNo,
            QueryVersionNumber(_) | QueryNumberOfInstances(_) | QueryContentDtr0(_)
            | QueryContentDtr1(_) | QueryContentDtr2(_) | QueryRandomAddressH(_)
            | QueryRandomAddressM(_) | QueryRandomAddressL(_) | ReadMemoryLocation(_)
            | QueryOperatingMode(_) | QueryDeviceGroupsZeroToSeven(_)
            | QueryDeviceGroupsEightToFifteen(_) | QueryDeviceGroupsSixteenToTwentyThree(_)
            | QueryDeviceGroupsTwentyFourToThirtyOne(_) | QueryPowerCycleNotification(_)
            | QueryExtendedVersionNumber(_) => ResponseKind::Numeric,
            _ => return None,
        })
    }

    pub fn encode(&self) -> Result<Frame<Forward>> {
        use DeviceCommand::*;
        let std = |addr: &DeviceAddress, opcode: u8| addr.add_to_frame_device(opcode);
        match self {
            IdentifyDevice(a) => std(a, 0x00),
            ResetPowerCycleSeen(a) => std(a, 0x01),
            Reset(a) => std(a, 0x10),
            ResetMemoryBank(a) => std(a, 0x11),
            SetShortAddress(a) => std(a, 0x14),
            EnableWriteMemory(a) => std(a, 0x15),
            EnableApplicationController(a) => std(a, 0x16),
            DisableApplicationController(a) => std(a, 0x17),
            SetOperatingMode(a) => std(a, 0x18),
            AddToDeviceGroupsZeroToFifteen(a) => std(a, 0x19),
            AddToDeviceGroupsSixteenToThirtyOne(a) => std(a, 0x1a),
            RemoveFromDeviceGroupsZeroToFifteen(a) => std(a, 0x1b),
            RemoveFromDeviceGroupsSixteenToThirtyOne(a) => std(a, 0x1c),
            StartQuiescentMode(a) => std(a, 0x1d),
            StopQuiescentMode(a) => std(a, 0x1e),
            EnablePowerCycleNotification(a) => std(a, 0x1f),
            DisablePowerCycleNotification(a) => std(a, 0x20),
            SavePersistentVariables(a) => std(a, 0x21),

            QueryDeviceStatus(a) => std(a, 0x30),
            QueryApplicationControllerError(a) => std(a, 0x31),
            QueryInputDeviceError(a) => std(a, 0x32),
            QueryMissingShortAddress(a) => std(a, 0x33),
            QueryVersionNumber(a) => std(a, 0x34),
            QueryNumberOfInstances(a) => std(a, 0x35),
            QueryContentDtr0(a) => std(a, 0x36),
            QueryContentDtr1(a) => std(a, 0x37),
            QueryContentDtr2(a) => std(a, 0x38),
            QueryRandomAddressH(a) => std(a, 0x39),
            QueryRandomAddressM(a) => std(a, 0x3a),
            QueryRandomAddressL(a) => std(a, 0x3b),
            ReadMemoryLocation(a) => std(a, 0x3c),
            QueryApplicationControlEnabled(a) => std(a, 0x3d),
            QueryOperatingMode(a) => std(a, 0x3e),
            QueryManufacturerSpecificMode(a) => std(a, 0x3f),
            QueryQuiescentMode(a) => std(a, 0x40),
            QueryDeviceGroupsZeroToSeven(a) => std(a, 0x41),
            QueryDeviceGroupsEightToFifteen(a) => std(a, 0x42),
            QueryDeviceGroupsSixteenToTwentyThree(a) => std(a, 0x43),
            QueryDeviceGroupsTwentyFourToThirtyOne(a) => std(a, 0x44),
            QueryPowerCycleNotification(a) => std(a, 0x45),
            QueryDeviceCapabilities(a) => std(a, 0x46),
            QueryExtendedVersionNumber(a) => std(a, 0x47),
            QueryResetState(a) => std(a, 0x48),

            Unknown(f) => Ok(*f),
        }
    }
}

/// A 24-bit instance-addressed command, targeting one input/sensor instance
/// on a control device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceCommand {
    SetEventPriority(DeviceAddress, InstanceAddress),
    EnableInstance(DeviceAddress, InstanceAddress),
    DisableInstance(DeviceAddress, InstanceAddress),
    SetPrimaryInstanceGroup(DeviceAddress, InstanceAddress),
    SetInstanceGroup1(DeviceAddress, InstanceAddress),
    SetInstanceGroup2(DeviceAddress, InstanceAddress),
    SetEventScheme(DeviceAddress, InstanceAddress),
    SetEventFilter(DeviceAddress, InstanceAddress),
    QueryInstanceType(DeviceAddress, InstanceAddress),
    QueryResolution(DeviceAddress, InstanceAddress),
    QueryInstanceError(DeviceAddress, InstanceAddress),
    QueryInstanceStatus(DeviceAddress, InstanceAddress),
    QueryEventPriority(DeviceAddress, InstanceAddress),
    QueryInstanceEnabled(DeviceAddress, InstanceAddress),
    QueryPrimaryInstanceGroup(DeviceAddress, InstanceAddress),
    QueryInstanceGroup1(DeviceAddress, InstanceAddress),
    QueryInstanceGroup2(DeviceAddress, InstanceAddress),
    QueryEventScheme(DeviceAddress, InstanceAddress),
    QueryInputValue(DeviceAddress, InstanceAddress),
    QueryInputValueLatch(DeviceAddress, InstanceAddress),
    QueryFeatureType(DeviceAddress, InstanceAddress),
    QueryNextFeatureType(DeviceAddress, InstanceAddress),
    QueryEventFilterL(DeviceAddress, InstanceAddress),
    QueryEventFilterM(DeviceAddress, InstanceAddress),
    QueryEventFilterH(DeviceAddress, InstanceAddress),
}

/// Event addressing scheme declared by `SetEventScheme`/`QueryEventScheme`
/// (IEC 62386-103 Table 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventScheme {
    Instance = 0,
    Device = 1,
    DeviceInstance = 2,
    DeviceGroup = 3,
    InstanceGroup = 4,
}

impl EventScheme {
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => EventScheme::Instance,
            1 => EventScheme::Device,
            2 => EventScheme::DeviceInstance,
            3 => EventScheme::DeviceGroup,
            4 => EventScheme::InstanceGroup,
            _ => return None,
        })
    }
}

fn event_scheme_name(v: u8) -> &'static str {
    match EventScheme::from_u8(v) {
        Some(EventScheme::Instance) => "instance",
        Some(EventScheme::Device) => "device",
        Some(EventScheme::DeviceInstance) => "device_instance",
        Some(EventScheme::DeviceGroup) => "device_group",
        Some(EventScheme::InstanceGroup) => "instance_group",
        None => crate::response::ENUM_RESPONSE_ERROR,
    }
}

impl InstanceCommand {
    pub fn is_config(&self) -> bool {
        use InstanceCommand::*;
        matches!(
            self,
            SetEventPriority(..)
                | EnableInstance(..)
                | DisableInstance(..)
                | SetPrimaryInstanceGroup(..)
                | SetInstanceGroup1(..)
                | SetInstanceGroup2(..)
                | SetEventScheme(..)
                | SetEventFilter(..)
        )
    }

    pub fn send_twice(&self) -> bool {
        self.is_config()
    }

    pub fn response_type(&self) -> Option<ResponseKind> {
        use InstanceCommand::*;
        Some(match self {
            QueryInstanceError(..) | QueryInstanceEnabled(..) => ResponseKind::YesNo,
            QueryInstanceStatus(..) => ResponseKind::Bitmap(&["instance error", "instance active"]),
            QueryEventScheme(..) => ResponseKind::Enum(event_scheme_name),
            QueryInstanceType(..) | QueryResolution(..) | QueryEventPriority(..)
            | QueryPrimaryInstanceGroup(..) | QueryInstanceGroup1(..)
            | QueryInstanceGroup2(..) | QueryInputValue(..) | QueryInputValueLatch(..)
            | QueryFeatureType(..) | QueryNextFeatureType(..) | QueryEventFilterL(..)
            | QueryEventFilterM(..) | QueryEventFilterH(..) => ResponseKind::Numeric,
            _ => return None,
        })
    }

    pub fn encode(&self) -> Result<Frame<Forward>> {
        use InstanceCommand::*;
        let (addr, inst, opcode) = match self {
            SetEventPriority(a, i) => (a, i, 0x61),
            EnableInstance(a, i) => (a, i, 0x62),
            DisableInstance(a, i) => (a, i, 0x63),
            SetPrimaryInstanceGroup(a, i) => (a, i, 0x64),
            SetInstanceGroup1(a, i) => (a, i, 0x65),
            SetInstanceGroup2(a, i) => (a, i, 0x66),
            SetEventScheme(a, i) => (a, i, 0x67),
            SetEventFilter(a, i) => (a, i, 0x68),
            QueryInstanceType(a, i) => (a, i, 0x80),
            QueryResolution(a, i) => (a, i, 0x81),
            QueryInstanceError(a, i) => (a, i, 0x82),
            QueryInstanceStatus(a, i) => (a, i, 0x83),
            QueryEventPriority(a, i) => (a, i, 0x84),
            QueryInstanceEnabled(a, i) => (a, i, 0x86),
            QueryPrimaryInstanceGroup(a, i) => (a, i, 0x88),
            QueryInstanceGroup1(a, i) => (a, i, 0x89),
            QueryInstanceGroup2(a, i) => (a, i, 0x8a),
            QueryEventScheme(a, i) => (a, i, 0x8b),
            QueryInputValue(a, i) => (a, i, 0x8c),
            QueryInputValueLatch(a, i) => (a, i, 0x8d),
            QueryFeatureType(a, i) => (a, i, 0x8e),
            QueryNextFeatureType(a, i) => (a, i, 0x8f),
            QueryEventFilterL(a, i) => (a, i, 0x90),
            QueryEventFilterM(a, i) => (a, i, 0x91),
            QueryEventFilterH(a, i) => (a, i, 0x92),
        };
        addr.add_to_frame_instance(*inst, opcode)
    }
}

/// A 24-bit special device command: fixed `(0xC1, instance_selector)`
/// prefix, addressed to all devices, with a free opcode-carrying low byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialDeviceCommand {
    Terminate,
    Initialise(u8),
    Randomise,
    Compare,
    Withdraw,
    SearchAddrH(u8),
    SearchAddrM(u8),
    SearchAddrL(u8),
    ProgramShortAddress(u8),
    VerifyShortAddress(u8),
    QueryShortAddress,
    WriteMemoryLocation(u8),
    WriteMemoryLocationNoReply(u8),
    Dtr0(u8),
    Dtr1(u8),
    Dtr2(u8),
}

const SPECIAL_DEVICE_ADDR: u8 = 0xc1;

impl SpecialDeviceCommand {
    pub fn send_twice(&self) -> bool {
        matches!(self, SpecialDeviceCommand::Initialise(_) | SpecialDeviceCommand::Randomise)
    }

    pub fn response_type(&self) -> Option<ResponseKind> {
        Some(match self {
            SpecialDeviceCommand::Compare => ResponseKind::YesNoOrError,
            SpecialDeviceCommand::VerifyShortAddress(_) => ResponseKind::YesNo,
            SpecialDeviceCommand::QueryShortAddress => ResponseKind::NumericMask,
            SpecialDeviceCommand::WriteMemoryLocation(_) => ResponseKind::Numeric,
            _ => return None,
        })
    }

    pub fn encode(&self) -> Result<Frame<Forward>> {
        use SpecialDeviceCommand::*;
        let (instance, param) = match self {
            Terminate => (0x00, 0x00),
            Initialise(p) => (0x01, *p),
            Randomise => (0x02, 0x00),
            Compare => (0x03, 0x00),
            Withdraw => (0x04, 0x00),
            SearchAddrH(p) => (0x05, *p),
            SearchAddrM(p) => (0x06, *p),
            SearchAddrL(p) => (0x07, *p),
            ProgramShortAddress(p) => (0x08, *p),
            VerifyShortAddress(p) => (0x09, *p),
            QueryShortAddress => (0x0a, 0x00),
            WriteMemoryLocation(p) => (0x20, *p),
            WriteMemoryLocationNoReply(p) => (0x21, *p),
            Dtr0(p) => (0x30, *p),
            Dtr1(p) => (0x31, *p),
            Dtr2(p) => (0x32, *p),
        };
        let top = Frame::new(8, SPECIAL_DEVICE_ADDR as u64)?;
        let mid = Frame::new(8, instance as u64)?;
        let lo = Frame::new(8, param as u64)?;
        top.concat(&mid)?.concat(&lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialise_matches_confirmed_wire_prefix() {
        let c = SpecialDeviceCommand::Initialise(0x7f);
        let f = c.encode().unwrap();
        assert_eq!(f.as_byte_sequence(), vec![0xc1, 0x01, 0x7f]);
    }

    #[test]
    fn device_standard_command_frame_shape() {
        let c = DeviceCommand::QueryDeviceStatus(DeviceAddress::short(3).unwrap());
        let f = c.encode().unwrap();
        assert_eq!(f.slice(15, 8).unwrap(), 0xfe);
        assert_eq!(f.slice(7, 0).unwrap(), 0x30);
    }

    #[test]
    fn instance_command_frame_shape() {
        let c = InstanceCommand::QueryInstanceStatus(
            DeviceAddress::short(1).unwrap(),
            InstanceAddress::number(2).unwrap(),
        );
        let f = c.encode().unwrap();
        assert!(f.bit(16).unwrap());
        assert_eq!(f.slice(15, 8).unwrap(), 0x02);
        assert_eq!(f.slice(7, 0).unwrap(), 0x83);
    }
}
