//! 16-bit gear commands (IEC 62386-102 and, for device_type 8, -209).

use crate::address::GearAddress;
use crate::error::{DaliError, Result};
use crate::frame::{Forward, Frame};
use crate::response::ResponseKind;

const STATUS_FLAGS: &[&str] = &[
    "status",
    "lamp failure",
    "arc power on",
    "limit error",
    "fade ready",
    "reset state",
    "missing short address",
    "power failure",
];

/// A 16-bit gear command: either direct arc power control or a registered
/// opcode from the part-102 standard set, the part-102 special set, or the
/// part-209 (DT8 colour) extension set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearCommand {
    Dapc(GearAddress, u8),

    Off(GearAddress),
    Up(GearAddress),
    Down(GearAddress),
    StepUp(GearAddress),
    StepDown(GearAddress),
    RecallMaxLevel(GearAddress),
    RecallMinLevel(GearAddress),
    StepDownAndOff(GearAddress),
    OnAndStepUp(GearAddress),
    EnableDapcSequence(GearAddress),
    GoToLastActiveLevel(GearAddress),
    ContinuousUp(GearAddress),
    ContinuousDown(GearAddress),
    GoToScene(GearAddress, u8),

    Reset(GearAddress),
    StoreActualLevelInDtr0(GearAddress),
    SavePersistentVariables(GearAddress),
    SetOperatingMode(GearAddress),
    ResetMemoryBank(GearAddress),
    IdentifyDevice(GearAddress),
    StoreDtrAsMaxLevel(GearAddress),
    StoreDtrAsMinLevel(GearAddress),
    StoreDtrAsFailLevel(GearAddress),
    StoreDtrAsPowerOnLevel(GearAddress),
    StoreDtrAsFadeTime(GearAddress),
    StoreDtrAsFadeRate(GearAddress),
    SetExtendedFadeTime(GearAddress),
    StoreDtrAsScene(GearAddress, u8),
    RemoveFromScene(GearAddress, u8),
    AddToGroup(GearAddress, u8),
    RemoveFromGroup(GearAddress, u8),
    StoreDtrAsShortAddress(GearAddress),
    EnableWriteMemory(GearAddress),

    QueryStatus(GearAddress),
    QueryControlGearPresent(GearAddress),
    QueryLampFailure(GearAddress),
    QueryLampPowerOn(GearAddress),
    QueryLimitError(GearAddress),
    QueryResetState(GearAddress),
    QueryMissingShortAddress(GearAddress),
    QueryVersionNumber(GearAddress),
    QueryContentDtr0(GearAddress),
    QueryDeviceType(GearAddress),
    QueryPhysicalMinimumLevel(GearAddress),
    QueryPowerFailure(GearAddress),
    QueryContentDtr1(GearAddress),
    QueryContentDtr2(GearAddress),
    QueryOperatingMode(GearAddress),
    QueryLightSourceType(GearAddress),
    QueryActualLevel(GearAddress),
    QueryMaxLevel(GearAddress),
    QueryMinLevel(GearAddress),
    QueryPowerOnLevel(GearAddress),
    QueryFailureLevel(GearAddress),
    QueryFadeTimeAndRate(GearAddress),
    QueryManufacturerSpecificMode(GearAddress),
    QueryNextDeviceType(GearAddress),
    QueryExtendedFadeTime(GearAddress),
    QueryControlGearFailure(GearAddress),
    QuerySceneLevel(GearAddress, u8),
    QueryGroupsZeroToSeven(GearAddress),
    QueryGroupsEightToFifteen(GearAddress),
    QueryRandomAddressH(GearAddress),
    QueryRandomAddressM(GearAddress),
    QueryRandomAddressL(GearAddress),
    ReadMemoryLocation(GearAddress),
    QueryExtendedVersionNumber(GearAddress),

    // part-209 DT8 colour extension (device_type 8)
    SetTemporaryXCoordinate(GearAddress),
    SetTemporaryYCoordinate(GearAddress),
    Activate(GearAddress),
    SetTemporaryColourTemperature(GearAddress),
    SetTemporaryRgbDimLevel(GearAddress),
    SetTemporaryRgbwafControl(GearAddress),
    QueryGearFeatures(GearAddress),
    QueryColourValue(GearAddress),

    // special commands (no device address; opcode + free parameter byte)
    Terminate,
    Dtr0(u8),
    Initialise(u8),
    Randomise,
    Compare,
    Withdraw,
    Ping,
    SearchAddrH(u8),
    SearchAddrM(u8),
    SearchAddrL(u8),
    ProgramShortAddress(u8),
    VerifyShortAddress(u8),
    QueryShortAddress,
    PhysicalSelection,
    EnableDeviceType(u8),
    Dtr1(u8),
    Dtr2(u8),

    Unknown(Frame<Forward>),
}

impl GearCommand {
    pub fn device_type(&self) -> u8 {
        use GearCommand::*;
        match self {
            SetTemporaryXCoordinate(_) | SetTemporaryYCoordinate(_) | Activate(_)
            | SetTemporaryColourTemperature(_) | SetTemporaryRgbDimLevel(_)
            | SetTemporaryRgbwafControl(_) | QueryGearFeatures(_) | QueryColourValue(_) => 8,
            _ => 0,
        }
    }

    pub fn is_config(&self) -> bool {
        use GearCommand::*;
        matches!(
            self,
            Reset(_)
                | StoreActualLevelInDtr0(_)
                | SavePersistentVariables(_)
                | SetOperatingMode(_)
                | ResetMemoryBank(_)
                | IdentifyDevice(_)
                | StoreDtrAsMaxLevel(_)
                | StoreDtrAsMinLevel(_)
                | StoreDtrAsFailLevel(_)
                | StoreDtrAsPowerOnLevel(_)
                | StoreDtrAsFadeTime(_)
                | StoreDtrAsFadeRate(_)
                | SetExtendedFadeTime(_)
                | StoreDtrAsScene(..)
                | RemoveFromScene(..)
                | AddToGroup(..)
                | RemoveFromGroup(..)
                | StoreDtrAsShortAddress(_)
                | EnableWriteMemory(_)
                | Initialise(_)
                | Randomise
        )
    }

    pub fn send_twice(&self) -> bool {
        self.is_config()
    }

    pub fn is_query(&self) -> bool {
        self.response_type().is_some()
    }

    pub fn uses_dtr0(&self) -> bool {
        use GearCommand::*;
        matches!(
            self,
            StoreActualLevelInDtr0(_)
                | SetOperatingMode(_)
                | ResetMemoryBank(_)
                | SetExtendedFadeTime(_)
                | StoreDtrAsScene(..)
                | StoreDtrAsShortAddress(_)
                | QueryContentDtr0(_)
                | ReadMemoryLocation(_)
                | QueryExtendedVersionNumber(_)
                | QueryColourValue(_)
        )
    }

    pub fn uses_dtr1(&self) -> bool {
        matches!(self, GearCommand::QueryContentDtr1(_) | GearCommand::ReadMemoryLocation(_))
    }

    pub fn uses_dtr2(&self) -> bool {
        matches!(self, GearCommand::QueryContentDtr2(_))
    }

    pub fn response_type(&self) -> Option<ResponseKind> {
        use GearCommand::*;
        Some(match self {
            QueryStatus(_) => ResponseKind::Bitmap(STATUS_FLAGS),
            Compare => ResponseKind::YesNoOrError,
            QueryControlGearPresent(_) | QueryLampPowerOn(_) | QueryManufacturerSpecificMode(_)
            | QueryControlGearFailure(_) | VerifyShortAddress(_) => ResponseKind::YesNo,
            QueryLampFailure(_) | QueryLimitError(_) | QueryResetState(_)
            | QueryMissingShortAddress(_) | QueryPowerFailure(_) => ResponseKind::YesNo,
            QueryVersionNumber(_) | QueryContentDtr0(_) | QueryPhysicalMinimumLevel(_)
            | QueryContentDtr1(_) | QueryContentDtr2(_) | QueryOperatingMode(_)
            | QueryLightSourceType(_) | QueryActualLevel(_) | QueryMaxLevel(_)
            | QueryMinLevel(_) | QueryPowerOnLevel(_) | QueryFailureLevel(_)
            | QueryFadeTimeAndRate(_) | QueryNextDeviceType(_) | QueryExtendedFadeTime(_)
            | QueryGroupsZeroToSeven(_) | QueryGroupsEightToFifteen(_)
            | QueryRandomAddressH(_) | QueryRandomAddressM(_) | QueryRandomAddressL(_)
            | ReadMemoryLocation(_) | QueryExtendedVersionNumber(_) | QueryGearFeatures(_)
            | QueryColourValue(_) | QueryDeviceType(_) => ResponseKind::Numeric,
            QuerySceneLevel(..) => ResponseKind::NumericMask,
            QueryShortAddress => ResponseKind::NumericMask,
            _ => return None,
        })
    }

    /// Encode this command to its 16-bit forward frame.
    pub fn encode(&self) -> Result<Frame<Forward>> {
        use GearCommand::*;
        let std = |addr: &GearAddress, opcode: u8| addr.add_to_frame(opcode);
        let param_cmd = |addr: &GearAddress, base: u8, param: u8| -> Result<Frame<Forward>> {
            if param > 15 {
                return Err(DaliError::AddressRange { kind: "scene/group number", value: param as u32, max: 15 });
            }
            addr.add_to_frame(base | param)
        };
        match self {
            Dapc(addr, level) => {
                let hi = Frame::new(8, addr.to_dapc_byte() as u64)?;
                let lo = Frame::new(8, *level as u64)?;
                hi.concat(&lo)
            }
            Off(a) => std(a, 0x00),
            Up(a) => std(a, 0x01),
            Down(a) => std(a, 0x02),
            StepUp(a) => std(a, 0x03),
            StepDown(a) => std(a, 0x04),
            RecallMaxLevel(a) => std(a, 0x05),
            RecallMinLevel(a) => std(a, 0x06),
            StepDownAndOff(a) => std(a, 0x07),
            OnAndStepUp(a) => std(a, 0x08),
            EnableDapcSequence(a) => std(a, 0x09),
            GoToLastActiveLevel(a) => std(a, 0x0a),
            ContinuousUp(a) => std(a, 0x0b),
            ContinuousDown(a) => std(a, 0x0c),
            GoToScene(a, s) => param_cmd(a, 0x10, *s),
            Reset(a) => std(a, 0x20),
            StoreActualLevelInDtr0(a) => std(a, 0x21),
            SavePersistentVariables(a) => std(a, 0x22),
            SetOperatingMode(a) => std(a, 0x23),
            ResetMemoryBank(a) => std(a, 0x24),
            IdentifyDevice(a) => std(a, 0x25),
            StoreDtrAsMaxLevel(a) => std(a, 0x2a),
            StoreDtrAsMinLevel(a) => std(a, 0x2b),
            StoreDtrAsFailLevel(a) => std(a, 0x2c),
            StoreDtrAsPowerOnLevel(a) => std(a, 0x2d),
            StoreDtrAsFadeTime(a) => std(a, 0x2e),
            StoreDtrAsFadeRate(a) => std(a, 0x2f),
            SetExtendedFadeTime(a) => std(a, 0x30),
            StoreDtrAsScene(a, s) => param_cmd(a, 0x40, *s),
            RemoveFromScene(a, s) => param_cmd(a, 0x50, *s),
            AddToGroup(a, g) => param_cmd(a, 0x60, *g),
            RemoveFromGroup(a, g) => param_cmd(a, 0x70, *g),
            StoreDtrAsShortAddress(a) => std(a, 0x80),
            EnableWriteMemory(a) => std(a, 0x81),
            QueryStatus(a) => std(a, 0x90),
            QueryControlGearPresent(a) => std(a, 0x91),
            QueryLampFailure(a) => std(a, 0x92),
            QueryLampPowerOn(a) => std(a, 0x93),
            QueryLimitError(a) => std(a, 0x94),
            QueryResetState(a) => std(a, 0x95),
            QueryMissingShortAddress(a) => std(a, 0x96),
            QueryVersionNumber(a) => std(a, 0x97),
            QueryContentDtr0(a) => std(a, 0x98),
            QueryDeviceType(a) => std(a, 0x99),
            QueryPhysicalMinimumLevel(a) => std(a, 0x9a),
            QueryPowerFailure(a) => std(a, 0x9b),
            QueryContentDtr1(a) => std(a, 0x9c),
            QueryContentDtr2(a) => std(a, 0x9d),
            QueryOperatingMode(a) => std(a, 0x9e),
            QueryLightSourceType(a) => std(a, 0x9f),
            QueryActualLevel(a) => std(a, 0xa0),
            QueryMaxLevel(a) => std(a, 0xa1),
            QueryMinLevel(a) => std(a, 0xa2),
            QueryPowerOnLevel(a) => std(a, 0xa3),
            QueryFailureLevel(a) => std(a, 0xa4),
            QueryFadeTimeAndRate(a) => std(a, 0xa5),
            QueryManufacturerSpecificMode(a) => std(a, 0xa6),
            QueryNextDeviceType(a) => std(a, 0xa7),
            QueryExtendedFadeTime(a) => std(a, 0xa8),
            QueryControlGearFailure(a) => std(a, 0xaa),
            QuerySceneLevel(a, s) => param_cmd(a, 0xb0, *s),
            QueryGroupsZeroToSeven(a) => std(a, 0xc0),
            QueryGroupsEightToFifteen(a) => std(a, 0xc1),
            QueryRandomAddressH(a) => std(a, 0xc2),
            QueryRandomAddressM(a) => std(a, 0xc3),
            QueryRandomAddressL(a) => std(a, 0xc4),
            ReadMemoryLocation(a) => std(a, 0xc5),
            QueryExtendedVersionNumber(a) => std(a, 0xff),

            SetTemporaryXCoordinate(a) => std(a, 0xe0),
            SetTemporaryYCoordinate(a) => std(a, 0xe1),
            Activate(a) => std(a, 0xe2),
            SetTemporaryColourTemperature(a) => std(a, 0xe7),
            SetTemporaryRgbDimLevel(a) => std(a, 0xeb),
            SetTemporaryRgbwafControl(a) => std(a, 0xed),
            QueryGearFeatures(a) => std(a, 0xf7),
            QueryColourValue(a) => std(a, 0xfa),

            Terminate => special(0xa1, 0x00),
            Dtr0(v) => special(0xa3, *v),
            Initialise(v) => special(0xa5, *v),
            Randomise => special(0xa7, 0x00),
            Compare => special(0xa9, 0x00),
            Withdraw => special(0xab, 0x00),
            Ping => special(0xad, 0x00),
            SearchAddrH(v) => special(0xb1, *v),
            SearchAddrM(v) => special(0xb3, *v),
            SearchAddrL(v) => special(0xb5, *v),
            ProgramShortAddress(v) => special(0xb7, *v),
            VerifyShortAddress(v) => special(0xb9, *v),
            QueryShortAddress => special(0xbb, 0x00),
            PhysicalSelection => special(0xbd, 0x00),
            EnableDeviceType(v) => special(0xc1, *v),
            Dtr1(v) => special(0xc3, *v),
            Dtr2(v) => special(0xc5, *v),

            Unknown(f) => Ok(*f),
        }
    }
}

fn special(opcode: u8, param: u8) -> Result<Frame<Forward>> {
    let hi = Frame::new(8, opcode as u64)?;
    let lo = Frame::new(8, param as u64)?;
    hi.concat(&lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dapc_scenario_1() {
        let c = GearCommand::Dapc(GearAddress::short(1).unwrap(), 254);
        let f = c.encode().unwrap();
        assert_eq!(f.as_byte_sequence(), vec![0x02, 0xfe]);
    }

    #[test]
    fn broadcast_off_scenario_2() {
        let c = GearCommand::Off(GearAddress::Broadcast);
        let f = c.encode().unwrap();
        assert_eq!(f.as_byte_sequence(), vec![0xff, 0x00]);
    }

    #[test]
    fn go_to_scene_rejects_out_of_range() {
        let c = GearCommand::GoToScene(GearAddress::Broadcast, 16);
        assert!(c.encode().is_err());
    }

    #[test]
    fn special_command_frame_shape() {
        let c = GearCommand::Initialise(0x7f);
        let f = c.encode().unwrap();
        assert_eq!(f.as_byte_sequence(), vec![0xa5, 0x7f]);
        assert!(c.send_twice());
    }

    #[test]
    fn colour_commands_report_device_type_8() {
        let c = GearCommand::Activate(GearAddress::short(0).unwrap());
        assert_eq!(c.device_type(), 8);
    }
}
