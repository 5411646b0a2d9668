//! Destination addressing for gear (16-bit), device (24-bit) and instance
//! (24-bit device) frames, per IEC 62386-102 Table 3 and -103 Table 4.

use crate::error::{DaliError, Result};
use crate::frame::{Forward, Frame};

/// A 16-bit gear address (IEC 62386-102).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearAddress {
    Broadcast,
    BroadcastUnaddressed,
    Group(u8),
    Short(u8),
}

impl GearAddress {
    pub fn group(g: u8) -> Result<Self> {
        if g > 15 {
            return Err(DaliError::AddressRange { kind: "gear group", value: g as u32, max: 15 });
        }
        Ok(GearAddress::Group(g))
    }

    pub fn short(a: u8) -> Result<Self> {
        if a > 63 {
            return Err(DaliError::AddressRange { kind: "gear short", value: a as u32, max: 63 });
        }
        Ok(GearAddress::Short(a))
    }

    /// The address byte with bit 0 cleared (the DAPC form); callers OR in 1
    /// for the command form.
    fn address_bits(&self) -> u8 {
        match *self {
            GearAddress::Broadcast => 0xfe,
            GearAddress::BroadcastUnaddressed => 0xfc,
            GearAddress::Group(g) => 0x80 | (g << 1),
            GearAddress::Short(a) => a << 1,
        }
    }

    /// The address byte as used in a standard 16-bit command frame (bit 0 set).
    pub fn to_byte(&self) -> u8 {
        self.address_bits() | 0x01
    }

    /// The address byte as used in a DAPC frame (bit 0 clear).
    pub fn to_dapc_byte(&self) -> u8 {
        self.address_bits() & !0x01
    }

    /// Inject this address (command form) into a fresh 16-bit forward frame
    /// carrying `opcode` in the low byte.
    pub fn add_to_frame(&self, opcode: u8) -> Result<Frame<Forward>> {
        let hi = Frame::new(8, self.to_byte() as u64)?;
        let lo = Frame::new(8, opcode as u64)?;
        hi.concat(&lo)
    }

    /// Decode the address half (high byte) of a 16-bit frame. Bit 0 of the
    /// byte (the command/DAPC discriminator) is ignored.
    pub fn from_byte(b: u8) -> Option<Self> {
        if b & 0xfe == 0xfe {
            Some(GearAddress::Broadcast)
        } else if b & 0xfe == 0xfc {
            Some(GearAddress::BroadcastUnaddressed)
        } else if b & 0xe0 == 0x80 {
            Some(GearAddress::Group((b & 0x1e) >> 1))
        } else if b & 0x80 == 0 {
            Some(GearAddress::Short((b & 0x7e) >> 1))
        } else {
            None
        }
    }
}

/// A 24-bit device address (IEC 62386-103).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAddress {
    Broadcast,
    BroadcastUnaddressed,
    Group(u8),
    Short(u8),
}

impl DeviceAddress {
    pub fn group(g: u8) -> Result<Self> {
        if g > 15 {
            return Err(DaliError::AddressRange { kind: "device group", value: g as u32, max: 15 });
        }
        Ok(DeviceAddress::Group(g))
    }

    pub fn short(a: u8) -> Result<Self> {
        if a > 63 {
            return Err(DaliError::AddressRange { kind: "device short", value: a as u32, max: 63 });
        }
        Ok(DeviceAddress::Short(a))
    }

    /// The 7-bit device address pattern, shifted into the top byte with
    /// `selector` as the low bit (0 = device-addressed, 1 = instance-addressed).
    fn top_byte(&self, selector: bool) -> u8 {
        let bits = match *self {
            DeviceAddress::Broadcast => 0xfe,
            DeviceAddress::BroadcastUnaddressed => 0xfc,
            DeviceAddress::Group(g) => 0x80 | (g << 1),
            DeviceAddress::Short(a) => a << 1,
        };
        (bits & !0x01) | selector as u8
    }

    pub fn from_top_byte(b: u8) -> Option<Self> {
        GearAddress::from_byte(b).map(|g| match g {
            GearAddress::Broadcast => DeviceAddress::Broadcast,
            GearAddress::BroadcastUnaddressed => DeviceAddress::BroadcastUnaddressed,
            GearAddress::Group(g) => DeviceAddress::Group(g),
            GearAddress::Short(a) => DeviceAddress::Short(a),
        })
    }

    /// Build a device-addressed (no specific instance) 24-bit forward frame.
    pub fn add_to_frame_device(&self, opcode: u8) -> Result<Frame<Forward>> {
        let top = Frame::new(8, self.top_byte(false) as u64)?;
        let mid = Frame::new(8, 0xfe)?;
        let lo = Frame::new(8, opcode as u64)?;
        top.concat(&mid)?.concat(&lo)
    }

    /// Build an instance-addressed 24-bit forward frame.
    pub fn add_to_frame_instance(&self, instance: InstanceAddress, opcode: u8) -> Result<Frame<Forward>> {
        let top = Frame::new(8, self.top_byte(true) as u64)?;
        let mid = Frame::new(8, instance.to_byte() as u64)?;
        let lo = Frame::new(8, opcode as u64)?;
        top.concat(&mid)?.concat(&lo)
    }
}

/// An instance selector used by 24-bit instance-addressed device commands
/// (IEC 62386-103 Table 4). This crate's mapping of selector bytes to
/// variants is an internally consistent scheme modeled on the equivalent
/// gear Table 3 pattern; see DESIGN.md for the open question this resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceAddress {
    Number(u8),
    Group(u8),
    Type(u8),
    Feature(u8),
    Broadcast,
}

impl InstanceAddress {
    pub fn number(n: u8) -> Result<Self> {
        if n > 31 {
            return Err(DaliError::AddressRange { kind: "instance number", value: n as u32, max: 31 });
        }
        Ok(InstanceAddress::Number(n))
    }

    pub fn group(g: u8) -> Result<Self> {
        if g > 31 {
            return Err(DaliError::AddressRange { kind: "instance group", value: g as u32, max: 31 });
        }
        Ok(InstanceAddress::Group(g))
    }

    pub fn instance_type(t: u8) -> Result<Self> {
        if t > 31 {
            return Err(DaliError::AddressRange { kind: "instance type", value: t as u32, max: 31 });
        }
        Ok(InstanceAddress::Type(t))
    }

    pub fn feature(f: u8) -> Result<Self> {
        if f > 31 {
            return Err(DaliError::AddressRange { kind: "instance feature", value: f as u32, max: 31 });
        }
        Ok(InstanceAddress::Feature(f))
    }

    pub fn to_byte(&self) -> u8 {
        match *self {
            InstanceAddress::Number(n) => n,
            InstanceAddress::Group(g) => 0x40 | g,
            InstanceAddress::Type(t) => 0x80 | t,
            InstanceAddress::Feature(f) => 0xc0 | f,
            InstanceAddress::Broadcast => 0xff,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00..=0x1f => Some(InstanceAddress::Number(b)),
            0x40..=0x5f => Some(InstanceAddress::Group(b - 0x40)),
            0x80..=0x9f => Some(InstanceAddress::Type(b - 0x80)),
            0xc0..=0xdf => Some(InstanceAddress::Feature(b - 0xc0)),
            0xff => Some(InstanceAddress::Broadcast),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gear_short_encoding() {
        let a = GearAddress::short(1).unwrap();
        assert_eq!(a.to_byte(), 0x03);
        assert_eq!(a.to_dapc_byte(), 0x02);
        assert_eq!(GearAddress::from_byte(0x02), Some(GearAddress::Short(1)));
    }

    #[test]
    fn gear_group_encoding() {
        let a = GearAddress::group(4).unwrap();
        assert_eq!(a.to_dapc_byte(), 0x88);
        assert_eq!(GearAddress::from_byte(0x88), Some(GearAddress::Group(4)));
    }

    #[test]
    fn gear_broadcast_encoding() {
        assert_eq!(GearAddress::Broadcast.to_byte(), 0xff);
        assert_eq!(GearAddress::from_byte(0xfe), Some(GearAddress::Broadcast));
        assert_eq!(GearAddress::from_byte(0xff), Some(GearAddress::Broadcast));
    }

    #[test]
    fn gear_broadcast_unaddressed_encoding() {
        assert_eq!(GearAddress::from_byte(0xfc), Some(GearAddress::BroadcastUnaddressed));
        assert_eq!(GearAddress::from_byte(0xfd), Some(GearAddress::BroadcastUnaddressed));
    }

    #[test]
    fn gear_range_validation() {
        assert!(GearAddress::short(64).is_err());
        assert!(GearAddress::group(16).is_err());
    }

    #[test]
    fn device_frame_round_trip_device_addressed() {
        let addr = DeviceAddress::short(5).unwrap();
        let f = addr.add_to_frame_device(0x01).unwrap();
        assert_eq!(f.width(), 24);
        assert_eq!(f.slice(23, 17).unwrap(), 5);
        assert_eq!(f.bit(16).unwrap(), false);
        assert_eq!(f.slice(15, 8).unwrap(), 0xfe);
        assert_eq!(DeviceAddress::from_top_byte(f.slice(23, 16).unwrap() as u8), Some(addr));
    }

    #[test]
    fn device_frame_instance_addressed() {
        let addr = DeviceAddress::short(2).unwrap();
        let inst = InstanceAddress::number(3).unwrap();
        let f = addr.add_to_frame_instance(inst, 0x80).unwrap();
        assert!(f.bit(16).unwrap());
        assert_eq!(f.slice(15, 8).unwrap(), 0x03);
        assert_eq!(InstanceAddress::from_byte(f.slice(15, 8).unwrap() as u8), Some(inst));
    }

    #[test]
    fn instance_address_byte_mapping() {
        assert_eq!(InstanceAddress::from_byte(0x00), Some(InstanceAddress::Number(0)));
        assert_eq!(InstanceAddress::from_byte(0x40), Some(InstanceAddress::Group(0)));
        assert_eq!(InstanceAddress::from_byte(0x80), Some(InstanceAddress::Type(0)));
        assert_eq!(InstanceAddress::from_byte(0xff), Some(InstanceAddress::Broadcast));
    }
}
