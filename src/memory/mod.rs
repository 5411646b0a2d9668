//! Declarative memory banks and the read/write/lock/latch sequences that
//! operate on them (IEC 62386-102/-103 Part 1, DiiA Parts 251-253).

pub mod banks;

use crate::address::DeviceAddress;
use crate::codec::Command;
use crate::command::{DeviceCommand, SpecialDeviceCommand};
use crate::error::{DaliError, Result};

/// Storage technology backing a memory location; informs whether a write is
/// even meaningful, not how it is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryType {
    Rom,
    RamRo,
    RamRw,
    NvmRo,
    NvmRw,
    NvmRwProtectable,
}

impl MemoryType {
    pub fn is_writeable(&self) -> bool {
        matches!(self, MemoryType::RamRw | MemoryType::NvmRw | MemoryType::NvmRwProtectable)
    }
}

/// A single addressable byte within a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLocation {
    pub address: u8,
    pub memory_type: MemoryType,
}

/// How the bytes at a [`MemoryValueDescriptor`]'s locations decode into a
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryValueKind {
    Numeric,
    /// First location is an exponent byte; remaining locations are the
    /// mantissa, MSB first.
    ScaledNumeric,
    FixedScaleNumeric { scale: i32 },
    Binary,
    /// Raw byte minus 60, per IEC 62386-102 Table 10.
    Temperature,
    String,
    /// "major.minor" packed one nibble/byte per component (DiiA Part 251).
    VersionNumber,
    ManufacturerSpecific,
}

/// A named value occupying one or more consecutive locations within a bank.
#[derive(Debug, Clone, Copy)]
pub struct MemoryValueDescriptor {
    pub name: &'static str,
    pub locations: &'static [MemoryLocation],
    pub kind: MemoryValueKind,
}

/// A declarative memory bank: its addressable range plus the named values
/// defined within it.
#[derive(Debug, Clone, Copy)]
pub struct MemoryBankDescriptor {
    pub number: u8,
    pub last_address: u8,
    pub lock_byte: Option<u8>,
    pub latch_byte: Option<u8>,
    pub values: &'static [MemoryValueDescriptor],
}

/// The decoded form of a [`MemoryValueDescriptor`], or `None` when a
/// location in its range came back unimplemented.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryValue {
    Numeric(Option<u64>),
    ScaledNumeric(Option<f64>),
    FixedScaleNumeric(Option<f64>),
    Binary(Option<bool>),
    Temperature(Option<i16>),
    String(Option<String>),
    VersionNumber(Option<(u8, u8)>),
    ManufacturerSpecific(Option<Vec<u8>>),
}

/// Decode the raw bytes collected from a [`MemoryValueDescriptor`]'s
/// locations (one `Option<u8>` per location, in declared order; `None`
/// where the read returned nothing).
pub fn decode_value(descriptor: &MemoryValueDescriptor, raw: &[Option<u8>]) -> Result<MemoryValue> {
    if raw.iter().any(Option::is_none) {
        return Ok(match descriptor.kind {
            MemoryValueKind::Numeric => MemoryValue::Numeric(None),
            MemoryValueKind::ScaledNumeric => MemoryValue::ScaledNumeric(None),
            MemoryValueKind::FixedScaleNumeric { .. } => MemoryValue::FixedScaleNumeric(None),
            MemoryValueKind::Binary => MemoryValue::Binary(None),
            MemoryValueKind::Temperature => MemoryValue::Temperature(None),
            MemoryValueKind::String => MemoryValue::String(None),
            MemoryValueKind::VersionNumber => MemoryValue::VersionNumber(None),
            MemoryValueKind::ManufacturerSpecific => MemoryValue::ManufacturerSpecific(None),
        });
    }
    let bytes: Vec<u8> = raw.iter().map(|b| b.unwrap()).collect();
    Ok(match descriptor.kind {
        MemoryValueKind::Numeric => {
            let v = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
            MemoryValue::Numeric(Some(v))
        }
        MemoryValueKind::ScaledNumeric => {
            let exponent = bytes[0] as i8;
            let mantissa = bytes[1..].iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
            MemoryValue::ScaledNumeric(Some(mantissa as f64 * 10f64.powi(exponent as i32)))
        }
        MemoryValueKind::FixedScaleNumeric { scale } => {
            let mantissa = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
            MemoryValue::FixedScaleNumeric(Some(mantissa as f64 * 10f64.powi(-scale)))
        }
        MemoryValueKind::Binary => MemoryValue::Binary(Some(bytes[0] != 0)),
        MemoryValueKind::Temperature => MemoryValue::Temperature(Some(bytes[0] as i16 - 60)),
        MemoryValueKind::String => {
            let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
            MemoryValue::String(Some(String::from_utf8_lossy(&bytes[..end]).into_owned()))
        }
        MemoryValueKind::VersionNumber => MemoryValue::VersionNumber(Some((bytes[0] >> 2, bytes[0] & 0x03))),
        MemoryValueKind::ManufacturerSpecific => MemoryValue::ManufacturerSpecific(Some(bytes)),
    })
}

/// The command plan to read one [`MemoryValueDescriptor`] from `addr`:
/// preload DTR1/DTR0 then one `ReadMemoryLocation` per location, relying on
/// the gear's own DTR0 auto-increment between reads.
pub fn read_plan(bank: u8, descriptor: &MemoryValueDescriptor, addr: DeviceAddress) -> Vec<Command> {
    let mut plan = vec![
        Command::SpecialDevice(SpecialDeviceCommand::Dtr1(bank)),
        Command::SpecialDevice(SpecialDeviceCommand::Dtr0(descriptor.locations[0].address)),
    ];
    plan.extend(std::iter::repeat(Command::Device(DeviceCommand::ReadMemoryLocation(addr))).take(descriptor.locations.len()));
    plan
}

/// The plan to read every value in `bank` in one pass: query the bank's
/// last addressable location, then read from offset 3 onward.
pub fn read_all_plan(bank: &MemoryBankDescriptor, addr: DeviceAddress) -> Vec<Command> {
    let mut plan = vec![
        Command::SpecialDevice(SpecialDeviceCommand::Dtr1(bank.number)),
        Command::SpecialDevice(SpecialDeviceCommand::Dtr0(0x00)),
        Command::Device(DeviceCommand::ReadMemoryLocation(addr)),
        Command::SpecialDevice(SpecialDeviceCommand::Dtr0(0x03)),
    ];
    let count = bank.last_address.saturating_sub(2) as usize;
    plan.extend(std::iter::repeat(Command::Device(DeviceCommand::ReadMemoryLocation(addr))).take(count));
    plan
}

/// The plan to write `bytes` starting at `descriptor`'s first location,
/// enabling write access first when the bank requires it.
pub fn write_plan(bank: u8, descriptor: &MemoryValueDescriptor, bytes: &[u8]) -> Result<Vec<Command>> {
    if bytes.len() > descriptor.locations.len() {
        return Err(DaliError::MemoryLocationNotWriteable);
    }
    for (loc, _) in descriptor.locations.iter().zip(bytes) {
        if !loc.memory_type.is_writeable() {
            return Err(DaliError::MemoryLocationNotWriteable);
        }
    }
    let mut plan = vec![
        Command::SpecialDevice(SpecialDeviceCommand::Dtr1(bank)),
        Command::SpecialDevice(SpecialDeviceCommand::Dtr0(descriptor.locations[0].address)),
    ];
    plan.extend(
        bytes
            .iter()
            .map(|&b| Command::SpecialDevice(SpecialDeviceCommand::WriteMemoryLocation(b))),
    );
    Ok(plan)
}

/// The plan to (re-)latch a bank's values, for banks that declare a latch
/// byte.
pub fn latch_plan(bank: &MemoryBankDescriptor) -> Result<Vec<Command>> {
    let latch = bank.latch_byte.ok_or(DaliError::MemoryValueNotWriteable("latch"))?;
    Ok(vec![
        Command::SpecialDevice(SpecialDeviceCommand::Dtr1(bank.number)),
        Command::SpecialDevice(SpecialDeviceCommand::Dtr0(latch)),
        Command::SpecialDevice(SpecialDeviceCommand::WriteMemoryLocationNoReply(0xaa)),
    ])
}

/// The plan to check whether a bank is locked: a non-`0x55` readback of its
/// lock byte means locked.
pub fn is_locked_plan(bank: &MemoryBankDescriptor) -> Result<Vec<Command>> {
    let lock = bank.lock_byte.ok_or(DaliError::MemoryBankLocked)?;
    Ok(vec![
        Command::SpecialDevice(SpecialDeviceCommand::Dtr1(bank.number)),
        Command::SpecialDevice(SpecialDeviceCommand::Dtr0(lock)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use banks::BANK_0;

    #[test]
    fn numeric_decodes_big_endian() {
        let d = &BANK_0.values[0];
        let raw: Vec<Option<u8>> = vec![Some(0x01), Some(0x02)];
        assert_eq!(decode_value(d, &raw).unwrap(), MemoryValue::Numeric(Some(0x0102)));
    }

    #[test]
    fn missing_location_yields_none() {
        let d = &BANK_0.values[0];
        let raw: Vec<Option<u8>> = vec![Some(0x01), None];
        assert_eq!(decode_value(d, &raw).unwrap(), MemoryValue::Numeric(None));
    }

    #[test]
    fn temperature_subtracts_sixty() {
        let d = MemoryValueDescriptor {
            name: "t",
            locations: &[MemoryLocation { address: 0x00, memory_type: MemoryType::RamRo }],
            kind: MemoryValueKind::Temperature,
        };
        let raw = vec![Some(85u8)];
        assert_eq!(decode_value(&d, &raw).unwrap(), MemoryValue::Temperature(Some(25)));
    }

    #[test]
    fn read_plan_preloads_dtr_registers() {
        let d = &BANK_0.values[0];
        let plan = read_plan(0, d, DeviceAddress::short(1).unwrap());
        assert!(matches!(plan[0], Command::SpecialDevice(SpecialDeviceCommand::Dtr1(0))));
        assert_eq!(plan.len(), 2 + d.locations.len());
    }

    #[test]
    fn write_plan_rejects_read_only_location() {
        let d = &BANK_0.values[0];
        assert!(write_plan(0, d, &[0x01, 0x02]).is_err());
    }
}
