//! Command registry: typed command definitions for both DALI namespaces.

pub mod device;
pub mod gear;

pub use device::{DeviceCommand, EventScheme, InstanceCommand, SpecialDeviceCommand};
pub use gear::GearCommand;
