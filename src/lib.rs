//! A host-side protocol engine for IEC 62386 DALI: frame/address/command
//! algebra, codec, response parsing, memory banks, command sequences and an
//! async bus driver. Concrete transports are supplied by the caller through
//! [`transport::Transport`].

pub mod address;
pub mod codec;
pub mod command;
pub mod error;
pub mod frame;
pub mod memory;
pub mod response;
pub mod bus_watch;
pub mod driver;
pub mod instance_map;
pub mod sequence;
pub mod sequences;
pub mod transport;

pub use address::{DeviceAddress, GearAddress, InstanceAddress};
pub use codec::{decode, decode_device, decode_gear, Command, InstanceTypeMap};
pub use command::{DeviceCommand, EventScheme, GearCommand, InstanceCommand, SpecialDeviceCommand};
pub use error::{DaliError, Result};
pub use frame::{Backward, BackwardFrame, Forward, Frame, ForwardFrame};
pub use response::{BitmapResponse, EnumResponse, Response, ResponseKind};
pub use driver::{Driver, DriverConfig};
pub use instance_map::InstanceMap;
pub use sequence::{ProgressReport, Sequence, SequenceStep};
