//! Canonical multi-step protocol transactions built on the [`crate::sequence::Sequence`] trait.

pub mod colour;
pub mod commissioning;
pub mod device_commissioning;
pub mod discovery;
pub mod events;
pub mod query_device_types;
pub mod query_input_value;
