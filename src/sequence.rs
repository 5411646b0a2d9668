//! Resumable multi-step protocol transactions.
//!
//! Rust has no stable, allocation-free generator usable here, so a
//! [`Sequence`] is a small state machine instead of a coroutine: each call to
//! `advance` consumes the previous step's [`Response`] (if any) and returns
//! the next thing the driver should do.

use std::time::Duration;

use crate::codec::Command;
use crate::error::DaliError;
use crate::response::Response;

/// Delivered to an optional observer while a sequence runs; carries no
/// `Response` requirement.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub message: String,
    pub completed: u32,
    pub size: u32,
}

/// What a [`Sequence`] wants the driver to do next.
pub enum SequenceStep<T> {
    SendCommand(Command),
    Sleep(Duration),
    Progress(ProgressReport),
    Finished(Result<T, DaliError>),
}

/// A resumable DALI protocol transaction. The driver holds its transaction
/// lock for the sequence's full lifetime so that no unrelated command
/// interleaves with it.
pub trait Sequence {
    type Output;

    /// Advance the sequence. `last` is the response to the most recently
    /// sent `SendCommand` step (`None` on the first call, and after `Sleep`
    /// or `Progress` steps).
    fn advance(&mut self, last: Option<Response>) -> SequenceStep<Self::Output>;
}
