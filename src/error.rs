use thiserror::Error;

pub type Result<T> = std::result::Result<T, DaliError>;

/// The crate's single error type. Every fallible operation across frame
/// construction, addressing, decoding, memory-bank access, sequences and the
/// driver funnels into one of these variants.
#[derive(Debug, Error)]
pub enum DaliError {
    #[error("value {value:#x} does not fit a {width}-bit frame")]
    FrameValue { width: u32, value: u64 },

    #[error("slice write value {value:#x} exceeds slice width {width}")]
    SliceValue { width: u32, value: u64 },

    #[error("address value {value} out of range for {kind} (0..={max})")]
    AddressRange { kind: &'static str, value: u32, max: u32 },

    #[error("address cannot be placed in a {frame_width}-bit frame")]
    IncompatibleFrame { frame_width: u32 },

    #[error("frame did not match any registered command")]
    CommandDecode,

    #[error("no response was received for a query that required one")]
    MissingResponse,

    #[error("response was a framing error where a clean value was required")]
    ResponseFramingError,

    #[error("sequence protocol violation: {0}")]
    DaliSequence(String),

    #[error("commissioning failed to verify short address {0}")]
    ProgramShortAddressFailure(u8),

    #[error("communication error: {0}")]
    Communication(String),

    #[error("transport cannot carry a {0}-bit frame")]
    UnsupportedFrameType(u32),

    #[error("memory location not implemented")]
    MemoryLocationNotImplemented,

    #[error("memory value {0} is not writeable")]
    MemoryValueNotWriteable(&'static str),

    #[error("memory location type does not permit writes")]
    MemoryLocationNotWriteable,

    #[error("memory write verification failed: wrote {wrote:#x}, read back {read:#x}")]
    MemoryWriteFailure { wrote: u8, read: u8 },

    #[error("memory bank is locked")]
    MemoryBankLocked,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out waiting on the driver's transaction lock or transport")]
    Timeout,

    #[error("driver is not connected")]
    NotConnected,
}
