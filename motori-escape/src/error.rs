use thiserror::Error;

/// Device-control failures, numbered the way `ESC . E` reports them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    #[error("device-control instruction overlapped another one")]
    Overlap,

    #[error("invalid device-control instruction")]
    InvalidInstruction,

    #[error("invalid byte in device-control parameters")]
    InvalidByte,

    #[error("device-control parameter out of range")]
    OutOfRange,

    #[error("too many device-control parameters")]
    TooManyParams,

    #[error("framing, parity or overrun error")]
    Framing,

    #[error("receive buffer overflow")]
    BufferOverflow,
}

impl DeviceError {
    pub const fn code(self) -> u8 {
        match self {
            Self::Overlap => 10,
            Self::InvalidInstruction => 11,
            Self::InvalidByte => 12,
            Self::OutOfRange => 13,
            Self::TooManyParams => 14,
            Self::Framing => 15,
            Self::BufferOverflow => 16,
        }
    }
}
