use thiserror::Error;

use crate::Mnemonic;

/// Local scanning failures. Each one aborts only the instruction being
/// scanned; the scanner keeps going with the next one.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    #[error("instruction `{}` not recognized", String::from_utf8_lossy(.0))]
    UnknownCommand([u8; 2]),

    #[error("wrong number of parameters for {0}")]
    WrongParams(Mnemonic),

    #[error("malformed numeric parameter for {0}")]
    BadNumberFormat(Mnemonic),
}
