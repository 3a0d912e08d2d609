use thiserror::Error;

use motori_scan::ScanError;

/// HP-GL errors as reported by `OE`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HpglError {
    #[error("instruction not recognized")]
    UnknownCommand,

    #[error("wrong number of parameters")]
    WrongParams,

    #[error("bad parameter")]
    BadParam,

    #[error("unknown character set")]
    UnknownCharset,

    #[error("position overflow")]
    PosOverflow,

    #[error("pinch wheels raised")]
    WheelsUp,
}

impl HpglError {
    /// Error number reported by `OE`.
    pub const fn code(self) -> u8 {
        match self {
            HpglError::UnknownCommand => 1,
            HpglError::WrongParams => 2,
            HpglError::BadParam => 3,
            HpglError::UnknownCharset => 5,
            HpglError::PosOverflow => 6,
            HpglError::WheelsUp => 8,
        }
    }
}

impl From<ScanError> for HpglError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::UnknownCommand(_) => HpglError::UnknownCommand,
            ScanError::WrongParams(_) => HpglError::WrongParams,
            ScanError::BadNumberFormat(_) => HpglError::BadParam,
        }
    }
}

/// Session level failures.
#[derive(Debug, Error)]
pub enum PlotterError {
    #[error("motion controller refused to home")]
    HomingRejected,

    #[error("homing cycle ended in alarm")]
    HomingFailed,

    #[error("plotter session is not active")]
    Inactive,

    #[error("invalid plotter options: {0}")]
    Options(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlotterError>;
