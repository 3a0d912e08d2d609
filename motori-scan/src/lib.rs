//! HP-GL instruction scanner.
//!
//! [`Scanner`] consumes a plotter byte stream one byte at a time and turns
//! it into [`Scan`] results: completed instructions with their numeric
//! parameters, label text, or local errors. The scanner never blocks and
//! never looks back; every call either consumes the byte or re-dispatches
//! it once when a letter implicitly terminates the previous instruction.

mod enums;
mod error;
mod mnemonic;
mod params;
mod parser;
mod transitions;

pub use error::ScanError;
pub use mnemonic::{Arity, Mnemonic};
pub use params::{MAX_PARAMS, Params};
pub use parser::{Command, DEFAULT_LABEL_TERMINATOR, Scan, Scanner};
