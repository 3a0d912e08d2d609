use std::fmt;

/// Control bytes with a meaning on the plotter link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlCode {
    /// (ETX, Caret = ^C) End of text, the default label terminator.
    EndOfText,
    /// (ENQ, Caret = ^E) Enquiry, the host asks whether a block fits.
    Enquiry,
    /// (ACK, Caret = ^F) Acknowledge, default answer to an enquiry.
    Acknowledge,
    /// (DC1, Caret = ^Q) XON, resume transmission.
    XOn,
    /// (DC3, Caret = ^S) XOFF, pause transmission.
    XOff,
    /// (CAN, Caret = ^X) Cancel, ends the plotting session.
    Cancel,
    /// (ESC, Caret = ^[) Escape, starts a device-control instruction.
    Escape,

    /// Byte without special meaning.
    Other(u8),
}

impl ControlCode {
    pub const fn byte(self) -> u8 {
        use ControlCode::*;
        match self {
            EndOfText => 0x03,
            Enquiry => 0x05,
            Acknowledge => 0x06,
            XOn => 0x11,
            XOff => 0x13,
            Cancel => 0x18,
            Escape => 0x1b,
            Other(byte) => byte,
        }
    }
}

impl From<u8> for ControlCode {
    fn from(byte: u8) -> Self {
        use ControlCode::*;
        match byte {
            0x03 => EndOfText,
            0x05 => Enquiry,
            0x06 => Acknowledge,
            0x11 => XOn,
            0x13 => XOff,
            0x18 => Cancel,
            0x1b => Escape,
            other => Other(other),
        }
    }
}

impl From<ControlCode> for u8 {
    fn from(code: ControlCode) -> Self {
        code.byte()
    }
}

impl fmt::Display for ControlCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ControlCode::*;
        let name = match self {
            EndOfText => "ETX",
            Enquiry => "ENQ",
            Acknowledge => "ACK",
            XOn => "DC1",
            XOff => "DC3",
            Cancel => "CAN",
            Escape => "ESC",
            Other(byte) => return write!(f, "{byte:#04x}"),
        };
        f.write_str(name)
    }
}
