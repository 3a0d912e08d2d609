use log::debug;

use crate::{ControlCode, DeviceError};

/// Upper bound of parameters a device-control instruction can carry.
pub const MAX_DEVICE_PARAMS: usize = 12;

/// Largest numeric parameter accepted.
const MAX_VALUE: u32 = 32767;

/// Device-control instructions, `ESC .` followed by the letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `@` logical buffer size and configuration switches.
    Configure,
    /// `B` output free buffer space.
    BufferSpace,
    /// `E` output extended error.
    ExtendedError,
    /// `H` enquiry/acknowledge handshake.
    Handshake1,
    /// `I` enquiry/acknowledge or XON/XOFF handshake.
    Handshake2,
    /// `J` abort device control.
    AbortDeviceControl,
    /// `K` abort graphics.
    AbortGraphics,
    /// `L` output buffer size.
    BufferSize,
    /// `M` output mode.
    OutputMode,
    /// `N` extended output and handshake mode.
    ExtendedOutput,
    /// `O` output extended status.
    ExtendedStatus,
    /// `R` reset handshake and output configuration.
    Reset,
    /// `(` or `Y`.
    PlotterOn,
    /// `)` or `Z`.
    PlotterOff,
}

impl Instruction {
    pub fn from_letter(letter: u8) -> Option<Self> {
        use Instruction::*;
        let instruction = match letter {
            b'@' => Configure,
            b'B' => BufferSpace,
            b'E' => ExtendedError,
            b'H' => Handshake1,
            b'I' => Handshake2,
            b'J' => AbortDeviceControl,
            b'K' => AbortGraphics,
            b'L' => BufferSize,
            b'M' => OutputMode,
            b'N' => ExtendedOutput,
            b'O' => ExtendedStatus,
            b'R' => Reset,
            b'(' | b'Y' => PlotterOn,
            b')' | b'Z' => PlotterOff,
            _ => return None,
        };
        Some(instruction)
    }

    pub fn letter(self) -> u8 {
        use Instruction::*;
        match self {
            Configure => b'@',
            BufferSpace => b'B',
            ExtendedError => b'E',
            Handshake1 => b'H',
            Handshake2 => b'I',
            AbortDeviceControl => b'J',
            AbortGraphics => b'K',
            BufferSize => b'L',
            OutputMode => b'M',
            ExtendedOutput => b'N',
            ExtendedStatus => b'O',
            Reset => b'R',
            PlotterOn => b'(',
            PlotterOff => b')',
        }
    }

    /// Parameters accepted before the `:` terminator. Instructions taking
    /// none execute as soon as the letter arrives.
    pub fn max_params(self) -> usize {
        use Instruction::*;
        match self {
            Configure => 2,
            Handshake1 | Handshake2 => MAX_DEVICE_PARAMS,
            OutputMode => 6,
            ExtendedOutput => 11,
            _ => 0,
        }
    }

    /// Whether the instruction answers with an output line.
    pub fn is_output(self) -> bool {
        use Instruction::*;
        matches!(self, BufferSpace | ExtendedError | BufferSize | ExtendedStatus)
    }
}

/// A complete device-control instruction. Omitted parameters are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCommand {
    pub instruction: Instruction,
    params: [Option<u16>; MAX_DEVICE_PARAMS],
    len: usize,
}

impl DeviceCommand {
    pub fn new(instruction: Instruction) -> Self {
        Self {
            instruction,
            params: [None; MAX_DEVICE_PARAMS],
            len: 0,
        }
    }

    pub fn with_params(instruction: Instruction, params: &[Option<u16>]) -> Self {
        let mut command = Self::new(instruction);
        for param in params.iter().take(MAX_DEVICE_PARAMS) {
            command.params[command.len] = *param;
            command.len += 1;
        }
        command
    }

    /// Parameter at `idx`, `None` when omitted or absent.
    #[inline]
    pub fn param(&self, idx: usize) -> Option<u16> {
        self.params().get(idx).copied().flatten()
    }

    #[inline]
    pub fn params(&self) -> &[Option<u16>] {
        &self.params[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Outcome of feeding one byte to [`DeviceControl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// Not part of a device-control instruction.
    Pass,
    Consumed,
    Command(DeviceCommand),
    Error(DeviceError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum State {
    #[default]
    Ground,
    Escape,
    Period,
    Params,
    /// Skipping the rest of a failed instruction.
    Discard,
}

/// Scanner for `ESC . <letter> [p1;p2;...] :` instructions.
#[derive(Debug)]
pub struct DeviceControl {
    state: State,
    command: DeviceCommand,
    value: Option<u32>,
}

impl Default for DeviceControl {
    fn default() -> Self {
        Self {
            state: State::Ground,
            command: DeviceCommand::new(Instruction::Reset),
            value: None,
        }
    }
}

impl DeviceControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An instruction has started but is not complete.
    pub fn is_active(&self) -> bool {
        self.state != State::Ground
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn advance(&mut self, byte: u8) -> Device {
        if byte == ControlCode::Escape.byte() {
            let overlapped = self.state == State::Params;
            self.value = None;
            self.state = State::Escape;
            if overlapped {
                debug!("[device] {}", DeviceError::Overlap);
                return Device::Error(DeviceError::Overlap);
            }
            return Device::Consumed;
        }

        match self.state {
            State::Ground => Device::Pass,
            State::Escape => match byte {
                b'.' => {
                    self.state = State::Period;
                    Device::Consumed
                },
                _ => {
                    self.state = State::Ground;
                    Device::Pass
                },
            },
            State::Period => self.instruction(byte),
            State::Params => self.param(byte),
            State::Discard => {
                if byte == b':' {
                    self.state = State::Ground;
                }
                Device::Consumed
            },
        }
    }

    fn instruction(&mut self, letter: u8) -> Device {
        let Some(instruction) = Instruction::from_letter(letter) else {
            debug!("[device] unknown instruction {}", letter as char);
            self.state = State::Ground;
            return Device::Error(DeviceError::InvalidInstruction);
        };

        self.command = DeviceCommand::new(instruction);
        self.value = None;
        if instruction.max_params() == 0 {
            self.state = State::Ground;
            return Device::Command(self.command);
        }

        self.state = State::Params;
        Device::Consumed
    }

    fn param(&mut self, byte: u8) -> Device {
        match byte {
            b'0'..=b'9' => {
                let digit = (byte - b'0') as u32;
                let value = self.value.unwrap_or(0) * 10 + digit;
                self.value = Some(value.min(MAX_VALUE + 1));
                Device::Consumed
            },
            b';' => match self.push() {
                Ok(()) => Device::Consumed,
                Err(err) => self.fail(err),
            },
            b':' => {
                if self.value.is_some() || !self.command.is_empty() {
                    if let Err(err) = self.push() {
                        return self.fail(err);
                    }
                }
                self.state = State::Ground;
                Device::Command(self.command)
            },
            b' ' => Device::Consumed,
            _ => self.fail(DeviceError::InvalidByte),
        }
    }

    fn push(&mut self) -> Result<(), DeviceError> {
        let value = self.value.take();
        if self.command.len >= self.command.instruction.max_params() {
            return Err(DeviceError::TooManyParams);
        }

        let value = match value {
            Some(value) if value > MAX_VALUE => {
                return Err(DeviceError::OutOfRange);
            },
            Some(value) => Some(value as u16),
            None => None,
        };

        self.command.params[self.command.len] = value;
        self.command.len += 1;
        Ok(())
    }

    fn fail(&mut self, err: DeviceError) -> Device {
        debug!("[device] {err}");
        self.value = None;
        self.state = State::Discard;
        Device::Error(err)
    }
}
