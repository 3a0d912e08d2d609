use log::trace;

use crate::enums::{Action, State};
use crate::params::Number;
use crate::{Arity, Mnemonic, Params, ScanError, transitions};

/// Label terminator used until `DT` selects another one (ETX, `^C`).
pub const DEFAULT_LABEL_TERMINATOR: u8 = 0x03;

/// A completed instruction.
///
/// Coordinate instructions (`PA`, `PR`, `PU`, `PD`) are reported once per
/// X,Y pair, or once with empty parameters when no pair was given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub mnemonic: Mnemonic,
    pub params: Params,
}

/// Outcome of feeding one byte to the [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scan {
    /// Byte consumed, nothing to act on yet.
    Continue,
    Command(Command),
    /// `LB` recognized, label bytes follow.
    LabelStart,
    Label(u8),
    /// The label terminator was seen.
    LabelEnd,
    Error(ScanError),
}

#[derive(Debug)]
pub struct Scanner {
    state: State,
    code: u16,
    params: Params,
    number: Number,
    pending_x: Option<f32>,
    pairs: usize,
    overflow: bool,
    terminator: u8,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            state: State::default(),
            code: 0,
            params: Params::default(),
            number: Number::default(),
            pending_x: None,
            pairs: 0,
            overflow: false,
            terminator: DEFAULT_LABEL_TERMINATOR,
        }
    }
}

impl Scanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a single byte.
    pub fn advance(&mut self, byte: u8) -> Scan {
        let mut scan = Scan::Continue;

        // A letter that implicitly terminates an instruction is dispatched a
        // second time from the ground state.
        for _ in 0..2 {
            let current = self.state;
            let (next, action) =
                transitions::transit(current, byte, self.terminator);
            self.state = next;

            let (result, redispatch) = self.perform(action, current, byte);
            if result != Scan::Continue {
                scan = result;
            }

            if !redispatch {
                break;
            }
        }

        scan
    }

    /// Drop any partially scanned instruction.
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.code = 0;
        self.begin();
    }

    /// Instruction whose parameters are being collected, if any.
    pub fn pending(&self) -> Option<Mnemonic> {
        match self.state {
            State::Params(m) | State::Coordinates(m) | State::Bare(m) => {
                Some(m)
            },
            State::Label => Some(Mnemonic::LB),
            State::LabelTerminator => Some(Mnemonic::DT),
            _ => None,
        }
    }

    /// Whether the scanner sits between instructions.
    pub fn is_idle(&self) -> bool {
        self.state == State::Ground && self.code == 0
    }

    #[inline]
    pub fn label_terminator(&self) -> u8 {
        self.terminator
    }

    pub fn set_label_terminator(&mut self, terminator: u8) {
        self.terminator = terminator;
    }

    fn perform(&mut self, action: Action, from: State, byte: u8) -> (Scan, bool) {
        use Action::*;

        let scan = match action {
            Ignore => Scan::Continue,
            Collect => {
                self.code = byte.to_ascii_uppercase() as u16;
                Scan::Continue
            },
            Reset => {
                self.code = 0;
                Scan::Continue
            },
            Recognize => self.recognize(byte),
            Stray => Scan::Error(ScanError::UnknownCommand([byte, b' '])),
            Digit => {
                self.number.collect(byte);
                Scan::Continue
            },
            Separator => self.separate(from),
            Terminate => self.finish(from),
            Interrupt => {
                let scan = self.finish(from);
                self.state = State::Ground;
                return (scan, true);
            },
            Excess => Scan::Error(ScanError::WrongParams(self.mnemonic(from))),
            Unexpected => {
                Scan::Error(ScanError::BadNumberFormat(self.mnemonic(from)))
            },
            Print => Scan::Label(byte),
            EndLabel => Scan::LabelEnd,
            Define => self.define(byte),
        };

        (scan, false)
    }

    fn mnemonic(&self, state: State) -> Mnemonic {
        match state {
            State::Params(m) | State::Coordinates(m) | State::Bare(m) => m,
            State::LabelTerminator => Mnemonic::DT,
            _ => Mnemonic::LB,
        }
    }

    fn begin(&mut self) {
        self.params.clear();
        self.number.clear();
        self.pending_x = None;
        self.pairs = 0;
        self.overflow = false;
    }

    fn recognize(&mut self, byte: u8) -> Scan {
        let code = self.code << 8 | byte.to_ascii_uppercase() as u16;
        self.code = 0;

        let Some(mnemonic) = Mnemonic::from_code(code) else {
            self.state = State::Skip;
            return Scan::Error(ScanError::UnknownCommand(code.to_be_bytes()));
        };

        self.begin();
        match mnemonic.arity() {
            Arity::Text => {
                self.state = State::Label;
                return Scan::LabelStart;
            },
            Arity::Terminator => self.state = State::LabelTerminator,
            Arity::Pairs => self.state = State::Coordinates(mnemonic),
            arity if arity.is_bare() => self.state = State::Bare(mnemonic),
            Arity::Counts(_) => self.state = State::Params(mnemonic),
        }

        Scan::Continue
    }

    fn separate(&mut self, from: State) -> Scan {
        match from {
            State::Params(m) => match self.number.take(m) {
                Ok(Some(value)) => {
                    if !self.params.push(value) {
                        self.overflow = true;
                    }
                    Scan::Continue
                },
                // Fields may not be empty.
                Ok(None) => self.abort(ScanError::BadNumberFormat(m)),
                Err(err) => self.abort(err),
            },
            State::Coordinates(m) => match self.number.take(m) {
                Ok(Some(value)) => self.coordinate(m, value),
                Ok(None) => self.abort(ScanError::BadNumberFormat(m)),
                Err(err) => self.abort(err),
            },
            _ => Scan::Continue,
        }
    }

    fn coordinate(&mut self, mnemonic: Mnemonic, value: f32) -> Scan {
        match self.pending_x.take() {
            None => {
                self.pending_x = Some(value);
                Scan::Continue
            },
            Some(x) => {
                self.pairs += 1;
                Scan::Command(Command {
                    mnemonic,
                    params: Params::from_slice(&[x, value]),
                })
            },
        }
    }

    fn finish(&mut self, from: State) -> Scan {
        let scan = match from {
            State::Params(m) => match self.number.take(m) {
                Err(err) => Scan::Error(err),
                Ok(value) => {
                    if let Some(value) = value {
                        self.overflow |= !self.params.push(value);
                    }

                    if self.overflow || !m.arity().accepts(self.params.len()) {
                        Scan::Error(ScanError::WrongParams(m))
                    } else {
                        self.command(m)
                    }
                },
            },
            State::Coordinates(m) => match self.number.take(m) {
                Err(err) => Scan::Error(err),
                Ok(Some(value)) if self.pending_x.is_some() => {
                    self.coordinate(m, value)
                },
                Ok(Some(_)) => Scan::Error(ScanError::WrongParams(m)),
                Ok(None) if self.pending_x.is_some() => {
                    Scan::Error(ScanError::WrongParams(m))
                },
                Ok(None) if self.pairs == 0 => self.command(m),
                Ok(None) => Scan::Continue,
            },
            State::Bare(m) => self.command(m),
            _ => Scan::Continue,
        };

        self.begin();
        scan
    }

    fn command(&mut self, mnemonic: Mnemonic) -> Scan {
        if matches!(mnemonic, Mnemonic::IN | Mnemonic::DF) {
            self.terminator = DEFAULT_LABEL_TERMINATOR;
        }

        trace!("[hpgl] {mnemonic} {:?}", self.params.as_slice());
        Scan::Command(Command {
            mnemonic,
            params: self.params,
        })
    }

    fn define(&mut self, byte: u8) -> Scan {
        self.terminator = match byte {
            b';' => DEFAULT_LABEL_TERMINATOR,
            other => other,
        };

        Scan::Command(Command {
            mnemonic: Mnemonic::DT,
            params: Params::from_slice(&[self.terminator as f32]),
        })
    }

    fn abort(&mut self, err: ScanError) -> Scan {
        self.state = State::Skip;
        self.begin();
        Scan::Error(err)
    }
}
