//! Transition table of the HP-GL scanner.
//!
//! Every function handles one [`State`]: given the input byte it returns the
//! next state and the [`Action`] the scanner performs. States that depend on
//! the recognized instruction carry it along, so the table stays pure and the
//! scanner only decides what to emit.

use crate::enums::{Action, State};

#[inline(always)]
const fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

#[inline(always)]
const fn is_numeric(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b'.' | b'+' | b'-')
}

/// Waiting for the first letter of an instruction.
#[inline(always)]
const fn ground(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        b';' | 0x00..=0x20 | 0x7f => (Ground, Ignore),
        b'A'..=b'Z' | b'a'..=b'z' => (Mnemonic, Collect),
        _ => (Skip, Stray),
    }
}

/// First letter seen, waiting for the second one.
#[inline(always)]
const fn mnemonic(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        _ if is_blank(byte) => (Mnemonic, Ignore),
        b'A'..=b'Z' | b'a'..=b'z' => (Ground, Recognize),
        _ => (Ground, Reset),
    }
}

/// Collecting numeric parameters or coordinate pairs.
#[inline(always)]
const fn params(state: State, byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        _ if is_numeric(byte) => (state, Digit),
        _ if is_blank(byte) => (state, Ignore),
        b',' => (state, Separator),
        b';' => (Ground, Terminate),
        b'A'..=b'Z' | b'a'..=b'z' => (Ground, Interrupt),
        _ => (Skip, Unexpected),
    }
}

/// Parameterless instruction waiting for its terminator.
#[inline(always)]
const fn bare(state: State, byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        _ if is_blank(byte) => (state, Ignore),
        b';' => (Ground, Terminate),
        b'A'..=b'Z' | b'a'..=b'z' => (Ground, Interrupt),
        _ if is_numeric(byte) => (Skip, Excess),
        b',' => (Skip, Excess),
        _ => (Skip, Unexpected),
    }
}

#[inline(always)]
const fn skip(byte: u8) -> (State, Action) {
    match byte {
        b';' => (State::Ground, Action::Ignore),
        _ => (State::Skip, Action::Ignore),
    }
}

#[inline(always)]
const fn label(byte: u8, terminator: u8) -> (State, Action) {
    if byte == terminator {
        (State::Ground, Action::EndLabel)
    } else {
        (State::Label, Action::Print)
    }
}

#[inline]
pub(crate) const fn transit(
    state: State,
    byte: u8,
    terminator: u8,
) -> (State, Action) {
    match state {
        State::Ground => ground(byte),
        State::Mnemonic => mnemonic(byte),
        State::Params(_) | State::Coordinates(_) => params(state, byte),
        State::Bare(_) => bare(state, byte),
        State::Skip => skip(byte),
        State::Label => label(byte, terminator),
        State::LabelTerminator => (State::Ground, Action::Define),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mnemonic;

    #[test]
    fn ground_ignores_separators_and_controls() {
        assert_eq!(transit(State::Ground, b';', 3), (State::Ground, Action::Ignore));
        assert_eq!(transit(State::Ground, 0x03, 3), (State::Ground, Action::Ignore));
        assert_eq!(transit(State::Ground, b'p', 3), (State::Mnemonic, Action::Collect));
        assert_eq!(transit(State::Ground, b'#', 3), (State::Skip, Action::Stray));
    }

    #[test]
    fn bare_keeps_its_instruction_on_blanks() {
        let state = State::Bare(Mnemonic::OE);
        assert_eq!(transit(state, b' ', 3), (state, Action::Ignore));
        assert_eq!(transit(state, b'5', 3), (State::Skip, Action::Excess));
    }

    #[test]
    fn letters_interrupt_parameter_lists() {
        let state = State::Coordinates(Mnemonic::PA);
        assert_eq!(transit(state, b'P', 3), (State::Ground, Action::Interrupt));
        assert_eq!(transit(state, b'7', 3), (state, Action::Digit));
        assert_eq!(transit(state, b'#', 3), (State::Skip, Action::Unexpected));
    }

    #[test]
    fn label_ends_on_terminator_only() {
        assert_eq!(transit(State::Label, b';', 3), (State::Label, Action::Print));
        assert_eq!(transit(State::Label, 3, 3), (State::Ground, Action::EndLabel));
        assert_eq!(transit(State::Label, b'@', b'@'), (State::Ground, Action::EndLabel));
    }
}
