use crate::Mnemonic;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    #[default]
    Ground,
    Mnemonic,
    Params(Mnemonic),
    Coordinates(Mnemonic),
    Bare(Mnemonic),
    Skip,
    Label,
    LabelTerminator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Ignore,
    Collect,
    Recognize,
    Reset,
    Stray,
    Digit,
    Separator,
    Terminate,
    Interrupt,
    Excess,
    Unexpected,
    Print,
    EndLabel,
    Define,
}
