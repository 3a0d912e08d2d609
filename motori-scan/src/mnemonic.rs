use std::fmt;

const fn code(first: u8, second: u8) -> u16 {
    (first as u16) << 8 | second as u16
}

/// Two-letter HP-GL instructions known to the scanner.
///
/// The discriminant is the 16-bit code the scanner accumulates: the first
/// letter in the high byte, the second one in the low byte.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    /// Arc absolute.
    AA = code(b'A', b'A'),
    /// Arc relative.
    AR = code(b'A', b'R'),
    /// Acceleration select (nonstandard).
    AS = code(b'A', b'S'),
    /// Designate alternate character set.
    CA = code(b'C', b'A'),
    /// Circle.
    CI = code(b'C', b'I'),
    /// Character plot.
    CP = code(b'C', b'P'),
    /// Designate standard character set.
    CS = code(b'C', b'S'),
    /// Default attributes.
    DF = code(b'D', b'F'),
    /// Absolute label direction.
    DI = code(b'D', b'I'),
    /// Relative label direction.
    DR = code(b'D', b'R'),
    /// Label terminator.
    DT = code(b'D', b'T'),
    /// Edge rectangle absolute.
    EA = code(b'E', b'A'),
    /// Edge rectangle relative.
    ER = code(b'E', b'R'),
    /// Edge wedge.
    EW = code(b'E', b'W'),
    /// Seek home (nonstandard).
    IH = code(b'I', b'H'),
    /// Input mask.
    IM = code(b'I', b'M'),
    /// Initialize.
    IN = code(b'I', b'N'),
    /// Input P1 and P2.
    IP = code(b'I', b'P'),
    /// Label.
    LB = code(b'L', b'B'),
    /// Line type.
    LT = code(b'L', b'T'),
    /// Output actual position.
    OA = code(b'O', b'A'),
    /// Output commanded position.
    OC = code(b'O', b'C'),
    /// Output error.
    OE = code(b'O', b'E'),
    /// Output factors.
    OF = code(b'O', b'F'),
    /// Output identification.
    OI = code(b'O', b'I'),
    /// Output P1 and P2.
    OP = code(b'O', b'P'),
    /// Output status.
    OS = code(b'O', b'S'),
    /// Output window.
    OW = code(b'O', b'W'),
    /// Plot absolute.
    PA = code(b'P', b'A'),
    /// Pen down.
    PD = code(b'P', b'D'),
    /// Page feed.
    PG = code(b'P', b'G'),
    /// Plot relative.
    PR = code(b'P', b'R'),
    /// Pen thickness.
    PT = code(b'P', b'T'),
    /// Pen up.
    PU = code(b'P', b'U'),
    /// Select alternate character set.
    SA = code(b'S', b'A'),
    /// Scale.
    SC = code(b'S', b'C'),
    /// Absolute character size.
    SI = code(b'S', b'I'),
    /// Select pen.
    SP = code(b'S', b'P'),
    /// Relative character size.
    SR = code(b'S', b'R'),
    /// Select standard character set.
    SS = code(b'S', b'S'),
    /// Velocity select.
    VS = code(b'V', b'S'),
}

/// How an instruction takes its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Bit `n` set means `n` numeric parameters are accepted.
    Counts(u8),
    /// Any number of X,Y pairs.
    Pairs,
    /// Free text up to the label terminator.
    Text,
    /// A single terminator byte.
    Terminator,
}

impl Arity {
    const fn counts(counts: &[usize]) -> Self {
        let mut mask = 0u8;
        let mut idx = 0;
        while idx < counts.len() {
            mask |= 1 << counts[idx];
            idx += 1;
        }
        Self::Counts(mask)
    }

    /// Whether `count` numeric parameters are acceptable.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Counts(mask) => count < 8 && mask & (1 << count) != 0,
            Self::Pairs => count % 2 == 0,
            Self::Text | Self::Terminator => count == 0,
        }
    }

    /// Only the bare instruction is accepted.
    pub fn is_bare(self) -> bool {
        matches!(self, Self::Counts(1))
    }
}

impl Mnemonic {
    pub const ALL: [Mnemonic; 41] = [
        Self::AA,
        Self::AR,
        Self::AS,
        Self::CA,
        Self::CI,
        Self::CP,
        Self::CS,
        Self::DF,
        Self::DI,
        Self::DR,
        Self::DT,
        Self::EA,
        Self::ER,
        Self::EW,
        Self::IH,
        Self::IM,
        Self::IN,
        Self::IP,
        Self::LB,
        Self::LT,
        Self::OA,
        Self::OC,
        Self::OE,
        Self::OF,
        Self::OI,
        Self::OP,
        Self::OS,
        Self::OW,
        Self::PA,
        Self::PD,
        Self::PG,
        Self::PR,
        Self::PT,
        Self::PU,
        Self::SA,
        Self::SC,
        Self::SI,
        Self::SP,
        Self::SR,
        Self::SS,
        Self::VS,
    ];

    /// Look up the instruction for an accumulated two-letter code.
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| *m as u16 == code)
    }

    /// The two ASCII letters of the instruction.
    pub fn letters(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }

    pub const fn arity(self) -> Arity {
        use Mnemonic::*;

        match self {
            AA | AR | EW => Arity::counts(&[3, 4]),
            AS | LT | VS => Arity::counts(&[0, 1, 2]),
            CA | CS | PT | SP | PG => Arity::counts(&[0, 1]),
            CI => Arity::counts(&[1, 2]),
            CP | DI | DR | SI | SR => Arity::counts(&[0, 2]),
            DF | IN | IH | OA | OC | OE | OF | OI | OP | OS | OW | SA | SS => {
                Arity::counts(&[0])
            },
            EA | ER => Arity::counts(&[2]),
            IM => Arity::counts(&[0, 1, 2, 3]),
            IP => Arity::counts(&[0, 2, 4]),
            SC => Arity::counts(&[0, 4]),
            PA | PD | PR | PU => Arity::Pairs,
            LB => Arity::Text,
            DT => Arity::Terminator,
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, second] = self.letters();
        write!(f, "{}{}", first as char, second as char)
    }
}
