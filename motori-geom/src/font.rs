// Glyph table derived from the HP2xx standard character set.
//
// Copyright (c) 1992 - 1994 Heinz W. Werntges.  All rights reserved.
// Parts Copyright (c) 1999  Martin Kroeker  All rights reserved.
//
// Distributed by Free Software Foundation, Inc.
//
// This file is part of HP2xx.
//
// HP2xx is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY.  No author or distributor accepts responsibility
// to anyone for the consequences of using it or for whether it serves any
// particular purpose or works at all, unless he says so in writing.  Refer
// to the GNU General Public License, Version 2 or later, for full details.
//
// Everyone is granted permission to copy, modify and redistribute
// HP2xx, but only under the conditions described in the GNU General Public
// License.  A copy of this license is supposed to have been
// given to you along with HP2xx so you can know your rights and
// responsibilities.  It should be in a file named COPYING.  Among other
// things, the copyright notice and this notice must be preserved on all
// copies.

//! Stroke font for character set 0.
//!
//! Every glyph is a list of pen commands on a small grid. One byte per
//! command: bit 7 lowers the pen for the move, bits 6..4 hold X (0..7) and
//! bits 3..0 hold Y (0..15). The baseline sits at `Y = 4` so descenders stay
//! positive; capitals span `X = 1..5` and `Y = 4..10`.

const FIRST: u8 = 0x20;
const LAST: u8 = 0x7e;

/// Bit marking a pen down move.
pub(crate) const PEN: u8 = 0x80;

/// Grid row of the baseline.
pub(crate) const BASELINE: f32 = 4.0;

static CHARSET0: [&[u8]; (LAST - FIRST + 1) as usize] = [
    b"", // space
    b"\x34\xb5\x36\xba", // !
    b"\x29\xaa\x49\xca", // "
    b"\x24\xaa\x44\xca\x16\xd6\x18\xd8", // #
    b"\x34\xba\x59\xa9\x98\xa7\xc7\xd6\xc5\x95", // $
    b"\x14\xda\x29\xa8\xb8\xb9\xa9\x36\xb5\xc5\xc6\xb6", // %
    b"\x54\x98\x99\xaa\xb9\xb8\x96\x95\xa4\xb4\xd6", // &
    b"\x39\xca", // '
    b"\x5a\xb8\xb6\xd4", // (
    b"\x14\xb6\xb8\x9a", // )
    b"\x05\xe9\x65\x89\x3a\xb4", // *
    b"\x35\xb9\x17\xd7", // +
    b"\x34\xa4\xa5\xb5\xb3\xa2", // ,
    b"\x17\xd7", // -
    b"\x34\xa4\xa5\xb5\xb4", // .
    b"\xea", // /
    b"\x15\xa4\xc4\xd5\xd9\xca\xaa\x99\x95", // 0
    b"\x24\xc4\x34\xba\xa9", // 1
    b"\x19\xaa\xca\xd9\xd8\x95\x94\xd4", // 2
    b"\x15\xa4\xc4\xd5\xd6\xc7\xb7\xda\x9a", // 3
    b"\x4a\x97\x96\xd6\x47\xc4", // 4
    b"\x5a\x9a\x98\xc8\xd7\xd5\xc4\xa4\x95", // 5
    b"\x5a\xba\x98\x95\xa4\xc4\xd5\xd6\xc7\x97", // 6
    b"\x1a\xda\xd9\x96\x94", // 7
    b"\x47\xd8\xd9\xca\xaa\x99\x98\xa7\xc7\xd6\xd5\xc4\xa4\x95\x96\xa7", // 8
    b"\x24\xb4\xd6\xd9\xca\xaa\x99\x98\xa7\xd7", // 9
    b"\x27\xa8\xb8\xb7\xa7\x25\xb5\xb4\xa4\xa5", // :
    b"\x26\xa7\xb7\xb6\xa6\x34\xa4\xa5\xb5\xb3\xa2", // ;
    b"\x4a\x97\xc4", // <
    b"\x18\xd8\x16\xd6", // =
    b"\x1a\xc7\x94", // >
    b"\x19\xaa\xca\xd9\xd8\xc7\xb7\xb6\x35\xb4", // ?
    b"\x43\xa3\x94\x98\xaa\xca\xd9\xd6\xc5\xb6\xb7\xc8\xd8", // @
    b"\x14\x99\xaa\xca\xd9\xd4\x16\xd6", // A
    b"\x14\x9a\xca\xd9\xd8\xc7\x97\x14\xc4\xd5\xd6\xc7", // B
    b"\x55\xc4\xa4\x95\x99\xaa\xca\xd9", // C
    b"\x14\x9a\xca\xd9\xd5\xc4\x94", // D
    b"\x54\x94\x9a\xda\x17\xc7", // E
    b"\x14\x9a\xda\x17\xc7", // F
    b"\x59\xca\xaa\x99\x95\xa4\xc4\xd5\xd7\xa7", // G
    b"\x14\x9a\x54\xda\x17\xd7", // H
    b"\x14\xd4\x34\xba\x1a\xda", // I
    b"\x15\xa4\xc4\xd5\xda\x9a", // J
    b"\x14\x9a\x17\xa7\xd4\x27\xda", // K
    b"\x1a\x94\xd4", // L
    b"\x14\x9a\xb8\xda\xd4", // M
    b"\x14\x9a\xd4\xda", // N
    b"\x24\x95\x99\xaa\xca\xd9\xd5\xc4\xa4", // O
    b"\x14\x9a\xca\xd9\xd8\xc7\x97", // P
    b"\x24\x95\x99\xaa\xca\xd9\xd6\xb4\xa4\x36\xd4", // Q
    b"\x14\x9a\xca\xd9\xd8\xc7\x97\xa7\xd4", // R
    b"\x15\xa4\xc4\xd5\xd6\xc7\xa7\x98\x99\xaa\xca\xd9", // S
    b"\x34\xba\x9a\xda", // T
    b"\x1a\x95\xa4\xc4\xd5\xda", // U
    b"\x1a\x98\xb4\xd8\xda", // V
    b"\x1a\x94\xb7\xd4\xda", // W
    b"\x14\xda\x54\x9a", // X
    b"\x1a\x99\xb6\xb4\x36\xd9\xda", // Y
    b"\x1a\xda\x94\xd4", // Z
    b"\x54\xb4\xba\xda", // [
    b"\x1a\xd4", // backslash
    b"\x14\xb4\xba\x9a", // ]
    b"\x18\xba\xd8", // ^
    b"\x13\xd3", // _
    b"\x2b\xc8", // `
    b"\x54\xa4\x95\x97\xa8\xc8\xc4", // a
    b"\x14\xc4\xd5\xd7\xc8\xa8\x2a\xa4", // b
    b"\x55\xc4\xb4\xa5\xa7\xb8\xc8\xd7", // c
    b"\x4a\xc4\xa4\x95\x97\xa8\xc8\x44\xd4", // d
    b"\x16\xc6\xd7\xc8\xa8\x97\x95\xa4\xd4", // e
    b"\x34\xb9\xca\xda\x27\xc7", // f
    b"\x12\xb2\xc3\xc8\xa8\x97\x95\xa4\xc4", // g
    b"\x1a\x94\x18\xb8\xc7\xc4", // h
    b"\x3a\xb9\x28\xb8\xb4\x24\xc4", // i
    b"\x3a\xb9\x28\xb8\xb3\xa2\x92", // j
    b"\x14\x9a\x44\x96\xc8", // k
    b"\x2a\xba\xb4\x24\xc4", // l
    b"\x14\x98\x17\xa8\xb7\xb4\x37\xc8\xd7\xd4", // m
    b"\x14\x98\x17\xa8\xb8\xc7\xc4", // n
    b"\x24\x95\x97\xa8\xb8\xc7\xc5\xb4\xa4", // o
    b"\x12\x98\xb8\xc7\xc5\xb4\x94", // p
    b"\x44\xa4\x95\x97\xa8\xc8\xc2", // q
    b"\x18\x94\x16\xb8\xc8", // r
    b"\x48\xa8\x97\xa6\xb6\xc5\xb4\x94", // s
    b"\x2a\xa4\xc4\x18\xc8", // t
    b"\x18\x95\xa4\xc4\xc8", // u
    b"\x18\x96\xb4\xd6\xd8", // v
    b"\x18\x95\xa4\xb5\xb7\x35\xc4\xd5\xd8", // w
    b"\x18\xd4\x14\xd8", // x
    b"\x12\xd6\xd8\x18\x96\xb4", // y
    b"\x18\xc8\x94\xc4", // z
    b"\x4b\xbb\xaa\xa8\x97\xa6\xa4\xb3\xc3", // {
    b"\x3b\xb3", // |
    b"\x2b\xbb\xca\xc8\xd7\xc6\xc4\xb3\xa3", // }
    b"\x19\xaa\xc8\xd9", // ~
];

/// Pen commands for `byte`, or `None` when set 0 has no glyph for it.
pub fn glyph_codes(byte: u8) -> Option<&'static [u8]> {
    match byte {
        FIRST..=LAST => Some(CHARSET0[(byte - FIRST) as usize]),
        _ => None,
    }
}

/// Split a pen command into its grid position and pen flag.
#[inline]
pub(crate) fn decode(code: u8) -> (f32, f32, bool) {
    let x = (code >> 4) & 0b111;
    let y = code & 0b1111;
    (x as f32, y as f32, code & PEN != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_ascii_is_covered() {
        for byte in b' '..=b'~' {
            assert!(glyph_codes(byte).is_some(), "{byte:#04x}");
        }
        assert_eq!(glyph_codes(b' '), Some(&[][..]));
        assert_eq!(glyph_codes(0x7f), None);
        assert_eq!(glyph_codes(b'\n'), None);
        assert_eq!(glyph_codes(0xc4), None);
    }

    #[test]
    fn letter_l() {
        let codes = glyph_codes(b'L').unwrap();
        let moves: Vec<_> = codes.iter().map(|code| decode(*code)).collect();
        assert_eq!(
            moves,
            vec![(1.0, 10.0, false), (1.0, 4.0, true), (5.0, 4.0, true)]
        );
    }

    #[test]
    fn glyphs_stay_on_grid() {
        for byte in b' '..=b'~' {
            for code in glyph_codes(byte).unwrap() {
                assert_ne!(*code, 0, "{}", byte as char);
                let (x, _, _) = decode(*code);
                assert!(x <= 6.0, "{}", byte as char);
            }
        }
    }
}
