use crate::codepointset::{CodePoint, Interval};
use std::sync::OnceLock;

// Character classes like \d or \S.

/// Construct an interval from an inclusive range of char.
const fn r(first: char, last: char) -> Interval {
    Interval {
        first: first as u32,
        last: last as u32,
    }
}

/// Construct an interval from a single char.
const fn r1(c: char) -> Interval {
    Interval {
        first: c as u32,
        last: c as u32,
    }
}

// Note all of these are sorted.
// The escape classes are ASCII-only, as in Ruby without the (?u) option.

/// \w
pub const WORD_CHARS: [Interval; 4] = [r('0', '9'), r('A', 'Z'), r1('_'), r('a', 'z')];

/// \d
pub const DIGITS: [Interval; 1] = [r('0', '9')];

/// \s: space, \t, \n, \v, \f and \r.
pub const WHITESPACE: [Interval; 2] = [r('\u{0009}', '\u{000D}'), r1('\u{0020}')];

/// \h
pub const HEX_DIGITS: [Interval; 3] = [r('0', '9'), r('A', 'F'), r('a', 'f')];

/// The single-character forms of \R.
pub const LINE_BREAKS: [Interval; 3] = [
    r('\u{000A}', '\u{000D}'),
    r1('\u{0085}'),
    r('\u{2028}', '\u{2029}'),
];

/// The character excluded from `.` outside of multiline mode.
pub const NEWLINE: Interval = r1('\n');

/// The first code point past ASCII.
pub const ASCII_END: CodePoint = 0x80;

/// ASCII punctuation and symbols, most familiar first.
const PUNCTUATION: &str = "!\"#%&'()*,-./:;?@[\\]_{}$+<=>^`|~";

/// \return every ASCII code point exactly once, in the order examples prefer
/// them: newline first so that its presence is obvious, then letters, digits,
/// punctuation, space, and the remaining (mostly control) characters.
pub fn ascii_sample_order() -> &'static [CodePoint] {
    static ORDER: OnceLock<Vec<CodePoint>> = OnceLock::new();
    ORDER.get_or_init(|| {
        let preferred = core::iter::once('\n')
            .chain('a'..='z')
            .chain('A'..='Z')
            .chain('0'..='9')
            .chain(PUNCTUATION.chars())
            .chain(core::iter::once(' '));
        let mut order: Vec<CodePoint> = preferred.map(u32::from).collect();
        for cp in 0..ASCII_END {
            if !order.contains(&cp) {
                order.push(cp);
            }
        }
        order
    })
}
