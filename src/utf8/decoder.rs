// https://tools.ietf.org/html/rfc3629
//
//   Code points          First   Second  Third   Fourth
//   U+0000..U+007F       00..7F
//   U+0080..U+07FF       C2..DF  80..BF
//   U+0800..U+0FFF       E0      A0..BF  80..BF
//   U+1000..U+CFFF       E1..EC  80..BF  80..BF
//   U+D000..U+D7FF       ED      80..9F  80..BF
//   U+E000..U+FFFF       EE..EF  80..BF  80..BF
//   U+10000..U+3FFFF     F0      90..BF  80..BF  80..BF
//   U+40000..U+FFFFF     F1..F3  80..BF  80..BF  80..BF
//   U+100000..U+10FFFF   F4      80..8F  80..BF  80..BF

/// Position of the decoder between two bytes of input.
///
/// The `Check*` states are entered only right after a lead byte whose second
/// byte has a narrower range than a plain continuation byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum State {
    /// The bytes read so far can not be part of well-formed UTF-8.
    Invalid,
    /// On a code point boundary. This is both the initial and the accepting state.
    #[default]
    Accept,
    NeedOne,
    NeedTwo,
    NeedThree,
    /// After `E0`: anything below `A0` would encode a code point under U+0800.
    CheckOverlong3,
    /// After `F0`: anything below `90` would encode a code point under U+10000.
    CheckOverlong4,
    /// After `F4`: anything above `8F` would encode a code point past U+10FFFF.
    CheckMax4,
    /// After `ED`: anything above `9F` would encode U+D800..U+DFFF.
    CheckSurrogate,
}

impl State {
    /// Feeds one byte to the decoder.
    ///
    /// Total: malformed input yields [`State::Invalid`], which then stays
    /// `Invalid` for every further byte. Drivers that want to carry on after an
    /// error call [`State::resume`] first.
    #[inline]
    pub const fn advance(self, byte: u8) -> State {
        match self {
            State::Invalid => State::Invalid,
            State::Accept => lead(byte),
            State::NeedOne => continuation(byte, State::Accept),
            State::NeedTwo => continuation(byte, State::NeedOne),
            State::NeedThree => continuation(byte, State::NeedTwo),
            State::CheckOverlong3 => match byte {
                0xA0..=0xBF => State::NeedOne,
                _ => State::Invalid,
            },
            State::CheckOverlong4 => match byte {
                0x90..=0xBF => State::NeedTwo,
                _ => State::Invalid,
            },
            State::CheckMax4 => match byte {
                0x80..=0x8F => State::NeedTwo,
                _ => State::Invalid,
            },
            State::CheckSurrogate => match byte {
                0x80..=0x9F => State::NeedOne,
                _ => State::Invalid,
            },
        }
    }

    /// The state to read the next byte from: a rejected byte is followed by a
    /// fresh start, everything else carries on where it was.
    #[inline]
    pub const fn resume(self) -> State {
        match self {
            State::Invalid => State::Accept,
            state => state,
        }
    }

    #[inline]
    pub const fn is_boundary(self) -> bool {
        matches!(self, State::Accept)
    }

    /// Number of continuation bytes still owed before the next boundary.
    pub const fn pending(self) -> usize {
        match self {
            State::Invalid | State::Accept => 0,
            State::NeedOne => 1,
            State::NeedTwo | State::CheckOverlong3 | State::CheckSurrogate => 2,
            State::NeedThree | State::CheckOverlong4 | State::CheckMax4 => 3,
        }
    }
}

#[inline]
const fn lead(byte: u8) -> State {
    match byte {
        0x00..=0x7F => State::Accept,
        // C0 and C1 can only produce overlong forms of ASCII
        0xC2..=0xDF => State::NeedOne,
        0xE0 => State::CheckOverlong3,
        0xED => State::CheckSurrogate,
        0xE1..=0xEC | 0xEE..=0xEF => State::NeedTwo,
        0xF0 => State::CheckOverlong4,
        0xF1..=0xF3 => State::NeedThree,
        0xF4 => State::CheckMax4,
        _ => State::Invalid,
    }
}

#[inline]
const fn continuation(byte: u8, next: State) -> State {
    if byte & 0xC0 == 0x80 {
        next
    } else {
        State::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(bytes: &[u8]) -> State {
        bytes.iter().fold(State::Accept, |state, &byte| state.advance(byte))
    }

    #[test]
    fn ascii_stays_on_boundary() {
        for byte in 0x00..=0x7F {
            assert_eq!(State::Accept.advance(byte), State::Accept);
        }
    }

    #[test]
    fn lead_bytes() {
        assert_eq!(State::Accept.advance(0xC0), State::Invalid);
        assert_eq!(State::Accept.advance(0xC1), State::Invalid);
        assert_eq!(State::Accept.advance(0xC2), State::NeedOne);
        assert_eq!(State::Accept.advance(0xDF), State::NeedOne);
        assert_eq!(State::Accept.advance(0xE0), State::CheckOverlong3);
        assert_eq!(State::Accept.advance(0xE1), State::NeedTwo);
        assert_eq!(State::Accept.advance(0xED), State::CheckSurrogate);
        assert_eq!(State::Accept.advance(0xEF), State::NeedTwo);
        assert_eq!(State::Accept.advance(0xF0), State::CheckOverlong4);
        assert_eq!(State::Accept.advance(0xF3), State::NeedThree);
        assert_eq!(State::Accept.advance(0xF4), State::CheckMax4);
        for byte in 0xF5..=0xFF {
            assert_eq!(State::Accept.advance(byte), State::Invalid, "{byte:#04X}");
        }
    }

    #[test]
    fn stray_continuation() {
        for byte in 0x80..=0xBF {
            assert_eq!(State::Accept.advance(byte), State::Invalid, "{byte:#04X}");
        }
    }

    #[test]
    fn check_states_need_a_continuation_byte() {
        // A space has the 0x20 bit set but is not a continuation byte.
        assert_eq!(State::CheckOverlong3.advance(b' '), State::Invalid);
        assert_eq!(State::CheckOverlong4.advance(b'0'), State::Invalid);
        assert_eq!(State::CheckMax4.advance(b'A'), State::Invalid);
        assert_eq!(State::CheckSurrogate.advance(0x00), State::Invalid);
    }

    #[test]
    fn check_state_ranges() {
        assert_eq!(State::CheckOverlong3.advance(0x9F), State::Invalid);
        assert_eq!(State::CheckOverlong3.advance(0xA0), State::NeedOne);
        assert_eq!(State::CheckOverlong4.advance(0x8F), State::Invalid);
        assert_eq!(State::CheckOverlong4.advance(0x90), State::NeedTwo);
        assert_eq!(State::CheckMax4.advance(0x8F), State::NeedTwo);
        assert_eq!(State::CheckMax4.advance(0x90), State::Invalid);
        assert_eq!(State::CheckSurrogate.advance(0x9F), State::NeedOne);
        assert_eq!(State::CheckSurrogate.advance(0xA0), State::Invalid);
    }

    #[test]
    fn invalid_is_absorbing() {
        for byte in 0x00..=0xFF {
            assert_eq!(State::Invalid.advance(byte), State::Invalid);
        }
        assert_eq!(State::Invalid.resume().advance(b'a'), State::Accept);
        assert_eq!(State::NeedTwo.resume(), State::NeedTwo);
    }

    #[test]
    fn whole_sequences() {
        assert_eq!(run("a".as_bytes()), State::Accept);
        assert_eq!(run("ß".as_bytes()), State::Accept);
        assert_eq!(run("€".as_bytes()), State::Accept);
        assert_eq!(run("🦀".as_bytes()), State::Accept);
        assert_eq!(run(b"\xF0\x9F\xA6"), State::NeedOne);
        assert_eq!(run(b"\xED\xA0\x80"), State::Invalid);
    }

    #[test]
    fn pending_counts_remaining_bytes() {
        assert_eq!(run(b"\xE2").pending(), 2);
        assert_eq!(run(b"\xE0").pending(), 2);
        assert_eq!(run(b"\xF4\x8F").pending(), 2);
        assert_eq!(run(b"\xF0").pending(), 3);
        assert_eq!(run(b"\xED").pending(), 2);
        assert!(run(b"").is_boundary());
    }

    #[test]
    fn starts_on_a_boundary() {
        assert_eq!(State::default(), State::Accept);
        assert!(State::default().is_boundary());
    }
}
