use super::decoder::State;
use crate::error::Utf8Error;

/// Checks whether `bytes` is well-formed UTF-8.
///
/// An empty buffer is valid. Embedded zero bytes are ordinary ASCII.
///
/// # Examples
///
/// ```
/// # use utf8_scrub::is_utf8;
/// assert!(is_utf8("Grüße 🦀".as_bytes()));
/// assert!(!is_utf8(b"\xC0\x80"));
/// ```
pub fn is_utf8(bytes: &[u8]) -> bool {
    let mut state = State::Accept;
    for &byte in bytes {
        state = state.advance(byte);
        if state == State::Invalid {
            return false;
        }
    }
    state == State::Accept
}

/// Like [`is_utf8`], but reports where the input stops being well-formed.
///
/// # Errors
/// - [`Utf8Error::Invalid`] when some byte can not continue the text.
/// - [`Utf8Error::Incomplete`] when the input ends in the middle of a sequence.
pub fn validate(bytes: &[u8]) -> Result<(), Utf8Error> {
    let mut state = State::Accept;
    let mut valid_up_to = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        state = state.advance(byte);
        match state {
            State::Invalid => return Err(Utf8Error::Invalid { valid_up_to }),
            State::Accept => valid_up_to = i + 1,
            _ => {}
        }
    }

    if state.is_boundary() {
        Ok(())
    } else {
        Err(Utf8Error::Incomplete { valid_up_to, missing: state.pending() })
    }
}
