use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EscapeError {
    #[error("`\\x` at byte {at} must be followed by two hex digits")]
    BadHex { at: usize },

    #[error("unknown escape `\\{found}` at byte {at}")]
    Unknown { at: usize, found: char },

    #[error("`\\` at the end of the input escapes nothing")]
    Dangling,
}

/// Turns typed text into raw bytes.
///
/// `\xNN` gives the byte `NN`, which is how invalid UTF-8 gets typed in.
/// `\\`, `\n`, `\r`, `\t` and `\0` work as in Rust. Everything else is kept
/// as its UTF-8 encoding.
pub fn unescape(text: &str) -> Result<Vec<u8>, EscapeError> {
    let mut bytes = Vec::with_capacity(text.len());
    let mut chars = text.char_indices();

    while let Some((at, c)) = chars.next() {
        if c != '\\' {
            let mut utf8 = [0; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            continue;
        }

        match chars.next() {
            Some((_, 'x')) => {
                let hi = chars.next().and_then(|(_, c)| c.to_digit(16));
                let lo = chars.next().and_then(|(_, c)| c.to_digit(16));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => bytes.push(((hi << 4) | lo) as u8),
                    _ => return Err(EscapeError::BadHex { at }),
                }
            }
            Some((_, '\\')) => bytes.push(b'\\'),
            Some((_, 'n')) => bytes.push(b'\n'),
            Some((_, 'r')) => bytes.push(b'\r'),
            Some((_, 't')) => bytes.push(b'\t'),
            Some((_, '0')) => bytes.push(0),
            Some((_, found)) => return Err(EscapeError::Unknown { at, found }),
            None => return Err(EscapeError::Dangling),
        }
    }
    Ok(bytes)
}

/// Whether `line` ends in a lone backslash asking for another line. `\\` at
/// the end is an escaped backslash, so only an odd run counts.
pub fn continues(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text() {
        assert_eq!(unescape("fear baboon").unwrap(), b"fear baboon");
        assert_eq!(unescape("Grüße").unwrap(), "Grüße".as_bytes());
        assert!(unescape("").unwrap().is_empty());
    }

    #[test]
    fn hex_bytes() {
        assert_eq!(unescape(r"Scrunch-faced \xF8 fear").unwrap(), b"Scrunch-faced \xF8 fear");
        assert_eq!(unescape(r"\xc2\x80").unwrap(), b"\xC2\x80");
        assert_eq!(unescape(r"\x00\xFF").unwrap(), b"\x00\xFF");
    }

    #[test]
    fn simple_escapes() {
        assert_eq!(unescape(r"a\\b\n\r\t\0").unwrap(), b"a\\b\n\r\t\0");
    }

    #[test]
    fn errors() {
        assert_eq!(unescape(r"ab\xF"), Err(EscapeError::BadHex { at: 2 }));
        assert_eq!(unescape(r"\xZZ"), Err(EscapeError::BadHex { at: 0 }));
        assert_eq!(unescape(r"é\q"), Err(EscapeError::Unknown { at: 2, found: 'q' }));
        assert_eq!(unescape("tail\\"), Err(EscapeError::Dangling));
    }

    #[test]
    fn line_continuation() {
        assert!(!continues(""));
        assert!(!continues("fear"));
        assert!(continues(r"fear\"));
        assert!(!continues(r"fear\\"));
        assert!(continues(r"fear\\\"));
        assert!(!continues(r"\\\\"));
        assert!(!continues(r"a\b"));
    }
}
