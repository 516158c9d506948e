use utf8_scrub::{invalid_spans, is_utf8, sanitize_utf8, validate, Utf8Error};

const MULTILINGUAL: &[u8] = include_bytes!("data/multilingual.html");

#[test]
fn html_document_is_valid() {
    assert!(is_utf8(MULTILINGUAL));
    assert_eq!(validate(MULTILINGUAL), Ok(()));
    assert_eq!(invalid_spans(MULTILINGUAL).count(), 0);
}

#[test]
fn html_document_is_copied_verbatim() {
    let sanitized = sanitize_utf8(MULTILINGUAL).unwrap();
    assert_eq!(sanitized.as_bytes(), MULTILINGUAL);
    assert_eq!(sanitized.capacity(), MULTILINGUAL.len());
}

#[test]
fn every_truncation_point_is_handled() {
    for end in 0..=MULTILINGUAL.len() {
        let prefix = &MULTILINGUAL[..end];
        let expected = std::str::from_utf8(prefix).is_ok();
        assert_eq!(is_utf8(prefix), expected, "prefix of {end} bytes");

        let sanitized = sanitize_utf8(prefix).unwrap();
        assert!(is_utf8(sanitized.as_bytes()));
        if expected {
            assert_eq!(sanitized.as_bytes(), prefix);
        } else {
            // Only the cut-off code point at the end is lost.
            assert_eq!(sanitized.replacements(), 1);
            assert!(sanitized.as_str().ends_with('\u{FFFD}'));
            assert!(matches!(validate(prefix), Err(Utf8Error::Incomplete { .. })));
        }
    }
}

#[test]
fn corrupted_document() {
    // Knock out the lead byte of every fourth multi-byte sequence.
    let mut corrupted = MULTILINGUAL.to_vec();
    let mut leads = 0;
    for byte in corrupted.iter_mut() {
        if *byte >= 0xC2 {
            leads += 1;
            if leads % 4 == 0 {
                *byte = 0xFF;
            }
        }
    }
    assert!(!is_utf8(&corrupted));

    let sanitized = sanitize_utf8(&corrupted).unwrap();
    assert!(is_utf8(sanitized.as_bytes()));
    assert_eq!(sanitized.replacements(), invalid_spans(&corrupted).count());
    assert!(sanitized.as_str().starts_with("<!DOCTYPE html>"));
    assert!(sanitized.as_str().trim_end().ends_with("</html>"));

    // Sanitizing the result again changes nothing.
    let again = sanitize_utf8(sanitized.as_bytes()).unwrap();
    assert_eq!(again.as_bytes(), sanitized.as_bytes());
}
