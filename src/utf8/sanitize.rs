use allocator_api2::alloc::{Allocator, Global};
use tracing::debug;

use super::chunks::Utf8Chunks;
use crate::error::SanitizeError;
use crate::utf8_buf::{Utf8Buf, REPLACEMENT_CHARACTER};

/// Copies `bytes` into a new buffer, replacing every maximal invalid span
/// with a single U+FFFD.
///
/// Valid text is copied unchanged and in order. Empty input gives an empty
/// buffer without allocating.
///
/// # Errors
/// Returns [`SanitizeError::OutOfMemory`] when the output can not grow. The
/// partial output is freed before returning.
///
/// # Examples
///
/// ```
/// # use utf8_scrub::sanitize_utf8;
/// let buf = sanitize_utf8(b"Scrunch-faced \xF8\x80\x80\x80\xF9\x80\x80\x8F fear baboon").unwrap();
/// assert_eq!(buf.as_bytes(), b"Scrunch-faced \xEF\xBF\xBD fear baboon");
/// ```
pub fn sanitize_utf8(bytes: &[u8]) -> Result<Utf8Buf, SanitizeError> {
    sanitize_utf8_in(bytes, Global)
}

/// [`sanitize_utf8`] with the output placed in `alloc`.
///
/// # Examples
///
/// ```
/// # use bumpalo::Bump;
/// # use utf8_scrub::sanitize_utf8_in;
/// let arena = Bump::new();
/// let buf = sanitize_utf8_in(b"\xF8\x80", &arena).unwrap();
/// assert_eq!(buf.as_bytes(), b"\xEF\xBF\xBD");
/// ```
pub fn sanitize_utf8_in<A: Allocator>(bytes: &[u8], alloc: A) -> Result<Utf8Buf<A>, SanitizeError> {
    if bytes.is_empty() {
        return Ok(Utf8Buf::new_in(alloc));
    }

    // Valid input, the common case, fits without growing.
    let mut out = Utf8Buf::try_with_capacity_in(bytes.len(), alloc)?;
    sanitize_into(bytes, &mut out)?;

    debug!(
        input = bytes.len(),
        output = out.len(),
        replacements = out.replacements(),
        "sanitized buffer"
    );
    Ok(out)
}

/// Length in bytes of the output [`sanitize_utf8`] would give for `bytes`.
///
/// # Examples
///
/// ```
/// # use utf8_scrub::sanitized_len;
/// assert_eq!(sanitized_len(b"ab\xFF\xFEc"), 6);
/// assert_eq!(sanitized_len(b""), 0);
/// ```
pub fn sanitized_len(bytes: &[u8]) -> usize {
    Utf8Chunks::new(bytes)
        .map(|chunk| match chunk.broken {
            [] => chunk.valid.len(),
            _ => chunk.valid.len() + REPLACEMENT_CHARACTER.len(),
        })
        .sum()
}

/// Appends the sanitized form of `bytes` to `out`.
pub(crate) fn sanitize_into<A: Allocator>(bytes: &[u8], out: &mut Utf8Buf<A>) -> Result<(), SanitizeError> {
    for chunk in Utf8Chunks::new(bytes) {
        out.try_push_str(chunk.valid)?;
        if !chunk.broken.is_empty() {
            out.try_push_replacement()?;
        }
    }
    Ok(())
}
