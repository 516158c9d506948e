use std::fmt;

use allocator_api2::alloc::{Allocator, Global};
use allocator_api2::vec::Vec;
use tracing::{debug, trace};

use crate::error::SanitizeError;

/// U+FFFD encoded as UTF-8.
pub const REPLACEMENT_CHARACTER: &[u8; 3] = b"\xEF\xBF\xBD";

/// Owned, growable buffer of well-formed UTF-8 produced by the sanitizer.
///
/// The bytes live in the allocator `A`, which is the global allocator unless
/// the buffer was built with [`crate::sanitize_utf8_in`]. Every write reserves
/// its room first, so running out of memory is reported as a
/// [`SanitizeError`] instead of aborting, and never leaves a half-written
/// buffer behind.
///
/// # Type parameters
/// - `A`: Any `allocator_api2` allocator, e.g. `&bumpalo::Bump`.
///
/// # Examples
///
/// ```
/// # use utf8_scrub::sanitize_utf8;
/// let buf = sanitize_utf8(b"fear \xF8 baboon").unwrap();
/// assert_eq!(buf.as_str(), "fear \u{FFFD} baboon");
/// assert_eq!(buf.replacements(), 1);
/// assert!(buf.capacity() >= buf.len());
/// ```
pub struct Utf8Buf<A: Allocator = Global> {
    bytes: Vec<u8, A>,
    replacements: usize,
}

impl<A: Allocator> Utf8Buf<A> {
    /// An empty buffer. Does not allocate.
    pub fn new_in(alloc: A) -> Utf8Buf<A> {
        Utf8Buf {
            bytes: Vec::new_in(alloc),
            replacements: 0,
        }
    }

    /// An empty buffer with room for exactly `capacity` bytes.
    ///
    /// # Errors
    /// Returns [`SanitizeError::OutOfMemory`] if the allocator refuses the request.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Utf8Buf<A>, SanitizeError> {
        let mut buf = Utf8Buf::new_in(alloc);
        buf.bytes
            .try_reserve_exact(capacity)
            .map_err(|_| out_of_memory(capacity))?;
        Ok(buf)
    }

    /// Appends valid text, growing the buffer if needed.
    pub fn try_push_str(&mut self, text: &str) -> Result<(), SanitizeError> {
        self.reserve(text.len())?;
        self.bytes.extend_from_slice(text.as_bytes());
        Ok(())
    }

    /// Appends one U+FFFD, growing the buffer if needed.
    pub fn try_push_replacement(&mut self) -> Result<(), SanitizeError> {
        self.reserve(REPLACEMENT_CHARACTER.len())?;
        self.bytes.extend_from_slice(REPLACEMENT_CHARACTER);
        self.replacements += 1;
        Ok(())
    }

    fn reserve(&mut self, additional: usize) -> Result<(), SanitizeError> {
        if self.bytes.capacity() - self.bytes.len() >= additional {
            return Ok(());
        }

        let requested = self.bytes.len().saturating_add(additional);
        trace!(len = self.bytes.len(), capacity = self.bytes.capacity(), requested, "growing output buffer");
        self.bytes.try_reserve(additional).map_err(|_| out_of_memory(requested))
    }

    /// Logical length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Allocated size in bytes. Always at least [`Utf8Buf::len`].
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// How many U+FFFD markers the sanitizer wrote.
    pub fn replacements(&self) -> usize {
        self.replacements
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: the buffer is only written through `try_push_str`, which takes
        // a `&str`, and `try_push_replacement`, which writes a whole code point.
        unsafe { std::str::from_utf8_unchecked(&self.bytes) }
    }

    /// Hands the bytes over to the caller.
    pub fn into_vec(self) -> Vec<u8, A> {
        self.bytes
    }
}

impl<A: Allocator> AsRef<[u8]> for Utf8Buf<A> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<A: Allocator> AsRef<str> for Utf8Buf<A> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// No `A: Debug` bound, unlike the derive.
impl<A: Allocator> fmt::Debug for Utf8Buf<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Utf8Buf")
            .field("text", &self.as_str())
            .field("replacements", &self.replacements)
            .finish()
    }
}

impl<A: Allocator> fmt::Display for Utf8Buf<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn out_of_memory(requested: usize) -> SanitizeError {
    debug!(requested, "allocation for sanitized output failed");
    SanitizeError::OutOfMemory { requested }
}
