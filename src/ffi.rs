//! C entry points.
//!
//! ```c
//! int   scrub_is_utf8(const char* buf, size_t len);
//! char* scrub_sanitize_utf8(const char* buf, size_t len, size_t* out_len);
//! void  scrub_free(char* buf, size_t len);
//! ```
//!
//! A null `buf` is never valid and sanitizes to nothing. Buffers returned by
//! `scrub_sanitize_utf8` belong to the caller and go back through `scrub_free`
//! with the length that came with them.

use std::ffi::{c_char, c_int};
use std::ptr;

use allocator_api2::alloc::Global;
use allocator_api2::boxed::Box;
use tracing::debug;

use crate::{is_utf8, sanitize_into, sanitized_len, Utf8Buf};

/// Returns 1 if the `len` bytes at `buf` are well-formed UTF-8, 0 otherwise.
///
/// # Safety
/// `buf` must be null or point to `len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn scrub_is_utf8(buf: *const c_char, len: usize) -> c_int {
    if buf.is_null() {
        return 0;
    }
    // SAFETY: guaranteed by the caller.
    let bytes = unsafe { std::slice::from_raw_parts(buf.cast::<u8>(), len) };
    c_int::from(is_utf8(bytes))
}

/// Sanitized copy of the `len` bytes at `buf`.
///
/// Writes the length of the copy to `out_len` unless it is null. Null or empty
/// input, and running out of memory, give a null pointer and length 0.
///
/// # Safety
/// `buf` must be null or point to `len` readable bytes. `out_len` must be null
/// or valid for a write.
#[no_mangle]
pub unsafe extern "C" fn scrub_sanitize_utf8(buf: *const c_char, len: usize, out_len: *mut usize) -> *mut c_char {
    let (ptr, written) = if buf.is_null() || len == 0 {
        (ptr::null_mut(), 0)
    } else {
        // SAFETY: guaranteed by the caller.
        let bytes = unsafe { std::slice::from_raw_parts(buf.cast::<u8>(), len) };
        into_raw(bytes).unwrap_or((ptr::null_mut(), 0))
    };

    if !out_len.is_null() {
        // SAFETY: guaranteed by the caller.
        unsafe { *out_len = written };
    }
    ptr
}

/// Releases a buffer returned by [`scrub_sanitize_utf8`].
///
/// # Safety
/// `buf` must be null, or a pointer returned by `scrub_sanitize_utf8` together
/// with the length it reported, not yet freed.
#[no_mangle]
pub unsafe extern "C" fn scrub_free(buf: *mut c_char, len: usize) {
    if buf.is_null() {
        return;
    }
    // SAFETY: `buf` and `len` describe a boxed slice in `Global` leaked by `into_raw`.
    drop(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(buf.cast::<u8>(), len)) });
}

fn into_raw(bytes: &[u8]) -> Option<(*mut c_char, usize)> {
    // The C side frees with the length only, so the one allocation is sized exactly.
    let len = sanitized_len(bytes);
    let mut sanitized = Utf8Buf::try_with_capacity_in(len, Global).ok()?;
    if let Err(err) = sanitize_into(bytes, &mut sanitized) {
        debug!(%err, "sanitizing for the C caller failed");
        return None;
    }
    debug_assert_eq!(sanitized.capacity(), len);

    let boxed = sanitized.into_vec().into_boxed_slice();
    let raw = Box::into_raw(boxed);
    Some((raw.cast::<c_char>(), len))
}
