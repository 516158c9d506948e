//! Validation and sanitization of UTF-8 byte buffers.
//!
//! [`is_utf8`] checks a buffer against RFC 3629: no overlong encodings, no
//! surrogate code points, nothing above U+10FFFF. [`sanitize_utf8`] copies a
//! buffer and replaces every maximal run of bytes that do not form a code
//! point with a single U+FFFD, leaving valid text untouched.
//!
//! Both run a small byte-at-a-time state machine, [`State`]. The [`ffi`]
//! module exposes the same two operations over pointer/length pairs.

mod error;
pub mod ffi;
mod utf8;
mod utf8_buf;

pub use error::*;
pub use utf8::*;
pub use utf8_buf::*;
