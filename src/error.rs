use thiserror::Error;

/// Why a buffer is not well-formed UTF-8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Utf8Error {
    #[error("invalid UTF-8 sequence after {valid_up_to} valid bytes")]
    Invalid { valid_up_to: usize },

    #[error("input ends {missing} byte(s) short of a complete UTF-8 sequence after {valid_up_to} valid bytes")]
    Incomplete { valid_up_to: usize, missing: usize },
}

impl Utf8Error {
    /// Length of the longest prefix that is well-formed UTF-8.
    pub fn valid_up_to(&self) -> usize {
        match *self {
            Utf8Error::Invalid { valid_up_to } | Utf8Error::Incomplete { valid_up_to, .. } => valid_up_to,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SanitizeError {
    /// Growing the output buffer failed. No partial output is kept.
    #[error("out of memory while reserving {requested} bytes of sanitized output")]
    OutOfMemory { requested: usize },
}
