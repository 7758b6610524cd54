use thiserror::Error;

/// Errors produced while decoding a location package.
///
/// The codec does not attempt partial recovery; a malformed buffer fails the
/// whole decode and the caller must discard the sync attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("package truncated while reading {context}")]
    Truncated { context: &'static str },
    #[error("negative record count: {0}")]
    NegativeCount(i32),
}
