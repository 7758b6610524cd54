use std::fmt;

use locmap_protocol::CodecError;

/// Typed error for sync and compositing operations.
#[derive(Debug)]
pub enum OverlayError {
    /// A location package could not be decoded.
    Codec(CodecError),
    /// Transport send or channel registration failed.
    Transport(String),
    /// The icon render collaborator failed.
    Render(String),
    /// Operation invoked on the wrong sync role.
    WrongRole(&'static str),
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "package decode failed: {e}"),
            Self::Transport(msg) => write!(f, "transport failed: {msg}"),
            Self::Render(msg) => write!(f, "icon render failed: {msg}"),
            Self::WrongRole(msg) => write!(f, "wrong sync role: {msg}"),
        }
    }
}

impl std::error::Error for OverlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for OverlayError {
    fn from(e: CodecError) -> Self {
        OverlayError::Codec(e)
    }
}
