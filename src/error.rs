//! Crate-level error types.

use std::fmt;

/// Errors produced by the umbra crate.
///
/// The rendering hot path is infallible by contract (every cast returns a
/// color); errors only arise at the edges - scene loading, thread spawning,
/// and image output.
#[derive(Debug)]
pub enum UmbraError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Scene file parsing or cross-reference resolution failure.
    SceneParse(String),
    /// Failed to spawn a worker thread.
    ThreadSpawn(std::io::Error),
    /// Failed to encode or write the output image.
    ImageEncode(String),
    /// Command-line arguments were malformed.
    Usage(String),
}

impl fmt::Display for UmbraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::SceneParse(msg) => {
                write!(f, "scene parse error: {msg}")
            }
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn worker thread: {e}")
            }
            Self::ImageEncode(msg) => {
                write!(f, "image output error: {msg}")
            }
            Self::Usage(msg) => write!(f, "usage error: {msg}"),
        }
    }
}

impl std::error::Error for UmbraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for UmbraError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
