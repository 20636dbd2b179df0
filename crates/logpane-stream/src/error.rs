//! Stream error taxonomy.

use std::fmt;

/// A terminal failure of one subscription.
///
/// Every variant ends the stream; recovery is the caller opening a fresh
/// subscription, never an automatic retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The source identity was rejected before anything was started
    /// (bad package name, tail length out of bounds).
    InvalidSource(String),
    /// The follower process could not be started.
    Spawn(String),
    /// Reading from the source failed mid-stream.
    Read(String),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSource(msg) => write!(f, "invalid source: {msg}"),
            Self::Spawn(msg) => write!(f, "failed to start journal follower: {msg}"),
            Self::Read(msg) => write!(f, "journal stream read failed: {msg}"),
        }
    }
}

impl std::error::Error for StreamError {}
