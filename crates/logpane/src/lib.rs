#![forbid(unsafe_code)]

//! logpane public facade crate.
//!
//! Re-exports the streaming-core surface (panel view-model, run parser,
//! buffer types, stream lifecycle) and offers a lightweight prelude for
//! day-to-day usage.

use std::fmt;

// --- ANSI re-exports -------------------------------------------------------

pub use logpane_ansi::{AnsiColor, StyledRun, parse_line, strip_nonvisual};

// --- Buffer re-exports -----------------------------------------------------

pub use logpane_buffer::{
    DEFAULT_CAPACITY, FOLLOW_THRESHOLD, FollowTracker, LogBuffer, LogEntry, ScrollMetrics,
};

// --- Stream re-exports -----------------------------------------------------

pub use logpane_stream::{
    DEFAULT_TAIL_LINES, JournalConfig, JournalSource, LineSink, LineSource, MAX_TAIL_LINES,
    ScriptedSource, StopSignal, StreamError, StreamHandle, validate_package_name,
};

// --- View re-exports -------------------------------------------------------

pub use logpane_view::{LogPanel, StyledLine};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for logpane consumers.
#[derive(Debug)]
pub enum Error {
    /// I/O failure outside the stream lifecycle.
    Io(std::io::Error),
    /// A stream subscription failed.
    Stream(StreamError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Stream(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<StreamError> for Error {
    fn from(err: StreamError) -> Self {
        Self::Stream(err)
    }
}

/// Standard result type for logpane APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AnsiColor, Error, JournalSource, LineSource, LogBuffer, LogEntry, LogPanel, Result,
        ScrollMetrics, StreamError, StreamHandle, StyledLine, StyledRun, parse_line,
    };

    pub use crate::{ansi, buffer, stream, view};
}

pub use logpane_ansi as ansi;
pub use logpane_buffer as buffer;
pub use logpane_stream as stream;
pub use logpane_view as view;
