#![forbid(unsafe_code)]

//! Line-stream subscriptions with explicit, cancellable lifecycles.
//!
//! A [`StreamHandle`] represents "currently receiving lines from source X":
//! opened once, delivering lines in order to a callback on a dedicated
//! reader thread, closable exactly once. Closing is idempotent, safe from
//! inside or outside a delivery callback, and guarantees that no further
//! `on_line`/`on_error` invocations happen after it returns.
//!
//! # How it works
//!
//! 1. [`StreamHandle::open`] spawns a reader thread running a [`LineSource`].
//! 2. The source pushes complete lines into a [`LineSink`]; each delivery
//!    runs to completion before the next.
//! 3. A transport failure surfaces through `on_error` at most once and ends
//!    the stream; there is no automatic retry, the caller opens a fresh
//!    handle if it wants to resume.
//! 4. `close()` gates further deliveries, stops the source, interrupts
//!    blocking I/O, and (when called from outside the reader thread) joins
//!    it.
//!
//! The one production source is [`JournalSource`], which follows the
//! systemd journal of a container app's service unit. [`ScriptedSource`]
//! is the test double.

pub mod error;
pub mod handle;
pub mod journal;
pub mod source;
pub mod stop;

pub use error::StreamError;
pub use handle::StreamHandle;
pub use journal::{
    DEFAULT_TAIL_LINES, JournalConfig, JournalSource, MAX_TAIL_LINES, validate_package_name,
};
pub use source::{LineSink, LineSource, ScriptedSource};
pub use stop::{StopSignal, StopTrigger};
