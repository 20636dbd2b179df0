#![forbid(unsafe_code)]

//! Bounded retention and follow state for a streaming log view.
//!
//! # Primary responsibilities
//!
//! - **Buffer**: [`LogBuffer`], a fixed-capacity ring of [`LogEntry`]s in
//!   arrival order, evicting from the head when full. Retention is
//!   best-effort by design: under sustained output the oldest lines go.
//! - **Follow**: [`FollowTracker`] + [`ScrollMetrics`], deciding whether
//!   newly appended entries should pin the view to the bottom.
//!
//! # Design principles
//!
//! - **No I/O, no clocks**: pure data + logic.
//! - **Local identity**: entry ids are allocated by the owning buffer, not
//!   by any global counter, so independent panels never share id space.

pub mod buffer;
pub mod follow;

pub use buffer::{DEFAULT_CAPACITY, LogBuffer, LogEntry};
pub use follow::{FOLLOW_THRESHOLD, FollowTracker, ScrollMetrics};
