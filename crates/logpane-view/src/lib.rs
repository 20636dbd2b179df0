#![forbid(unsafe_code)]

//! The log panel view-model.
//!
//! [`LogPanel`] is what the render layer talks to: it owns the bounded
//! buffer, the follow tracker, and (while expanded) the stream subscription
//! for exactly one package. Lines cross from the reader thread into the
//! panel over a channel and are applied to the buffer only inside
//! [`LogPanel::poll`], on the caller's thread, so buffer mutation stays
//! single-threaded and lock-free even though the transport delivers
//! asynchronously.
//!
//! # Render loop contract
//!
//! 1. Call `poll()` once per frame (or per event-loop tick).
//! 2. If it returned a non-zero append count and [`LogPanel::is_following`]
//!    is true, pin the view to the bottom.
//! 3. Report every scroll observation through [`LogPanel::on_scroll`].
//! 4. Show [`LogPanel::error`] inline when set; the stream is already
//!    terminal at that point and only a fresh [`LogPanel::expand`] resumes.

pub mod panel;

pub use panel::{LogPanel, StyledLine};
