#![forbid(unsafe_code)]

//! SGR run parsing for streamed log lines.
//!
//! `logpane-ansi` turns one raw log line, possibly containing embedded
//! `ESC [ <params> m` color/style sequences, into an ordered list of styled
//! runs for the render layer. It also provides the transport-edge scrubber
//! that removes non-visual CSI sequences (cursor movement, erase) before a
//! line ever reaches the buffer.
//!
//! # Primary responsibilities
//!
//! - **Parser**: per-line scan producing [`StyledRun`]s from SGR sequences.
//! - **Palette**: the fixed 16-entry [`AnsiColor`] map for SGR 30–37 / 90–97.
//! - **Scrub**: [`strip_nonvisual`] removal of cursor/erase CSI and `\r`.
//!
//! # Design principles
//!
//! - **No I/O**: pure data + logic; callers supply complete lines.
//! - **Deterministic**: identical input always produces identical runs.
//! - **Never fails**: malformed or unsupported sequences are inert, not
//!   errors; arbitrary attacker-influenced input cannot panic the parser.
//!
//! Style state is scoped to a single line: an unterminated color does not
//! bleed into the next line. This diverges from strict terminal semantics
//! on purpose; it reproduces the visible behavior of the panel this core
//! was built for.

pub mod color;
pub mod parser;
pub mod scrub;

pub use color::AnsiColor;
pub use parser::{StyledRun, parse_line};
pub use scrub::strip_nonvisual;
