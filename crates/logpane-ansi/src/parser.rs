//! Per-line SGR parser.
//!
//! A deterministic left-to-right scan over one line of log output. Plain
//! text between escape sequences is emitted as a run carrying the current
//! pen; well-formed SGR sequences (`ESC [ <digits;digits;...> m`) update
//! the pen without producing a run. Everything else that starts with ESC
//! (non-SGR CSI, truncated sequences, a stray ESC) is inert: removed from
//! the output, no run, no pen change.
//!
//! Recognized SGR codes:
//!
//! | Code    | Effect                         |
//! |---------|--------------------------------|
//! | `0`     | full reset (color + bold)      |
//! | `1`     | bold on                        |
//! | `39`    | reset color, bold untouched    |
//! | `30–37` | foreground, normal palette     |
//! | `90–97` | foreground, bright palette     |
//! | other   | accepted, no visual effect     |
//!
//! An empty parameter list (`ESC [ m`) means `0`; empty items between
//! semicolons parse as `0`; codes within one sequence apply left to right.
//!
//! The pen resets at the start of every line. See the crate docs for why
//! this per-line scoping is kept despite diverging from strict ANSI.

use crate::color::AnsiColor;

/// A maximal piece of line text sharing one style.
///
/// Concatenating the `text` of all runs for a line reproduces the line with
/// its escape sequences removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    /// The visible text of this run.
    pub text: String,
    /// Foreground color, `None` for the terminal default.
    pub color: Option<AnsiColor>,
    /// Whether the run renders bold.
    pub bold: bool,
}

/// Current style while scanning a single line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Pen {
    color: Option<AnsiColor>,
    bold: bool,
}

/// Parse one line into styled runs.
///
/// Pure: same input, same output; no state survives between calls. A line
/// with no escape sequences yields exactly one default-styled run; an empty
/// line yields no runs.
#[must_use]
pub fn parse_line(line: &str) -> Vec<StyledRun> {
    let bytes = line.as_bytes();
    let mut runs = Vec::new();
    let mut pen = Pen::default();
    let mut pending = String::new();
    let mut seg_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != 0x1b {
            i += 1;
            continue;
        }
        // ESC is ASCII, so both slice points sit on char boundaries.
        pending.push_str(&line[seg_start..i]);
        let (next, sgr_params) = scan_escape(bytes, i);
        if let Some(params) = sgr_params {
            flush(&mut runs, &mut pending, pen);
            apply_sgr(&mut pen, params);
        }
        i = next;
        seg_start = next;
    }

    pending.push_str(&line[seg_start..]);
    flush(&mut runs, &mut pending, pen);
    runs
}

/// Emit the pending text as a run under the given pen. Empty pending text
/// emits nothing, so adjacent escape sequences never create empty runs.
fn flush(runs: &mut Vec<StyledRun>, pending: &mut String, pen: Pen) {
    if pending.is_empty() {
        return;
    }
    runs.push(StyledRun {
        text: std::mem::take(pending),
        color: pen.color,
        bold: pen.bold,
    });
}

/// Scan the escape sequence starting at `start` (which holds ESC).
///
/// Returns the index to resume scanning at, plus `Some(params)` when the
/// sequence is a well-formed SGR (`ESC [ [0-9;]* m`). Every other shape is
/// consumed as inert:
///
/// - `ESC` at end of line: consumed.
/// - `ESC` not followed by `[`: only the ESC byte is consumed, so a
///   following character stays literal text.
/// - CSI with a final byte other than `m`, or with non-`[0-9;]` parameter
///   bytes: consumed through its final byte.
/// - CSI interrupted by a control byte or a non-ASCII byte: consumed up to
///   (not including) the interrupting byte.
/// - CSI running off the end of the line: consumed to the end.
///
/// All resume points are char boundaries: the interrupting-byte case stops
/// on either an ASCII control or a UTF-8 lead byte.
fn scan_escape(bytes: &[u8], start: usize) -> (usize, Option<&[u8]>) {
    match bytes.get(start + 1) {
        None => return (bytes.len(), None),
        Some(&b'[') => {}
        Some(_) => return (start + 1, None),
    }

    let mut j = start + 2;
    while j < bytes.len() {
        let b = bytes[j];
        if (0x40..=0x7E).contains(&b) {
            // Final byte (ECMA-48 CSI range).
            let params = &bytes[start + 2..j];
            if b == b'm' && params.iter().all(|p| p.is_ascii_digit() || *p == b';') {
                return (j + 1, Some(params));
            }
            return (j + 1, None);
        }
        if !(0x20..=0x3F).contains(&b) {
            // A byte that can belong to neither the parameter nor the
            // intermediate range aborts the sequence.
            return (j, None);
        }
        j += 1;
    }
    (bytes.len(), None)
}

/// Apply one SGR parameter list to the pen, left to right.
fn apply_sgr(pen: &mut Pen, params: &[u8]) {
    if params.is_empty() {
        *pen = Pen::default();
        return;
    }
    for part in params.split(|&b| b == b';') {
        let code = if part.is_empty() { 0 } else { decimal_code(part) };
        match code {
            0 => *pen = Pen::default(),
            1 => pen.bold = true,
            39 => pen.color = None,
            other => {
                if let Some(color) = AnsiColor::from_sgr(other) {
                    pen.color = Some(color);
                }
            }
        }
    }
}

/// Decode an all-digit parameter, saturating oversized values into the
/// unrecognized range instead of failing.
fn decimal_code(digits: &[u8]) -> u16 {
    let mut value: u32 = 0;
    for &d in digits {
        value = value.saturating_mul(10).saturating_add(u32::from(d - b'0'));
    }
    value.min(u32::from(u16::MAX)) as u16
}
