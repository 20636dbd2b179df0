//! Transport-edge scrubbing of non-visual escape sequences.
//!
//! Container tooling writing to the journal through a TTY (docker compose
//! progress output in particular) emits cursor movement, erase-line, and
//! carriage-return tricks to redraw in place. None of that can be replayed
//! in a line-oriented panel, so the follower strips it before delivery
//! while preserving SGR color/style sequences for the run parser.
//!
//! Stripped: `ESC [ [0-9;]* <final>` where `<final>` is one of
//! `A`–`H`, `J`, `K`, `S`, `T`, `f` (cursor, erase, scroll), and bare `\r`.
//! Everything else passes through untouched.

use std::borrow::Cow;

/// Remove non-visual CSI sequences and carriage returns from one line.
///
/// Returns the input borrowed when nothing needed stripping, which is the
/// common case for journal output.
#[must_use]
pub fn strip_nonvisual(line: &str) -> Cow<'_, str> {
    if !line.contains('\x1b') && !line.contains('\r') {
        return Cow::Borrowed(line);
    }

    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len());
    let mut seg_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                out.push_str(&line[seg_start..i]);
                i += 1;
                seg_start = i;
            }
            0x1b => {
                if let Some(end) = nonvisual_end(bytes, i) {
                    out.push_str(&line[seg_start..i]);
                    i = end;
                    seg_start = i;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    out.push_str(&line[seg_start..]);
    Cow::Owned(out)
}

/// If `start` (holding ESC) begins a non-visual CSI sequence, return the
/// index just past its final byte.
fn nonvisual_end(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes.get(start + 1) != Some(&b'[') {
        return None;
    }
    let mut j = start + 2;
    while j < bytes.len() && (bytes[j].is_ascii_digit() || bytes[j] == b';') {
        j += 1;
    }
    match bytes.get(j) {
        Some(b'A'..=b'H' | b'J' | b'K' | b'S' | b'T' | b'f') => Some(j + 1),
        _ => None,
    }
}
