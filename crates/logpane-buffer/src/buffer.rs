//! Fixed-capacity log entry storage.
//!
//! Uses a `VecDeque` ring for O(1) append and head eviction. Entries are
//! immutable once created; eviction and [`LogBuffer::clear`] are the only
//! removal paths.

use std::collections::VecDeque;

/// Default retention for one log panel.
pub const DEFAULT_CAPACITY: usize = 200;

/// One delivered log line.
///
/// `id` is unique within the owning buffer and strictly increasing in
/// arrival order, so id order and buffer order always agree. `text` is the
/// raw line content and may still embed SGR sequences; parsing into styled
/// runs happens at render time, never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Monotonic per-buffer id, stable across evictions.
    pub id: u64,
    /// Raw line content.
    pub text: String,
}

/// Ordered ring of the most recent [`LogEntry`]s.
///
/// Invariant: `len() <= capacity()` at every return point. When an append
/// would exceed capacity, entries are dropped from the head until the size
/// is back at capacity.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    /// Next id to assign. Survives `clear()` so render keys never collide
    /// across a clear-and-refill.
    next_id: u64,
}

impl LogBuffer {
    /// Create a buffer retaining at most `capacity` entries.
    ///
    /// A capacity of 0 is clamped to 1: a panel that retains nothing has no
    /// meaning, and `append` promises to return the entry it created.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
            next_id: 0,
        }
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the buffer holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a line at the tail, evicting from the head if over capacity.
    ///
    /// Returns the created entry.
    pub fn append(&mut self, text: impl Into<String>) -> &LogEntry {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push_back(LogEntry {
            id,
            text: text.into(),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.entries.back().expect("buffer non-empty after append")
    }

    /// Get an entry by position (0 = oldest retained).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LogEntry> {
        self.entries.get(index)
    }

    /// Iterate over retained entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Owned copy of the retained entries in arrival order, for consumers
    /// that outlive the next mutation.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Drop all entries. The id counter is NOT reset.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
