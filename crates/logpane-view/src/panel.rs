//! Panel state: subscription, buffer, follow flag, inline error.

use std::sync::mpsc::{Receiver, TryRecvError, channel};

use logpane_ansi::{StyledRun, parse_line};
use logpane_buffer::{DEFAULT_CAPACITY, FollowTracker, LogBuffer, LogEntry, ScrollMetrics};
use logpane_stream::{JournalSource, LineSource, StreamError, StreamHandle};

/// One rendered entry: the buffer id (a stable render key) plus the parsed
/// runs. Recomputed from the entry text on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    /// Render key; matches the underlying [`LogEntry::id`].
    pub id: u64,
    /// Styled runs in line order.
    pub runs: Vec<StyledRun>,
}

enum StreamEvent {
    Line(String),
    Failed(String),
}

struct Subscription {
    handle: StreamHandle,
    events: Receiver<StreamEvent>,
}

/// View-model for one expandable log panel.
///
/// Owns its buffer and id space outright; two panels never share state.
/// Expanding opens a subscription for the named package (closing any
/// previous one first), collapsing closes it. A transport failure is
/// terminal: it sets [`error`](Self::error) and tears the subscription
/// down; the entries already on screen stay visible.
pub struct LogPanel {
    buffer: LogBuffer,
    follow: FollowTracker,
    subscription: Option<Subscription>,
    error: Option<String>,
}

impl LogPanel {
    /// A collapsed panel with the default retention of 200 entries.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A collapsed panel retaining at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: LogBuffer::new(capacity),
            follow: FollowTracker::new(),
            subscription: None,
            error: None,
        }
    }

    /// Expand the panel onto `package`'s service journal.
    ///
    /// Fails fast (without opening anything) when the package name is
    /// invalid.
    pub fn expand(&mut self, package: &str) -> Result<(), StreamError> {
        let source = JournalSource::new(package)?;
        self.expand_with(source);
        Ok(())
    }

    /// Expand the panel onto an arbitrary line source.
    ///
    /// Any previous subscription is closed first (the panel never
    /// multiplexes two sources) and the buffer and error state start
    /// fresh.
    pub fn expand_with(&mut self, source: impl LineSource + 'static) {
        self.collapse();
        self.buffer.clear();
        self.error = None;
        self.follow = FollowTracker::new();

        let (line_tx, events) = channel();
        let error_tx = line_tx.clone();
        let handle = StreamHandle::open(
            source,
            move |line| {
                line_tx.send(StreamEvent::Line(line)).ok();
            },
            move |error| {
                error_tx.send(StreamEvent::Failed(error.to_string())).ok();
            },
        );
        self.subscription = Some(Subscription { handle, events });
    }

    /// Close the subscription, keeping the entries on screen.
    pub fn collapse(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.handle.close();
        }
    }

    /// Whether the panel currently holds a subscription (expanded), even
    /// one that has already reached its terminal state.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.subscription.is_some()
    }

    /// Whether lines can still arrive.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(|s| !s.handle.is_closed())
    }

    /// Apply queued deliveries to the buffer. Returns the number of entries
    /// appended, so the render layer knows a follow decision is due.
    ///
    /// All buffer mutation happens here, on the caller's thread.
    pub fn poll(&mut self) -> usize {
        let Some(subscription) = self.subscription.as_mut() else {
            return 0;
        };

        let mut appended = 0;
        let mut failure = None;
        loop {
            match subscription.events.try_recv() {
                Ok(StreamEvent::Line(text)) => {
                    self.buffer.append(text);
                    appended += 1;
                }
                Ok(StreamEvent::Failed(message)) => {
                    failure = Some(message);
                    break;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        if let Some(message) = failure {
            tracing::debug!(error = %message, "log stream failed");
            self.error = Some(message);
            self.collapse();
        }
        appended
    }

    /// Ordered snapshot of the retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.buffer.iter()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no entries are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Retention limit of the underlying buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Parse every retained entry into styled runs, oldest first.
    #[must_use]
    pub fn styled_lines(&self) -> Vec<StyledLine> {
        self.buffer
            .iter()
            .map(|entry| StyledLine {
                id: entry.id,
                runs: parse_line(&entry.text),
            })
            .collect()
    }

    /// The inline failure message, set once a transport error ended the
    /// stream. Cleared by the next [`expand`](Self::expand).
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Report a scroll observation from the rendering surface.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        self.follow.on_scroll(metrics);
    }

    /// Whether appended entries should pin the view to the bottom.
    #[must_use]
    pub fn is_following(&self) -> bool {
        self.follow.should_follow()
    }
}

impl Default for LogPanel {
    fn default() -> Self {
        Self::new()
    }
}
