//! The subscription handle.
//!
//! One handle per logical "watching source X". The lifecycle is
//! `Streaming` from [`StreamHandle::open`] until either [`StreamHandle::close`]
//! or a terminal source outcome (clean EOF or error); nothing leaves the
//! closed state, so re-watching means opening a fresh handle. A handle never
//! multiplexes sources: when the watched identity changes, the owner closes
//! this handle and opens another.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::error::StreamError;
use crate::source::{LineSink, LineSource};
use crate::stop::StopTrigger;

/// A live, closable subscription to one line source.
///
/// Deliveries happen on a dedicated reader thread, one callback at a time,
/// in transport order. Dropping the handle requests a stop without joining
/// the reader (mirroring the non-blocking drop of the rest of the
/// codebase); call [`close`](Self::close) for the full guarantee that no
/// callback runs after the call returns.
pub struct StreamHandle {
    source_id: String,
    trigger: StopTrigger,
    interrupt: Box<dyn Fn() + Send + Sync>,
    closed: Arc<AtomicBool>,
    reader: Option<thread::JoinHandle<()>>,
}

impl StreamHandle {
    /// Open a subscription: spawn the reader thread and start delivering.
    ///
    /// `on_line` is invoked for every line the source produces, in order.
    /// `on_error` is invoked at most once, only for a terminal transport
    /// failure, and never after `close()`. A source that ends cleanly
    /// closes the stream silently.
    pub fn open<S, L, E>(mut source: S, mut on_line: L, on_error: E) -> Self
    where
        S: LineSource + 'static,
        L: FnMut(String) + Send + 'static,
        E: FnOnce(StreamError) + Send + 'static,
    {
        let source_id = source.source_id().to_string();
        let (signal, trigger) = crate::stop::StopSignal::new();
        let interrupt = source.interrupter();
        let closed = Arc::new(AtomicBool::new(false));

        let thread_closed = Arc::clone(&closed);
        let log_id = source_id.clone();
        let reader = thread::spawn(move || {
            let mut on_error = Some(on_error);
            let gate = signal.clone();
            let mut deliver = move |line: String| {
                // Checked immediately before every delivery so a close from
                // either side of the callback boundary gates the next line.
                if gate.is_stopped() {
                    return false;
                }
                on_line(line);
                true
            };
            let mut sink = LineSink::new(&mut deliver);

            tracing::debug!(source = %log_id, "stream opened");
            match source.run(&mut sink, &signal) {
                Ok(()) => tracing::debug!(source = %log_id, "stream ended"),
                Err(error) => {
                    if !signal.is_stopped() {
                        tracing::debug!(source = %log_id, %error, "stream failed");
                        if let Some(report) = on_error.take() {
                            report(error);
                        }
                    }
                }
            }
            thread_closed.store(true, Ordering::SeqCst);
        });

        Self {
            source_id,
            trigger,
            interrupt,
            closed,
            reader: Some(reader),
        }
    }

    /// Identity of the watched source.
    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Whether the stream has reached its terminal state, via `close()`,
    /// clean end of source, or transport failure.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Close the subscription and release the underlying resource.
    ///
    /// Idempotent: closing twice is indistinguishable from closing once.
    /// Safe to call from inside a delivery callback: the reader thread is
    /// only joined when closing from another thread, so there is no
    /// self-join deadlock. Once `close()` returns (from outside the reader
    /// thread), no further `on_line`/`on_error` invocation occurs, even for
    /// data the transport had already buffered.
    pub fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        self.trigger.stop();
        (self.interrupt)();
        if let Some(reader) = self.reader.take() {
            if reader.thread().id() == thread::current().id() {
                // Closing from inside a callback: the stop flag already
                // gates the next delivery; the thread unwinds by itself.
                tracing::debug!(source = %self.source_id, "stream closed from delivery callback");
                return;
            }
            if reader.join().is_err() {
                tracing::warn!(source = %self.source_id, "stream reader thread panicked");
            }
            tracing::debug!(source = %self.source_id, "stream closed");
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        self.trigger.stop();
        (self.interrupt)();
        // No join in drop; close() is the blocking teardown path.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedSource;
    use std::sync::Mutex;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn wait_until_closed(handle: &StreamHandle) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while !handle.is_closed() {
            assert!(Instant::now() < deadline, "stream never reached closed state");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn delivers_lines_in_order_then_ends_cleanly() {
        let (line_tx, line_rx) = mpsc::channel();
        let (err_tx, err_rx) = mpsc::channel();
        let handle = StreamHandle::open(
            ScriptedSource::new("unit-a", ["one", "two", "three"]),
            move |line| { line_tx.send(line).ok(); },
            move |error| { err_tx.send(error).ok(); },
        );

        let mut lines = Vec::new();
        for _ in 0..3 {
            lines.push(
                line_rx
                    .recv_timeout(Duration::from_secs(1))
                    .expect("line delivery timed out"),
            );
        }
        assert_eq!(lines, vec!["one", "two", "three"]);

        wait_until_closed(&handle);
        assert!(err_rx.try_recv().is_err(), "clean EOF must not report an error");
    }

    #[test]
    fn close_is_idempotent_and_gates_further_delivery() {
        let (line_tx, line_rx) = mpsc::channel();
        let lines: Vec<String> = (0..1000).map(|i| format!("line{i}")).collect();
        let mut handle = StreamHandle::open(
            ScriptedSource::new("unit-b", lines).paced(Duration::from_millis(5)),
            move |line| { line_tx.send(line).ok(); },
            |_error| {},
        );

        let _ = line_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("first line timed out");
        handle.close();
        handle.close();

        // Drain whatever landed before the close took effect, then verify
        // silence.
        while line_rx.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(50));
        assert!(line_rx.try_recv().is_err(), "line delivered after close");
        assert!(handle.is_closed());
    }

    #[test]
    fn close_before_any_output_releases_quietly() {
        let (line_tx, line_rx) = mpsc::channel();
        let mut handle = StreamHandle::open(
            ScriptedSource::new("unit-c", ["late"]).paced(Duration::from_millis(100)),
            move |line| { line_tx.send(line).ok(); },
            |_error| {},
        );
        handle.close();
        thread::sleep(Duration::from_millis(150));
        assert!(line_rx.try_recv().is_err());
        assert!(handle.is_closed());
    }

    #[test]
    fn transport_failure_is_reported_exactly_once() {
        let (err_tx, err_rx) = mpsc::channel();
        let handle = StreamHandle::open(
            ScriptedSource::failing("unit-d", ["a"], StreamError::Read("disconnected".into())),
            |_line| {},
            move |error| { err_tx.send(error).ok(); },
        );

        let error = err_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("error was never reported");
        assert_eq!(error, StreamError::Read("disconnected".into()));

        wait_until_closed(&handle);
        assert!(err_rx.try_recv().is_err(), "error reported more than once");
    }

    #[test]
    fn error_is_suppressed_after_close() {
        let (err_tx, err_rx) = mpsc::channel();
        let mut handle = StreamHandle::open(
            ScriptedSource::failing(
                "unit-e",
                Vec::<String>::new(),
                StreamError::Read("late failure".into()),
            )
            .paced(Duration::from_millis(100)),
            |_line| {},
            move |error| { err_tx.send(error).ok(); },
        );
        handle.close();
        thread::sleep(Duration::from_millis(150));
        assert!(err_rx.try_recv().is_err(), "error delivered after close");
    }

    #[test]
    fn close_from_within_a_delivery_callback_does_not_deadlock() {
        let slot: Arc<Mutex<Option<StreamHandle>>> = Arc::new(Mutex::new(None));
        let callback_slot = Arc::clone(&slot);
        let (line_tx, line_rx) = mpsc::channel();

        let lines: Vec<String> = (0..10).map(|i| format!("line{i}")).collect();
        let handle = StreamHandle::open(
            ScriptedSource::new("unit-f", lines).paced(Duration::from_millis(20)),
            move |line| {
                line_tx.send(line).ok();
                if let Some(mut taken) = callback_slot
                    .lock()
                    .expect("handle slot poisoned")
                    .take()
                {
                    taken.close();
                }
            },
            |_error| {},
        );
        *slot.lock().expect("handle slot poisoned") = Some(handle);

        let _ = line_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("first line timed out");
        // Let the in-callback close land, drain the line that carried it,
        // then verify silence.
        thread::sleep(Duration::from_millis(80));
        while line_rx.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(120));
        assert!(
            line_rx.try_recv().is_err(),
            "delivery continued after close from callback"
        );
    }
}
