//! The line source abstraction.
//!
//! A [`LineSource`] produces complete, text-encoded lines. Assembling
//! lines out of raw transport chunks is the source's job, so consumers
//! never see partial lines. Sources run on the handle's reader thread and
//! deliver through a [`LineSink`].

use crate::error::StreamError;
use crate::stop::StopSignal;

/// Delivery funnel handed to a running source.
///
/// Wraps the handle's gate and `on_line` callback; the source never sees
/// either directly.
pub struct LineSink<'a> {
    deliver: &'a mut dyn FnMut(String) -> bool,
}

impl<'a> LineSink<'a> {
    /// Wrap a delivery function. `deliver` returns `false` once the stream
    /// is closed.
    pub(crate) fn new(deliver: &'a mut dyn FnMut(String) -> bool) -> Self {
        Self { deliver }
    }

    /// Deliver one line downstream.
    ///
    /// Returns `false` when the stream has been closed; the source should
    /// stop producing and return `Ok(())`.
    pub fn deliver(&mut self, line: impl Into<String>) -> bool {
        (self.deliver)(line.into())
    }
}

/// A producer of complete text lines from some external transport.
pub trait LineSource: Send {
    /// Identity of what is being watched, for logging and thread naming.
    fn source_id(&self) -> &str;

    /// Produce lines until EOF, a terminal error, a stop request, or the
    /// sink reporting the stream closed.
    ///
    /// Sources that pace themselves should block on
    /// [`StopSignal::wait_timeout`] rather than sleeping, so close wakes
    /// them promptly. `Ok(())` is a clean end of stream and is not
    /// reported as an error downstream.
    fn run(&mut self, sink: &mut LineSink<'_>, stop: &StopSignal) -> Result<(), StreamError>;

    /// A hook to unblock a `run` stuck in blocking I/O, invoked from the
    /// closing thread. Sources that only ever block on the stop signal can
    /// keep the default no-op.
    fn interrupter(&self) -> Box<dyn Fn() + Send + Sync> {
        Box::new(|| {})
    }
}

/// A source that replays a fixed script: some lines, then a clean EOF or a
/// terminal error. The test double for everything downstream of the
/// transport.
pub struct ScriptedSource {
    id: String,
    lines: Vec<String>,
    outcome: Option<StreamError>,
    /// Pause before each line; zero emits as fast as the sink accepts.
    pace: std::time::Duration,
}

impl ScriptedSource {
    /// A source that emits `lines` and then ends cleanly.
    #[must_use]
    pub fn new(id: impl Into<String>, lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            lines: lines.into_iter().map(Into::into).collect(),
            outcome: None,
            pace: std::time::Duration::ZERO,
        }
    }

    /// A source that emits `lines` and then fails with `error`.
    #[must_use]
    pub fn failing(
        id: impl Into<String>,
        lines: impl IntoIterator<Item = impl Into<String>>,
        error: StreamError,
    ) -> Self {
        Self {
            outcome: Some(error),
            ..Self::new(id, lines)
        }
    }

    /// Wait this long before each emitted line (and before the outcome).
    #[must_use]
    pub fn paced(mut self, pace: std::time::Duration) -> Self {
        self.pace = pace;
        self
    }
}

impl LineSource for ScriptedSource {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn run(&mut self, sink: &mut LineSink<'_>, stop: &StopSignal) -> Result<(), StreamError> {
        for line in std::mem::take(&mut self.lines) {
            if !self.pace.is_zero() && stop.wait_timeout(self.pace) {
                return Ok(());
            }
            if stop.is_stopped() || !sink.deliver(line) {
                return Ok(());
            }
        }
        if !self.pace.is_zero() && stop.wait_timeout(self.pace) {
            return Ok(());
        }
        match self.outcome.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: &mut dyn LineSource) -> (Vec<String>, Result<(), StreamError>) {
        let mut out = Vec::new();
        let mut deliver = |line: String| {
            out.push(line);
            true
        };
        let mut sink = LineSink::new(&mut deliver);
        let (signal, _trigger) = StopSignal::new();
        let result = source.run(&mut sink, &signal);
        (out, result)
    }

    #[test]
    fn scripted_source_replays_lines_in_order() {
        let mut source = ScriptedSource::new("unit", ["a", "b", "c"]);
        let (lines, result) = collect(&mut source);
        assert_eq!(lines, vec!["a", "b", "c"]);
        assert!(result.is_ok());
    }

    #[test]
    fn scripted_source_ends_with_configured_error() {
        let mut source =
            ScriptedSource::failing("unit", ["a"], StreamError::Read("gone".to_string()));
        let (lines, result) = collect(&mut source);
        assert_eq!(lines, vec!["a"]);
        assert_eq!(result, Err(StreamError::Read("gone".to_string())));
    }

    #[test]
    fn scripted_source_stops_when_sink_reports_closed() {
        let mut source = ScriptedSource::new("unit", ["a", "b", "c"]);
        let mut seen = 0;
        let mut deliver = |_line: String| {
            seen += 1;
            seen < 2
        };
        let mut sink = LineSink::new(&mut deliver);
        let (signal, _trigger) = StopSignal::new();
        assert!(source.run(&mut sink, &signal).is_ok());
        assert_eq!(seen, 2);
    }

    #[test]
    fn scripted_source_honors_stop_before_emitting() {
        let mut source = ScriptedSource::new("unit", ["a"]);
        let mut deliver = |_line: String| panic!("must not deliver after stop");
        let mut sink = LineSink::new(&mut deliver);
        let (signal, trigger) = StopSignal::new();
        trigger.stop();
        assert!(source.run(&mut sink, &signal).is_ok());
    }
}
