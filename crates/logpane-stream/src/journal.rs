//! Following the systemd journal of a container app.
//!
//! `JournalSource` runs `journalctl -u <package>.service -o cat -n <tail>
//! -f --no-pager` and delivers each stdout line, scrubbed of non-visual
//! escape sequences. The child is killed and reaped on every exit path
//! (stop, sink closure, read failure, EOF), so closing the handle always
//! releases the process.
//!
//! Package names are validated before anything is spawned: a name that
//! could smuggle option or path syntax into the argv never reaches the
//! shell-free `Command`, and is rejected as [`StreamError::InvalidSource`].

use std::io::{BufRead, BufReader, ErrorKind};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};

use logpane_ansi::strip_nonvisual;

use crate::error::StreamError;
use crate::source::{LineSink, LineSource};
use crate::stop::StopSignal;

/// Journal lines shown before following new output.
pub const DEFAULT_TAIL_LINES: u32 = 50;

/// Upper bound on the initial tail length.
pub const MAX_TAIL_LINES: u32 = 10_000;

/// Tunables for the journal follower.
#[derive(Debug, Clone)]
pub struct JournalConfig {
    /// Binary to invoke.
    pub command: String,
    /// Suffix appended to the package name to form the unit name.
    pub unit_suffix: String,
    /// Number of recent lines to show before following (1..=10000).
    pub tail_lines: u32,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            command: "journalctl".to_string(),
            unit_suffix: ".service".to_string(),
            tail_lines: DEFAULT_TAIL_LINES,
        }
    }
}

impl JournalConfig {
    /// Override the initial tail length.
    #[must_use]
    pub fn with_tail_lines(mut self, tail_lines: u32) -> Self {
        self.tail_lines = tail_lines;
        self
    }

    /// Override the journalctl binary path.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }
}

/// Reject package names that are empty, contain anything outside the
/// Debian name alphabet (`a-z`, `0-9`, `+`, `-`, `.`), or do not start
/// with a letter or digit.
pub fn validate_package_name(name: &str) -> Result<(), StreamError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(StreamError::InvalidSource(
            "package name must not be empty".to_string(),
        ));
    };
    if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
        return Err(StreamError::InvalidSource(format!(
            "package name '{name}' must start with a lowercase letter or digit"
        )));
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '-' | '.')) {
        return Err(StreamError::InvalidSource(format!(
            "package name '{name}' contains invalid characters"
        )));
    }
    Ok(())
}

/// Live journal follower for one package's service unit.
pub struct JournalSource {
    package: String,
    config: JournalConfig,
    /// Slot shared with the interrupter so a close can kill a child the
    /// reader thread is blocked reading from.
    child: Arc<Mutex<Option<Child>>>,
}

impl JournalSource {
    /// Build a follower for `package` with default settings.
    pub fn new(package: impl Into<String>) -> Result<Self, StreamError> {
        Self::with_config(package, JournalConfig::default())
    }

    /// Build a follower with explicit settings.
    pub fn with_config(
        package: impl Into<String>,
        config: JournalConfig,
    ) -> Result<Self, StreamError> {
        let package = package.into();
        validate_package_name(&package)?;
        if !(1..=MAX_TAIL_LINES).contains(&config.tail_lines) {
            return Err(StreamError::InvalidSource(format!(
                "tail length must be between 1 and {MAX_TAIL_LINES}, got {}",
                config.tail_lines
            )));
        }
        Ok(Self {
            package,
            config,
            child: Arc::new(Mutex::new(None)),
        })
    }

    /// The argv this source will spawn.
    #[must_use]
    pub fn command_line(&self) -> Vec<String> {
        vec![
            self.config.command.clone(),
            "-u".to_string(),
            format!("{}{}", self.package, self.config.unit_suffix),
            "-o".to_string(),
            "cat".to_string(),
            "-n".to_string(),
            self.config.tail_lines.to_string(),
            "-f".to_string(),
            "--no-pager".to_string(),
        ]
    }

    /// Kill and reap the child, if one is running.
    fn reap(&self) {
        if let Ok(mut slot) = self.child.lock()
            && let Some(mut child) = slot.take()
        {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl LineSource for JournalSource {
    fn source_id(&self) -> &str {
        &self.package
    }

    fn run(&mut self, sink: &mut LineSink<'_>, stop: &StopSignal) -> Result<(), StreamError> {
        let argv = self.command_line();
        let mut child = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => StreamError::Spawn(format!(
                    "{} not found; systemd journal tools are not installed",
                    self.config.command
                )),
                _ => StreamError::Spawn(err.to_string()),
            })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(StreamError::Spawn(
                "journal stream had no stdout".to_string(),
            ));
        };
        if let Ok(mut slot) = self.child.lock() {
            *slot = Some(child);
        }
        tracing::debug!(package = %self.package, "journal follower started");

        let result = (|| {
            for line in BufReader::new(stdout).lines() {
                if stop.is_stopped() {
                    return Ok(());
                }
                let line = line.map_err(|err| StreamError::Read(err.to_string()))?;
                if !sink.deliver(strip_nonvisual(&line).into_owned()) {
                    return Ok(());
                }
            }
            Ok(())
        })();

        self.reap();
        tracing::debug!(package = %self.package, "journal follower stopped");
        result
    }

    fn interrupter(&self) -> Box<dyn Fn() + Send + Sync> {
        let slot = Arc::clone(&self.child);
        Box::new(move || {
            if let Ok(mut guard) = slot.lock()
                && let Some(child) = guard.as_mut()
            {
                let _ = child.kill();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Package name validation ────────────────────────────────────

    #[test]
    fn rejects_empty_name() {
        assert!(matches!(
            validate_package_name(""),
            Err(StreamError::InvalidSource(_))
        ));
    }

    #[test]
    fn rejects_path_traversal() {
        assert!(validate_package_name("../evil").is_err());
        assert!(validate_package_name("a/../b").is_err());
    }

    #[test]
    fn rejects_option_injection() {
        assert!(validate_package_name("-f").is_err());
        assert!(validate_package_name("--unit=x").is_err());
    }

    #[test]
    fn rejects_uppercase_and_whitespace() {
        assert!(validate_package_name("Traefik").is_err());
        assert!(validate_package_name("tra efik").is_err());
    }

    #[test]
    fn accepts_typical_package_names() {
        for name in ["traefik", "signalk-server", "halos-core-containers", "app2", "lib.plus+"] {
            assert!(validate_package_name(name).is_ok(), "{name}");
        }
    }

    // ── Construction ───────────────────────────────────────────────

    #[test]
    fn rejects_tail_length_out_of_bounds() {
        for tail in [0u32, MAX_TAIL_LINES + 1] {
            let config = JournalConfig::default().with_tail_lines(tail);
            assert!(matches!(
                JournalSource::with_config("traefik", config),
                Err(StreamError::InvalidSource(_))
            ));
        }
    }

    #[test]
    fn accepts_tail_length_bounds() {
        for tail in [1u32, MAX_TAIL_LINES] {
            let config = JournalConfig::default().with_tail_lines(tail);
            assert!(JournalSource::with_config("traefik", config).is_ok());
        }
    }

    #[test]
    fn invalid_name_never_constructs() {
        assert!(JournalSource::new("../evil").is_err());
    }

    // ── Command construction ───────────────────────────────────────

    #[test]
    fn builds_the_exact_follower_argv() {
        let config = JournalConfig::default().with_tail_lines(100);
        let source = JournalSource::with_config("halos-core-containers", config)
            .expect("valid source");
        assert_eq!(
            source.command_line(),
            vec![
                "journalctl",
                "-u",
                "halos-core-containers.service",
                "-o",
                "cat",
                "-n",
                "100",
                "-f",
                "--no-pager",
            ]
        );
    }

    #[test]
    fn default_tail_is_50() {
        let source = JournalSource::new("traefik").expect("valid source");
        assert_eq!(source.command_line()[6], "50");
    }

    #[test]
    fn source_id_is_the_package_name() {
        let source = JournalSource::new("signalk-server").expect("valid source");
        assert_eq!(source.source_id(), "signalk-server");
    }
}
