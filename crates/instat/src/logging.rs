//! Logging configuration for instat.
//!
//! Store operations log at debug level and mutations at info level. Logs go
//! to stderr so that listings and `--json` output on stdout stay clean.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings and mutations (info and above).
    #[default]
    Normal,
    /// Every file read and write (debug and above).
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Convert verbosity to a tracing level.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Build a verbosity from the CLI's `-q` flag and `-v` count.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }
}

/// Initialize the logging system.
///
/// Call once at startup. `RUST_LOG` takes precedence over `verbosity`.
///
/// # Examples
///
/// ```no_run
/// use instat::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// tracing::debug!("every file access is now logged");
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let default_filter = format!("instat={}", verbosity.to_level_filter());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbosity != Verbosity::Normal)
            .without_time()
            .with_file(false)
            .with_line_number(false),
    );

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = subscriber.try_init();
}

/// Initialize logging for tests, capturing output per test.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("instat=debug")
        .with_test_writer()
        .try_init();
}
