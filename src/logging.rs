//! Diagnostic logging setup

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "WORKLENS_LOG";

const DEFAULT_FILTER: &str = "worklens=warn";
const LOG_FILE_NAME: &str = "worklens.log";

/// Where diagnostics go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// CLI mode
    Stderr,
    /// TUI mode; stderr would corrupt the screen
    File(PathBuf),
}

impl LogTarget {
    /// `~/.worklens/worklens.log`, or None if home is unknown
    pub fn default_file() -> Option<Self> {
        crate::config::data_dir().map(|dir| Self::File(dir.join(LOG_FILE_NAME)))
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn file_writer(path: &Path) -> Option<BoxMakeWriter> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()?;
    Some(BoxMakeWriter::new(Mutex::new(file)))
}

/// Install the global subscriber. Calling twice is harmless.
pub fn init(target: LogTarget) {
    let (writer, ansi) = match &target {
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogTarget::File(path) => match file_writer(path) {
            Some(writer) => (writer, false),
            None => (BoxMakeWriter::new(std::io::sink), false),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .try_init();
}
