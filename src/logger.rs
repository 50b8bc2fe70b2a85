// A minimal logger for the `log` crate. Records go to stderr as
// `timestamp|LEVEL|file:line: message`. Filtering is left entirely to
// `log::set_max_level`, which `main` sets from `CADENCE_LOG`.

use std::{
    path::{Path, PathBuf},
    sync::{LazyLock, Mutex},
};

use {
    jiff::{Timestamp, tz::TimeZone},
    log::Log,
};

use crate::style::Theme;

/// A logger that writes every record it receives to stderr.
#[derive(Debug)]
pub struct Logger {
    /// The time zone used to render record timestamps. When absent, they
    /// are rendered in UTC.
    tz: Mutex<Option<TimeZone>>,
}

impl Logger {
    /// Installs a new logger as the global `log` logger.
    ///
    /// This fails if a global logger was already installed.
    pub fn init() -> Result<&'static Logger, log::SetLoggerError> {
        let logger = Box::leak(Box::new(Logger { tz: Mutex::new(None) }));
        log::set_logger(logger)?;
        Ok(logger)
    }

    /// Render timestamps for all subsequent records in the given zone.
    pub fn set_time_zone(&self, tz: TimeZone) {
        *self.tz.lock().unwrap() = Some(tz);
    }

    fn timestamp(&self) -> String {
        // `Zoned::now()` would consult the system time zone, which may itself
        // log. Converting a timestamp with an already known zone doesn't.
        let ts = Timestamp::now();
        match *self.tz.lock().unwrap() {
            None => ts.to_string(),
            Some(ref tz) => ts.to_zoned(tz.clone()).to_string(),
        }
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let theme = Theme::stderr();
        let now = theme.highlight(self.timestamp());
        let level = theme.level(record.level());
        match (record.file(), record.line()) {
            (Some(file), Some(line)) => eprintln!(
                "{now}|{level}|{file}:{line}: {msg}",
                file = relative(file),
                msg = record.args(),
            ),
            (Some(file), None) => eprintln!(
                "{now}|{level}|{file}: {msg}",
                file = relative(file),
                msg = record.args(),
            ),
            _ => eprintln!("{now}|{level}: {msg}", msg = record.args()),
        }
    }

    fn flush(&self) {}
}

fn relative(path: &str) -> &str {
    static CWD: LazyLock<Option<PathBuf>> =
        LazyLock::new(|| std::env::current_dir().ok());

    let Some(cwd) = CWD.as_deref() else { return path };
    Path::new(path)
        .strip_prefix(cwd)
        .ok()
        .and_then(|p| p.to_str())
        .unwrap_or(path)
}
