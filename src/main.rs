use std::{io::Write, process::ExitCode, sync::LazyLock};

use {
    anyhow::Context,
    jiff::{Timestamp, Zoned, tz::TimeZone},
};

mod args;
mod cmd;
mod datetime;
mod logger;
mod parse;
mod recur;
mod store;
mod style;
mod task;

/// The local time zone, as configured by `TZ` or the system.
static TZ: LazyLock<TimeZone> = LazyLock::new(TimeZone::system);

/// The moment Cadence considers to be "now" for the whole invocation.
///
/// Tests pin this with `CADENCE_NOW` so that "today" never moves.
static NOW: LazyLock<Zoned> = LazyLock::new(|| {
    let ts = match env_now() {
        Ok(Some(ts)) => {
            log::trace!("using `CADENCE_NOW={ts}` as the current time");
            ts
        }
        Ok(None) => Timestamp::now(),
        Err(err) => {
            log::warn!("ignoring `CADENCE_NOW`: {err:#}");
            Timestamp::now()
        }
    };
    ts.to_zoned(TZ.clone())
});

/// Every day, a little bit of it comes around again.
fn main() -> ExitCode {
    let Err(err) = run() else { return ExitCode::SUCCESS };
    let root = err.root_cause();
    if root.is::<args::Help>() || root.is::<args::Version>() {
        // OK because there's nowhere left to report a failed write.
        writeln!(std::io::stdout(), "{root}").unwrap();
        return ExitCode::SUCCESS;
    }
    // Rust ignores SIGPIPE, so a closed pipe shows up as an I/O error. Like
    // other Unix tools, treat it as a normal way to stop.
    let broken_pipe = err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|e| e.kind() == std::io::ErrorKind::BrokenPipe)
    });
    if broken_pipe {
        return ExitCode::SUCCESS;
    }
    let backtrace = std::env::var("RUST_BACKTRACE").is_ok_and(|v| v == "1")
        && std::env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1");
    if backtrace {
        writeln!(std::io::stderr(), "{err:?}").unwrap();
    } else {
        writeln!(std::io::stderr(), "{err:#}").unwrap();
    }
    ExitCode::FAILURE
}

fn run() -> anyhow::Result<()> {
    log::set_max_level(env_log_level()?);
    // Detecting the system time zone may itself log, so the logger only
    // switches to local timestamps once `TZ` is known.
    let logger = logger::Logger::init()?;
    logger.set_time_zone(TZ.clone());
    cmd::run(&mut lexopt::Parser::from_env())
}

/// Reads the log level from `CADENCE_LOG`. Logging is off by default.
fn env_log_level() -> anyhow::Result<log::LevelFilter> {
    let level = std::env::var("CADENCE_LOG").unwrap_or_default();
    Ok(match &*level {
        "" | "off" => log::LevelFilter::Off,
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        unk => anyhow::bail!("unrecognized log level '{unk}'"),
    })
}

/// Reads the current time from `CADENCE_NOW`, if it's set.
fn env_now() -> anyhow::Result<Option<Timestamp>> {
    let Some(val) = std::env::var_os("CADENCE_NOW") else { return Ok(None) };
    let val = val
        .into_string()
        .map_err(|val| anyhow::anyhow!("{val:?} is not valid UTF-8"))?;
    let ts = val.parse().with_context(|| {
        format!("`{val}` is not a valid RFC 3339 timestamp")
    })?;
    Ok(Some(ts))
}
