use std::path::PathBuf;

use {
    anyhow::Context,
    bstr::{BStr, ByteSlice},
};

use crate::{
    args::{Configurable, Usage},
    parse::{BytesExt, FromBytes},
    recur::{self, ErrorKind, Pattern},
    store::Store,
};

/// A recurrence pattern given on the command line.
///
/// This exists separately from `recur::Pattern` so that failing to parse
/// one shows users a few examples of what is accepted.
#[derive(Clone, Copy, Debug, Default)]
pub struct Recurrence(Pattern);

impl Recurrence {
    pub const ARG_OR_STDIN: Usage = Usage::arg(
        "<pattern>",
        "A recurrence pattern, e.g., `every monday`.",
        r#"
A recurrence pattern, e.g., `every monday`.

Patterns can either be passed as positional arguments or as line delimited
data on stdin, but not both. That is, patterns will only be read from stdin
when there are no patterns provided as positional arguments.
"#,
    );

    pub const ARG: Usage = Usage::arg(
        "<pattern>",
        "A recurrence pattern, e.g., `every monday`.",
        r#"
A recurrence pattern, e.g., `every monday`.

Matching is case insensitive. The following patterns are supported:

`every <weekday>`, e.g., `every tuesday`. The pattern occurs once a week.

`<day> of each month`, e.g., `15th of each month` or `31 of the month`. Months
with fewer days than requested use their last day instead. So `31st of each
month` occurs on April 30 and on February 28 (or 29).

`<n> weekday of the month`, e.g., `2nd weekday of the month`. A weekday is any
of Monday through Friday, and `n` is in the range 1 through 5.

`last weekend of the month`, which occurs on the later of the last Saturday
and the last Sunday of each month.

`none` (or the empty string), which never recurs.
"#,
    );

    pub const FLAG: Usage = Usage::flag(
        "-r/--recur <pattern>",
        "Repeat the task according to this pattern.",
        r#"
Repeat the task according to this pattern.

When set, the task is scheduled on the first occurrence of the pattern that
falls on or after the task's date. Completing or skipping a recurring task
schedules its next instance.

The supported patterns are `every <weekday>`, `<day> of each month`, `<n>
weekday of the month` and `last weekend of the month`. Use `none` for a task
that doesn't repeat.
"#,
    );

    pub fn get(&self) -> Pattern {
        self.0
    }
}

impl std::str::FromStr for Recurrence {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Recurrence> {
        s.as_bytes().parse()
    }
}

impl FromBytes for Recurrence {
    type Err = anyhow::Error;

    fn from_bytes(s: &[u8]) -> anyhow::Result<Recurrence> {
        let s = s.to_str().map_err(|_| {
            anyhow::anyhow!(
                "recurrence pattern `{}` is not valid UTF-8",
                BStr::new(s),
            )
        })?;
        match Pattern::parse(s) {
            Ok(pattern) => Ok(Recurrence(pattern)),
            Err(err) => Err(with_hint(err)),
        }
    }
}

/// Attaches examples of valid patterns to a pattern error.
///
/// An invalid day already names the range of valid days, so it's left as is.
fn with_hint(err: recur::Error) -> anyhow::Error {
    match *err.kind() {
        ErrorKind::InvalidPattern { .. } => anyhow::anyhow!(
            "{err}, supported patterns include `every monday`, \
             `3rd of each month`, `2nd weekday of the month` \
             and `last weekend of the month`",
        ),
        _ => anyhow::Error::from(err),
    }
}

/// The location of the task store.
///
/// The store is the `--store` flag if given, then the `CADENCE_STORE`
/// environment variable and finally `.cadence.jsonl` in the user's home
/// directory.
#[derive(Clone, Debug, Default)]
pub struct StoreLocation {
    path: Option<PathBuf>,
}

impl StoreLocation {
    /// Returns the path of the task store to use.
    pub fn resolve(&self) -> anyhow::Result<PathBuf> {
        if let Some(ref path) = self.path {
            return Ok(path.clone());
        }
        if let Some(path) = non_empty_var("CADENCE_STORE") {
            return Ok(PathBuf::from(path));
        }
        let home = non_empty_var("HOME")
            .or_else(|| non_empty_var("USERPROFILE"))
            .context(
                "could not find your home directory, \
                 set CADENCE_STORE or use --store to choose a task store",
            )?;
        Ok(PathBuf::from(home).join(".cadence.jsonl"))
    }

    /// Opens the task store at this location.
    pub fn open(&self) -> anyhow::Result<Store> {
        let path = self.resolve()?;
        log::debug!("using task store {}", path.display());
        Store::open(path)
    }
}

impl Configurable for StoreLocation {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Long("store") => {
                let path = p.value().context("--store")?;
                anyhow::ensure!(
                    !path.is_empty(),
                    "--store: the path of a task store cannot be empty",
                );
                self.path = Some(PathBuf::from(path));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const STORE: Usage = Usage::flag(
            "--store <path>",
            "Read and write tasks in this file.",
            r#"
Read and write tasks in this file.

Tasks are kept in a single file, one JSON object per line. The file is created
when the first task is added.

When this flag isn't given, the `CADENCE_STORE` environment variable is used.
If that isn't set either, then tasks are stored in `.cadence.jsonl` in your
home directory.
"#,
        );
        &[STORE]
    }
}

fn non_empty_var(name: &str) -> Option<std::ffi::OsString> {
    std::env::var_os(name).filter(|v| !v.is_empty())
}
