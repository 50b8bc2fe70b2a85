use {
    anyhow::Context,
    bstr::{BString, ByteSlice, ByteVec},
};

use crate::{
    args::{Configurable, flags::Recurrence},
    datetime::{DateTime, DateTimeFlexible},
    parse::{BufReadExt, BytesExt, Line},
};

/// The CLI parsing configuration for reading datetimes.
///
/// This will greedily consume all remaining positional arguments as datetimes.
///
/// When there are no positional arguments to consume, then this will read
/// datetimes from `stdin` in a line delimited fashion.
#[derive(Clone, Debug, Default)]
pub struct DateTimes(Arguments);

impl DateTimes {
    /// Run the given function over each datetime read from the CLI.
    ///
    /// If there were no positional datetimes, then this tries to read them
    /// from stdin, one per line.
    ///
    /// Iteration stops when the closure returns false or returns an error.
    pub fn try_map(
        self,
        mut f: impl FnMut(DateTime) -> anyhow::Result<bool>,
    ) -> anyhow::Result<()> {
        self.0.try_map(|arg| f(arg.to_datetime()?))
    }
}

impl Configurable for DateTimes {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        self.0.configure(p, arg)
    }
}

/// The CLI parsing configuration for reading recurrence patterns.
///
/// Like `DateTimes`, positional arguments take priority. Only when there are
/// none are patterns read from `stdin`, one per line.
#[derive(Clone, Debug, Default)]
pub struct Patterns(Arguments);

impl Patterns {
    /// Run the given function over each pattern read from the CLI.
    ///
    /// The closure also gets the raw text that the pattern was parsed from.
    ///
    /// Iteration stops when the closure returns false or returns an error.
    pub fn try_map(
        self,
        mut f: impl FnMut(&str, Recurrence) -> anyhow::Result<bool>,
    ) -> anyhow::Result<()> {
        self.0.try_map(|arg| {
            let recurrence = arg.to_recurrence()?;
            let raw = arg.raw().to_str_lossy();
            f(raw.trim(), recurrence)
        })
    }
}

impl Configurable for Patterns {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        self.0.configure(p, arg)
    }
}

/// The parsing configuration for reading arguments either as positional
/// arguments on the CLI, or as line-delimited data on `stdin`.
///
/// This will greedily consume all remaining positional arguments. That is,
/// this is generally intended for use cases where a variable number of
/// arguments can be given.
///
/// When there are _zero_ positional arguments, then this will read lines from
/// stdin instead.
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    positional: Vec<BString>,
}

impl Arguments {
    /// Run the given function over each argument read from the CLI.
    ///
    /// If there were no positional arguments, then this tries to read them
    /// from stdin, one per line. Stated differently, the argument given
    /// to the closure is either always `Positional` or always `StdinLine`.
    /// You can never get a mix.
    ///
    /// Blank lines on stdin are skipped.
    ///
    /// Iteration stops when the closure returns false or returns an error.
    pub fn try_map(
        self,
        mut f: impl FnMut(Argument<'_>) -> anyhow::Result<bool>,
    ) -> anyhow::Result<()> {
        if !self.positional.is_empty() {
            for arg in self.positional {
                if !f(Argument::Positional(arg))? {
                    return Ok(());
                }
            }
            return Ok(());
        }
        std::io::stdin().lock().for_byte_line(|line| {
            if line.is_blank() {
                return Ok(true);
            }
            f(Argument::StdinLine(line))
                .with_context(|| format!("line {} of <stdin>", line.number()))
        })
    }
}

impl Configurable for Arguments {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Value(ref mut v) => {
                let v = std::mem::take(v);
                let bytes = Vec::from_os_string(v).map_err(|arg| {
                    anyhow::anyhow!(
                        "cadence requires that positional arguments \
                         be valid UTF-8 in non-Unix environments, \
                         but `{arg:?}` is not valid UTF-8",
                    )
                })?;
                self.positional.push(BString::from(bytes));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// A generic argument parsed from either positional args on the CLI, or
/// as a single line from stdin.
#[derive(Clone, Debug)]
pub enum Argument<'a> {
    /// Just arbitrary bytes.
    ///
    /// On Windows, we require that this is valid UTF-8.
    Positional(BString),
    /// A line containing arbitrary ASCII compatible bytes.
    StdinLine(Line<'a>),
}

impl<'a> Argument<'a> {
    /// Returns the raw bytes of this argument, without any line terminator.
    pub fn raw(&self) -> &[u8] {
        match *self {
            Argument::Positional(ref arg) => arg.as_slice(),
            Argument::StdinLine(line) => line.content(),
        }
    }

    /// Parse this argument into a datetime.
    ///
    /// Positional arguments accept the flexible format, e.g., `today`. Lines
    /// on stdin must unambiguously refer to an instant in time.
    pub fn to_datetime(&self) -> anyhow::Result<DateTime> {
        match *self {
            Argument::Positional(ref arg) => {
                let dt: DateTimeFlexible =
                    arg.parse().context("invalid datetime")?;
                Ok(dt.into())
            }
            Argument::StdinLine(line) => {
                line.content().parse::<DateTime>().context("invalid datetime")
            }
        }
    }

    /// Parse this argument into a recurrence pattern.
    pub fn to_recurrence(&self) -> anyhow::Result<Recurrence> {
        self.raw().parse()
    }
}
