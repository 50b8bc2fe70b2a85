use std::io::Write;

use anyhow::Context;

use crate::{
    args::{self, Usage, flags::Recurrence, positional},
    datetime::DateTime,
};

const USAGE: &'static str = r#"
Compute the next occurrences of a recurrence pattern.

The first positional argument is the pattern. Every remaining positional
argument is a reference datetime. When no reference datetimes are given, then
line delimited datetimes are read from stdin.

The next occurrence is always on a day strictly after the reference datetime's
day, regardless of the reference's time of day. Occurrences are printed as the
first instant of their day, in the time zone of the reference datetime.

USAGE:
    cadence pattern next <pattern> <datetime>...
    cadence pattern next <pattern> < line delimited <datetime>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Find the next Monday:

        $ cadence pattern next 'every monday' today
        2024-07-22T00:00:00-04:00[America/New_York]

    %snip-start%

    Print the next three paydays, which fall on the last day of each month:

        $ cadence pattern next -c3 '31st of each month' today
        2024-07-31T00:00:00-04:00[America/New_York]
        2024-08-31T00:00:00-04:00[America/New_York]
        2024-09-30T00:00:00-04:00[America/New_York]

    Find the second weekday of the month after a handful of dates:

        $ cadence pattern next '2nd weekday of the month' 2025-11-01 2025-11-04
        2025-11-04T00:00:00-05:00[America/New_York]
        2025-12-02T00:00:00-05:00[America/New_York]

    %snip-end%
REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config = Config::default();
    let mut datetimes = positional::DateTimes::default();
    args::configure(p, USAGE, &mut [&mut config, &mut datetimes])?;

    let pattern = config.pattern()?;
    anyhow::ensure!(
        pattern.is_recurring(),
        "pattern `{pattern}` does not recur, so it has no next occurrence",
    );
    let mut wtr = std::io::stdout().lock();
    datetimes.try_map(|dt| {
        let mut zdt = dt.get().clone();
        for _ in 0..config.count() {
            zdt = pattern.next_occurrence(&zdt).with_context(|| {
                format!("failed to find next occurrence after {dt}")
            })?;
            writeln!(wtr, "{}", DateTime::from(zdt.clone()))?;
        }
        Ok(true)
    })
}

#[derive(Debug, Default)]
struct Config {
    pattern: Option<Recurrence>,
    count: Option<usize>,
}

impl Config {
    fn pattern(&self) -> anyhow::Result<crate::recur::Pattern> {
        self.pattern
            .map(|r| r.get())
            .context("missing required recurrence pattern")
    }

    fn count(&self) -> usize {
        self.count.unwrap_or(1)
    }
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        use lexopt::Arg::*;

        match *arg {
            Value(ref v) => {
                if self.pattern.is_some() {
                    return Ok(false);
                }
                let pattern = v.to_str().with_context(|| {
                    format!("recurrence pattern {v:?} is not valid UTF-8")
                })?;
                self.pattern = Some(pattern.parse()?);
            }
            Short('c') | Long("count") => {
                let count: usize = args::parse(p, "-c/--count")?;
                anyhow::ensure!(
                    count > 0,
                    "-c/--count: the number of occurrences must be at least 1",
                );
                self.count = Some(count);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const COUNT: Usage = Usage::flag(
            "-c/--count <number>",
            "Print this many successive occurrences for each datetime.",
            r#"
Print this many successive occurrences for each datetime.

Each occurrence after the first is the next occurrence of the pattern after
the previous one. The default is 1.
"#,
        );
        &[Recurrence::ARG, DateTime::ARG_OR_STDIN, COUNT]
    }
}
