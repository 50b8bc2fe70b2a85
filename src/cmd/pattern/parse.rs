use std::io::Write;

use crate::args::{self, Usage, flags::Recurrence, positional};

const USAGE: &'static str = r#"
Parse recurrence patterns.

This accepts one or more patterns as positional arguments. When no positional
arguments are given, then line delimited patterns are read from stdin.

Each pattern is printed in its canonical form, one per line. The canonical
form of a pattern always parses back into the same pattern.

USAGE:
    cadence pattern parse <pattern>...
    cadence pattern parse < line delimited <pattern>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Check what a pattern means:

        $ cadence pattern parse '31st of each month'
        Day 31 of each month

    %snip-start%

    Print each pattern next to its canonical form:

        $ cadence pattern parse -s 'EVERY FRIDAY' 'last weekend of the month'
        EVERY FRIDAY	Every Friday
        last weekend of the month	Last weekend of each month

    Find out whether patterns recur at all:

        $ printf 'every monday\nnone\n' | cadence pattern parse --recurring
        true
        false

    %snip-end%
REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config = Config::default();
    let mut patterns = positional::Patterns::default();
    args::configure(p, USAGE, &mut [&mut config, &mut patterns])?;

    let mut wtr = std::io::stdout().lock();
    patterns.try_map(|raw, recurrence| {
        let pattern = recurrence.get();
        if config.show_input {
            write!(wtr, "{raw}\t")?;
        }
        if config.recurring {
            writeln!(wtr, "{}", pattern.is_recurring())?;
        } else {
            writeln!(wtr, "{pattern}")?;
        }
        Ok(true)
    })
}

#[derive(Debug, Default)]
struct Config {
    show_input: bool,
    recurring: bool,
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        use lexopt::Arg::*;

        match *arg {
            Short('s') | Long("show-input") => {
                self.show_input = true;
            }
            Long("recurring") => {
                self.recurring = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const SHOW_INPUT: Usage = Usage::flag(
            "-s/--show-input",
            "Print each pattern as given before its parsed form.",
            r#"
Print each pattern as given before its parsed form.

The pattern as given and its parsed form are separated by a tab. Surrounding
whitespace is removed from the pattern as given.
"#,
        );
        const RECURRING: Usage = Usage::flag(
            "--recurring",
            "Print whether each pattern recurs instead of its canonical form.",
            r#"
Print whether each pattern recurs instead of its canonical form.

This prints `true` for every pattern except `none` (or an empty pattern), for
which it prints `false`.
"#,
        );
        &[Recurrence::ARG_OR_STDIN, SHOW_INPUT, RECURRING]
    }
}
