mod next;
mod parse;

const USAGE: &'static str = "\
Commands for working with recurrence patterns.

USAGE:
    cadence pattern <command> ...

COMMANDS:
    next   Compute the next occurrences of a pattern
    parse  Parse patterns into their canonical form
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = crate::args::next_as_command(USAGE, p)?;
    match &*cmd {
        "next" => next::run(p),
        "parse" => parse::run(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}
