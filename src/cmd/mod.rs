mod pattern;
mod task;

const USAGE: &'static str = "\
Keep track of tasks that come around again.

USAGE:
    cadence <command> ...

COMMANDS:
    pattern  Parse recurrence patterns and compute their occurrences
    task     Add, list and update tasks
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    // For convenience, running `cadence` with no arguments lists the tasks
    // for today.
    if p.try_raw_args().map_or(false, |args| args.as_slice().is_empty()) {
        return task::list::today();
    }

    let cmd = crate::args::next_as_command(USAGE, p)?;
    match &*cmd {
        "pattern" => pattern::run(p),
        "task" => task::run(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}
