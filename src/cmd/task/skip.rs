use std::io::Write;

use crate::{
    args::{self, flags::StoreLocation},
    cmd::task::{Target, close},
    style::Theme,
    task::Task,
};

const USAGE_SKIP: &'static str = r#"
Skip a task.

Skipped tasks are hidden from `cadence task list`. When the task recurs, its
next instance is added just like when it's completed.

USAGE:
    cadence task skip <id>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Skip this month's rent reminder:

        $ cadence task skip 3
        skipped task 3
        created task 6 for Mon, Sep 30, 2024 (Day 31 of each month)

REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

const USAGE_UNSKIP: &'static str = r#"
Restore a skipped task.

The next instance of a recurring task that was created when it was skipped is
left as is.

USAGE:
    cadence task unskip <id>

TIP:
    use -h for short docs and --help for long docs

REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn skip(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut target = Target::default();
    let mut location = StoreLocation::default();
    args::configure(p, USAGE_SKIP, &mut [&mut target, &mut location])?;

    let id = target.id()?;
    let mut store = location.open()?;
    let theme = Theme::stdout();
    let mut wtr = std::io::stdout().lock();
    if store.get(id)?.is_skipped() {
        writeln!(wtr, "task {} is already skipped", theme.highlight(id))?;
        return Ok(());
    }
    let next = close(&mut store, id, crate::NOW.timestamp(), Task::skip)?;
    store.save()?;

    writeln!(wtr, "skipped task {}", theme.highlight(id))?;
    if let Some(next) = next {
        writeln!(wtr, "created {next}")?;
    }
    Ok(())
}

pub fn unskip(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut target = Target::default();
    let mut location = StoreLocation::default();
    args::configure(p, USAGE_UNSKIP, &mut [&mut target, &mut location])?;

    let id = target.id()?;
    let mut store = location.open()?;
    let mut task = store.get(id)?.clone();
    task.unskip(crate::NOW.timestamp());
    store.update(task)?;
    store.save()?;

    let mut wtr = std::io::stdout().lock();
    writeln!(wtr, "unskipped task {}", Theme::stdout().highlight(id))?;
    Ok(())
}
