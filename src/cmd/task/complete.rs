use std::io::Write;

use crate::{
    args::{self, flags::StoreLocation},
    cmd::task::{Target, close},
    style::Theme,
    task::Task,
};

const USAGE_COMPLETE: &'static str = r#"
Mark a task as completed.

When the task recurs, its next instance is added on the next occurrence of its
pattern after the completed task's date.

USAGE:
    cadence task complete <id>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Complete a weekly task:

        $ cadence task complete 4
        completed task 4
        created task 5 for Mon, Jul 29, 2024 (Every Monday)

REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

const USAGE_INCOMPLETE: &'static str = r#"
Mark a completed task as not completed.

The next instance of a recurring task that was created when it was completed
is left as is.

USAGE:
    cadence task incomplete <id>

TIP:
    use -h for short docs and --help for long docs

REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn complete(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut target = Target::default();
    let mut location = StoreLocation::default();
    args::configure(p, USAGE_COMPLETE, &mut [&mut target, &mut location])?;

    let id = target.id()?;
    let mut store = location.open()?;
    let theme = Theme::stdout();
    let mut wtr = std::io::stdout().lock();
    if store.get(id)?.is_completed() {
        writeln!(wtr, "task {} is already completed", theme.highlight(id))?;
        return Ok(());
    }
    let next = close(&mut store, id, crate::NOW.timestamp(), Task::complete)?;
    store.save()?;

    writeln!(wtr, "completed task {}", theme.highlight(id))?;
    if let Some(next) = next {
        writeln!(wtr, "created {next}")?;
    }
    Ok(())
}

pub fn incomplete(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut target = Target::default();
    let mut location = StoreLocation::default();
    args::configure(p, USAGE_INCOMPLETE, &mut [&mut target, &mut location])?;

    let id = target.id()?;
    let mut store = location.open()?;
    let mut task = store.get(id)?.clone();
    task.incomplete(crate::NOW.timestamp());
    store.update(task)?;
    store.save()?;

    let mut wtr = std::io::stdout().lock();
    writeln!(
        wtr,
        "marked task {} as incomplete",
        Theme::stdout().highlight(id),
    )?;
    Ok(())
}
