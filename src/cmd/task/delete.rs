use std::io::Write;

use crate::{
    args::{self, flags::StoreLocation},
    cmd::task::Target,
    style::Theme,
};

const USAGE: &'static str = r#"
Delete a task.

Only the given task is deleted. Other instances of a recurring task are left
alone.

USAGE:
    cadence task delete <id>

TIP:
    use -h for short docs and --help for long docs

REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut target = Target::default();
    let mut location = StoreLocation::default();
    args::configure(p, USAGE, &mut [&mut target, &mut location])?;

    let id = target.id()?;
    let mut store = location.open()?;
    let task = store.delete(id)?;
    store.save()?;

    let mut wtr = std::io::stdout().lock();
    writeln!(
        wtr,
        "deleted task {} ({})",
        Theme::stdout().highlight(id),
        task.title(),
    )?;
    Ok(())
}
