use std::fmt::Display;

use {
    anyhow::Context,
    jiff::{Timestamp, civil::Date},
};

use crate::{
    args::{Configurable, Usage},
    parse::OsStrExt,
    recur::Pattern,
    store::Store,
    style::Theme,
    task::{Task, TaskId},
};

mod add;
mod complete;
mod delete;
mod edit;
pub(super) mod list;
mod skip;

const USAGE: &'static str = "\
Commands for working with tasks.

USAGE:
    cadence task <command> ...

COMMANDS:
    add         Add a new task
    complete    Mark a task as completed
    delete      Delete a task
    edit        Change the title, details or tags of a task
    incomplete  Mark a completed task as not completed
    list        List tasks
    skip        Skip a task
    unskip      Restore a skipped task
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = crate::args::next_as_command(USAGE, p)?;
    match &*cmd {
        "add" => add::run(p),
        "complete" => complete::complete(p),
        "delete" => delete::run(p),
        "edit" => edit::run(p),
        "incomplete" => complete::incomplete(p),
        "list" => list::run(p),
        "skip" => skip::skip(p),
        "unskip" => skip::unskip(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}

/// The single task a command operates on.
#[derive(Debug, Default)]
struct Target {
    id: Option<TaskId>,
}

impl Target {
    fn id(&self) -> anyhow::Result<TaskId> {
        self.id.context("missing required task id")
    }
}

impl Configurable for Target {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Value(ref v) => {
                if self.id.is_some() {
                    return Ok(false);
                }
                self.id = Some(v.parse()?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[TaskId::ARG]
    }
}

/// A task that was just put on the calendar.
#[derive(Clone, Copy, Debug)]
struct Scheduled {
    id: TaskId,
    date: Date,
    recurrence: Pattern,
}

impl Scheduled {
    fn new(task: &Task) -> Scheduled {
        Scheduled {
            id: task.id(),
            date: task.date(),
            recurrence: task.recurrence(),
        }
    }
}

impl std::fmt::Display for Scheduled {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let theme = Theme::stdout();
        write!(
            f,
            "task {} for {}",
            theme.highlight(self.id),
            theme.date(human_date(self.date)),
        )?;
        if self.recurrence.is_recurring() {
            write!(f, " ({})", self.recurrence)?;
        }
        Ok(())
    }
}

/// Closes the given task with `action` and schedules its next instance.
///
/// A task schedules its next instance the first time it is closed. Closing
/// it again, even after reopening it, schedules nothing.
///
/// Callers are responsible for saving the store.
fn close(
    store: &mut Store,
    id: TaskId,
    now: Timestamp,
    action: impl FnOnce(&mut Task, Timestamp),
) -> anyhow::Result<Option<Scheduled>> {
    let mut task = store.get(id)?.clone();
    action(&mut task, now);
    let next = task.take_next_instance(now)?;
    store.update(task)?;
    match next {
        None => Ok(None),
        Some(next) => Ok(Some(Scheduled::new(store.create(next)?))),
    }
}

/// Formats a date for people, e.g., `Sat, Jul 20, 2024`.
fn human_date(date: Date) -> impl Display {
    date.strftime("%a, %b %-d, %Y")
}
