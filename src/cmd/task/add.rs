use std::io::Write;

use anyhow::Context;

use crate::{
    args::{self, Usage, flags::Recurrence, flags::StoreLocation},
    cmd::task::Scheduled,
    datetime::{DateTime, DateTimeFlexible},
    parse::OsStrExt,
    task::{Tag, Task},
};

const USAGE: &'static str = r#"
Add a new task.

The task's title is given as positional arguments. When more than one is given,
they are joined together with a single space.

A task falls on the current day unless `-d/--date` says otherwise. A recurring
task, created with `-r/--recur`, falls on the first occurrence of its pattern
on or after that day instead.

USAGE:
    cadence task add <title>...

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Add a task for today:

        $ cadence task add 'water the plants'
        added task 1 for Sat, Jul 20, 2024

    %snip-start%

    Add a task for tomorrow with some details:

        $ cadence task add call the bank -d tomorrow -m 'ask about the fee'
        added task 2 for Sun, Jul 21, 2024

    Pay rent on the last day of every month, starting next month:

        $ cadence task add 'pay rent' -r '31st of each month' -d 2024-08-01
        added task 3 for Sat, Aug 31, 2024 (Day 31 of each month)

    Add a tagged weekly task:

        $ cadence task add 'team sync' -r 'every monday' -t work -t meetings
        added task 4 for Mon, Jul 22, 2024 (Every Monday)

    %snip-end%
REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config = Config::default();
    let mut location = StoreLocation::default();
    args::configure(p, USAGE, &mut [&mut config, &mut location])?;

    let now = crate::NOW.timestamp();
    let task = config.task(now)?;
    let mut store = location.open()?;
    let scheduled = Scheduled::new(store.create(task)?);
    store.save()?;

    let mut wtr = std::io::stdout().lock();
    writeln!(wtr, "added {scheduled}")?;
    Ok(())
}

#[derive(Debug, Default)]
struct Config {
    title: Vec<String>,
    details: String,
    date: Option<DateTime>,
    recur: Recurrence,
    tags: Vec<Tag>,
}

impl Config {
    fn task(&self, now: jiff::Timestamp) -> anyhow::Result<Task> {
        anyhow::ensure!(
            !self.title.is_empty(),
            "missing required task title",
        );
        let title = self.title.join(" ");
        let date = match self.date {
            None => DateTime::now().local_date(),
            Some(ref dt) => dt.local_date(),
        };
        let pattern = self.recur.get();
        let mut task = if pattern.is_recurring() {
            Task::new_recurring(&title, &self.details, pattern, date, now)?
        } else {
            Task::new(&title, &self.details, date, now)?
        };
        task.set_tags(self.tags.iter().cloned(), now)?;
        Ok(task)
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
                let word = v.to_str().context("invalid task title")?;
                self.title.push(word.to_string());
            }
            Short('m') | Long("details") => {
                self.details = args::parse(p, "-m/--details")?;
            }
            Short('d') | Long("date") => {
                let dt: DateTimeFlexible = args::parse(p, "-d/--date")?;
                self.date = Some(dt.into());
            }
            Short('r') | Long("recur") => {
                self.recur = args::parse(p, "-r/--recur")?;
            }
            Short('t') | Long("tag") => {
                self.tags.push(args::parse(p, "-t/--tag")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const TITLE: Usage = Usage::arg(
            "<title>",
            "What needs to be done.",
            r#"
What needs to be done.

The title cannot be empty. Surrounding whitespace is removed.
"#,
        );
        const DETAILS: Usage = Usage::flag(
            "-m/--details <text>",
            "Longer notes about the task.",
            r#"
Longer notes about the task.

These are shown below the task's title by `cadence task list`.
"#,
        );
        &[
            TITLE,
            DETAILS,
            DateTime::DATE_FLAG,
            Recurrence::FLAG,
            Tag::FLAG,
        ]
    }
}
