use std::io::Write;

use crate::{
    args::{self, Usage, flags::StoreLocation},
    cmd::task::human_date,
    datetime::DateTime,
    store::{Filter, When},
    style::Theme,
    task::{Tag, Task},
};

const USAGE: &'static str = r#"
List tasks.

By default, only the tasks for the current day are listed. Tasks are grouped
by their date and ordered by when they were added. Skipped tasks are never
listed.

USAGE:
    cadence task list

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    List what's left to do today:

        $ cadence task list
        Sat, Jul 20, 2024
          [ ] 1. water the plants

    %snip-start%

    List everything coming up that is tagged with `work`:

        $ cadence task list --future -t work
        Mon, Jul 22, 2024
          [ ] 4. team sync (Every Monday) #work #meetings

    %snip-end%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config = Config::default();
    let mut location = StoreLocation::default();
    args::configure(p, USAGE, &mut [&mut config, &mut location])?;
    config.run(&location)
}

/// Lists the tasks for today from the default task store.
pub fn today() -> anyhow::Result<()> {
    Config::default().run(&StoreLocation::default())
}

#[derive(Debug, Default)]
struct Config {
    when: Option<When>,
    tags: Vec<Tag>,
}

impl Config {
    fn run(&self, location: &StoreLocation) -> anyhow::Result<()> {
        let store = location.open()?;
        let filter = self.filter();
        let tasks = store.list(&filter);

        let mut wtr = std::io::stdout().lock();
        if tasks.is_empty() {
            let msg = match filter.when() {
                When::All => "No tasks.",
                When::Past => "No past tasks.",
                When::Current => "No tasks for today.",
                When::Future => "No future tasks.",
            };
            writeln!(wtr, "{msg}")?;
            return Ok(());
        }
        let theme = Theme::stdout();
        let groups = tasks.chunk_by(|a, b| a.date() == b.date());
        for (i, group) in groups.enumerate() {
            if i > 0 {
                writeln!(wtr)?;
            }
            writeln!(wtr, "{}", theme.date(human_date(group[0].date())))?;
            for task in group.iter() {
                write_task(&mut wtr, theme, task)?;
            }
        }
        Ok(())
    }

    fn filter(&self) -> Filter {
        let today = DateTime::now().local_date();
        let mut filter = Filter::new(self.when.unwrap_or_default(), today);
        for tag in self.tags.iter() {
            filter = filter.tag(tag.clone());
        }
        filter
    }

    fn set_when(&mut self, when: When) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.when.is_none_or(|w| w == when),
            "only one of --past, --future or --all may be given",
        );
        self.when = Some(when);
        Ok(())
    }
}

fn write_task<W: Write>(
    wtr: &mut W,
    theme: &Theme,
    task: &Task,
) -> anyhow::Result<()> {
    let status = if task.is_completed() { "[x]" } else { "[ ]" };
    write!(wtr, "  {status} {}. ", theme.highlight(task.id()))?;
    if task.is_completed() {
        write!(wtr, "{}", theme.muted(task.title()))?;
    } else {
        write!(wtr, "{}", task.title())?;
    }
    if task.is_recurring() {
        write!(wtr, " ({})", task.recurrence())?;
    }
    for tag in task.tags() {
        write!(wtr, " {}", theme.tag(format!("#{tag}")))?;
    }
    writeln!(wtr)?;
    for line in task.details().lines() {
        if line.trim().is_empty() {
            writeln!(wtr)?;
        } else {
            writeln!(wtr, "      {line}")?;
        }
    }
    Ok(())
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        use lexopt::Arg::*;

        match *arg {
            Long("past") => self.set_when(When::Past)?,
            Long("future") => self.set_when(When::Future)?,
            Long("all") => self.set_when(When::All)?,
            Short('t') | Long("tag") => {
                self.tags.push(args::parse(p, "-t/--tag")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const PAST: Usage = Usage::flag(
            "--past",
            "List tasks dated before today.",
            r#"
List tasks dated before today.

This conflicts with `--future` and `--all`.
"#,
        );
        const FUTURE: Usage = Usage::flag(
            "--future",
            "List tasks dated after today.",
            r#"
List tasks dated after today.

This conflicts with `--past` and `--all`.
"#,
        );
        const ALL: Usage = Usage::flag(
            "--all",
            "List every task regardless of its date.",
            r#"
List every task regardless of its date.

This conflicts with `--past` and `--future`.
"#,
        );
        const TAG: Usage = Usage::flag(
            "-t/--tag <name>",
            "Only list tasks with this tag. May be repeated.",
            r#"
Only list tasks with this tag. May be repeated.

When repeated, only tasks carrying every one of the given tags are listed. Tag
names are case insensitive.
"#,
        );
        &[PAST, FUTURE, ALL, TAG]
    }
}
