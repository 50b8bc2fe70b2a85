use std::io::Write;

use crate::{
    args::{self, Usage, flags::StoreLocation},
    cmd::task::Target,
    style::Theme,
    task::{Tag, Task},
};

const USAGE: &'static str = r#"
Change the title, details or tags of a task.

Tags given with `-t/--tag` are added to the tags the task already has. Use
`--clear-tags` to remove the existing tags first.

The date and recurrence pattern of a task cannot be changed. Instead, delete
the task and add it again.

USAGE:
    cadence task edit <id>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Fix a typo in a title:

        $ cadence task edit 1 --title 'water the plants'
        updated task 1

    %snip-start%

    Replace all tags on a task:

        $ cadence task edit 4 --clear-tags -t work
        updated task 4

    Remove the details of a task:

        $ cadence task edit 2 -m ''
        updated task 2

    %snip-end%
REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config = Config::default();
    let mut target = Target::default();
    let mut location = StoreLocation::default();
    args::configure(
        p,
        USAGE,
        &mut [&mut config, &mut target, &mut location],
    )?;

    let id = target.id()?;
    anyhow::ensure!(
        !config.is_empty(),
        "nothing to change, use --title, -m/--details, -t/--tag \
         or --clear-tags",
    );
    let mut store = location.open()?;
    let mut task = store.get(id)?.clone();
    config.apply(&mut task, crate::NOW.timestamp())?;
    store.update(task)?;
    store.save()?;

    let mut wtr = std::io::stdout().lock();
    writeln!(wtr, "updated task {}", Theme::stdout().highlight(id))?;
    Ok(())
}

#[derive(Debug, Default)]
struct Config {
    title: Option<String>,
    details: Option<String>,
    tags: Vec<Tag>,
    clear_tags: bool,
}

impl Config {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.details.is_none()
            && self.tags.is_empty()
            && !self.clear_tags
    }

    fn apply(
        &self,
        task: &mut Task,
        now: jiff::Timestamp,
    ) -> anyhow::Result<()> {
        if let Some(ref title) = self.title {
            task.set_title(title, now)?;
        }
        if let Some(ref details) = self.details {
            task.set_details(details, now);
        }
        if self.clear_tags || !self.tags.is_empty() {
            let existing: &[Tag] =
                if self.clear_tags { &[] } else { task.tags() };
            let tags: Vec<Tag> =
                existing.iter().chain(self.tags.iter()).cloned().collect();
            task.set_tags(tags, now)?;
        }
        Ok(())
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
            Long("title") => {
                self.title = Some(args::parse(p, "--title")?);
            }
            Short('m') | Long("details") => {
                self.details = Some(args::parse(p, "-m/--details")?);
            }
            Short('t') | Long("tag") => {
                self.tags.push(args::parse(p, "-t/--tag")?);
            }
            Long("clear-tags") => {
                self.clear_tags = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const TITLE: Usage = Usage::flag(
            "--title <text>",
            "Replace the title of the task.",
            r#"
Replace the title of the task.

The new title cannot be empty.
"#,
        );
        const DETAILS: Usage = Usage::flag(
            "-m/--details <text>",
            "Replace the details of the task.",
            r#"
Replace the details of the task.

An empty value removes the details.
"#,
        );
        const CLEAR_TAGS: Usage = Usage::flag(
            "--clear-tags",
            "Remove every tag from the task.",
            r#"
Remove every tag from the task.

Tags given with `-t/--tag` are still added afterwards, which makes it possible
to replace the tags of a task in one go.
"#,
        );
        &[TITLE, DETAILS, Tag::FLAG, CLEAR_TAGS]
    }
}
