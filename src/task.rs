use std::sync::LazyLock;

use {
    anyhow::Context,
    jiff::{Timestamp, civil::Date},
    regex::Regex,
};

use crate::{
    args::Usage,
    parse::FromBytes,
    recur::{self, Pattern},
};

/// The maximum number of tags a single task may carry.
pub const MAX_TAGS: usize = 5;

/// The maximum length of a tag name, in bytes.
const MAX_TAG_LEN: usize = 50;

/// The identifier of a task within a store.
///
/// Identifiers are assigned by the store when a task is created. A task that
/// hasn't been stored yet has the (otherwise invalid) identifier `0`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub const ARG: Usage = Usage::arg(
        "<id>",
        "The identifier of a task, as shown by `cadence task list`.",
        r#"
The identifier of a task, as shown by `cadence task list`.

Identifiers are positive integers assigned when a task is added. They are
never reused for as long as a task with that identifier exists.
"#,
    );

    /// Returns the identifier that follows this one.
    ///
    /// This fails once every identifier has been used.
    pub fn next(self) -> anyhow::Result<TaskId> {
        let id = self.0.checked_add(1).with_context(|| {
            format!("task ids are exhausted, the last id is {self}")
        })?;
        Ok(TaskId(id))
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for TaskId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<TaskId> {
        let id: u64 = s.trim().parse().with_context(|| {
            format!("invalid task id `{s}`, expected a positive integer")
        })?;
        anyhow::ensure!(id > 0, "invalid task id `{s}`, ids start at 1");
        Ok(TaskId(id))
    }
}

impl FromBytes for TaskId {
    type Err = anyhow::Error;

    fn from_bytes(s: &[u8]) -> anyhow::Result<TaskId> {
        std::str::from_utf8(s)
            .map_err(|_| anyhow::anyhow!("task id is not valid UTF-8"))?
            .parse()
    }
}

/// A normalized and validated tag name.
///
/// Tags are trimmed and lowercased when parsed. What remains must be
/// non-empty, at most 50 bytes long and consist only of ASCII lowercase
/// letters, digits, `_` and `-`.
#[derive(
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub const FLAG: Usage = Usage::flag(
        "-t/--tag <name>",
        "Attach a tag to a task. May be repeated.",
        r#"
Attach a tag to a task. May be repeated.

Tag names are case insensitive and are always stored in lowercase. They may
only contain ASCII letters, digits, underscores and hyphens, and may be at most
50 characters long. A task can have at most 5 tags.
"#,
    );

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Tag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Tag> {
        static VALID: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+$").unwrap());

        let name = s.trim().to_lowercase();
        anyhow::ensure!(!name.is_empty(), "tag name cannot be empty");
        anyhow::ensure!(
            name.len() <= MAX_TAG_LEN,
            "tag name `{name}` is too long, \
             tag names cannot exceed {MAX_TAG_LEN} characters",
        );
        anyhow::ensure!(
            VALID.is_match(&name),
            "invalid tag name `{name}`, tag names can only contain \
             letters, numbers, underscores and hyphens",
        );
        Ok(Tag(name))
    }
}

impl TryFrom<String> for Tag {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Tag> {
        s.parse()
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> String {
        tag.0
    }
}

/// A single dated item in someone's task list.
///
/// A recurring task is still a single dated instance. Completing or skipping
/// it is what makes the next instance come into existence, via
/// `Task::take_next_instance`.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    details: String,
    date: Date,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    skipped: bool,
    #[serde(default, skip_serializing_if = "is_never")]
    recurrence: Pattern,
    /// Set once the instance following this one has been created.
    #[serde(default, skip_serializing_if = "is_false")]
    next_scheduled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<Tag>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Task {
    /// Creates a new non-recurring task on the given date.
    ///
    /// The title must contain something other than whitespace.
    pub fn new(
        title: &str,
        details: &str,
        date: Date,
        now: Timestamp,
    ) -> anyhow::Result<Task> {
        Ok(Task {
            id: TaskId::default(),
            title: validate_title(title)?,
            details: details.trim().to_string(),
            date,
            completed: false,
            skipped: false,
            recurrence: Pattern::Never,
            next_scheduled: false,
            tags: vec![],
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates a new recurring task whose first instance is the first
    /// occurrence of `pattern` on or after `start`.
    ///
    /// This fails when `pattern` is not recurring.
    pub fn new_recurring(
        title: &str,
        details: &str,
        pattern: Pattern,
        start: Date,
        now: Timestamp,
    ) -> anyhow::Result<Task> {
        anyhow::ensure!(
            pattern.is_recurring(),
            "a recurring task requires a recurring pattern",
        );
        let before = start
            .yesterday()
            .with_context(|| format!("failed to find day before {start}"))?;
        let date = pattern.next_after(before)?;
        let mut task = Task::new(title, details, date, now)?;
        task.recurrence = pattern;
        Ok(task)
    }

    /// Returns the instance that follows this one, if this task recurs.
    ///
    /// The instance returned is dated at the next occurrence strictly after
    /// this task's date. It copies this task's title, details, tags and
    /// pattern, but is neither completed nor skipped and has not been
    /// assigned an identifier yet.
    pub fn next_instance(
        &self,
        now: Timestamp,
    ) -> Result<Option<Task>, recur::Error> {
        if !self.is_recurring() {
            return Ok(None);
        }
        let date = self.recurrence.next_after(self.date)?;
        log::debug!(
            "next instance of task {id} (`{pattern}`) falls on {date}",
            id = self.id,
            pattern = self.recurrence,
        );
        Ok(Some(Task {
            id: TaskId::default(),
            title: self.title.clone(),
            details: self.details.clone(),
            date,
            completed: false,
            skipped: false,
            recurrence: self.recurrence,
            next_scheduled: false,
            tags: self.tags.clone(),
            created_at: now,
            updated_at: now,
        }))
    }

    /// Returns the instance that follows this closed task, at most once.
    ///
    /// An open task never yields its next instance. Once a closed task has
    /// yielded one, it never yields another, even if it is reopened and
    /// closed again.
    pub fn take_next_instance(
        &mut self,
        now: Timestamp,
    ) -> Result<Option<Task>, recur::Error> {
        if self.is_open() || self.next_scheduled {
            return Ok(None);
        }
        let next = self.next_instance(now)?;
        self.next_scheduled = next.is_some();
        Ok(next)
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn recurrence(&self) -> Pattern {
        self.recurrence
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_recurring()
    }

    /// Returns true when this task is neither completed nor skipped.
    pub fn is_open(&self) -> bool {
        !self.completed && !self.skipped
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    pub fn complete(&mut self, now: Timestamp) {
        self.completed = true;
        self.updated_at = now;
    }

    pub fn incomplete(&mut self, now: Timestamp) {
        self.completed = false;
        self.updated_at = now;
    }

    pub fn skip(&mut self, now: Timestamp) {
        self.skipped = true;
        self.updated_at = now;
    }

    pub fn unskip(&mut self, now: Timestamp) {
        self.skipped = false;
        self.updated_at = now;
    }

    pub fn set_title(
        &mut self,
        title: &str,
        now: Timestamp,
    ) -> anyhow::Result<()> {
        self.title = validate_title(title)?;
        self.updated_at = now;
        Ok(())
    }

    pub fn set_details(&mut self, details: &str, now: Timestamp) {
        self.details = details.trim().to_string();
        self.updated_at = now;
    }

    /// Replaces this task's tags.
    ///
    /// Duplicates are dropped, keeping the first of each. This fails when
    /// more than `MAX_TAGS` distinct tags remain.
    pub fn set_tags(
        &mut self,
        tags: impl IntoIterator<Item = Tag>,
        now: Timestamp,
    ) -> anyhow::Result<()> {
        let mut distinct: Vec<Tag> = vec![];
        for tag in tags {
            if !distinct.contains(&tag) {
                distinct.push(tag);
            }
        }
        anyhow::ensure!(
            distinct.len() <= MAX_TAGS,
            "a task cannot have more than {MAX_TAGS} tags, \
             but {count} were given",
            count = distinct.len(),
        );
        self.tags = distinct;
        self.updated_at = now;
        Ok(())
    }

    /// Sets the identifier of a task that is about to be stored.
    pub(crate) fn assign_id(&mut self, id: TaskId) {
        self.id = id;
    }
}

fn validate_title(title: &str) -> anyhow::Result<String> {
    let title = title.trim();
    anyhow::ensure!(!title.is_empty(), "task title cannot be empty");
    Ok(title.to_string())
}

fn is_never(pattern: &Pattern) -> bool {
    !pattern.is_recurring()
}

fn is_false(b: &bool) -> bool {
    !*b
}
