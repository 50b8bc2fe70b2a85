/*!
A task store backed by a single JSON-lines file.

Each line holds one task serialized with serde. Recurrence patterns are
persisted as their canonical text, which parses back into the same pattern
when the store is loaded.

The whole file is read into memory on open and written back out on save.
Saving writes a sibling temporary file first and then renames it over the
store, so that a crash mid-write never leaves a truncated store behind.
*/

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use {anyhow::Context, jiff::civil::Date};

use crate::{
    parse::BufReadExt,
    task::{Tag, Task, TaskId},
};

/// An in-memory view of every task in a store file.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    /// Always sorted by task identifier.
    tasks: Vec<Task>,
}

impl Store {
    /// Opens the store at the given path.
    ///
    /// A missing file is treated as an empty store. The file is only created
    /// once the store is saved.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Store> {
        let path = path.into();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!(
                    "task store {} does not exist, starting empty",
                    path.display(),
                );
                return Ok(Store { path, tasks: vec![] });
            }
            Err(err) => {
                return Err(anyhow::Error::from(err).context(format!(
                    "failed to open task store {}",
                    path.display(),
                )));
            }
        };
        let mut tasks: Vec<Task> = vec![];
        BufReader::new(file).for_byte_line(|line| {
            if line.is_blank() {
                return Ok(true);
            }
            let task: Task = serde_json::from_slice(line.content())
                .with_context(|| {
                    format!(
                        "{}:{}: invalid task record",
                        path.display(),
                        line.number(),
                    )
                })?;
            anyhow::ensure!(
                task.id() != TaskId::default(),
                "{}:{}: task record is missing an id",
                path.display(),
                line.number(),
            );
            tasks.push(task);
            Ok(true)
        })?;
        tasks.sort_by_key(|t| t.id());
        if let Some(pair) = tasks.windows(2).find(|w| w[0].id() == w[1].id()) {
            anyhow::bail!(
                "{}: task id {} appears more than once",
                path.display(),
                pair[0].id(),
            );
        }
        log::debug!("loaded {} tasks from {}", tasks.len(), path.display());
        Ok(Store { path, tasks })
    }

    /// Returns the path of the file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the task with the given identifier.
    pub fn get(&self, id: TaskId) -> anyhow::Result<&Task> {
        let index = self.index_of(id)?;
        Ok(&self.tasks[index])
    }

    /// Adds a new task to this store and returns it with its newly assigned
    /// identifier.
    ///
    /// Any identifier the task had before is replaced.
    pub fn create(&mut self, mut task: Task) -> anyhow::Result<&Task> {
        let last = self.tasks.last().map_or(TaskId::default(), |t| t.id());
        let id = last.next()?;
        task.assign_id(id);
        log::debug!("created task {id} on {}", task.date());
        self.tasks.push(task);
        // OK because we just pushed a task.
        Ok(self.tasks.last().unwrap())
    }

    /// Replaces the stored task that has the same identifier as the one
    /// given.
    pub fn update(&mut self, task: Task) -> anyhow::Result<()> {
        let index = self.index_of(task.id())?;
        log::debug!("updated task {}", task.id());
        self.tasks[index] = task;
        Ok(())
    }

    /// Removes the task with the given identifier and returns it.
    pub fn delete(&mut self, id: TaskId) -> anyhow::Result<Task> {
        let index = self.index_of(id)?;
        log::debug!("deleted task {id}");
        Ok(self.tasks.remove(index))
    }

    /// Returns all tasks matching the given filter, ordered by date and then
    /// by creation time.
    ///
    /// Skipped tasks are never included.
    pub fn list(&self, filter: &Filter) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| !t.is_skipped() && filter.matches(t))
            .collect();
        tasks.sort_by_key(|t| (t.date(), t.created_at(), t.id()));
        tasks
    }

    /// Writes every task in this store back to its file.
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(name) = self.path.file_name() else {
            anyhow::bail!(
                "task store path {} does not name a file",
                self.path.display(),
            );
        };
        let mut tmp_name = std::ffi::OsString::from(".");
        tmp_name.push(name);
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        let file = File::create(&tmp).with_context(|| {
            format!("failed to create temporary file {}", tmp.display())
        })?;
        let mut wtr = BufWriter::new(file);
        for task in self.tasks.iter() {
            serde_json::to_writer(&mut wtr, task)?;
            wtr.write_all(b"\n")?;
        }
        wtr.into_inner()
            .map_err(|err| err.into_error())
            .and_then(|file| file.sync_all())
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path).with_context(|| {
            format!(
                "failed to replace task store {} with {}",
                self.path.display(),
                tmp.display(),
            )
        })?;
        log::debug!(
            "saved {} tasks to {}",
            self.tasks.len(),
            self.path.display(),
        );
        Ok(())
    }

    fn index_of(&self, id: TaskId) -> anyhow::Result<usize> {
        self.tasks
            .binary_search_by_key(&id, |t| t.id())
            .map_err(|_| anyhow::anyhow!("task {id} not found"))
    }
}

/// Which tasks to select based on their date.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum When {
    /// Every task regardless of its date.
    All,
    /// Tasks dated before today.
    Past,
    /// Tasks dated today.
    #[default]
    Current,
    /// Tasks dated after today.
    Future,
}

/// A selection of tasks in a store.
#[derive(Clone, Debug)]
pub struct Filter {
    when: When,
    today: Date,
    tags: Vec<Tag>,
}

impl Filter {
    /// Creates a filter selecting tasks by date relative to `today`.
    pub fn new(when: When, today: Date) -> Filter {
        Filter { when, today, tags: vec![] }
    }

    /// Additionally require that selected tasks carry this tag.
    pub fn tag(mut self, tag: Tag) -> Filter {
        self.tags.push(tag);
        self
    }

    pub fn when(&self) -> When {
        self.when
    }

    fn matches(&self, task: &Task) -> bool {
        let on_day = match self.when {
            When::All => true,
            When::Past => task.date() < self.today,
            When::Current => task.date() == self.today,
            When::Future => task.date() > self.today,
        };
        on_day && self.tags.iter().all(|tag| task.has_tag(tag))
    }
}
