// Task store: in-memory collection with write-through persistence

use crate::filter::{FilterMode, Query};
use crate::models::{Priority, Task, now_ms, seed_tasks};
use crate::persist::StateSlot;
use chrono::NaiveDate;
use eyre::{Context, Result};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Callback invoked synchronously after each successful mutation
pub type Listener = Box<dyn FnMut(&[Task])>;

/// Aggregate counts over the collection, relative to a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Incomplete tasks matching the query
    pub remaining: usize,
    /// All stored tasks
    pub total: usize,
    /// All completed tasks
    pub completed: usize,
}

/// Single source of truth for the task collection.
///
/// Owns the in-memory tasks, every mutation and query, and the write-through
/// to the injected persistence slot. The presentation layer calls these
/// operations and re-renders from `query` + `sort_for_display`.
pub struct TaskStore {
    tasks: Vec<Task>,
    slot: Box<dyn StateSlot>,
    listeners: Vec<Listener>,
}

impl TaskStore {
    /// Open a store over the given persistence slot.
    ///
    /// A well-formed persisted payload becomes the initial collection.
    /// Absent or malformed data falls back to the seed set, which is
    /// written through immediately; the malformed case is never surfaced.
    pub fn open(slot: Box<dyn StateSlot>) -> Result<Self> {
        let (tasks, seeded) = match slot.load()? {
            Some(payload) => match Self::decode(&payload) {
                Some(tasks) => {
                    debug!(count = tasks.len(), "Loaded persisted task collection");
                    (tasks, false)
                }
                None => {
                    warn!("Discarding unreadable persisted state, using seed tasks");
                    (seed_tasks(), true)
                }
            },
            None => {
                info!("No persisted state found, using seed tasks");
                (seed_tasks(), true)
            }
        };

        let mut store = Self {
            tasks,
            slot,
            listeners: Vec::new(),
        };

        if seeded {
            store.flush()?;
        }

        Ok(store)
    }

    /// Decode a persisted payload. Returns `None` when the payload is not
    /// valid JSON for a task array or violates id uniqueness, in which case
    /// the caller discards it wholesale.
    fn decode(payload: &str) -> Option<Vec<Task>> {
        let tasks: Vec<Task> = serde_json::from_str(payload).ok()?;

        let mut seen = HashSet::new();
        if !tasks.iter().all(|t| seen.insert(t.id)) {
            return None;
        }

        Some(tasks)
    }

    /// Read-only view of the stored collection, insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Register a listener notified after each successful mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&[Task]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Fresh id: creation time in milliseconds, bumped past the current
    /// maximum so rapid successive adds stay unique.
    fn next_id(&self) -> i64 {
        let max_id = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        now_ms().max(max_id + 1)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a new task. Returns the new id, or `None` when the trimmed
    /// text is empty (silent no-op, nothing persisted).
    pub fn add(&mut self, text: &str, priority: Priority, due_date: Option<NaiveDate>) -> Result<Option<i64>> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring add with empty text");
            return Ok(None);
        }

        let id = self.next_id();
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            completed: false,
            priority,
            due_date,
        });

        self.flush()?;
        Ok(Some(id))
    }

    /// Remove the task with the given id. Returns whether a removal
    /// occurred; an absent id is a silent no-op with no flush.
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);

        if self.tasks.len() == before {
            debug!(id, "Delete ignored, no such task");
            return Ok(false);
        }

        self.flush()?;
        Ok(true)
    }

    /// Flip `completed` on the matching task, leaving every other field
    /// untouched. Returns whether a task was toggled.
    pub fn toggle_complete(&mut self, id: i64) -> Result<bool> {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                self.flush()?;
                Ok(true)
            }
            None => {
                debug!(id, "Toggle ignored, no such task");
                Ok(false)
            }
        }
    }

    /// Overwrite text, priority, and due date on the matching task.
    /// `completed` and `id` are untouched. Unlike `add`, no non-empty
    /// check is applied to the replacement text.
    pub fn edit(
        &mut self,
        id: i64,
        new_text: &str,
        new_priority: Priority,
        new_due_date: Option<NaiveDate>,
    ) -> Result<bool> {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.text = new_text.to_string();
                task.priority = new_priority;
                task.due_date = new_due_date;
                self.flush()?;
                Ok(true)
            }
            None => {
                debug!(id, "Edit ignored, no such task");
                Ok(false)
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tasks satisfying both the filter mode and the search term, as a new
    /// sequence of clones in insertion order. Stored order is never mutated.
    pub fn query(&self, mode: FilterMode, search: &str) -> Vec<Task> {
        let query = Query::new(mode, search);
        self.tasks.iter().filter(|t| query.matches(t)).cloned().collect()
    }

    /// Sort a query result in place for display:
    /// priority descending, then ascending due date (dated tasks before
    /// undated at equal priority), then descending id when neither task
    /// has a due date. Stable, so uncovered ties keep input order.
    pub fn sort_for_display(tasks: &mut [Task]) {
        tasks.sort_by(display_cmp);
    }

    /// Counts for the footer: remaining relative to the query, total and
    /// completed over the whole collection.
    pub fn stats(&self, mode: FilterMode, search: &str) -> Stats {
        let query = Query::new(mode, search);
        Stats {
            remaining: self
                .tasks
                .iter()
                .filter(|t| query.matches(t) && !t.completed)
                .count(),
            total: self.tasks.len(),
            completed: self.tasks.iter().filter(|t| t.completed).count(),
        }
    }

    /// Encode the whole collection and overwrite the slot, then notify
    /// listeners. Called after every successful mutation.
    fn flush(&mut self) -> Result<()> {
        let payload = serde_json::to_string(&self.tasks).context("Failed to encode task collection")?;
        self.slot.save(&payload)?;
        debug!(count = self.tasks.len(), "Flushed task collection");

        for listener in &mut self.listeners {
            listener(&self.tasks);
        }

        Ok(())
    }
}

fn display_cmp(a: &Task, b: &Task) -> Ordering {
    b.priority
        .rank()
        .cmp(&a.priority.rank())
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.id.cmp(&a.id),
        })
}
