//! Persisted, observable to-do collection.
//!
//! # Responsibility
//! - Own the ordered to-do collection as the single source of truth.
//! - Notify subscribers after every mutation.
//! - Write the whole collection as one JSON snapshot after every mutation.
//! - Rehydrate the collection once when the store is opened.
//!
//! # Invariants
//! - Item ids are unique; order is insertion order.
//! - Subscribers are notified before the snapshot is written, and the
//!   snapshot always reflects post-mutation state.
//! - Delete/complete on an unknown id still notify and persist, but leave
//!   the collection unchanged.

use crate::model::todo::{TodoId, TodoItem};
use crate::observable::{Observable, Subscription};
use crate::storage::{KeyValueStore, StorageError};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Storage key holding the to-do snapshot.
pub const DEFAULT_TODOS_KEY: &str = "todos";

pub type TodoResult<T> = Result<T, TodoError>;

/// What to do when the stored snapshot cannot be decoded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Log the failure and start from an empty collection.
    #[default]
    Recover,
    /// Fail store construction with `TodoError::CorruptSnapshot`.
    Strict,
}

/// Construction options for [`TodoStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoStoreOptions {
    pub key: String,
    pub load_policy: LoadPolicy,
}

impl Default for TodoStoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_TODOS_KEY.to_string(),
            load_policy: LoadPolicy::default(),
        }
    }
}

/// Source of creation timestamps.
pub trait Clock {
    /// Current time in Unix epoch milliseconds.
    fn now_ms(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        epoch_millis(SystemTime::now())
    }
}

/// Milliseconds since the Unix epoch; clocks set before the epoch yield `0`.
fn epoch_millis(now: SystemTime) -> i64 {
    match now.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
        Err(err) => {
            warn!(
                "event=clock_read module=todo_store status=error error_code=clock_before_epoch skew_ms={}",
                err.duration().as_millis()
            );
            0
        }
    }
}

/// Snapshot decoding failure.
#[derive(Debug)]
pub enum SnapshotError {
    Malformed(serde_json::Error),
    DuplicateId(TodoId),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed to-do snapshot: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate to-do id in snapshot: {id}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

/// To-do store error.
#[derive(Debug)]
pub enum TodoError {
    /// Reading or writing the storage backend failed.
    Storage(StorageError),
    /// The stored snapshot could not be decoded (strict loading only).
    CorruptSnapshot { key: String, source: SnapshotError },
    /// The in-memory collection could not be encoded.
    Encode(serde_json::Error),
}

impl Display for TodoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::CorruptSnapshot { key, source } => {
                write!(f, "corrupt snapshot under key `{key}`: {source}")
            }
            Self::Encode(err) => write!(f, "failed to encode to-do snapshot: {err}"),
        }
    }
}

impl Error for TodoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::CorruptSnapshot { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<StorageError> for TodoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Serializes a collection into its persisted JSON form.
pub fn encode_snapshot(todos: &[TodoItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(todos)
}

/// Parses a persisted JSON snapshot, rejecting duplicate ids.
pub fn decode_snapshot(raw: &str) -> Result<Vec<TodoItem>, SnapshotError> {
    let todos: Vec<TodoItem> = serde_json::from_str(raw).map_err(SnapshotError::Malformed)?;
    let mut seen = HashSet::with_capacity(todos.len());
    for todo in &todos {
        if !seen.insert(todo.id) {
            return Err(SnapshotError::DuplicateId(todo.id));
        }
    }
    Ok(todos)
}

/// Observable to-do collection persisted to a [`KeyValueStore`].
///
/// All operations take `&self`, so one instance can be built at startup and
/// shared by reference with every consumer.
pub struct TodoStore<S: KeyValueStore, C: Clock = SystemClock> {
    todos: Observable<Vec<TodoItem>>,
    storage: S,
    clock: C,
    key: String,
}

impl<S: KeyValueStore> TodoStore<S, SystemClock> {
    /// Opens the store, rehydrating from `storage`.
    pub fn open(storage: S, options: TodoStoreOptions) -> TodoResult<Self> {
        Self::open_with_clock(storage, options, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> TodoStore<S, C> {
    /// Opens the store with a caller-provided clock.
    ///
    /// # Errors
    /// - `TodoError::Storage` when the backend read fails.
    /// - `TodoError::CorruptSnapshot` when the snapshot is unreadable and
    ///   `options.load_policy` is `Strict`.
    pub fn open_with_clock(storage: S, options: TodoStoreOptions, clock: C) -> TodoResult<Self> {
        let initial = load_initial(&storage, &options)?;
        Ok(Self {
            todos: Observable::new(initial),
            storage,
            clock,
            key: options.key,
        })
    }

    /// Appends a new open item and returns its id.
    pub fn add_todo(&self, text: impl Into<String>) -> TodoResult<TodoId> {
        let item = TodoItem::new(text, self.clock.now_ms());
        let id = item.id;
        self.commit(|todos| todos.push(item))?;
        debug!("event=todo_add module=todo_store status=ok id={id}");
        Ok(id)
    }

    /// Removes the item with `id`. Returns whether an item was removed.
    pub fn delete_todo(&self, id: TodoId) -> TodoResult<bool> {
        let removed = self.commit(|todos| {
            let before = todos.len();
            todos.retain(|todo| todo.id != id);
            todos.len() != before
        })?;
        debug!("event=todo_delete module=todo_store status=ok id={id} found={removed}");
        Ok(removed)
    }

    /// Toggles the first item with `id`. Returns its new flag, or `None`
    /// when no item matches.
    pub fn complete_todo(&self, id: TodoId) -> TodoResult<Option<bool>> {
        let toggled = self.commit(|todos| {
            todos
                .iter_mut()
                .find(|todo| todo.id == id)
                .map(TodoItem::toggle)
        })?;
        debug!(
            "event=todo_complete module=todo_store status=ok id={id} found={}",
            toggled.is_some()
        );
        Ok(toggled)
    }

    /// Subscribes to the collection; `callback` runs immediately and after
    /// every mutation.
    pub fn subscribe(&self, callback: impl FnMut(&Vec<TodoItem>) + 'static) -> Subscription {
        self.todos.subscribe(callback)
    }

    /// Returns a snapshot of the current collection.
    pub fn todos(&self) -> Vec<TodoItem> {
        self.todos.get()
    }

    pub fn get(&self, id: TodoId) -> Option<TodoItem> {
        self.todos
            .with(|todos| todos.iter().find(|todo| todo.id == id).cloned())
    }

    pub fn len(&self) -> usize {
        self.todos.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.todos.with(Vec::is_empty)
    }

    /// Storage key this store writes to.
    pub fn key(&self) -> &str {
        &self.key
    }

    fn commit<R>(&self, mutate: impl FnOnce(&mut Vec<TodoItem>) -> R) -> TodoResult<R> {
        let result = self.todos.update(mutate);
        self.persist()?;
        Ok(result)
    }

    fn persist(&self) -> TodoResult<()> {
        let (snapshot, count) = self
            .todos
            .with(|todos| encode_snapshot(todos).map(|snapshot| (snapshot, todos.len())))
            .map_err(TodoError::Encode)?;

        if let Err(err) = self.storage.set_item(&self.key, &snapshot) {
            error!(
                "event=todo_persist module=todo_store status=error key={} error={err}",
                self.key
            );
            return Err(err.into());
        }

        debug!(
            "event=todo_persist module=todo_store status=ok key={} count={count} bytes={}",
            self.key,
            snapshot.len()
        );
        Ok(())
    }
}

fn load_initial<S: KeyValueStore>(
    storage: &S,
    options: &TodoStoreOptions,
) -> TodoResult<Vec<TodoItem>> {
    let Some(raw) = storage.get_item(&options.key)? else {
        info!(
            "event=todo_store_load module=todo_store status=empty key={}",
            options.key
        );
        return Ok(Vec::new());
    };

    match decode_snapshot(&raw) {
        Ok(todos) => {
            info!(
                "event=todo_store_load module=todo_store status=ok key={} count={}",
                options.key,
                todos.len()
            );
            Ok(todos)
        }
        Err(err) => match options.load_policy {
            LoadPolicy::Recover => {
                warn!(
                    "event=todo_store_load module=todo_store status=recovered key={} error={err}",
                    options.key
                );
                Ok(Vec::new())
            }
            LoadPolicy::Strict => {
                error!(
                    "event=todo_store_load module=todo_store status=error key={} error={err}",
                    options.key
                );
                Err(TodoError::CorruptSnapshot {
                    key: options.key.clone(),
                    source: err,
                })
            }
        },
    }
}
