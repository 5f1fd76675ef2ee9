//! Sources a store can load its list from.

use crate::types::{Todo, TodoId};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading a todo list out of a source
#[derive(Error, Debug)]
pub enum SourceError {
    /// The file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The contents are not a JSON array of todos
    #[error("Invalid todo list JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two items share an id
    #[error("Duplicate todo id {0}")]
    DuplicateId(TodoId),

    /// An item has id 0; ids start at 1
    #[error("Invalid todo id {0}, ids must be positive")]
    InvalidId(TodoId),
}

/// Provider of an initial todo list
///
/// Injected into the reducer through `TodoEnvironment` and consulted on
/// `TodoAction::Fetch`.
pub trait TodoSource: Send + Sync {
    /// Read the full list
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the list cannot be read or its ids are
    /// not unique.
    fn fetch(&self) -> Result<Vec<Todo>, SourceError>;
}

/// Checks that every id is positive and no two items share one
///
/// # Errors
///
/// Returns [`SourceError::InvalidId`] for an id of 0, or
/// [`SourceError::DuplicateId`] with the first repeated id.
pub fn ensure_unique_ids(todos: &[Todo]) -> Result<(), SourceError> {
    let mut seen = HashSet::with_capacity(todos.len());
    for todo in todos {
        if todo.id.get() == 0 {
            return Err(SourceError::InvalidId(todo.id));
        }
        if !seen.insert(todo.id) {
            return Err(SourceError::DuplicateId(todo.id));
        }
    }
    Ok(())
}

/// A fixed list held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    todos: Vec<Todo>,
}

impl InMemorySource {
    /// Serve `todos` on every fetch
    #[must_use]
    pub const fn new(todos: Vec<Todo>) -> Self {
        Self { todos }
    }
}

impl TodoSource for InMemorySource {
    fn fetch(&self) -> Result<Vec<Todo>, SourceError> {
        ensure_unique_ids(&self.todos)?;
        Ok(self.todos.clone())
    }
}

/// A JSON file holding an array of `{ "id", "text", "done" }` objects
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Read from `path` on every fetch
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TodoSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<Todo>, SourceError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let todos: Vec<Todo> = serde_json::from_str(&contents)?;
        ensure_unique_ids(&todos)?;

        tracing::debug!(path = %self.path.display(), count = todos.len(), "Read todos from file");
        Ok(todos)
    }
}
