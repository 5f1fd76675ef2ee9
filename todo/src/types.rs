//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of items, each with a numeric id,
//! some text and a done flag, plus a draft text used to stage the next item.

use serde::{Deserialize, Serialize};

/// Unique identifier for a todo item within a list
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// What needs doing
    pub text: String,
    /// Whether the item is completed
    pub done: bool,
}

impl Todo {
    /// Creates an open todo item
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            done: false,
        }
    }

    /// Returns the item with its done flag set to `done`
    #[must_use]
    pub const fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }
}

/// State held by the todo store
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    /// All todos in insertion order
    pub todos: Vec<Todo>,
    /// Draft text for the next item
    pub new_todo: String,
    /// Message from the last failed fetch, cleared by the next load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl TodoState {
    /// Creates an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state holding `todos` and an empty draft
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos,
            ..Self::default()
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.done).count()
    }

    /// Returns the number of open todos
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.count() - self.completed_count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn contains(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }
}

/// Everything that can happen to the todo store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// Replace the whole list
    Load {
        /// The new list
        todos: Vec<Todo>,
    },

    /// Change the draft text
    SetNewTodo {
        /// New draft
        text: String,
    },

    /// Append the draft as a new item and clear the draft
    AddTodos,

    /// Replace the text of an item
    Update {
        /// Item to change
        id: TodoId,
        /// Replacement text
        text: String,
    },

    /// Flip the done flag of an item
    Toggle {
        /// Item to flip
        id: TodoId,
    },

    /// Drop an item from the list
    Remove {
        /// Item to drop
        id: TodoId,
    },

    /// Load the list from the environment's source
    Fetch,

    /// The source could not provide a list
    FetchFailed {
        /// Error message
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: u64, text: &str) -> Todo {
        Todo::new(TodoId::new(id), text)
    }

    #[test]
    fn todo_id_display() {
        assert_eq!(TodoId::new(42).to_string(), "42");
    }

    #[test]
    fn todo_new_is_open() {
        let todo = todo(1, "Buy milk");
        assert_eq!(todo.id, TodoId::new(1));
        assert_eq!(todo.text, "Buy milk");
        assert!(!todo.done);
        assert!(todo.with_done(true).done);
    }

    #[test]
    fn todo_json_shape() {
        let json = serde_json::to_value(todo(3, "c")).unwrap_or_default();
        assert_eq!(json, serde_json::json!({ "id": 3, "text": "c", "done": false }));
    }

    #[test]
    fn todo_state_counts() {
        let state = TodoState::with_todos(vec![
            todo(1, "a"),
            todo(2, "b").with_done(true),
            todo(5, "c"),
        ]);

        assert_eq!(state.count(), 3);
        assert_eq!(state.completed_count(), 1);
        assert_eq!(state.remaining_count(), 2);
        assert!(state.contains(TodoId::new(5)));
        assert!(!state.contains(TodoId::new(3)));
        assert_eq!(state.get(TodoId::new(2)).map(|t| t.text.as_str()), Some("b"));
    }

    #[test]
    fn todo_state_without_error_omits_field() {
        let json = serde_json::to_value(TodoState::new()).unwrap_or_default();
        assert_eq!(json, serde_json::json!({ "todos": [], "new_todo": "" }));
    }
}
