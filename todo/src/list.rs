//! Pure transformations over a todo list.
//!
//! Each function borrows the current list and returns a new one; the input
//! is never modified, so anyone still holding the old list sees it unchanged.
//! An id that matches no item leaves the list as it was.

use crate::types::{Todo, TodoId};

/// The id [`add_todo`] would assign: one above the largest id, or 1 for an empty list
///
/// Returns `None` once the largest id is `u64::MAX`.
#[must_use]
pub fn next_id(todos: &[Todo]) -> Option<TodoId> {
    let max = todos.iter().map(|todo| todo.id.get()).max().unwrap_or(0);
    max.checked_add(1).map(TodoId::new)
}

/// Appends an open item with a fresh id
///
/// Any text is accepted, including empty text and text already in the list.
/// When the id space is used up the list is returned unchanged.
#[must_use]
pub fn add_todo(todos: &[Todo], text: impl Into<String>) -> Vec<Todo> {
    let Some(id) = next_id(todos) else {
        tracing::warn!(
            count = todos.len(),
            "No todo id left above the largest one, item not added"
        );
        return todos.to_vec();
    };

    let mut next = Vec::with_capacity(todos.len() + 1);
    next.extend_from_slice(todos);
    next.push(Todo::new(id, text));
    next
}

/// Replaces the text of the item with `id`
#[must_use]
pub fn update_todo(todos: &[Todo], id: TodoId, text: &str) -> Vec<Todo> {
    todos
        .iter()
        .map(|todo| {
            let mut todo = todo.clone();
            if todo.id == id {
                text.clone_into(&mut todo.text);
            }
            todo
        })
        .collect()
}

/// Flips the done flag of the item with `id`
#[must_use]
pub fn toggle_todo(todos: &[Todo], id: TodoId) -> Vec<Todo> {
    todos
        .iter()
        .map(|todo| {
            let mut todo = todo.clone();
            if todo.id == id {
                todo.done = !todo.done;
            }
            todo
        })
        .collect()
}

/// Drops the item with `id`
#[must_use]
pub fn remove_todo(todos: &[Todo], id: TodoId) -> Vec<Todo> {
    todos.iter().filter(|todo| todo.id != id).cloned().collect()
}
