//! Reducer logic for the todo store.
//!
//! Every list change goes through the pure functions in [`crate::list`];
//! the reducer only decides which one to call and swaps the result into the
//! state copy it was handed.

use crate::list::{add_todo, remove_todo, toggle_todo, update_todo};
use crate::source::{InMemorySource, TodoSource};
use crate::types::{TodoAction, TodoId, TodoState};
use std::sync::Arc;
use todo_store_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Where `TodoAction::Fetch` reads the list from
    pub source: Arc<dyn TodoSource>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(source: Arc<dyn TodoSource>) -> Self {
        Self { source }
    }

    /// Creates an environment that owns `source`
    #[must_use]
    pub fn with_source<S: TodoSource + 'static>(source: S) -> Self {
        Self::new(Arc::new(source))
    }
}

impl Default for TodoEnvironment {
    /// An environment whose source yields an empty list
    fn default() -> Self {
        Self::with_source(InMemorySource::default())
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the todo store
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Logs when `id` matches nothing; the operation then leaves the list as is
    fn note_missing(state: &TodoState, id: TodoId, operation: &'static str) {
        if !state.contains(id) {
            tracing::debug!(%id, operation, "No todo with this id, list unchanged");
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::Load { todos } => {
                tracing::debug!(count = todos.len(), "Loading todos");
                state.todos = todos;
                state.last_error = None;
            },

            TodoAction::SetNewTodo { text } => {
                state.new_todo = text;
            },

            TodoAction::AddTodos => {
                let text = std::mem::take(&mut state.new_todo);
                state.todos = add_todo(&state.todos, text);
            },

            TodoAction::Update { id, text } => {
                Self::note_missing(state, id, "update");
                state.todos = update_todo(&state.todos, id, &text);
            },

            TodoAction::Toggle { id } => {
                Self::note_missing(state, id, "toggle");
                state.todos = toggle_todo(&state.todos, id);
            },

            TodoAction::Remove { id } => {
                Self::note_missing(state, id, "remove");
                state.todos = remove_todo(&state.todos, id);
            },

            TodoAction::Fetch => {
                let source = Arc::clone(&env.source);
                return smallvec![Effect::run(move || {
                    Some(match source.fetch() {
                        Ok(todos) => TodoAction::Load { todos },
                        Err(error) => TodoAction::FetchFailed {
                            error: error.to_string(),
                        },
                    })
                })];
            },

            TodoAction::FetchFailed { error } => {
                tracing::warn!(%error, "Fetching todos failed, keeping current list");
                state.last_error = Some(error);
            },
        }

        smallvec![Effect::None]
    }
}
