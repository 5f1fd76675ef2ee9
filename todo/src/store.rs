//! The todo store handle.
//!
//! `TodoStore` wraps the generic runtime [`Store`] with one method per
//! operation. Applications create it, keep it, and hand clones to whatever
//! needs to read or change the list.

use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{Todo, TodoAction, TodoId, TodoState};
use std::sync::Arc;
use todo_store_runtime::{Store, StoreConfig, StoreError, Subscription};
use tokio::sync::{broadcast, watch};

/// The runtime store specialised to todos
pub type TodoRuntime = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Handle to a todo list and its draft text
///
/// Every mutator applies its change and notifies all subscribers before it
/// returns. Clones share the same list.
///
/// # Errors
///
/// Mutators return the runtime's [`StoreError`]. None of the todo actions
/// produce effect feedback loops, so with a sane [`StoreConfig`] they always
/// succeed; an id that matches nothing is a silent no-op.
#[derive(Clone)]
pub struct TodoStore {
    runtime: TodoRuntime,
}

impl TodoStore {
    /// An empty store
    #[must_use]
    pub fn new(environment: TodoEnvironment) -> Self {
        Self::with_state(TodoState::new(), environment, StoreConfig::default())
    }

    /// A store starting from `state`
    #[must_use]
    pub fn with_state(state: TodoState, environment: TodoEnvironment, config: StoreConfig) -> Self {
        Self {
            runtime: Store::with_config(state, TodoReducer::new(), environment, config),
        }
    }

    /// The underlying runtime store
    #[must_use]
    pub const fn runtime(&self) -> &TodoRuntime {
        &self.runtime
    }

    /// Replace the list wholesale
    ///
    /// # Errors
    ///
    /// See [`TodoStore`].
    pub fn load(&self, todos: Vec<Todo>) -> Result<(), StoreError> {
        self.runtime.send(TodoAction::Load { todos })
    }

    /// Load the list from the environment's source
    ///
    /// A failed read leaves the list alone and sets `last_error`.
    ///
    /// # Errors
    ///
    /// See [`TodoStore`].
    pub fn fetch(&self) -> Result<(), StoreError> {
        self.runtime.send(TodoAction::Fetch)
    }

    /// Change the draft text
    ///
    /// # Errors
    ///
    /// See [`TodoStore`].
    pub fn set_new_todo(&self, text: impl Into<String>) -> Result<(), StoreError> {
        self.runtime.send(TodoAction::SetNewTodo { text: text.into() })
    }

    /// Append the draft as a new item and clear the draft
    ///
    /// # Errors
    ///
    /// See [`TodoStore`].
    pub fn add_todos(&self) -> Result<(), StoreError> {
        self.runtime.send(TodoAction::AddTodos)
    }

    /// Replace the text of item `id`
    ///
    /// # Errors
    ///
    /// See [`TodoStore`].
    pub fn update(&self, id: TodoId, text: impl Into<String>) -> Result<(), StoreError> {
        self.runtime.send(TodoAction::Update {
            id,
            text: text.into(),
        })
    }

    /// Flip the done flag of item `id`
    ///
    /// # Errors
    ///
    /// See [`TodoStore`].
    pub fn toggle(&self, id: TodoId) -> Result<(), StoreError> {
        self.runtime.send(TodoAction::Toggle { id })
    }

    /// Drop item `id`
    ///
    /// # Errors
    ///
    /// See [`TodoStore`].
    pub fn remove(&self, id: TodoId) -> Result<(), StoreError> {
        self.runtime.send(TodoAction::Remove { id })
    }

    /// The current list
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.runtime.state(|s| s.todos.clone())
    }

    /// The current draft text
    #[must_use]
    pub fn new_todo(&self) -> String {
        self.runtime.state(|s| s.new_todo.clone())
    }

    /// The message from the last failed fetch, if any
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.runtime.state(|s| s.last_error.clone())
    }

    /// The current state object
    #[must_use]
    pub fn snapshot(&self) -> Arc<TodoState> {
        self.runtime.snapshot()
    }

    /// Watch published states
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<TodoState>> {
        self.runtime.subscribe()
    }

    /// Call `listener` with every new state until the subscription is dropped
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn listen<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Arc<TodoState>) + Send + Sync + 'static,
    {
        self.runtime.listen(listener)
    }

    /// Observe every action the store processes
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<TodoAction> {
        self.runtime.subscribe_actions()
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new(TodoEnvironment::default())
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;

    fn todo(id: u64, text: &str) -> Todo {
        Todo::new(TodoId::new(id), text)
    }

    #[test]
    fn starts_empty() {
        let store = TodoStore::default();
        assert!(store.todos().is_empty());
        assert!(store.new_todo().is_empty());
        assert!(store.last_error().is_none());
    }

    #[test]
    fn draft_then_add() {
        let store = TodoStore::default();
        store.set_new_todo("x").unwrap();
        assert_eq!(store.new_todo(), "x");

        store.add_todos().unwrap();
        assert_eq!(store.todos(), vec![todo(1, "x")]);
        assert!(store.new_todo().is_empty());
    }

    #[test]
    fn load_then_edit() {
        let store = TodoStore::default();
        store.load(vec![todo(1, "a"), todo(2, "b")]).unwrap();
        store.update(TodoId::new(2), "bb").unwrap();
        store.toggle(TodoId::new(1)).unwrap();
        store.remove(TodoId::new(9)).unwrap();

        assert_eq!(store.todos(), vec![todo(1, "a").with_done(true), todo(2, "bb")]);
    }

    #[test]
    fn fetch_from_source() {
        let source = InMemorySource::new(vec![todo(4, "d")]);
        let store = TodoStore::new(TodoEnvironment::with_source(source));
        store.fetch().unwrap();
        assert_eq!(store.todos(), vec![todo(4, "d")]);
    }

    #[test]
    fn with_state_keeps_given_state() {
        let mut state = TodoState::with_todos(vec![todo(3, "c")]);
        state.new_todo = "draft".to_string();

        let store =
            TodoStore::with_state(state, TodoEnvironment::default(), StoreConfig::default());
        assert_eq!(store.todos(), vec![todo(3, "c")]);
        assert_eq!(store.new_todo(), "draft");
    }

    #[test]
    fn debug_shows_state() {
        let store = TodoStore::default();
        assert!(format!("{store:?}").starts_with("TodoStore { state: TodoState"));
    }
}
