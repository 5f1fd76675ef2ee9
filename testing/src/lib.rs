//! # Todo Store Testing
//!
//! Testing utilities and helpers for the todo store.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`assertions`]: Effect assertion helpers
//! - [`mocks::StateRecorder`]: Captures every state a store publishes
//!
//! ## Example
//!
//! ```ignore
//! use todo_store_testing::StateRecorder;
//!
//! let store = TodoStore::new(TodoEnvironment::default());
//! let (recorder, _subscription) = StateRecorder::attach(store.runtime());
//!
//! store.set_new_todo("milk")?;
//! store.add_todos()?;
//!
//! assert_eq!(recorder.len(), 2);
//! ```


/// Mock collaborators for store tests
pub mod mocks {
    use std::sync::{Arc, Mutex, PoisonError};
    use todo_store_core::reducer::Reducer;
    use todo_store_runtime::{Store, Subscription};

    /// Records every state object a store publishes
    ///
    /// Clones share the same recording.
    #[derive(Debug)]
    pub struct StateRecorder<S> {
        states: Arc<Mutex<Vec<Arc<S>>>>,
    }

    impl<S> Clone for StateRecorder<S> {
        fn clone(&self) -> Self {
            Self {
                states: Arc::clone(&self.states),
            }
        }
    }

    impl<S> Default for StateRecorder<S> {
        fn default() -> Self {
            Self {
                states: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl<S> StateRecorder<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        /// Register a recorder as a listener on `store`
        ///
        /// Recording stops when the returned subscription is dropped.
        #[must_use]
        pub fn attach<A, E, R>(store: &Store<S, A, E, R>) -> (Self, Subscription)
        where
            R: Reducer<State = S, Action = A, Environment = E>,
            A: Clone,
        {
            let recorder = Self::default();
            let sink = recorder.clone();
            let subscription = store.listen(move |state| sink.record(state));
            (recorder, subscription)
        }

        /// Append a published state
        pub fn record(&self, state: &Arc<S>) {
            self.lock().push(Arc::clone(state));
        }

        /// Number of states recorded
        #[must_use]
        pub fn len(&self) -> usize {
            self.lock().len()
        }

        /// Whether nothing has been recorded
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.lock().is_empty()
        }

        /// All recorded states, oldest first
        #[must_use]
        pub fn states(&self) -> Vec<Arc<S>> {
            self.lock().clone()
        }

        /// The most recently recorded state
        #[must_use]
        pub fn last(&self) -> Option<Arc<S>> {
            self.lock().last().cloned()
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Arc<S>>> {
            self.states.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}

// Re-export commonly used items
pub use mocks::StateRecorder;
pub use reducer_test::{ReducerTest, assertions};
