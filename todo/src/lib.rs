//! Todo list state container.
//!
//! A todo list is a sequence of items that can be added, edited, toggled and
//! removed, plus a draft text staged for the next item. The crate is split the
//! same way the data flows:
//!
//! - [`list`]: pure functions from an old list to a new one
//! - [`reducer`]: maps each [`TodoAction`] onto those functions
//! - [`store`]: [`TodoStore`], the handle applications hold and subscribe to
//! - [`source`]: where a store can load its initial list from
//!
//! # Quick Start
//!
//! ```
//! use todo_store::{TodoId, TodoStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = TodoStore::default();
//! let _subscription = store.listen(|state| println!("{} todos", state.count()));
//!
//! store.set_new_todo("Buy milk")?;
//! store.add_todos()?;
//! store.toggle(TodoId::new(1))?;
//!
//! let state = store.snapshot();
//! assert_eq!(state.completed_count(), 1);
//! assert!(state.new_todo.is_empty());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod list;
pub mod reducer;
pub mod source;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use list::{add_todo, next_id, remove_todo, toggle_todo, update_todo};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use source::{InMemorySource, JsonFileSource, SourceError, TodoSource};
pub use store::{TodoRuntime, TodoStore};
pub use types::{Todo, TodoAction, TodoId, TodoState};
