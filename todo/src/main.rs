//! Command-line demo for the todo store.
//!
//! Loads a list (from the JSON file named by the first argument, or a
//! built-in pair of items), then adds, toggles and removes items while a
//! listener prints every state the store publishes.

use std::sync::Arc;
use todo_store::{
    InMemorySource, JsonFileSource, Todo, TodoEnvironment, TodoId, TodoState, TodoStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_state(state: &Arc<TodoState>) {
    println!(
        "  {} todos, {} done, draft {:?}",
        state.count(),
        state.completed_count(),
        state.new_todo
    );
    for todo in &state.todos {
        let status = if todo.done { "✓" } else { " " };
        println!("    [{status}] #{} {}", todo.id, todo.text);
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_store=debug,todo_store_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Todo Store ===\n");

    let environment = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "Loading todos from file");
            TodoEnvironment::with_source(JsonFileSource::new(path))
        },
        None => TodoEnvironment::with_source(InMemorySource::new(vec![
            Todo::new(TodoId::new(1), "a"),
            Todo::new(TodoId::new(2), "b"),
        ])),
    };

    let store = TodoStore::new(environment);
    let _printer = store.listen(print_state);

    println!(">>> fetch");
    store.fetch()?;
    if let Some(error) = store.last_error() {
        anyhow::bail!("could not load todos: {error}");
    }

    println!("\n>>> set_new_todo(\"c\")");
    store.set_new_todo("c")?;

    println!("\n>>> add_todos()");
    store.add_todos()?;

    println!("\n>>> toggle(2)");
    store.toggle(TodoId::new(2))?;

    println!("\n>>> remove(1)");
    store.remove(TodoId::new(1))?;

    let state = store.snapshot();
    println!(
        "\nFinal: {} todos, {} remaining",
        state.count(),
        state.remaining_count()
    );
    println!("{}", serde_json::to_string_pretty(&state.todos)?);

    Ok(())
}
