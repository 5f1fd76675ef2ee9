//! Property tests for the pure list functions.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use proptest::sample::Index;
use todo_store::{Todo, TodoId, add_todo, next_id, remove_todo, toggle_todo, update_todo};

/// Lists with unique ids in arbitrary order
fn todo_list() -> impl Strategy<Value = Vec<Todo>> {
    prop::collection::btree_set(1_u64..10_000, 0..24)
        .prop_flat_map(|ids| {
            let len = ids.len();
            (
                Just(ids.into_iter().collect::<Vec<_>>()),
                prop::collection::vec(("[a-z ]{0,12}", any::<bool>()), len),
            )
        })
        .prop_map(|(ids, fields)| {
            ids.into_iter()
                .zip(fields)
                .map(|(id, (text, done))| Todo::new(TodoId::new(id), text).with_done(done))
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

/// A list together with the id of one of its items
fn list_with_member() -> impl Strategy<Value = (Vec<Todo>, TodoId)> {
    (todo_list().prop_filter("needs an item", |todos| !todos.is_empty()), any::<Index>())
        .prop_map(|(todos, index)| {
            let id = index.get(&todos).id;
            (todos, id)
        })
}

/// An id that is not in the list
fn absent_id(todos: &[Todo]) -> TodoId {
    next_id(todos).unwrap()
}

proptest! {
    #[test]
    fn add_appends_one_fresh_open_item(todos in todo_list(), text in ".{0,16}") {
        let original = todos.clone();
        let next = add_todo(&todos, text.clone());

        prop_assert_eq!(&todos, &original);
        prop_assert_eq!(next.len(), todos.len() + 1);
        prop_assert_eq!(&next[..todos.len()], &todos[..]);

        let added = next.last().unwrap();
        prop_assert!(todos.iter().all(|todo| todo.id < added.id));
        prop_assert_eq!(&added.text, &text);
        prop_assert!(!added.done);
    }

    #[test]
    fn update_changes_only_target_text((todos, id) in list_with_member(), text in ".{0,16}") {
        let next = update_todo(&todos, id, &text);

        prop_assert_eq!(next.len(), todos.len());
        for (before, after) in todos.iter().zip(&next) {
            prop_assert_eq!(before.id, after.id);
            prop_assert_eq!(before.done, after.done);
            if before.id == id {
                prop_assert_eq!(&after.text, &text);
            } else {
                prop_assert_eq!(&after.text, &before.text);
            }
        }
    }

    #[test]
    fn update_absent_id_is_noop(todos in todo_list(), text in ".{0,16}") {
        prop_assert_eq!(update_todo(&todos, absent_id(&todos), &text), todos);
    }

    #[test]
    fn toggle_flips_only_target((todos, id) in list_with_member()) {
        let next = toggle_todo(&todos, id);

        for (before, after) in todos.iter().zip(&next) {
            prop_assert_eq!(before.id, after.id);
            prop_assert_eq!(&before.text, &after.text);
            prop_assert_eq!(after.done, before.done != (before.id == id));
        }
    }

    #[test]
    fn toggle_twice_is_identity(todos in todo_list(), raw_id in 0_u64..10_001) {
        let id = TodoId::new(raw_id);
        prop_assert_eq!(toggle_todo(&toggle_todo(&todos, id), id), todos);
    }

    #[test]
    fn remove_present_id_shrinks_by_one((todos, id) in list_with_member()) {
        let next = remove_todo(&todos, id);

        prop_assert_eq!(next.len(), todos.len() - 1);
        prop_assert!(next.iter().all(|todo| todo.id != id));
        let kept: Vec<&Todo> = todos.iter().filter(|todo| todo.id != id).collect();
        prop_assert_eq!(next.iter().collect::<Vec<_>>(), kept);
    }

    #[test]
    fn remove_absent_id_is_noop(todos in todo_list()) {
        prop_assert_eq!(remove_todo(&todos, absent_id(&todos)), todos);
    }

    #[test]
    fn ids_stay_unique_across_mixed_operations(
        todos in todo_list(),
        ops in prop::collection::vec((0_u8..4, 0_u64..10_050), 0..32),
    ) {
        let mut todos = todos;
        for (op, raw_id) in ops {
            let id = TodoId::new(raw_id);
            todos = match op {
                0 => add_todo(&todos, "new"),
                1 => update_todo(&todos, id, "changed"),
                2 => toggle_todo(&todos, id),
                _ => remove_todo(&todos, id),
            };
        }

        let mut ids: Vec<TodoId> = todos.iter().map(|todo| todo.id).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), todos.len());
    }
}
