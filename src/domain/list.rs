use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ListId(pub i64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TodoId(pub i64);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub name: String,
    pub completed: bool,
}

/// A named list together with its todos, in the order the store returned them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoList {
    pub id: ListId,
    pub name: String,
    pub todos: Vec<Todo>,
}

impl TodoList {
    pub fn todos_count(&self) -> usize { self.todos.len() }

    pub fn todos_remaining_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    /// A list is complete when it has todos and none of them are open.
    pub fn is_complete(&self) -> bool {
        self.todos_count() > 0 && self.todos_remaining_count() == 0
    }
}

/// Incomplete todos first, then completed ones. Relative order inside each
/// group is preserved; the list itself is left untouched.
pub fn sort_todos(todos: &[Todo]) -> Vec<&Todo> {
    let (complete, incomplete): (Vec<&Todo>, Vec<&Todo>) = todos.iter().partition(|t| t.completed);
    incomplete.into_iter().chain(complete).collect()
}

/// Same ordering as [`sort_todos`], keyed on list completeness.
pub fn sort_lists(lists: &[TodoList]) -> Vec<&TodoList> {
    let (complete, incomplete): (Vec<&TodoList>, Vec<&TodoList>) = lists.iter().partition(|l| l.is_complete());
    incomplete.into_iter().chain(complete).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: i64, completed: bool) -> Todo {
        Todo { id: TodoId(id), name: format!("todo {id}"), completed }
    }

    fn list(id: i64, todos: Vec<Todo>) -> TodoList {
        TodoList { id: ListId(id), name: format!("list {id}"), todos }
    }

    #[test]
    fn empty_list_is_not_complete() {
        let l = list(1, vec![]);
        assert_eq!(l.todos_count(), 0);
        assert_eq!(l.todos_remaining_count(), 0);
        assert!(!l.is_complete());
    }

    #[test]
    fn list_complete_only_when_every_todo_done() {
        let partial = list(1, vec![todo(1, true), todo(2, false)]);
        assert_eq!(partial.todos_remaining_count(), 1);
        assert!(!partial.is_complete());

        let done = list(2, vec![todo(1, true), todo(2, true)]);
        assert!(done.is_complete());
    }

    #[test]
    fn sort_todos_puts_incomplete_first_and_keeps_storage_order() {
        let todos = vec![todo(1, true), todo(2, false), todo(3, true), todo(4, false)];
        let ids: Vec<i64> = sort_todos(&todos).iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
        let original: Vec<i64> = todos.iter().map(|t| t.id.0).collect();
        assert_eq!(original, vec![1, 2, 3, 4]);
    }

    #[test]
    fn sort_lists_puts_complete_lists_last() {
        let lists = vec![
            list(1, vec![todo(1, true)]),
            list(2, vec![]),
            list(3, vec![todo(2, false)]),
        ];
        let ids: Vec<i64> = sort_lists(&lists).iter().map(|l| l.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
