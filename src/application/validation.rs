use std::ops::RangeInclusive;

use thiserror::Error;

use crate::domain::list::TodoList;

const NAME_LENGTH: RangeInclusive<usize> = 1..=100;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("List name must be unique.")]
    ListNotUnique,
    #[error("List name must be between 1 and 100 characters.")]
    ListLength,
    #[error("Todo name must be between 1 and 100 characters.")]
    TodoLength,
}

/// Expects an already trimmed name. Uniqueness is exact and case-sensitive.
pub fn validate_list_name(name: &str, existing: &[TodoList]) -> Result<(), NameError> {
    if existing.iter().any(|list| list.name == name) {
        return Err(NameError::ListNotUnique);
    }
    if !NAME_LENGTH.contains(&name.chars().count()) {
        return Err(NameError::ListLength);
    }
    Ok(())
}

pub fn validate_todo_name(name: &str) -> Result<(), NameError> {
    if !NAME_LENGTH.contains(&name.chars().count()) {
        return Err(NameError::TodoLength);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::list::ListId;

    fn existing(names: &[&str]) -> Vec<TodoList> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| TodoList { id: ListId(i as i64 + 1), name: n.to_string(), todos: vec![] })
            .collect()
    }

    #[test]
    fn accepts_fresh_names_at_both_bounds() {
        let lists = existing(&["Home"]);
        assert_eq!(validate_list_name("W", &lists), Ok(()));
        assert_eq!(validate_list_name(&"x".repeat(100), &lists), Ok(()));
    }

    #[test]
    fn rejects_taken_name_case_sensitively() {
        let lists = existing(&["Home"]);
        assert_eq!(validate_list_name("Home", &lists), Err(NameError::ListNotUnique));
        assert_eq!(validate_list_name("home", &lists), Ok(()));
    }

    #[test]
    fn rejects_empty_and_overlong_list_names() {
        assert_eq!(validate_list_name("", &[]), Err(NameError::ListLength));
        assert_eq!(validate_list_name(&"x".repeat(101), &[]), Err(NameError::ListLength));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert_eq!(validate_todo_name(&"é".repeat(100)), Ok(()));
        assert_eq!(validate_todo_name(&"é".repeat(101)), Err(NameError::TodoLength));
    }

    #[test]
    fn todo_messages_match_what_users_see() {
        assert_eq!(validate_todo_name("").unwrap_err().to_string(), "Todo name must be between 1 and 100 characters.");
        assert_eq!(NameError::ListNotUnique.to_string(), "List name must be unique.");
    }
}
