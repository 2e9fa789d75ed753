use async_trait::async_trait;
use thiserror::Error;

use super::list::{ListId, TodoId, TodoList};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("a list with this name already exists")]
    DuplicateListName,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait ListRepository: Send + Sync + 'static {
    async fn init(&self) -> RepoResult<()>;
    async fn all_lists(&self) -> RepoResult<Vec<TodoList>>;
    async fn find_list(&self, id: ListId) -> RepoResult<Option<TodoList>>;
    async fn create_list(&self, name: &str) -> RepoResult<()>;
    async fn delete_list(&self, id: ListId) -> RepoResult<()>;
    async fn update_list_name(&self, id: ListId, name: &str) -> RepoResult<()>;
    async fn create_todo(&self, list_id: ListId, name: &str) -> RepoResult<()>;
    /// Scoped by both ids; a todo that belongs to another list is left alone.
    async fn delete_todo(&self, list_id: ListId, todo_id: TodoId) -> RepoResult<()>;
    async fn update_todo_status(&self, list_id: ListId, todo_id: TodoId, completed: bool) -> RepoResult<()>;
    async fn mark_all_todos_completed(&self, list_id: ListId) -> RepoResult<()>;
}
