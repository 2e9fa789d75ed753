use async_trait::async_trait;
use thiserror::Error;

use super::validation::{validate_list_name, validate_todo_name, NameError};
use crate::domain::{
    list::{ListId, TodoId, TodoList},
    repository::{ListRepository, RepoError},
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Invalid(#[from] NameError),
    #[error("The specified list was not found.")]
    NotFound,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<RepoError> for ServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::DuplicateListName => ServiceError::Invalid(NameError::ListNotUnique),
            RepoError::Store(e) => ServiceError::Store(e),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Domain operations behind the HTTP handlers. Names arrive as submitted and
/// are trimmed before validation and storage.
#[async_trait]
pub trait ListService: Send + Sync + 'static {
    async fn all_lists(&self) -> ServiceResult<Vec<TodoList>>;
    /// `NotFound` when no list has this id.
    async fn load_list(&self, id: ListId) -> ServiceResult<TodoList>;
    async fn create_list(&self, name: &str) -> ServiceResult<()>;
    async fn rename_list(&self, id: ListId, name: &str) -> ServiceResult<()>;
    async fn delete_list(&self, id: ListId) -> ServiceResult<()>;
    async fn add_todo(&self, list_id: ListId, name: &str) -> ServiceResult<()>;
    async fn delete_todo(&self, list_id: ListId, todo_id: TodoId) -> ServiceResult<()>;
    async fn set_todo_status(&self, list_id: ListId, todo_id: TodoId, completed: bool) -> ServiceResult<()>;
    async fn complete_all(&self, list_id: ListId) -> ServiceResult<()>;
}

#[derive(Clone)]
pub struct ListServiceImpl<R: ListRepository> {
    repo: R,
}

impl<R: ListRepository> ListServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: ListRepository> ListService for ListServiceImpl<R> {
    async fn all_lists(&self) -> ServiceResult<Vec<TodoList>> { Ok(self.repo.all_lists().await?) }

    async fn load_list(&self, id: ListId) -> ServiceResult<TodoList> {
        self.repo.find_list(id).await?.ok_or(ServiceError::NotFound)
    }

    async fn create_list(&self, name: &str) -> ServiceResult<()> {
        let name = name.trim();
        validate_list_name(name, &self.repo.all_lists().await?)?;
        self.repo.create_list(name).await?;
        tracing::info!(name, "list created");
        Ok(())
    }

    async fn rename_list(&self, id: ListId, name: &str) -> ServiceResult<()> {
        let name = name.trim();
        validate_list_name(name, &self.repo.all_lists().await?)?;
        self.repo.update_list_name(id, name).await?;
        tracing::info!(list_id = id.0, name, "list renamed");
        Ok(())
    }

    async fn delete_list(&self, id: ListId) -> ServiceResult<()> {
        self.repo.delete_list(id).await?;
        tracing::info!(list_id = id.0, "list deleted");
        Ok(())
    }

    async fn add_todo(&self, list_id: ListId, name: &str) -> ServiceResult<()> {
        let name = name.trim();
        validate_todo_name(name)?;
        self.repo.create_todo(list_id, name).await?;
        Ok(())
    }

    async fn delete_todo(&self, list_id: ListId, todo_id: TodoId) -> ServiceResult<()> {
        Ok(self.repo.delete_todo(list_id, todo_id).await?)
    }

    async fn set_todo_status(&self, list_id: ListId, todo_id: TodoId, completed: bool) -> ServiceResult<()> {
        Ok(self.repo.update_todo_status(list_id, todo_id, completed).await?)
    }

    async fn complete_all(&self, list_id: ListId) -> ServiceResult<()> {
        Ok(self.repo.mark_all_todos_completed(list_id).await?)
    }
}
