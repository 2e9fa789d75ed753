use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};

use crate::domain::{
    list::{ListId, Todo, TodoId, TodoList},
    repository::{ListRepository, RepoError, RepoResult},
};

#[derive(Clone)]
pub struct SqliteListRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteListRepository {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        // Every connection to `:memory:` is its own database, so keep exactly one alive.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    async fn conn(&self) -> RepoResult<PoolConnection<Sqlite>> {
        Ok(self.pool.acquire().await?)
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return RepoError::DuplicateListName;
            }
        }
        RepoError::Store(err.into())
    }
}

#[async_trait]
impl ListRepository for SqliteListRepository {
    async fn init(&self) -> RepoResult<()> {
        let mut conn = self.conn().await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS lists (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )",
        )
        .execute(&mut *conn)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todo (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                list_id INTEGER NOT NULL REFERENCES lists (id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT FALSE
            )",
        )
        .execute(&mut *conn)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS todo_list_id_idx ON todo (list_id)")
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    async fn all_lists(&self) -> RepoResult<Vec<TodoList>> {
        let mut conn = self.conn().await?;
        tracing::debug!("SELECT id, name FROM lists");
        let rows = sqlx::query("SELECT id, name FROM lists ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;

        let mut lists = Vec::with_capacity(rows.len());
        for row in rows {
            let id = ListId(row.try_get("id")?);
            let todos = find_todos_for_list(&mut conn, id).await?;
            lists.push(TodoList { id, name: row.try_get("name")?, todos });
        }
        Ok(lists)
    }

    async fn find_list(&self, id: ListId) -> RepoResult<Option<TodoList>> {
        let mut conn = self.conn().await?;
        tracing::debug!(list_id = id.0, "SELECT id, name FROM lists WHERE id = ?1");
        let row = sqlx::query("SELECT id, name FROM lists WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&mut *conn)
            .await?;
        let Some(row) = row else { return Ok(None) };

        let id = ListId(row.try_get("id")?);
        let todos = find_todos_for_list(&mut conn, id).await?;
        Ok(Some(TodoList { id, name: row.try_get("name")?, todos }))
    }

    async fn create_list(&self, name: &str) -> RepoResult<()> {
        tracing::debug!(name, "INSERT INTO lists");
        sqlx::query("INSERT INTO lists (name) VALUES (?1)")
            .bind(name)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn delete_list(&self, id: ListId) -> RepoResult<()> {
        tracing::debug!(list_id = id.0, "DELETE FROM lists");
        sqlx::query("DELETE FROM lists WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn update_list_name(&self, id: ListId, name: &str) -> RepoResult<()> {
        tracing::debug!(list_id = id.0, name, "UPDATE lists SET name");
        sqlx::query("UPDATE lists SET name = ?1 WHERE id = ?2")
            .bind(name)
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn create_todo(&self, list_id: ListId, name: &str) -> RepoResult<()> {
        tracing::debug!(list_id = list_id.0, name, "INSERT INTO todo");
        sqlx::query("INSERT INTO todo (list_id, name, completed) VALUES (?1, ?2, FALSE)")
            .bind(list_id.0)
            .bind(name)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn delete_todo(&self, list_id: ListId, todo_id: TodoId) -> RepoResult<()> {
        tracing::debug!(list_id = list_id.0, todo_id = todo_id.0, "DELETE FROM todo");
        sqlx::query("DELETE FROM todo WHERE id = ?1 AND list_id = ?2")
            .bind(todo_id.0)
            .bind(list_id.0)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn update_todo_status(&self, list_id: ListId, todo_id: TodoId, completed: bool) -> RepoResult<()> {
        tracing::debug!(list_id = list_id.0, todo_id = todo_id.0, completed, "UPDATE todo SET completed");
        sqlx::query("UPDATE todo SET completed = ?1 WHERE id = ?2 AND list_id = ?3")
            .bind(completed)
            .bind(todo_id.0)
            .bind(list_id.0)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn mark_all_todos_completed(&self, list_id: ListId) -> RepoResult<()> {
        tracing::debug!(list_id = list_id.0, "UPDATE todo SET completed = TRUE");
        sqlx::query("UPDATE todo SET completed = TRUE WHERE list_id = ?1")
            .bind(list_id.0)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }
}

async fn find_todos_for_list(conn: &mut PoolConnection<Sqlite>, list_id: ListId) -> RepoResult<Vec<Todo>> {
    tracing::debug!(list_id = list_id.0, "SELECT id, name, completed FROM todo WHERE list_id = ?1");
    let rows = sqlx::query("SELECT id, name, completed FROM todo WHERE list_id = ?1 ORDER BY id")
        .bind(list_id.0)
        .fetch_all(&mut **conn)
        .await?;
    rows.into_iter().map(row_to_todo).collect()
}

fn row_to_todo(row: SqliteRow) -> RepoResult<Todo> {
    let completed = match row.try_get::<bool, _>("completed") {
        Ok(flag) => flag,
        // rows written with the old "t"/"f" text convention
        Err(_) => is_truthy_flag(&row.try_get::<String, _>("completed")?),
    };
    Ok(Todo { id: TodoId(row.try_get("id")?), name: row.try_get("name")?, completed })
}

fn is_truthy_flag(flag: &str) -> bool { flag == "t" }

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> SqliteListRepository {
        let repo = SqliteListRepository::connect("sqlite::memory:").await.unwrap();
        repo.init().await.unwrap();
        repo
    }

    async fn list_named(repo: &SqliteListRepository, name: &str) -> TodoList {
        repo.all_lists().await.unwrap().into_iter().find(|l| l.name == name).unwrap()
    }

    #[test]
    fn only_exact_t_is_truthy() {
        assert!(is_truthy_flag("t"));
        assert!(!is_truthy_flag("f"));
        assert!(!is_truthy_flag("true"));
        assert!(!is_truthy_flag("T"));
    }

    #[tokio::test]
    async fn created_list_starts_empty() {
        let repo = repo().await;
        repo.create_list("Groceries").await.unwrap();
        let lists = repo.all_lists().await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name, "Groceries");
        assert!(lists[0].todos.is_empty());
    }

    #[tokio::test]
    async fn find_list_returns_none_for_unknown_id() {
        let repo = repo().await;
        assert!(repo.find_list(ListId(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn todo_round_trip_through_find_list() {
        let repo = repo().await;
        repo.create_list("Groceries").await.unwrap();
        let list = list_named(&repo, "Groceries").await;
        repo.create_todo(list.id, "Milk").await.unwrap();

        let found = repo.find_list(list.id).await.unwrap().unwrap();
        assert_eq!(found.todos.len(), 1);
        assert_eq!(found.todos[0].name, "Milk");
        assert!(!found.todos[0].completed);
    }

    #[tokio::test]
    async fn todos_come_back_in_insertion_order() {
        let repo = repo().await;
        repo.create_list("Chores").await.unwrap();
        let list = list_named(&repo, "Chores").await;
        for name in ["sweep", "mop", "dust"] {
            repo.create_todo(list.id, name).await.unwrap();
        }
        let names: Vec<String> = repo.find_list(list.id).await.unwrap().unwrap().todos.into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["sweep", "mop", "dust"]);
    }

    #[tokio::test]
    async fn duplicate_name_hits_unique_constraint() {
        let repo = repo().await;
        repo.create_list("Work").await.unwrap();
        let err = repo.create_list("Work").await.unwrap_err();
        assert!(matches!(err, RepoError::DuplicateListName));
        assert_eq!(repo.all_lists().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rename_list_updates_name() {
        let repo = repo().await;
        repo.create_list("Old").await.unwrap();
        let list = list_named(&repo, "Old").await;
        repo.update_list_name(list.id, "New").await.unwrap();
        assert_eq!(repo.find_list(list.id).await.unwrap().unwrap().name, "New");
    }

    #[tokio::test]
    async fn delete_todo_with_wrong_list_is_noop() {
        let repo = repo().await;
        repo.create_list("A").await.unwrap();
        repo.create_list("B").await.unwrap();
        let a = list_named(&repo, "A").await;
        let b = list_named(&repo, "B").await;
        repo.create_todo(a.id, "keep me").await.unwrap();
        let todo_id = repo.find_list(a.id).await.unwrap().unwrap().todos[0].id;

        repo.delete_todo(b.id, todo_id).await.unwrap();
        assert_eq!(repo.find_list(a.id).await.unwrap().unwrap().todos.len(), 1);

        repo.delete_todo(a.id, todo_id).await.unwrap();
        assert!(repo.find_list(a.id).await.unwrap().unwrap().todos.is_empty());
    }

    #[tokio::test]
    async fn update_status_toggles_single_todo() {
        let repo = repo().await;
        repo.create_list("L").await.unwrap();
        let list = list_named(&repo, "L").await;
        repo.create_todo(list.id, "one").await.unwrap();
        repo.create_todo(list.id, "two").await.unwrap();
        let first = repo.find_list(list.id).await.unwrap().unwrap().todos[0].id;

        repo.update_todo_status(list.id, first, true).await.unwrap();
        let todos = repo.find_list(list.id).await.unwrap().unwrap().todos;
        assert!(todos[0].completed);
        assert!(!todos[1].completed);

        repo.update_todo_status(list.id, first, false).await.unwrap();
        assert!(!repo.find_list(list.id).await.unwrap().unwrap().todos[0].completed);
    }

    #[tokio::test]
    async fn mark_all_completed_is_idempotent() {
        let repo = repo().await;
        repo.create_list("L").await.unwrap();
        let list = list_named(&repo, "L").await;
        repo.create_todo(list.id, "one").await.unwrap();
        repo.create_todo(list.id, "two").await.unwrap();

        for _ in 0..2 {
            repo.mark_all_todos_completed(list.id).await.unwrap();
            let found = repo.find_list(list.id).await.unwrap().unwrap();
            assert!(found.todos.iter().all(|t| t.completed));
            assert!(found.is_complete());
        }
    }

    #[tokio::test]
    async fn deleting_list_cascades_to_todos() {
        let repo = repo().await;
        repo.create_list("Doomed").await.unwrap();
        let list = list_named(&repo, "Doomed").await;
        repo.create_todo(list.id, "orphan?").await.unwrap();

        repo.delete_list(list.id).await.unwrap();
        assert!(repo.find_list(list.id).await.unwrap().is_none());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todo WHERE list_id = ?1")
            .bind(list.id.0)
            .fetch_one(&*repo.pool)
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn legacy_text_flags_are_coerced() {
        let repo = repo().await;
        repo.create_list("Legacy").await.unwrap();
        let list = list_named(&repo, "Legacy").await;
        for (name, flag) in [("done", "t"), ("open", "f")] {
            sqlx::query("INSERT INTO todo (list_id, name, completed) VALUES (?1, ?2, ?3)")
                .bind(list.id.0)
                .bind(name)
                .bind(flag)
                .execute(&*repo.pool)
                .await
                .unwrap();
        }
        let todos = repo.find_list(list.id).await.unwrap().unwrap().todos;
        assert!(todos[0].completed);
        assert!(!todos[1].completed);
    }
}
