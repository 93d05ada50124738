//! Postgres backend for the credential and task stores.
//!
//! All statements are parameterized. Connections come from a sqlx pool and
//! are returned to it when each statement finishes, whatever the outcome.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tasktrack_core::{
    CredentialStore, DatabaseConfig, NewTask, Result, Task, TaskId, TaskOwnership, TaskStore,
    TrackerError, User, UserId,
};

/// Schema created idempotently at startup.
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect using the pool settings from `config`.
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        tracing::info!(
            database = %config.redacted_connection_string(),
            max_connections = config.pool.max_connections,
            "connecting to Postgres"
        );
        let pool = PgPoolOptions::new()
            .max_connections(config.pool.max_connections)
            .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout_seconds))
            .connect(&config.connection_string())
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `users` and `tasks` tables if they are missing.
    pub async fn bootstrap_schema(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        tracing::info!("database schema ready");
        Ok(())
    }
}

fn storage_error(err: sqlx::Error) -> TrackerError {
    tracing::error!(error = %err, "database statement failed");
    TrackerError::storage(err)
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    login: String,
    password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            login: row.login,
            password_hash: row.password_hash,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: i32,
    text: String,
    date: NaiveDate,
    is_done: bool,
    user_id: i32,
    tag: String,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            date: row.date,
            is_done: row.is_done,
            user_id: row.user_id,
            tag: row.tag,
        }
    }
}

#[async_trait]
impl CredentialStore for PostgresStore {
    async fn login_exists(&self, login: &str) -> Result<bool> {
        let found: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(found.is_some())
    }

    async fn insert_user(&self, login: &str, password_hash: &str) -> Result<UserId> {
        let res: std::result::Result<(i32,), sqlx::Error> = sqlx::query_as(
            "INSERT INTO users (login, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(login)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok((id,)) => Ok(id),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(TrackerError::Conflict("User already exists".to_string()))
            }
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, login, password_hash FROM users WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl TaskStore for PostgresStore {
    async fn insert_task(&self, task: &NewTask) -> Result<TaskId> {
        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO tasks (text, date, user_id, is_done, tag) \
             VALUES ($1, $2, $3, false, $4) RETURNING id",
        )
        .bind(&task.text)
        .bind(task.date)
        .bind(task.owner)
        .bind(&task.tag)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                TrackerError::Unauthorized(format!("user {} does not exist", task.owner))
            }
            e => storage_error(e),
        })?;
        Ok(id)
    }

    async fn list_open(&self, owner: UserId, tag: Option<&str>) -> Result<Vec<Task>> {
        // A NULL filter matches every tag.
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, text, date, is_done, user_id, tag FROM tasks \
             WHERE user_id = $1 AND is_done = false AND ($2::text IS NULL OR tag = $2) \
             ORDER BY date ASC, id ASC",
        )
        .bind(owner)
        .bind(tag)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn find_task(&self, id: TaskId) -> Result<Option<TaskOwnership>> {
        let row: Option<(i32, String)> =
            sqlx::query_as("SELECT user_id, text FROM tasks WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_error)?;
        Ok(row.map(|(owner, text)| TaskOwnership { owner, text }))
    }

    async fn mark_done(&self, id: TaskId) -> Result<()> {
        sqlx::query("UPDATE tasks SET is_done = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}
