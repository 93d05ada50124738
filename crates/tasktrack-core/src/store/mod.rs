//! Store traits implemented by the storage backends.
//!
//! The Postgres backend lives in `tasktrack-adapter-pg`; [`MemoryStore`] keeps
//! everything in process and backs tests and database-less runs.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::Result;
use crate::model::{NewTask, Task, TaskId, TaskOwnership, User, UserId};
use async_trait::async_trait;

/// Persists login/password-hash pairs.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Whether a user with `login` exists.
    async fn login_exists(&self, login: &str) -> Result<bool>;

    /// Insert a user and return its id. A duplicate login is a `Conflict`.
    async fn insert_user(&self, login: &str, password_hash: &str) -> Result<UserId>;

    async fn find_by_login(&self, login: &str) -> Result<Option<User>>;
}

/// Persists tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a task with `is_done = false` and return its id.
    async fn insert_task(&self, task: &NewTask) -> Result<TaskId>;

    /// Open tasks of `owner`, optionally restricted to an exact tag, ordered
    /// by date ascending (ties by id).
    async fn list_open(&self, owner: UserId, tag: Option<&str>) -> Result<Vec<Task>>;

    async fn find_task(&self, id: TaskId) -> Result<Option<TaskOwnership>>;

    /// Set `is_done = true`. Idempotent; authorization happens one layer up.
    async fn mark_done(&self, id: TaskId) -> Result<()>;
}
