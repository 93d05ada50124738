//! Domain model: users, tasks and the shapes exchanged with stores.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// System-assigned user identifier (`users.id`, a Postgres `serial`).
pub type UserId = i32;

/// System-assigned task identifier (`tasks.id`, a Postgres `serial`).
pub type TaskId = i32;

/// A registered user as persisted by the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub login: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub date: NaiveDate,
    pub is_done: bool,
    pub user_id: UserId,
    /// Empty string means "untagged".
    #[serde(default)]
    pub tag: String,
}

/// A validated task ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub date: NaiveDate,
    pub tag: String,
    pub owner: UserId,
}

/// Owner and text of a task, as returned by a single-row lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOwnership {
    pub owner: UserId,
    pub text: String,
}

/// One entry of a grouped task listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: TaskId,
    pub text: String,
    pub until: NaiveDate,
}

impl From<&Task> for TaskItem {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            until: task.date,
        }
    }
}

/// Raw task-add input, before validation. `date` and `tag` are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub text: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub tag: Option<String>,
}

/// Raw registration input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub login: String,
    pub password: String,
}

/// Successful password-grant outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub username: String,
    pub status: String,
    pub access_token: String,
    pub token_type: String,
}
