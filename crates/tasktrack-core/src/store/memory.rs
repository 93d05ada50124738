//! In-process store backend.

use super::{CredentialStore, TaskStore};
use crate::error::{Result, TrackerError};
use crate::model::{NewTask, Task, TaskId, TaskOwnership, User, UserId};
use async_trait::async_trait;
use std::sync::RwLock;

/// Store keeping users and tasks in memory.
///
/// Ids are assigned sequentially from 1, like a `serial` column.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    tasks: RwLock<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a task, including done ones.
    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.tasks
            .read()
            .ok()
            .and_then(|tasks| tasks.iter().find(|t| t.id == id).cloned())
    }
}

fn poisoned<T>(_: T) -> TrackerError {
    TrackerError::Storage("memory store lock poisoned".to_string())
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn login_exists(&self, login: &str) -> Result<bool> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().any(|u| u.login == login))
    }

    async fn insert_user(&self, login: &str, password_hash: &str) -> Result<UserId> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.iter().any(|u| u.login == login) {
            return Err(TrackerError::Conflict("User already exists".to_string()));
        }
        let id = users.len() as UserId + 1;
        users.push(User {
            id,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
        });
        Ok(id)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.login == login).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: &NewTask) -> Result<TaskId> {
        // foreign key: tasks.user_id -> users.id
        let owner_exists = self
            .users
            .read()
            .map_err(poisoned)?
            .iter()
            .any(|u| u.id == task.owner);
        if !owner_exists {
            return Err(TrackerError::Unauthorized(format!(
                "user {} does not exist",
                task.owner
            )));
        }

        let mut tasks = self.tasks.write().map_err(poisoned)?;
        let id = tasks.len() as TaskId + 1;
        tasks.push(Task {
            id,
            text: task.text.clone(),
            date: task.date,
            is_done: false,
            user_id: task.owner,
            tag: task.tag.clone(),
        });
        Ok(id)
    }

    async fn list_open(&self, owner: UserId, tag: Option<&str>) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        let mut open: Vec<Task> = tasks
            .iter()
            .filter(|t| t.user_id == owner && !t.is_done)
            .filter(|t| tag.is_none_or(|tag| t.tag == tag))
            .cloned()
            .collect();
        open.sort_by_key(|t| (t.date, t.id));
        Ok(open)
    }

    async fn find_task(&self, id: TaskId) -> Result<Option<TaskOwnership>> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        Ok(tasks.iter().find(|t| t.id == id).map(|t| TaskOwnership {
            owner: t.user_id,
            text: t.text.clone(),
        }))
    }

    async fn mark_done(&self, id: TaskId) -> Result<()> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
            task.is_done = true;
        }
        Ok(())
    }
}
