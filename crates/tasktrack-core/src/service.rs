//! Tracker service: the operations behind every endpoint.
//!
//! Validation runs before any mutation; stores are only touched once the
//! input contracts hold.

use crate::auth;
use crate::error::{Result, TrackerError};
use crate::grouping::{TaskGroups, group_by_tag};
use crate::model::{IssuedToken, Registration, TaskDraft, TaskId, UserId};
use crate::store::{CredentialStore, TaskStore};
use crate::validation;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// Source of "today" for date validation.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Clone)]
pub struct TrackerService {
    credentials: Arc<dyn CredentialStore>,
    tasks: Arc<dyn TaskStore>,
    clock: Clock,
}

impl TrackerService {
    pub fn new(credentials: Arc<dyn CredentialStore>, tasks: Arc<dyn TaskStore>) -> Self {
        Self {
            credentials,
            tasks,
            clock: Arc::new(local_today),
        }
    }

    /// Build a service over a single backend implementing both stores.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: CredentialStore + TaskStore + 'static,
    {
        Self::new(store.clone(), store)
    }

    /// Replace the clock used to evaluate "today".
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Register a new user. Returns the confirmation status line.
    ///
    /// Uniqueness is checked here and again by the store on insert, so a
    /// concurrent registration of the same login still ends in `Conflict`.
    pub async fn register(&self, reg: Registration) -> Result<String> {
        validation::validate_login(&reg.login)?;
        validation::validate_password(&reg.password)?;
        if self.credentials.login_exists(&reg.login).await? {
            return Err(TrackerError::Conflict("User already exists".to_string()));
        }

        let hash = auth::hash_password(&reg.password)?;
        let id = self.credentials.insert_user(&reg.login, &hash).await?;
        tracing::info!(user_id = id, login = %reg.login, "user registered");
        Ok(format!("{} registered", reg.login))
    }

    /// Password grant: verify the pair and hand out the bearer token.
    pub async fn issue_token(&self, username: &str, password: &str) -> Result<IssuedToken> {
        let user = self
            .credentials
            .find_by_login(username)
            .await?
            .ok_or_else(|| TrackerError::UserNotFound(username.to_string()))?;

        if !auth::verify_password(password, &user.password_hash)? {
            tracing::debug!(login = %username, "password verification failed");
            return Err(TrackerError::InvalidCredential);
        }

        Ok(IssuedToken {
            username: user.login,
            status: "logged".to_string(),
            access_token: auth::issue_token(user.id),
            token_type: auth::TOKEN_TYPE.to_string(),
        })
    }

    /// Add a task for `owner`. Returns the new task id.
    pub async fn add_task(&self, owner: UserId, draft: TaskDraft) -> Result<TaskId> {
        let task = validation::validate_task(draft, owner, self.today())?;
        let id = self.tasks.insert_task(&task).await?;
        tracing::debug!(task_id = id, user_id = owner, date = %task.date, "task added");
        Ok(id)
    }

    /// Open tasks of `owner` grouped by tag. An empty filter means no filter.
    pub async fn list_tasks(&self, owner: UserId, tag: Option<&str>) -> Result<TaskGroups> {
        let tag = tag.filter(|t| !t.is_empty());
        let tasks = self.tasks.list_open(owner, tag).await?;
        Ok(group_by_tag(&tasks))
    }

    /// Mark a task done on behalf of `requester`. Returns the task text.
    pub async fn mark_done(&self, requester: UserId, id: TaskId) -> Result<String> {
        let task = self
            .tasks
            .find_task(id)
            .await?
            .ok_or(TrackerError::TaskNotFound(id))?;

        if task.owner != requester {
            tracing::warn!(
                task_id = id,
                owner = task.owner,
                requester,
                "refused to modify foreign task"
            );
            return Err(TrackerError::Forbidden(
                "You can change only your own tasks".to_string(),
            ));
        }

        self.tasks.mark_done(id).await?;
        Ok(task.text)
    }
}
