//! Input contracts checked before any mutation is attempted.
//!
//! Each rule is independent and pure; rules that need the store (login
//! uniqueness, task existence) live in [`crate::service`].

use crate::error::{Result, TrackerError};
use crate::model::{NewTask, TaskDraft, UserId};
use chrono::{Days, NaiveDate};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_LOGIN_LEN: usize = 20;
pub const MAX_TEXT_LEN: usize = 256;
pub const MAX_TAG_LEN: usize = 256;

/// Lengths are counted in characters, matching the `varchar(n)` columns.
fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn validate_login(login: &str) -> Result<()> {
    let len = char_len(login);
    if len == 0 {
        return Err(TrackerError::validation("Login must not be empty"));
    }
    if len > MAX_LOGIN_LEN {
        return Err(TrackerError::Validation(format!(
            "Login must be at most {MAX_LOGIN_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if char_len(password) < MIN_PASSWORD_LEN {
        return Err(TrackerError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Postgres text columns cannot hold NUL.
fn reject_nul(field: &str, value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(TrackerError::Validation(format!(
            "{field} must not contain NUL characters"
        )));
    }
    Ok(())
}

pub fn validate_text(text: &str) -> Result<()> {
    if char_len(text) > MAX_TEXT_LEN {
        return Err(TrackerError::Validation(format!(
            "Task text must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    reject_nul("Task text", text)
}

pub fn validate_tag(tag: &str) -> Result<()> {
    if char_len(tag) > MAX_TAG_LEN {
        return Err(TrackerError::Validation(format!(
            "Tag must be at most {MAX_TAG_LEN} characters"
        )));
    }
    reject_nul("Tag", tag)
}

/// Default due date for a task created on `today`.
pub fn default_due_date(today: NaiveDate) -> NaiveDate {
    today.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX)
}

/// Resolve the due date of a new task: omitted means tomorrow, a supplied
/// date must be strictly after `today`.
pub fn resolve_due_date(requested: Option<NaiveDate>, today: NaiveDate) -> Result<NaiveDate> {
    match requested {
        None => Ok(default_due_date(today)),
        Some(date) if date > today => Ok(date),
        Some(date) => Err(TrackerError::Validation(format!(
            "Date should be in the future (got {date}, today is {today})"
        ))),
    }
}

/// Validate a task draft and turn it into an insertable task owned by `owner`.
pub fn validate_task(draft: TaskDraft, owner: UserId, today: NaiveDate) -> Result<NewTask> {
    validate_text(&draft.text)?;
    let tag = draft.tag.unwrap_or_default();
    validate_tag(&tag)?;
    let date = resolve_due_date(draft.date, today)?;
    Ok(NewTask {
        text: draft.text,
        date,
        tag,
        owner,
    })
}
