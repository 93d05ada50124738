//! # tasktrack-core
//!
//! Domain logic of the tasktrack service: a per-user list of dated,
//! optionally tagged tasks behind password login and bearer tokens.
//!
//! - [`validation`]: input contracts checked before any mutation
//! - [`grouping`]: open tasks grouped by tag for listing
//! - [`auth`]: password hashing and bearer token handling
//! - [`store`]: credential/task store traits and the in-memory backend
//! - [`service`]: [`TrackerService`], one method per operation
//! - [`config`]: TOML configuration and the secrets file

pub mod auth;
pub mod config;
pub mod error;
pub mod grouping;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

pub use config::{ConfigError, ConfigSource, DatabaseConfig, StoreBackend, TrackerConfig};
pub use error::{Result, TrackerError};
pub use grouping::{TaskGroups, UNTAGGED_KEY, group_by_tag};
pub use model::{
    IssuedToken, NewTask, Registration, Task, TaskDraft, TaskId, TaskItem, TaskOwnership, User,
    UserId,
};
pub use service::TrackerService;
pub use store::{CredentialStore, MemoryStore, TaskStore};
