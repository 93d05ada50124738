//! # tasktrack-server
//!
//! HTTP surface of the task tracker:
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | POST | `/reg` | - |
//! | POST | `/token` | - |
//! | POST | `/add_task` | bearer |
//! | GET | `/tasks` | bearer |
//! | PUT | `/mark_done` | bearer |
//! | GET | `/healthz` | - |

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
