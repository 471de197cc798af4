/// Post Service Library
///
/// The Quill content-sharing backend: users author text posts, tag them,
/// and publish a post for a bounded time window by filing a report with an
/// expiry timestamp. Identity is owned by an external provider; this
/// service only validates bearer tokens.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Database row types for posts, tags, reports
/// - `services`: Business logic layer (cached resource controllers)
/// - `db`: Database access layer and repositories
/// - `middleware`: HTTP middleware for authentication
/// - `jobs`: Background jobs (report expiry sweeper)
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
