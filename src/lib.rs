//! Orgdesk - multi-tenant HR and organization management backend
//!
//! Companies own users, positions, and a department tree stored as
//! materialized paths; tasks link authors to observers and executors.
//! The hierarchy module is the core: path codec, prefix-query engine,
//! and the store that performs cascading subtree moves and deletes.

pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod hierarchy;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
