//! Department hierarchy
//!
//! Materialized-path model for the company → department tree: path codec,
//! pure prefix-query engine, and the store that owns all path writes.

pub mod path;
pub mod query;
pub mod store;

pub use path::{DeptPath, PathError};
pub use store::DepartmentStore;
