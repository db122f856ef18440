//! Entity module - SeaORM entity definitions
//!
//! One module per database table.

pub mod company;
pub mod department;
pub mod invite;
pub mod position;
pub mod role_assignment;
pub mod task;
pub mod task_executor;
pub mod task_observer;
pub mod user;
