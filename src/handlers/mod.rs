//! Request handlers module

pub mod auth;
pub mod department;
pub mod position;
pub mod task;
pub mod user;
