//! Service module
//!
//! Authorization and orchestration over the entity layer and the
//! department store. Handlers stay thin; all business rules live here.

pub mod auth;
pub mod org;
pub mod task;

pub use auth::AuthService;
pub use org::OrganizationService;
pub use task::TaskAssignmentService;
