//! User handlers
//!
//! Profile updates, employee onboarding, role assignments, and
//! subordinate lookup over the manager tree.

use axum::{extract::Path, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::entity::role_assignment::RoleResponse;
use crate::entity::user::UserResponse;
use crate::error::AppResult;
use crate::middleware::{CurrentUser, DbConn};
use crate::routes::ApiResponse;
use crate::service::{AuthService, OrganizationService};
use crate::state::AppState;

fn org_service(db: &DbConn) -> OrganizationService {
    OrganizationService::new(db.0.clone())
}

/// Create employee request
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position_id: Option<i64>,
}

/// Create employee response
#[derive(Debug, Serialize)]
pub struct CreateEmployeeResponse {
    pub message: String,
    pub invite_token: String,
}

/// POST /api/v1/employees
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Json(req): Json<CreateEmployeeRequest>,
) -> AppResult<Json<CreateEmployeeResponse>> {
    let service = AuthService::new(db.0.clone(), state.config.auth.clone());
    let invite_token = service
        .create_employee(
            &caller,
            &req.email,
            &req.first_name,
            &req.last_name,
            req.position_id,
        )
        .await?;
    Ok(Json(CreateEmployeeResponse {
        message: "Employee created and invite generated".to_string(),
        invite_token,
    }))
}

/// Update user request
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub manager_id: Option<i64>,
}

/// PATCH /api/v1/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let service = AuthService::new(db.0.clone(), state.config.auth.clone());
    let user = service
        .update_user(&caller, user_id, req.first_name, req.last_name, req.manager_id)
        .await?;
    Ok(Json(user.into()))
}

/// Update email request
#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    pub new_email: String,
}

/// PATCH /api/v1/users/:id/email
pub async fn update_email(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateEmailRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = AuthService::new(db.0.clone(), state.config.auth.clone());
    service.update_email(&caller, user_id, &req.new_email).await?;
    Ok(Json(ApiResponse::success_msg("Email updated successfully")))
}

/// GET /api/v1/employees/:id/subordinates
pub async fn get_subordinates(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let subs = org_service(&db).get_subordinates(&caller, user_id).await?;
    Ok(Json(subs.into_iter().map(Into::into).collect()))
}

/// Assign role request
#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub department_id: i64,
    pub role_name: String,
}

/// POST /api/v1/users/:id/roles
pub async fn assign_role(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
    Json(req): Json<AssignRoleRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    org_service(&db)
        .assign_role(&caller, user_id, req.department_id, &req.role_name)
        .await?;
    Ok(Json(ApiResponse::success_msg("Role assigned successfully")))
}

/// GET /api/v1/users/:id/roles
pub async fn get_roles(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<RoleResponse>>> {
    let roles = org_service(&db).get_roles(&caller, user_id).await?;
    Ok(Json(roles.into_iter().map(Into::into).collect()))
}
