//! Position handlers
//!
//! Position CRUD and assignment to departments/users.

use axum::{extract::Path, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::entity::position;
use crate::error::AppResult;
use crate::middleware::{CurrentUser, DbConn};
use crate::routes::ApiResponse;
use crate::service::OrganizationService;

fn org_service(db: &DbConn) -> OrganizationService {
    OrganizationService::new(db.0.clone())
}

/// Create position request
#[derive(Debug, Deserialize)]
pub struct CreatePositionRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Create position response
#[derive(Debug, Serialize)]
pub struct CreatePositionResponse {
    pub message: String,
    pub position_id: i64,
}

/// POST /api/v1/positions
pub async fn create_position(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Json(req): Json<CreatePositionRequest>,
) -> AppResult<Json<CreatePositionResponse>> {
    let position_id = org_service(&db)
        .create_position(&caller, &req.name, req.description)
        .await?;
    Ok(Json(CreatePositionResponse {
        message: "Position created successfully".to_string(),
        position_id,
    }))
}

/// Update position request
#[derive(Debug, Deserialize)]
pub struct UpdatePositionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// PATCH /api/v1/positions/:id
pub async fn update_position(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(position_id): Path<i64>,
    Json(req): Json<UpdatePositionRequest>,
) -> AppResult<Json<position::Model>> {
    let pos = org_service(&db)
        .update_position(&caller, position_id, req.name, req.description)
        .await?;
    Ok(Json(pos))
}

/// DELETE /api/v1/positions/:id
pub async fn delete_position(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(position_id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    org_service(&db).delete_position(&caller, position_id).await?;
    Ok(Json(ApiResponse::success_msg("Position deleted successfully")))
}

/// Assign position to department request
#[derive(Debug, Deserialize)]
pub struct AssignToDepartmentRequest {
    pub department_id: i64,
}

/// POST /api/v1/positions/:id/assign-department
pub async fn assign_position_to_department(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(position_id): Path<i64>,
    Json(req): Json<AssignToDepartmentRequest>,
) -> AppResult<Json<position::Model>> {
    let pos = org_service(&db)
        .assign_position_to_department(&caller, position_id, req.department_id)
        .await?;
    Ok(Json(pos))
}

/// Assign position to user request
#[derive(Debug, Deserialize)]
pub struct AssignToUserRequest {
    pub user_id: i64,
}

/// POST /api/v1/positions/:id/assign-user
pub async fn assign_position_to_user(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(position_id): Path<i64>,
    Json(req): Json<AssignToUserRequest>,
) -> AppResult<Json<position::Model>> {
    let pos = org_service(&db)
        .assign_position_to_user(&caller, position_id, req.user_id)
        .await?;
    Ok(Json(pos))
}
