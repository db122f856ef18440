//! Department handlers
//!
//! CRUD plus the hierarchy queries (ancestors, descendants, subtree move).

use axum::{extract::Path, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::entity::department::DepartmentResponse;
use crate::error::AppResult;
use crate::middleware::{CurrentUser, DbConn};
use crate::routes::ApiResponse;
use crate::service::OrganizationService;

fn org_service(db: &DbConn) -> OrganizationService {
    OrganizationService::new(db.0.clone())
}

/// Create department request
#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub parent_id: Option<i64>,
}

/// Create department response
#[derive(Debug, Serialize)]
pub struct CreateDepartmentResponse {
    pub department_id: i64,
}

/// POST /api/v1/departments
pub async fn create_department(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Json(req): Json<CreateDepartmentRequest>,
) -> AppResult<Json<CreateDepartmentResponse>> {
    let department_id = org_service(&db)
        .create_department(&caller, &req.name, req.parent_id)
        .await?;
    Ok(Json(CreateDepartmentResponse { department_id }))
}

/// GET /api/v1/departments/:id
pub async fn get_department(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(department_id): Path<i64>,
) -> AppResult<Json<DepartmentResponse>> {
    let dept = org_service(&db)
        .get_department(&caller, department_id)
        .await?;
    Ok(Json(dept.into()))
}

/// GET /api/v1/departments/:id/descendants
pub async fn get_descendants(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(department_id): Path<i64>,
) -> AppResult<Json<Vec<DepartmentResponse>>> {
    let rows = org_service(&db)
        .get_descendants(&caller, department_id)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/departments/:id/ancestors
pub async fn get_ancestors(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(department_id): Path<i64>,
) -> AppResult<Json<Vec<DepartmentResponse>>> {
    let rows = org_service(&db)
        .get_ancestors(&caller, department_id)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Move department request
#[derive(Debug, Deserialize)]
pub struct MoveDepartmentRequest {
    pub new_parent_id: i64,
}

/// PATCH /api/v1/departments/:id/move
pub async fn move_department(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(department_id): Path<i64>,
    Json(req): Json<MoveDepartmentRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    org_service(&db)
        .move_department(&caller, department_id, req.new_parent_id)
        .await?;
    Ok(Json(ApiResponse::success_msg("Department moved successfully")))
}

/// Update department request
#[derive(Debug, Deserialize)]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
}

/// PATCH /api/v1/departments/:id
pub async fn update_department(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(department_id): Path<i64>,
    Json(req): Json<UpdateDepartmentRequest>,
) -> AppResult<Json<DepartmentResponse>> {
    let dept = org_service(&db)
        .update_department(&caller, department_id, req.name)
        .await?;
    Ok(Json(dept.into()))
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteDepartmentResponse {
    pub message: String,
    pub removed: u64,
}

/// DELETE /api/v1/departments/:id
pub async fn delete_department(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(department_id): Path<i64>,
) -> AppResult<Json<DeleteDepartmentResponse>> {
    let removed = org_service(&db)
        .delete_department(&caller, department_id)
        .await?;
    Ok(Json(DeleteDepartmentResponse {
        message: "Department deleted successfully".to_string(),
        removed,
    }))
}

/// Assign manager request
#[derive(Debug, Deserialize)]
pub struct AssignManagerRequest {
    pub user_id: i64,
}

/// POST /api/v1/departments/:id/manager
pub async fn assign_manager(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(department_id): Path<i64>,
    Json(req): Json<AssignManagerRequest>,
) -> AppResult<Json<DepartmentResponse>> {
    let dept = org_service(&db)
        .assign_manager(&caller, department_id, req.user_id)
        .await?;
    Ok(Json(dept.into()))
}
