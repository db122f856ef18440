//! Task handlers
//!
//! Task CRUD with observer/executor wiring.

use axum::{extract::Path, Extension, Json};
use serde::Deserialize;

use crate::entity::task::TaskResponse;
use crate::error::AppResult;
use crate::middleware::{CurrentUser, DbConn};
use crate::routes::ApiResponse;
use crate::service::task::{NewTask, TaskUpdate};
use crate::service::TaskAssignmentService;

fn task_service(db: &DbConn) -> TaskAssignmentService {
    TaskAssignmentService::new(db.0.clone())
}

/// Create task request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub responsible_id: i64,
    #[serde(default)]
    pub observer_ids: Vec<i64>,
    #[serde(default)]
    pub executor_ids: Vec<i64>,
    pub deadline: Option<String>,
    pub estimated_time: Option<f64>,
    pub status: Option<String>,
}

/// POST /api/v1/tasks
pub async fn create_task(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> AppResult<Json<TaskResponse>> {
    let observer_ids = req.observer_ids.clone();
    let executor_ids = req.executor_ids.clone();
    let task = task_service(&db)
        .create_task(
            &caller,
            NewTask {
                title: req.title,
                description: req.description,
                responsible_id: req.responsible_id,
                observer_ids: req.observer_ids,
                executor_ids: req.executor_ids,
                deadline: req.deadline,
                estimated_time: req.estimated_time,
                status: req.status,
            },
        )
        .await?;
    Ok(Json(TaskResponse::from_parts(task, observer_ids, executor_ids)))
}

/// GET /api/v1/tasks/:id
pub async fn get_task(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(task_id): Path<i64>,
) -> AppResult<Json<TaskResponse>> {
    let (task, observer_ids, executor_ids) =
        task_service(&db).get_task(&caller, task_id).await?;
    Ok(Json(TaskResponse::from_parts(task, observer_ids, executor_ids)))
}

/// Update task request
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<String>,
    pub estimated_time: Option<f64>,
}

/// PATCH /api/v1/tasks/:id
pub async fn update_task(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(task_id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> AppResult<Json<TaskResponse>> {
    let service = task_service(&db);
    service
        .update_task(
            &caller,
            task_id,
            TaskUpdate {
                title: req.title,
                description: req.description,
                status: req.status,
                deadline: req.deadline,
                estimated_time: req.estimated_time,
            },
        )
        .await?;
    let (task, observer_ids, executor_ids) = service.get_task(&caller, task_id).await?;
    Ok(Json(TaskResponse::from_parts(task, observer_ids, executor_ids)))
}

/// DELETE /api/v1/tasks/:id
pub async fn delete_task(
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Path(task_id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    task_service(&db).delete_task(&caller, task_id).await?;
    Ok(Json(ApiResponse::success_msg("Task deleted successfully")))
}
