use axum::{
    http::StatusCode,
    middleware,
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::middleware::auth_layer;
use crate::state::AppState;

pub mod health;

/// API response wrapper for message-only endpoints
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: true,
            message: "success".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_msg(message: impl Into<String>) -> Self {
        Self {
            code: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth / signup flow
        .route("/auth/check-account", post(handlers::auth::check_account))
        .route("/auth/sign-up", post(handlers::auth::sign_up))
        .route("/auth/sign-up-complete", post(handlers::auth::sign_up_complete))
        .route("/auth/sign-in", post(handlers::auth::sign_in))
        .route("/auth/invite-employee", post(handlers::auth::invite_employee))
        .route("/auth/confirm-invite", post(handlers::auth::confirm_invite))
        // Department routes
        .route("/departments", post(handlers::department::create_department))
        .route("/departments/:id", get(handlers::department::get_department))
        .route("/departments/:id", patch(handlers::department::update_department))
        .route("/departments/:id", delete(handlers::department::delete_department))
        .route(
            "/departments/:id/descendants",
            get(handlers::department::get_descendants),
        )
        .route(
            "/departments/:id/ancestors",
            get(handlers::department::get_ancestors),
        )
        .route("/departments/:id/move", patch(handlers::department::move_department))
        .route("/departments/:id/manager", post(handlers::department::assign_manager))
        // Position routes
        .route("/positions", post(handlers::position::create_position))
        .route("/positions/:id", patch(handlers::position::update_position))
        .route("/positions/:id", delete(handlers::position::delete_position))
        .route(
            "/positions/:id/assign-department",
            post(handlers::position::assign_position_to_department),
        )
        .route(
            "/positions/:id/assign-user",
            post(handlers::position::assign_position_to_user),
        )
        // Employee / user routes
        .route("/employees", post(handlers::user::create_employee))
        .route(
            "/employees/:id/subordinates",
            get(handlers::user::get_subordinates),
        )
        .route("/users/:id", patch(handlers::user::update_user))
        .route("/users/:id/email", patch(handlers::user::update_email))
        .route("/users/:id/roles", post(handlers::user::assign_role))
        .route("/users/:id/roles", get(handlers::user::get_roles))
        // Task routes
        .route("/tasks", post(handlers::task::create_task))
        .route("/tasks/:id", get(handlers::task::get_task))
        .route("/tasks/:id", patch(handlers::task::update_task))
        .route("/tasks/:id", delete(handlers::task::delete_task));

    Router::new()
        .nest("/api/v1", api_routes)
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(state.clone(), auth_layer))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Fallback handler for 404
pub async fn fallback() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"code": 404, "message": "Not Found"})),
    )
}
