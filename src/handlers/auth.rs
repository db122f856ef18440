//! Authentication handlers
//!
//! Signup flow (check account → verify token → complete), sign-in, and
//! invite management.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::{CurrentUser, DbConn};
use crate::routes::ApiResponse;
use crate::service::AuthService;
use crate::state::AppState;

fn auth_service(state: &AppState, db: &DbConn) -> AuthService {
    AuthService::new(db.0.clone(), state.config.auth.clone())
}

/// Check account request
#[derive(Debug, Deserialize)]
pub struct CheckAccountRequest {
    pub account: String,
}

/// Check account response
#[derive(Debug, Serialize)]
pub struct CheckAccountResponse {
    pub message: String,
    pub account: String,
    pub invite_token: String,
}

/// POST /api/v1/auth/check-account
pub async fn check_account(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    Json(req): Json<CheckAccountRequest>,
) -> AppResult<Json<CheckAccountResponse>> {
    let check = auth_service(&state, &db).check_account(&req.account).await?;
    Ok(Json(CheckAccountResponse {
        message: "Verification code generated".to_string(),
        account: check.email,
        invite_token: check.invite_token,
    }))
}

/// Sign up (token verification) request
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub account: String,
    pub token: String,
}

/// POST /api/v1/auth/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    Json(req): Json<SignUpRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    auth_service(&state, &db)
        .sign_up(&req.account, &req.token)
        .await?;
    Ok(Json(ApiResponse::success_msg("Account successfully verified")))
}

/// Complete sign up request
#[derive(Debug, Deserialize)]
pub struct CompleteSignUpRequest {
    pub account: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub password: String,
}

/// Complete sign up response
#[derive(Debug, Serialize)]
pub struct CompleteSignUpResponse {
    pub account: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub user_id: i64,
}

/// POST /api/v1/auth/sign-up-complete
pub async fn sign_up_complete(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    Json(req): Json<CompleteSignUpRequest>,
) -> AppResult<Json<CompleteSignUpResponse>> {
    let user = auth_service(&state, &db)
        .sign_up_complete(
            &req.account,
            &req.first_name,
            &req.last_name,
            &req.company_name,
            &req.password,
        )
        .await?;
    Ok(Json(CompleteSignUpResponse {
        account: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        company_name: req.company_name,
        user_id: user.id,
    }))
}

/// Sign in request
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub account: String,
    pub password: String,
}

/// Sign in response
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /api/v1/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    Json(req): Json<SignInRequest>,
) -> AppResult<Json<SignInResponse>> {
    let token = auth_service(&state, &db)
        .sign_in(&req.account, &req.password)
        .await?;
    tracing::info!(account = %req.account, "user signed in");
    Ok(Json(SignInResponse {
        access_token: token.access_token,
        token_type: token.token_type.to_string(),
    }))
}

/// Invite employee request
#[derive(Debug, Deserialize)]
pub struct InviteEmployeeRequest {
    pub email: String,
}

/// Invite response
#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub message: String,
    pub email: String,
    pub invite_token: String,
}

/// POST /api/v1/auth/invite-employee
pub async fn invite_employee(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    Extension(caller): Extension<CurrentUser>,
    Json(req): Json<InviteEmployeeRequest>,
) -> AppResult<Json<InviteResponse>> {
    let token = auth_service(&state, &db)
        .invite_employee(&caller, &req.email)
        .await?;
    Ok(Json(InviteResponse {
        message: "Invite successfully generated".to_string(),
        email: req.email,
        invite_token: token,
    }))
}

/// Confirm invite request
#[derive(Debug, Deserialize)]
pub struct ConfirmInviteRequest {
    pub account: String,
    pub token: String,
    pub password: String,
}

/// POST /api/v1/auth/confirm-invite
pub async fn confirm_invite(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    Json(req): Json<ConfirmInviteRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    auth_service(&state, &db)
        .confirm_invite(&req.account, &req.token, &req.password)
        .await?;
    Ok(Json(ApiResponse::success_msg(
        "Registration completed successfully",
    )))
}
