//! Authentication middleware
//!
//! Bearer-token (JWT) authentication for API routes. The decoded claims
//! carry `(user_id, company_id, is_admin)`; handlers trust this triple via
//! the `CurrentUser` extension.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::config::AuthConfig;
use crate::entity::user;
use crate::error::AppError;
use crate::state::AppState;

/// Database connection wrapper for use in handlers via Extension
#[derive(Clone)]
pub struct DbConn(pub DatabaseConnection);

impl Deref for DbConn {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub company_id: i64,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Issue an access token for a signed-in user.
pub fn encode_token(user: &user::Model, auth: &AuthConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id,
        company_id: user.company_id,
        is_admin: user.is_admin,
        iat: now,
        exp: now + auth.token_ttl_secs as i64,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
}

/// Decode and validate an access token.
pub fn decode_token(token: &str, auth: &AuthConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("token rejected: {}", e);
        AppError::Unauthorized
    })
}

/// Identity extension available to every authenticated handler
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub company_id: i64,
    pub is_admin: bool,
}

/// Paths that don't require authentication
fn is_public_path(path: &str) -> bool {
    if path == "/api/v1/health" {
        return true;
    }
    // Signup / sign-in flow
    matches!(
        path,
        "/api/v1/auth/check-account"
            | "/api/v1/auth/sign-up"
            | "/api/v1/auth/sign-up-complete"
            | "/api/v1/auth/sign-in"
            | "/api/v1/auth/confirm-invite"
    )
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Authentication middleware
pub async fn auth_layer(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // All handlers access the pool via Extension<DbConn>
    request.extensions_mut().insert(DbConn(state.db.clone()));

    if is_public_path(&path) {
        return next.run(request).await;
    }

    let Some(token) = bearer_token(&request) else {
        return AppError::Unauthorized.into_response();
    };

    let claims = match decode_token(token, &state.config.auth) {
        Ok(claims) => claims,
        Err(err) => return err.into_response(),
    };

    // The token may outlive the account; re-check the user row.
    let user_result = user::Entity::find_by_id(claims.sub).one(&state.db).await;

    match user_result {
        Ok(Some(user_model)) if user_model.is_active => {
            let current_user = CurrentUser {
                id: user_model.id,
                company_id: user_model.company_id,
                is_admin: user_model.is_admin,
            };
            request.extensions_mut().insert(current_user);
            next.run(request).await
        }
        Ok(Some(_)) => {
            tracing::warn!(user_id = claims.sub, "inactive account presented a valid token");
            AppError::PermissionDenied.into_response()
        }
        Ok(None) => {
            tracing::warn!(user_id = claims.sub, "token for unknown user");
            AppError::Unauthorized.into_response()
        }
        Err(e) => {
            tracing::error!("Database error during auth: {}", e);
            AppError::Database(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> user::Model {
        user::Model {
            id: 7,
            email: "admin@example.com".to_string(),
            hashed_password: "x".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            is_active: true,
            is_admin: true,
            company_id: 3,
            position_id: None,
            department_id: None,
            manager_id: None,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let auth = AuthConfig::default();
        let token = encode_token(&test_user(), &auth).unwrap();
        let claims = decode_token(&token, &auth).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.company_id, 3);
        assert!(claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let auth = AuthConfig::default();
        let token = encode_token(&test_user(), &auth).unwrap();
        let other = AuthConfig {
            jwt_secret: "different".to_string(),
            ..AuthConfig::default()
        };
        assert!(matches!(
            decode_token(&token, &other),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/api/v1/health"));
        assert!(is_public_path("/api/v1/auth/sign-in"));
        assert!(!is_public_path("/api/v1/departments"));
    }
}
