//! Login endpoint — the seam between the authentication adapter and the
//! session store.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub roles: Vec<String>,
}

/// `POST /login` — verify credentials and issue a session token.
///
/// Unknown usernames and wrong passwords produce the identical 401
/// response so the endpoint cannot be used to probe for accounts.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let credentials = {
        let conn = ctx
            .db
            .lock()
            .map_err(|_| ApiError::Internal("db lock".into()))?;
        auth::load_user_credentials(&conn, &request.username)?
    };

    if !auth::verify_password(&request.password, &credentials.password_hash) {
        tracing::warn!(username = %request.username, "failed login");
        return Err(ApiError::BadCredentials);
    }

    let token = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.issue(&credentials.username, credentials.roles.clone())
    };

    tracing::info!(username = %credentials.username, "login");
    Ok(Json(LoginResponse {
        token,
        username: credentials.username,
        roles: credentials.roles,
    }))
}
