//! Admin authorization gate for `/admin` routes.
//!
//! Runs after `require_auth` and checks the `ROLE_ADMIN` authority on the
//! injected `UserContext`. Non-admins are rejected with 403 before the
//! handler body executes; no store access happens for a denied request.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::UserContext;

pub async fn require_admin(req: Request<axum::body::Body>, next: Next) -> Response {
    let user = match req.extensions().get::<UserContext>() {
        Some(user) => user,
        None => return ApiError::Internal("missing user context".into()).into_response(),
    };

    if !user.is_admin() {
        tracing::warn!(username = %user.username, path = %req.uri().path(), "admin route denied");
        return ApiError::Forbidden.into_response();
    }

    next.run(req).await
}
