//! Route table.
//!
//! Three tiers, matching the authorization policy:
//! - open: `/`, `/health`, `/login`
//! - authenticated: `/user/index`
//! - admin: `/admin/*` (auth + admin gate, checked before the handler)
//!
//! Middleware uses `Extension<ApiContext>` (injected as the outermost
//! layer); endpoint handlers use `State<ApiContext>`.

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

pub fn api_router(ctx: ApiContext) -> Router {
    // Layers apply bottom-up: require_auth wraps the admin gate, so the
    // session is resolved before the role check runs.
    let admin = Router::new()
        .route("/delete", get(endpoints::patients::delete))
        .route("/formPatients", get(endpoints::patients::form))
        .route("/save", post(endpoints::patients::save))
        .route("/editPatient", get(endpoints::patients::edit))
        .layer(axum::middleware::from_fn(middleware::admin::require_admin));

    let protected = Router::new()
        .route("/user/index", get(endpoints::patients::index))
        .nest("/admin", admin)
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx.clone()));

    let open = Router::new()
        .route("/", get(endpoints::patients::home))
        .route("/health", get(endpoints::health::check))
        .route("/login", post(endpoints::auth::login))
        .with_state(ctx);

    Router::new().merge(protected).merge(open)
}
