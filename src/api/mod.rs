//! HTTP surface.
//!
//! Request flow: router → middleware stack → handler → store. The
//! middleware stack is two layers: `require_auth` (bearer session →
//! `UserContext`) on everything under `/user` and `/admin`, and
//! `require_admin` (checks the `ROLE_ADMIN` authority) on `/admin` only,
//! short-circuiting with 403 before any handler or store access.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server, ServerHandle};
pub use types::ApiContext;
