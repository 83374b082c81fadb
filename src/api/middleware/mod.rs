//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Auth validator — resolves the bearer session, injects `UserContext`
//! 2. Admin gate — `/admin` routes only, checks the `ROLE_ADMIN` authority

pub mod admin;
pub mod auth;
