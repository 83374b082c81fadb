//! Shared types for the API layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rusqlite::Connection;

use crate::auth;

/// How long a session stays valid after login.
const SESSION_TTL_SECS: u64 = 8 * 60 * 60;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes and middleware: the database connection
/// and the in-process session store.
#[derive(Clone)]
pub struct ApiContext {
    pub db: Arc<Mutex<Connection>>,
    pub sessions: Arc<Mutex<SessionStore>>,
}

impl ApiContext {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            sessions: Arc::new(Mutex::new(SessionStore::new())),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// User context — injected by auth middleware
// ═══════════════════════════════════════════════════════════

/// Authenticated user context, injected into request extensions by the
/// auth middleware after session validation. Roles are in authority form
/// (`ROLE_ADMIN`).
#[derive(Debug, Clone)]
pub struct UserContext {
    pub username: String,
    pub roles: Vec<String>,
}

impl UserContext {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == auth::ADMIN_AUTHORITY)
    }
}

// ═══════════════════════════════════════════════════════════
// Session store — hashed bearer tokens with TTL
// ═══════════════════════════════════════════════════════════

struct SessionEntry {
    username: String,
    roles: Vec<String>,
    expires_at: Instant,
}

/// In-memory session store. Tokens are stored as SHA-256 hashes so a
/// memory dump never reveals a usable bearer token.
pub struct SessionStore {
    sessions: HashMap<[u8; 32], SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            ttl: Duration::from_secs(SESSION_TTL_SECS),
        }
    }

    /// Create a session and return its bearer token.
    pub fn issue(&mut self, username: &str, roles: Vec<String>) -> String {
        if self.sessions.len() > 1000 {
            self.cleanup();
        }
        let token = generate_token();
        self.sessions.insert(
            hash_token(&token),
            SessionEntry {
                username: username.to_string(),
                roles,
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Resolve a bearer token to the authenticated user, if the session
    /// exists and has not expired.
    pub fn resolve(&self, token: &str) -> Option<UserContext> {
        let entry = self.sessions.get(&hash_token(token))?;
        if Instant::now() > entry.expires_at {
            return None;
        }
        Some(UserContext {
            username: entry.username.clone(),
            roles: entry.roles.clone(),
        })
    }

    fn cleanup(&mut self) {
        let now = Instant::now();
        self.sessions.retain(|_, s| now < s.expires_at);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a bearer token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
