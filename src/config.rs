use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "patientele";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Listing page size when the request does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 4;

/// Role granting mutation rights over patients (stored bare; the
/// authentication adapter maps it to the `ROLE_ADMIN` authority).
pub const ADMIN_ROLE: &str = "ADMIN";
pub const USER_ROLE: &str = "USER";

/// Get the application data directory (~/Patientele/)
pub fn data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Patientele")
}

/// Path of the SQLite database file
pub fn database_path() -> PathBuf {
    data_dir().join("patientele.db")
}

/// Address the HTTP server binds to. `PATIENTELE_PORT` overrides the port.
pub fn bind_addr() -> SocketAddr {
    let port = std::env::var("PATIENTELE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    SocketAddr::from(([127, 0, 0, 1], port))
}

/// Default log filter when RUST_LOG is unset
pub fn default_log_filter() -> String {
    format!("info,{APP_NAME}=debug")
}
