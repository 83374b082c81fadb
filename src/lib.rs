pub mod accounts;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod seed;

use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] db::DatabaseError),
    #[error(transparent)]
    Seed(#[from] seed::SeedError),
}

/// Boot the service: logging, database + migrations, idempotent seed,
/// HTTP server. Runs until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    std::fs::create_dir_all(config::data_dir())?;
    let conn = db::open_database(&config::database_path())?;
    seed::run_seed(&conn)?;

    let ctx = api::ApiContext::new(conn);
    let mut server = api::start_server(ctx, config::bind_addr()).await?;
    tracing::info!(addr = %server.addr, "listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    server.shutdown();
    Ok(())
}
