use todo_lists::{build_app, config::Config, domain::repository::ListRepository, infrastructure::sqlite_repo::SqliteListRepository};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(database_url = %config.database_url, "opening database");
    let repo = SqliteListRepository::connect(&config.database_url).await?;
    repo.init().await?;
    let router = build_app(repo)?;

    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(config.bind_addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
