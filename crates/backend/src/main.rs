use std::net::SocketAddr;

use backend::shared::config;
use backend::shared::data::db;
use backend::{routes, system};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let cfg = config::init()?;

    db::initialize_database(&config::get_database_path(cfg))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    system::initialization::ensure_admin_user_exists().await?;

    let app = routes::configure_routes();

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Backend listening on http://{}", addr);
    tracing::info!(
        "Documents stored in {}",
        config::get_documents_dir(cfg).display()
    );

    axum::serve(listener, app).await?;
    Ok(())
}
