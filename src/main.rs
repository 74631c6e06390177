use teamtrack::api::routes::create_routes;
use teamtrack::config::{run_migrations, AppConfig, DatabaseConfig};
use teamtrack::services::start_poll_scheduler;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let app_config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    let db = db_config.create_pool().await?;
    run_migrations(&db).await?;
    info!("Database ready");

    // Keep the scheduler handle alive for the lifetime of the server.
    let _scheduler = start_poll_scheduler(db.clone()).await?;

    let app = create_routes(db, &app_config.jwt_secret);

    let listener = TcpListener::bind(app_config.server_address()).await?;
    info!("TeamTrack server starting on http://{}", app_config.server_address());
    info!(
        "Health check available at http://{}/health",
        app_config.server_address()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
