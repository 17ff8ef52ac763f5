use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;

use subcost::app;
use subcost::repo::PgSubscriptionStore;
use subcost::settings::Settings;
use subcost::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    let subscriber = telemetry::create_subscriber(settings.app.log_filter(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let pool = settings
        .database
        .pool_options()
        .connect_with(settings.database.with_db())
        .await
        .context("Failed to connect to Postgres")?;
    tracing::info!("Postgres pool initialized");

    let store = Arc::new(PgSubscriptionStore::new(pool));

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!(addr = ?listener.local_addr()?, "Starting server");

    app::run(listener, store, settings.app.timeouts())?
        .await
        .context("Failed to run app")?;

    tracing::info!("Server stopped");
    Ok(())
}
