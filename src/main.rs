use std::sync::Arc;

use actix_web::HttpServer;
use booking_server::{admin::credentials::CredentialStore, config::Config, database, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booking_server=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = database::create_pool(&config.database_url)?;
    database::run_migrations(&pool)?;
    tracing::info!(database = %config.database_url, "database ready");

    let credentials: Arc<dyn CredentialStore> = Arc::new(config.credentials());
    let state = AppState::new(pool, credentials, config.purge_policy());

    tracing::info!(
        bind = %config.bind_addr,
        purge_appointments = config.purge_appointments,
        "starting server"
    );
    HttpServer::new(move || booking_server::app(state.clone()))
        .bind(config.bind_addr.as_str())?
        .run()
        .await?;

    Ok(())
}
