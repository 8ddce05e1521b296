//! Process entry-point: tracing, configuration, migrations, then the server.

use actix_web::web;
use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use jotter::inbound::http::health::HealthState;
use jotter::outbound::persistence::{DbPool, PoolConfig};
use jotter::server::{AppConfig, create_server};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Apply pending migrations over a one-off synchronous connection.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = diesel::PgConnection::establish(database_url)
        .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    run_migrations(&config.database_url)?;
    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(std::io::Error::other)?;

    let health = web::Data::new(HealthState::new());
    let server = create_server(health, &config, pool)?;
    server.await
}
