pub mod bootstrap;
mod embedded;
pub mod notes;

use deadpool_postgres::{
    CreatePoolError, ManagerConfig, Object, Pool, PoolError, RecyclingMethod, Runtime,
};
use tokio_postgres::NoTls;

/// Known connection-string prefixes and the form `tokio-postgres` accepts.
const SCHEME_REWRITES: &[(&str, &str)] = &[
    ("postgresql+asyncpg://", "postgresql://"),
    ("postgresql+psycopg2://", "postgresql://"),
    ("postgresql+psycopg://", "postgresql://"),
    ("postgres://", "postgresql://"),
];

/// A pooled connection, held for the duration of one request.
pub type Session = Object;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("failed to create connection pool: {0}")]
    CreatePool(#[from] CreatePoolError),

    #[error("failed to acquire database connection: {0}")]
    Pool(#[from] PoolError),

    #[error("database query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("database migration failed: {0}")]
    Migration(#[from] refinery::Error),
}

/// Rewrites the scheme of `url` through [`SCHEME_REWRITES`].
/// Unrecognised schemes are returned unchanged.
pub fn normalize_database_url(url: &str) -> String {
    SCHEME_REWRITES
        .iter()
        .find_map(|(from, to)| {
            url.strip_prefix(from)
                .map(|rest| format!("{to}{rest}"))
        })
        .unwrap_or_else(|| url.to_string())
}

#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Builds the process-wide pool. No connection is opened until the first
    /// [`Database::session`] call.
    pub fn connect(database_url: &str) -> Result<Self, DatabaseError> {
        let mut cfg = deadpool_postgres::Config::new();
        cfg.url = Some(normalize_database_url(database_url));
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Verified,
        });

        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;

        Ok(Self { pool })
    }

    pub async fn session(&self) -> Result<Session, DatabaseError> {
        Ok(self.pool.get().await?)
    }

    /// Provisions optional extensions, then applies the embedded migrations.
    /// Must complete before the HTTP listener accepts traffic.
    pub async fn bootstrap(&self) -> Result<(), DatabaseError> {
        let mut client = self.session().await?;

        bootstrap::provision_extensions(&client).await;

        let migrations_report = embedded::migrations::runner()
            .run_async(&mut **client)
            .await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}
