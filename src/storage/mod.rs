//! Storage implementations.
//!
//! Backends:
//! - `sql`: unified PostgreSQL/SQLite stores generated from shared statements
//! - `mock`: in-memory store for tests

use std::sync::Arc;

use tracing::info;

use crate::config::{StorageConfig, StorageType};

pub use crate::interfaces::{
    ForumStore, PostStore, Result, ServiceStore, StorageError, ThreadStore, UserStore, VoteStore,
};

pub mod helpers;

#[cfg(feature = "sql")]
pub mod schema;

#[cfg(feature = "sql")]
pub mod sql;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockStore;

/// Error type for storage initialization.
pub type InitError = Box<dyn std::error::Error + Send + Sync>;

/// One handle per storage concern, all backed by the same database.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub forums: Arc<dyn ForumStore>,
    pub threads: Arc<dyn ThreadStore>,
    pub posts: Arc<dyn PostStore>,
    pub votes: Arc<dyn VoteStore>,
    pub service: Arc<dyn ServiceStore>,
}

impl Stores {
    /// Use one object for every concern.
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: UserStore + ForumStore + ThreadStore + PostStore + VoteStore + ServiceStore + 'static,
    {
        Self {
            users: store.clone(),
            forums: store.clone(),
            threads: store.clone(),
            posts: store.clone(),
            votes: store.clone(),
            service: store,
        }
    }

    /// In-memory stores for tests.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn mock() -> Self {
        Self::from_shared(Arc::new(MockStore::new()))
    }

    /// SQLite stores sharing `pool`. Migrations must already have run.
    #[cfg(feature = "sqlite")]
    pub fn sqlite(pool: sqlx::SqlitePool) -> Self {
        use self::sql::sqlite::*;

        Self {
            users: Arc::new(SqliteUserStore::new(pool.clone())),
            forums: Arc::new(SqliteForumStore::new(pool.clone())),
            threads: Arc::new(SqliteThreadStore::new(pool.clone())),
            posts: Arc::new(SqlitePostStore::new(pool.clone())),
            votes: Arc::new(SqliteVoteStore::new(pool.clone())),
            service: Arc::new(SqliteServiceStore::new(pool)),
        }
    }

    /// PostgreSQL stores sharing `pool`. Migrations must already have run.
    #[cfg(feature = "postgres")]
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        use self::sql::postgres::*;

        Self {
            users: Arc::new(PostgresUserStore::new(pool.clone())),
            forums: Arc::new(PostgresForumStore::new(pool.clone())),
            threads: Arc::new(PostgresThreadStore::new(pool.clone())),
            posts: Arc::new(PostgresPostStore::new(pool.clone())),
            votes: Arc::new(PostgresVoteStore::new(pool.clone())),
            service: Arc::new(PostgresServiceStore::new(pool)),
        }
    }
}

/// Apply the embedded SQLite migrations.
#[cfg(feature = "sqlite")]
pub async fn migrate_sqlite(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::migrate!("migrations/sqlite").run(pool).await?;
    Ok(())
}

/// Apply the embedded PostgreSQL migrations.
#[cfg(feature = "postgres")]
pub async fn migrate_postgres(pool: &sqlx::PgPool) -> Result<()> {
    sqlx::migrate!("migrations/postgres").run(pool).await?;
    Ok(())
}

/// Open a SQLite pool for `config`, creating the database file if needed.
#[cfg(feature = "sqlite")]
pub async fn connect_sqlite(config: &StorageConfig) -> std::result::Result<sqlx::SqlitePool, InitError> {
    use std::str::FromStr;

    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

    let sqlite = &config.sqlite;
    let (options, pool_options) = if sqlite.is_memory() {
        // Every connection to :memory: is its own database, so keep exactly one alive.
        let pool_options = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
        (SqliteConnectOptions::from_str("sqlite::memory:")?, pool_options)
    } else {
        if let Some(parent) = std::path::Path::new(&sqlite.path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let options = SqliteConnectOptions::new()
            .filename(&sqlite.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool_options = SqlitePoolOptions::new().max_connections(config.pool.max_connections);
        (options, pool_options)
    };
    let options = options.foreign_keys(true);

    let pool = crate::utils::bootstrap::connect_with_retry("sqlite", &sqlite.path, || {
        pool_options
            .clone()
            .acquire_timeout(config.pool.acquire_timeout())
            .connect_with(options.clone())
    })
    .await?;

    Ok(pool)
}

/// Open a PostgreSQL pool for `config`.
#[cfg(feature = "postgres")]
pub async fn connect_postgres(config: &StorageConfig) -> std::result::Result<sqlx::PgPool, InitError> {
    use std::str::FromStr;

    use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

    let options = PgConnectOptions::from_str(&config.postgres.uri)?;
    // Logged without credentials.
    let address = format!(
        "{}:{}/{}",
        options.get_host(),
        options.get_port(),
        options.get_database().unwrap_or_default()
    );

    let pool = crate::utils::bootstrap::connect_with_retry("postgres", &address, || {
        PgPoolOptions::new()
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout())
            .connect_with(options.clone())
    })
    .await?;

    Ok(pool)
}

/// Initialize storage based on configuration.
///
/// Connects with retry, applies migrations and returns the store handles for
/// the configured backend.
pub async fn init_storage(config: &StorageConfig) -> std::result::Result<Stores, InitError> {
    info!(storage_type = %config.storage_type, "Initializing storage");

    match config.storage_type {
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            let pool = connect_sqlite(config).await?;
            migrate_sqlite(&pool).await?;
            info!(path = %config.sqlite.path, "SQLite storage ready");
            Ok(Stores::sqlite(pool))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageType::Sqlite => {
            tracing::error!("SQLite storage requested but 'sqlite' feature is not enabled");
            Err("SQLite feature not enabled".into())
        }
        #[cfg(feature = "postgres")]
        StorageType::Postgres => {
            let pool = connect_postgres(config).await?;
            migrate_postgres(&pool).await?;
            info!("PostgreSQL storage ready");
            Ok(Stores::postgres(pool))
        }
        #[cfg(not(feature = "postgres"))]
        StorageType::Postgres => {
            tracing::error!("PostgreSQL storage requested but 'postgres' feature is not enabled");
            Err("PostgreSQL feature not enabled".into())
        }
    }
}
