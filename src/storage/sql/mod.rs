//! Unified SQL storage implementations.
//!
//! This module provides shared implementations for SQL-based storage backends
//! (PostgreSQL, SQLite). The implementations are parameterized by database type
//! using the `SqlDatabase` trait and generated per backend by macros, so both
//! drivers run the same statements.

/// Declare a pool-holding store type generic over the SQL backend.
macro_rules! sql_store {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<DB: $crate::storage::sql::SqlDatabase> {
            pool: DB::Pool,
            _marker: std::marker::PhantomData<DB>,
        }

        impl<DB: $crate::storage::sql::SqlDatabase> $name<DB> {
            /// Create a new store with the given pool.
            pub fn new(pool: DB::Pool) -> Self {
                Self {
                    pool,
                    _marker: std::marker::PhantomData,
                }
            }

            /// Get the underlying pool.
            pub fn pool(&self) -> &DB::Pool {
                &self.pool
            }
        }
    };
}

mod forum_store;
mod post_store;
mod query;
mod rows;
mod service_store;
mod thread_store;
mod user_store;
mod vote_store;

pub use forum_store::SqlForumStore;
pub use post_store::SqlPostStore;
pub use query::SqlDatabase;
pub use service_store::SqlServiceStore;
pub use thread_store::SqlThreadStore;
pub use user_store::SqlUserStore;
pub use vote_store::SqlVoteStore;

#[cfg(feature = "postgres")]
pub mod postgres {
    //! PostgreSQL database backend.

    use sea_query::PostgresQueryBuilder;
    use sqlx::PgPool;

    /// PostgreSQL database marker type.
    pub struct Postgres;

    impl super::SqlDatabase for Postgres {
        type Pool = PgPool;

        const NAME: &'static str = "postgres";

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_update(stmt: sea_query::UpdateStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_delete(stmt: sea_query::DeleteStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }
    }

    pub type PostgresUserStore = super::SqlUserStore<Postgres>;
    pub type PostgresForumStore = super::SqlForumStore<Postgres>;
    pub type PostgresThreadStore = super::SqlThreadStore<Postgres>;
    pub type PostgresPostStore = super::SqlPostStore<Postgres>;
    pub type PostgresVoteStore = super::SqlVoteStore<Postgres>;
    pub type PostgresServiceStore = super::SqlServiceStore<Postgres>;
}

#[cfg(feature = "sqlite")]
pub mod sqlite {
    //! SQLite database backend.

    use sea_query::SqliteQueryBuilder;
    use sqlx::SqlitePool;

    /// SQLite database marker type.
    pub struct Sqlite;

    impl super::SqlDatabase for Sqlite {
        type Pool = SqlitePool;

        const NAME: &'static str = "sqlite";

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_update(stmt: sea_query::UpdateStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_delete(stmt: sea_query::DeleteStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }
    }

    pub type SqliteUserStore = super::SqlUserStore<Sqlite>;
    pub type SqliteForumStore = super::SqlForumStore<Sqlite>;
    pub type SqliteThreadStore = super::SqlThreadStore<Sqlite>;
    pub type SqlitePostStore = super::SqlPostStore<Sqlite>;
    pub type SqliteVoteStore = super::SqlVoteStore<Sqlite>;
    pub type SqliteServiceStore = super::SqlServiceStore<Sqlite>;
}
