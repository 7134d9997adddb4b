//! Unified SQL VoteStore implementation.

use super::SqlDatabase;

sql_store!(
    /// SQL-based implementation of VoteStore.
    ///
    /// Every write first takes the thread row's write lock, then recomputes
    /// the thread's `votes` column from the ledger before committing. Vote
    /// writers on one thread therefore run one after another, and each
    /// recount sees every ledger change committed before it.
    SqlVoteStore
);

/// Macro to implement VoteStore for a specific SQL backend.
macro_rules! impl_vote_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        impl SqlVoteStore<$db_type> {
            /// A no-op write to the thread row.
            ///
            /// PostgreSQL holds the row lock until commit, and SQLite takes
            /// its database write lock up front instead of upgrading later.
            fn lock_statement(thread_id: i64) -> String {
                use sea_query::{Expr, Query};

                use crate::storage::schema::Threads;

                let stmt = Query::update()
                    .table(Threads::Table)
                    .value(Threads::Votes, Expr::col(Threads::Votes))
                    .and_where(Expr::col(Threads::Id).eq(thread_id))
                    .to_owned();
                <$db_type>::build_update(stmt)
            }

            fn recount_statement(thread_id: i64) -> String {
                use sea_query::{Expr, Query};

                use crate::storage::schema::{Threads, THREAD_VOTES_SUM};

                let stmt = Query::update()
                    .table(Threads::Table)
                    .value(Threads::Votes, Expr::cust(THREAD_VOTES_SUM))
                    .and_where(Expr::col(Threads::Id).eq(thread_id))
                    .to_owned();
                <$db_type>::build_update(stmt)
            }
        }

        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::VoteStore for SqlVoteStore<$db_type> {
            async fn insert_vote(&self, vote: &crate::domain::Vote) -> crate::interfaces::Result<()> {
                use sea_query::Query;

                use crate::storage::schema::Votes;

                let sql = {
                    let insert = Query::insert()
                        .into_table(Votes::Table)
                        .columns([Votes::Thread, Votes::Nickname, Votes::Voice])
                        .values_panic([
                            vote.thread_id.into(),
                            vote.nickname.clone().into(),
                            vote.voice.into(),
                        ])
                        .to_owned();
                    <$db_type>::build_insert(insert)
                };

                let mut tx = self.pool.begin().await?;

                sqlx::query(&Self::lock_statement(vote.thread_id))
                    .execute(&mut *tx)
                    .await?;
                sqlx::query(&sql).execute(&mut *tx).await?;
                sqlx::query(&Self::recount_statement(vote.thread_id))
                    .execute(&mut *tx)
                    .await?;

                tx.commit().await?;
                Ok(())
            }

            async fn update_vote(&self, vote: &crate::domain::Vote) -> crate::interfaces::Result<bool> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::Votes;

                let sql = {
                    let update = Query::update()
                        .table(Votes::Table)
                        .value(Votes::Voice, vote.voice)
                        .and_where(Expr::col(Votes::Thread).eq(vote.thread_id))
                        .and_where(Expr::col(Votes::Nickname).eq(vote.nickname.as_str()))
                        .to_owned();
                    <$db_type>::build_update(update)
                };

                let mut tx = self.pool.begin().await?;

                sqlx::query(&Self::lock_statement(vote.thread_id))
                    .execute(&mut *tx)
                    .await?;
                let result = sqlx::query(&sql).execute(&mut *tx).await?;

                if result.rows_affected() == 0 {
                    return Ok(false);
                }

                sqlx::query(&Self::recount_statement(vote.thread_id))
                    .execute(&mut *tx)
                    .await?;

                tx.commit().await?;
                Ok(true)
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_vote_store!(super::postgres::Postgres, "postgres");
impl_vote_store!(super::sqlite::Sqlite, "sqlite");
