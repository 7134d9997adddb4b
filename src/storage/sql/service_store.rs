//! Unified SQL ServiceStore implementation.

use super::SqlDatabase;

sql_store!(
    /// SQL-based implementation of ServiceStore.
    SqlServiceStore
);

/// Macro to implement ServiceStore for a specific SQL backend.
macro_rules! impl_service_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::ServiceStore for SqlServiceStore<$db_type> {
            async fn status(&self) -> crate::interfaces::Result<crate::domain::Status> {
                use crate::storage::schema::STATUS_QUERY;
                use crate::storage::sql::rows::StatusRow;

                let row = sqlx::query_as::<_, StatusRow>(STATUS_QUERY)
                    .fetch_one(&self.pool)
                    .await?;

                Ok(crate::domain::Status {
                    users: row.users,
                    forums: row.forums,
                    threads: row.threads,
                    posts: row.posts,
                })
            }

            async fn clear(&self) -> crate::interfaces::Result<()> {
                use sea_query::{IntoTableRef, Query, TableRef};

                use crate::storage::schema::{ForumUsers, Forums, Posts, Threads, Users, Votes};

                // Children before parents so foreign keys hold at every step.
                let statements: Vec<String> = {
                    let tables: [TableRef; 6] = [
                        Votes::Table.into_table_ref(),
                        Posts::Table.into_table_ref(),
                        ForumUsers::Table.into_table_ref(),
                        Threads::Table.into_table_ref(),
                        Forums::Table.into_table_ref(),
                        Users::Table.into_table_ref(),
                    ];
                    tables
                        .into_iter()
                        .map(|table| {
                            <$db_type>::build_delete(Query::delete().from_table(table).to_owned())
                        })
                        .collect()
                };

                let mut tx = self.pool.begin().await?;
                for sql in &statements {
                    sqlx::query(sql).execute(&mut *tx).await?;
                }
                tx.commit().await?;

                tracing::info!(backend = <$db_type>::NAME, "Store cleared");
                Ok(())
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_service_store!(super::postgres::Postgres, "postgres");
impl_service_store!(super::sqlite::Sqlite, "sqlite");
