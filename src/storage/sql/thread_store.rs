//! Unified SQL ThreadStore implementation.

use super::SqlDatabase;

sql_store!(
    /// SQL-based implementation of ThreadStore.
    SqlThreadStore
);

/// Macro to implement ThreadStore for a specific SQL backend.
macro_rules! impl_thread_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::ThreadStore for SqlThreadStore<$db_type> {
            async fn insert_thread(
                &self,
                thread: &crate::domain::NewThread,
                created: chrono::DateTime<chrono::Utc>,
            ) -> crate::interfaces::Result<crate::domain::Thread> {
                use sea_query::{Expr, OnConflict, Query};

                use crate::storage::helpers::{format_timestamp, truncate_to_millis};
                use crate::storage::schema::{ForumUsers, Forums, Threads, THREAD_COLUMNS};
                use crate::storage::sql::rows::ThreadRow;

                let created = truncate_to_millis(created);
                let mut tx = self.pool.begin().await?;

                let sql = {
                    let insert = Query::insert()
                        .into_table(Threads::Table)
                        .columns([
                            Threads::Title,
                            Threads::Author,
                            Threads::Forum,
                            Threads::Message,
                            Threads::Slug,
                            Threads::Created,
                        ])
                        .values_panic([
                            thread.title.clone().into(),
                            thread.author.clone().into(),
                            thread.forum.clone().into(),
                            thread.message.clone().into(),
                            thread.normalized_slug().map(str::to_string).into(),
                            format_timestamp(&created).into(),
                        ])
                        .returning(Query::returning().columns(THREAD_COLUMNS))
                        .to_owned();
                    <$db_type>::build_insert(insert)
                };
                let row = sqlx::query_as::<_, ThreadRow>(&sql)
                    .fetch_one(&mut *tx)
                    .await?;

                let sql = {
                    let bump = Query::update()
                        .table(Forums::Table)
                        .value(Forums::Threads, Expr::col(Forums::Threads).add(1))
                        .and_where(Expr::col(Forums::Slug).eq(thread.forum.as_str()))
                        .to_owned();
                    <$db_type>::build_update(bump)
                };
                sqlx::query(&sql).execute(&mut *tx).await?;

                let sql = {
                    let member = Query::insert()
                        .into_table(ForumUsers::Table)
                        .columns([ForumUsers::Forum, ForumUsers::Nickname])
                        .values_panic([thread.forum.clone().into(), thread.author.clone().into()])
                        .on_conflict(
                            OnConflict::columns([ForumUsers::Forum, ForumUsers::Nickname])
                                .do_nothing()
                                .to_owned(),
                        )
                        .to_owned();
                    <$db_type>::build_insert(member)
                };
                sqlx::query(&sql).execute(&mut *tx).await?;

                tx.commit().await?;

                row.try_into()
            }

            async fn find_thread(
                &self,
                id: i64,
            ) -> crate::interfaces::Result<Option<crate::domain::Thread>> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::{Threads, THREAD_COLUMNS};
                use crate::storage::sql::rows::ThreadRow;

                let sql = {
                    let stmt = Query::select()
                        .columns(THREAD_COLUMNS)
                        .from(Threads::Table)
                        .and_where(Expr::col(Threads::Id).eq(id))
                        .to_owned();
                    <$db_type>::build_select(stmt)
                };
                let row = sqlx::query_as::<_, ThreadRow>(&sql)
                    .fetch_optional(&self.pool)
                    .await?;

                row.map(crate::domain::Thread::try_from).transpose()
            }

            async fn find_thread_by_slug(
                &self,
                slug: &str,
            ) -> crate::interfaces::Result<Option<crate::domain::Thread>> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::{Threads, THREAD_COLUMNS};
                use crate::storage::sql::rows::ThreadRow;

                let sql = {
                    let stmt = Query::select()
                        .columns(THREAD_COLUMNS)
                        .from(Threads::Table)
                        .and_where(Expr::col(Threads::Slug).eq(slug))
                        .to_owned();
                    <$db_type>::build_select(stmt)
                };
                let row = sqlx::query_as::<_, ThreadRow>(&sql)
                    .fetch_optional(&self.pool)
                    .await?;

                row.map(crate::domain::Thread::try_from).transpose()
            }

            async fn forum_threads(
                &self,
                forum: &str,
                page: &crate::domain::ThreadPage,
            ) -> crate::interfaces::Result<Vec<crate::domain::Thread>> {
                use sea_query::{Expr, Order, Query};

                use crate::storage::helpers::format_timestamp;
                use crate::storage::schema::{Threads, THREAD_COLUMNS};
                use crate::storage::sql::rows::{collect_rows, ThreadRow};

                let order = if page.desc { Order::Desc } else { Order::Asc };

                let sql = {
                    let mut stmt = Query::select();
                    stmt.columns(THREAD_COLUMNS)
                        .from(Threads::Table)
                        .and_where(Expr::col(Threads::Forum).eq(forum))
                        .order_by(Threads::Created, order.clone())
                        .order_by(Threads::Id, order);

                    // The creation-time cursor is inclusive.
                    if let Some(since) = &page.since {
                        let since = format_timestamp(since);
                        stmt.and_where(if page.desc {
                            Expr::col(Threads::Created).lte(since)
                        } else {
                            Expr::col(Threads::Created).gte(since)
                        });
                    }
                    if page.limit > 0 {
                        stmt.limit(u64::from(page.limit));
                    }

                    <$db_type>::build_select(stmt)
                };
                let rows = sqlx::query_as::<_, ThreadRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?;

                collect_rows(rows)
            }

            async fn update_thread(
                &self,
                id: i64,
                update: &crate::domain::ThreadUpdate,
            ) -> crate::interfaces::Result<Option<crate::domain::Thread>> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::{Threads, THREAD_COLUMNS};
                use crate::storage::sql::rows::ThreadRow;

                if update.is_empty() {
                    return crate::interfaces::ThreadStore::find_thread(self, id).await;
                }

                let sql = {
                    let mut stmt = Query::update();
                    stmt.table(Threads::Table)
                        .and_where(Expr::col(Threads::Id).eq(id));
                    if !update.title.is_empty() {
                        stmt.value(Threads::Title, update.title.clone());
                    }
                    if !update.message.is_empty() {
                        stmt.value(Threads::Message, update.message.clone());
                    }
                    stmt.returning(Query::returning().columns(THREAD_COLUMNS));

                    <$db_type>::build_update(stmt)
                };
                let row = sqlx::query_as::<_, ThreadRow>(&sql)
                    .fetch_optional(&self.pool)
                    .await?;

                row.map(crate::domain::Thread::try_from).transpose()
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_thread_store!(super::postgres::Postgres, "postgres");
impl_thread_store!(super::sqlite::Sqlite, "sqlite");
