//! Unified SQL ForumStore implementation.

use super::SqlDatabase;

sql_store!(
    /// SQL-based implementation of ForumStore.
    SqlForumStore
);

/// Macro to implement ForumStore for a specific SQL backend.
macro_rules! impl_forum_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::ForumStore for SqlForumStore<$db_type> {
            async fn insert_forum(
                &self,
                forum: &crate::domain::NewForum,
            ) -> crate::interfaces::Result<crate::domain::Forum> {
                use sea_query::Query;

                use crate::storage::schema::{Forums, FORUM_COLUMNS};
                use crate::storage::sql::rows::ForumRow;

                let sql = {
                    let stmt = Query::insert()
                        .into_table(Forums::Table)
                        .columns([Forums::Slug, Forums::Title, Forums::Owner])
                        .values_panic([
                            forum.slug.clone().into(),
                            forum.title.clone().into(),
                            forum.owner.clone().into(),
                        ])
                        .returning(Query::returning().columns(FORUM_COLUMNS))
                        .to_owned();
                    <$db_type>::build_insert(stmt)
                };
                let row = sqlx::query_as::<_, ForumRow>(&sql)
                    .fetch_one(&self.pool)
                    .await?;

                Ok(row.into())
            }

            async fn find_forum(
                &self,
                slug: &str,
            ) -> crate::interfaces::Result<Option<crate::domain::Forum>> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::{Forums, FORUM_COLUMNS};
                use crate::storage::sql::rows::ForumRow;

                let sql = {
                    let stmt = Query::select()
                        .columns(FORUM_COLUMNS)
                        .from(Forums::Table)
                        .and_where(Expr::col(Forums::Slug).eq(slug))
                        .to_owned();
                    <$db_type>::build_select(stmt)
                };
                let row = sqlx::query_as::<_, ForumRow>(&sql)
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(row.map(Into::into))
            }

            async fn forum_users(
                &self,
                slug: &str,
                page: &crate::domain::UserPage,
            ) -> crate::interfaces::Result<Vec<crate::domain::User>> {
                use sea_query::{Expr, Func, Order, Query};

                use crate::storage::schema::{ForumUsers, Users, USER_COLUMNS};
                use crate::storage::sql::rows::UserRow;

                let order = if page.desc { Order::Desc } else { Order::Asc };

                let sql = {
                    let mut stmt = Query::select();
                    stmt.columns(USER_COLUMNS.map(|c| (Users::Table, c)))
                        .from(Users::Table)
                        .inner_join(
                            ForumUsers::Table,
                            Expr::col((ForumUsers::Table, ForumUsers::Nickname))
                                .equals((Users::Table, Users::Nickname)),
                        )
                        .and_where(Expr::col((ForumUsers::Table, ForumUsers::Forum)).eq(slug))
                        .order_by_expr(
                            Func::lower(Expr::col((Users::Table, Users::Nickname))).into(),
                            order,
                        );

                    if let Some(since) = &page.since {
                        let key = Expr::expr(Func::lower(Expr::col((Users::Table, Users::Nickname))));
                        let cursor = since.to_ascii_lowercase();
                        stmt.and_where(if page.desc { key.lt(cursor) } else { key.gt(cursor) });
                    }
                    if page.limit > 0 {
                        stmt.limit(u64::from(page.limit));
                    }

                    <$db_type>::build_select(stmt)
                };
                let rows = sqlx::query_as::<_, UserRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?;

                Ok(rows.into_iter().map(Into::into).collect())
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_forum_store!(super::postgres::Postgres, "postgres");
impl_forum_store!(super::sqlite::Sqlite, "sqlite");
