//! Unified SQL UserStore implementation.

use super::SqlDatabase;

sql_store!(
    /// SQL-based implementation of UserStore.
    ///
    /// Nicknames are matched as `LOWER(nickname)`, the expression the unique
    /// index is built on, against a value folded with ASCII rules here.
    /// Under byte collation `LOWER()` folds ASCII letters only.
    SqlUserStore
);

/// Macro to implement UserStore for a specific SQL backend.
macro_rules! impl_user_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::UserStore for SqlUserStore<$db_type> {
            async fn insert_user(&self, user: &crate::domain::User) -> crate::interfaces::Result<()> {
                use sea_query::Query;

                use crate::storage::schema::{Users, USER_COLUMNS};

                let sql = {
                    let stmt = Query::insert()
                        .into_table(Users::Table)
                        .columns(USER_COLUMNS)
                        .values_panic([
                            user.nickname.clone().into(),
                            user.full_name.clone().into(),
                            user.about.clone().into(),
                            user.email.clone().into(),
                        ])
                        .to_owned();
                    <$db_type>::build_insert(stmt)
                };
                sqlx::query(&sql).execute(&self.pool).await?;

                Ok(())
            }

            async fn find_user(
                &self,
                nickname: &str,
            ) -> crate::interfaces::Result<Option<crate::domain::User>> {
                use sea_query::{Expr, Func, Query};

                use crate::storage::schema::{Users, USER_COLUMNS};
                use crate::storage::sql::rows::UserRow;

                let sql = {
                    let stmt = Query::select()
                        .columns(USER_COLUMNS)
                        .from(Users::Table)
                        .and_where(
                            Expr::expr(Func::lower(Expr::col(Users::Nickname)))
                                .eq(nickname.to_ascii_lowercase()),
                        )
                        .to_owned();
                    <$db_type>::build_select(stmt)
                };
                let row = sqlx::query_as::<_, UserRow>(&sql)
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(row.map(Into::into))
            }

            async fn find_users_by_nickname_or_email(
                &self,
                nickname: &str,
                email: &str,
            ) -> crate::interfaces::Result<Vec<crate::domain::User>> {
                use sea_query::{Cond, Expr, Func, Order, Query};

                use crate::storage::schema::{Users, USER_COLUMNS};
                use crate::storage::sql::rows::UserRow;

                let sql = {
                    let stmt = Query::select()
                        .columns(USER_COLUMNS)
                        .from(Users::Table)
                        .cond_where(
                            Cond::any()
                                .add(
                                    Expr::expr(Func::lower(Expr::col(Users::Nickname)))
                                        .eq(nickname.to_ascii_lowercase()),
                                )
                                .add(Expr::col(Users::Email).eq(email)),
                        )
                        .order_by(Users::Nickname, Order::Asc)
                        .to_owned();
                    <$db_type>::build_select(stmt)
                };
                let rows = sqlx::query_as::<_, UserRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?;

                Ok(rows.into_iter().map(Into::into).collect())
            }

            async fn update_user(
                &self,
                nickname: &str,
                update: &crate::domain::UserUpdate,
            ) -> crate::interfaces::Result<Option<crate::domain::User>> {
                use sea_query::{Expr, Func, Query};

                use crate::storage::schema::{Users, USER_COLUMNS};
                use crate::storage::sql::rows::UserRow;

                if update.is_empty() {
                    return crate::interfaces::UserStore::find_user(self, nickname).await;
                }

                let sql = {
                    let mut stmt = Query::update();
                    stmt.table(Users::Table).and_where(
                        Expr::expr(Func::lower(Expr::col(Users::Nickname)))
                            .eq(nickname.to_ascii_lowercase()),
                    );
                    if !update.full_name.is_empty() {
                        stmt.value(Users::FullName, update.full_name.clone());
                    }
                    if !update.about.is_empty() {
                        stmt.value(Users::About, update.about.clone());
                    }
                    if !update.email.is_empty() {
                        stmt.value(Users::Email, update.email.clone());
                    }
                    stmt.returning(Query::returning().columns(USER_COLUMNS));
                    <$db_type>::build_update(stmt)
                };
                let row = sqlx::query_as::<_, UserRow>(&sql)
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(row.map(Into::into))
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_user_store!(super::postgres::Postgres, "postgres");
impl_user_store!(super::sqlite::Sqlite, "sqlite");
