//! Unified SQL PostStore implementation.
//!
//! Paths are stored encoded (see [`TreePath::encode`](crate::domain::TreePath::encode))
//! in a byte-collated column, so `ORDER BY path` is depth-first order and
//! keyset cursors are plain string comparisons.

use super::SqlDatabase;

sql_store!(
    /// SQL-based implementation of PostStore.
    SqlPostStore
);

/// Macro to implement PostStore for a specific SQL backend.
macro_rules! impl_post_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::PostStore for SqlPostStore<$db_type> {
            async fn append_posts(
                &self,
                thread: &crate::domain::Thread,
                posts: &[crate::domain::NewPost],
                created: chrono::DateTime<chrono::Utc>,
            ) -> crate::interfaces::Result<Vec<crate::domain::Post>> {
                use std::collections::{BTreeSet, HashMap};

                use sea_query::{Expr, Func, OnConflict, Query};

                use crate::domain::{Post, TreePath};
                use crate::interfaces::StorageError;
                use crate::storage::helpers::{format_timestamp, truncate_to_millis};
                use crate::storage::schema::{ForumUsers, Forums, Posts, Users};
                use crate::storage::sql::rows::{IdRow, NicknameRow, PathRow};

                if posts.is_empty() {
                    return Ok(Vec::new());
                }

                let created = truncate_to_millis(created);
                let stamp = format_timestamp(&created);
                let mut tx = self.pool.begin().await?;

                // Lowercased nickname -> canonical nickname.
                let mut authors: HashMap<String, String> = HashMap::new();
                let mut inserted = Vec::with_capacity(posts.len());

                for new_post in posts {
                    let key = new_post.author.to_ascii_lowercase();
                    let author = match authors.get(&key) {
                        Some(author) => author.clone(),
                        None => {
                            let sql = {
                                let lookup = Query::select()
                                    .column(Users::Nickname)
                                    .from(Users::Table)
                                    .and_where(
                                        Expr::expr(Func::lower(Expr::col(Users::Nickname)))
                                            .eq(key.as_str()),
                                    )
                                    .to_owned();
                                <$db_type>::build_select(lookup)
                            };
                            let row = sqlx::query_as::<_, NicknameRow>(&sql)
                                .fetch_optional(&mut *tx)
                                .await?
                                .ok_or_else(|| StorageError::missing("user", &new_post.author))?;
                            authors.insert(key, row.nickname.clone());
                            row.nickname
                        }
                    };

                    let parent_path = if new_post.parent == 0 {
                        None
                    } else {
                        let sql = {
                            let lookup = Query::select()
                                .columns([Posts::Path, Posts::Root])
                                .from(Posts::Table)
                                .and_where(Expr::col(Posts::Id).eq(new_post.parent))
                                .and_where(Expr::col(Posts::Thread).eq(thread.id))
                                .to_owned();
                            <$db_type>::build_select(lookup)
                        };
                        let row = sqlx::query_as::<_, PathRow>(&sql)
                            .fetch_optional(&mut *tx)
                            .await?
                            .ok_or(StorageError::ParentNotFound {
                                parent: new_post.parent,
                                thread: thread.id,
                            })?;
                        Some(TreePath::decode(&row.path)?)
                    };

                    let sql = {
                        let insert = Query::insert()
                            .into_table(Posts::Table)
                            .columns([
                                Posts::Parent,
                                Posts::Author,
                                Posts::Message,
                                Posts::Forum,
                                Posts::Thread,
                                Posts::Created,
                            ])
                            .values_panic([
                                new_post.parent.into(),
                                author.clone().into(),
                                new_post.message.clone().into(),
                                thread.forum.clone().into(),
                                thread.id.into(),
                                stamp.clone().into(),
                            ])
                            .returning(Query::returning().column(Posts::Id))
                            .to_owned();
                        <$db_type>::build_insert(insert)
                    };
                    let IdRow { id } = sqlx::query_as::<_, IdRow>(&sql)
                        .fetch_one(&mut *tx)
                        .await?;

                    let path = match &parent_path {
                        Some(parent) => parent.child(id),
                        None => TreePath::root(id),
                    };
                    let root = path.root_id().unwrap_or(id);

                    let sql = {
                        let set_path = Query::update()
                            .table(Posts::Table)
                            .value(Posts::Path, path.encode())
                            .value(Posts::Root, root)
                            .and_where(Expr::col(Posts::Id).eq(id))
                            .to_owned();
                        <$db_type>::build_update(set_path)
                    };
                    sqlx::query(&sql).execute(&mut *tx).await?;

                    inserted.push(Post {
                        id,
                        parent: new_post.parent,
                        author,
                        message: new_post.message.clone(),
                        is_edited: false,
                        forum: thread.forum.clone(),
                        thread: thread.id,
                        created,
                        path,
                    });
                }

                let sql = {
                    let bump = Query::update()
                        .table(Forums::Table)
                        .value(
                            Forums::Posts,
                            Expr::col(Forums::Posts).add(inserted.len() as i64),
                        )
                        .and_where(Expr::col(Forums::Slug).eq(thread.forum.as_str()))
                        .to_owned();
                    <$db_type>::build_update(bump)
                };
                sqlx::query(&sql).execute(&mut *tx).await?;

                let sql = {
                    let members: BTreeSet<&String> = authors.values().collect();
                    let mut member = Query::insert();
                    member
                        .into_table(ForumUsers::Table)
                        .columns([ForumUsers::Forum, ForumUsers::Nickname])
                        .on_conflict(
                            OnConflict::columns([ForumUsers::Forum, ForumUsers::Nickname])
                                .do_nothing()
                                .to_owned(),
                        );
                    for nickname in members {
                        member.values_panic([thread.forum.clone().into(), nickname.clone().into()]);
                    }
                    <$db_type>::build_insert(member)
                };
                sqlx::query(&sql).execute(&mut *tx).await?;

                tx.commit().await?;

                Ok(inserted)
            }

            async fn find_post(
                &self,
                id: i64,
            ) -> crate::interfaces::Result<Option<crate::domain::Post>> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::{Posts, POST_COLUMNS};
                use crate::storage::sql::rows::PostRow;

                let sql = {
                    let stmt = Query::select()
                        .columns(POST_COLUMNS)
                        .from(Posts::Table)
                        .and_where(Expr::col(Posts::Id).eq(id))
                        .to_owned();
                    <$db_type>::build_select(stmt)
                };
                let row = sqlx::query_as::<_, PostRow>(&sql)
                    .fetch_optional(&self.pool)
                    .await?;

                row.map(crate::domain::Post::try_from).transpose()
            }

            async fn thread_posts(
                &self,
                thread_id: i64,
                query: &crate::domain::PostQuery,
            ) -> crate::interfaces::Result<Vec<crate::domain::Post>> {
                use sea_query::{Expr, Order, Query};

                use crate::domain::SortMode;
                use crate::storage::schema::{Posts, POST_COLUMNS};
                use crate::storage::sql::rows::{collect_rows, IdRow, PathRow, PostRow};

                let order = if query.desc { Order::Desc } else { Order::Asc };

                // Tree cursors are resolved within the thread; an unknown
                // cursor post yields an empty page.
                let cursor = match (query.sort, query.cursor()) {
                    (SortMode::Flat, _) | (_, None) => None,
                    (_, Some(since)) => {
                        let sql = {
                            let lookup = Query::select()
                                .columns([Posts::Path, Posts::Root])
                                .from(Posts::Table)
                                .and_where(Expr::col(Posts::Id).eq(since))
                                .and_where(Expr::col(Posts::Thread).eq(thread_id))
                                .to_owned();
                            <$db_type>::build_select(lookup)
                        };
                        let row = sqlx::query_as::<_, PathRow>(&sql)
                            .fetch_optional(&self.pool)
                            .await?;
                        match row {
                            Some(row) => Some(row),
                            None => return Ok(Vec::new()),
                        }
                    }
                };

                // Parent-tree pages are counted in root posts, picked first.
                let roots: Vec<i64> = if query.sort == SortMode::ParentTree {
                    let sql = {
                        let mut roots = Query::select();
                        roots
                            .column(Posts::Id)
                            .from(Posts::Table)
                            .and_where(Expr::col(Posts::Thread).eq(thread_id))
                            .and_where(Expr::col(Posts::Parent).eq(0))
                            .order_by(Posts::Id, order.clone());
                        if let Some(cursor) = &cursor {
                            roots.and_where(if query.desc {
                                Expr::col(Posts::Id).lt(cursor.root)
                            } else {
                                Expr::col(Posts::Id).gt(cursor.root)
                            });
                        }
                        if query.limit > 0 {
                            roots.limit(u64::from(query.limit));
                        }
                        <$db_type>::build_select(roots)
                    };
                    let ids: Vec<i64> = sqlx::query_as::<_, IdRow>(&sql)
                        .fetch_all(&self.pool)
                        .await?
                        .into_iter()
                        .map(|row| row.id)
                        .collect();
                    if ids.is_empty() {
                        return Ok(Vec::new());
                    }
                    ids
                } else {
                    Vec::new()
                };

                let sql = {
                    let mut stmt = Query::select();
                    stmt.columns(POST_COLUMNS)
                        .from(Posts::Table)
                        .and_where(Expr::col(Posts::Thread).eq(thread_id));

                    match query.sort {
                        SortMode::Flat => {
                            if let Some(since) = query.cursor() {
                                stmt.and_where(if query.desc {
                                    Expr::col(Posts::Id).lt(since)
                                } else {
                                    Expr::col(Posts::Id).gt(since)
                                });
                            }
                            stmt.order_by(Posts::Id, order);
                            if query.limit > 0 {
                                stmt.limit(u64::from(query.limit));
                            }
                        }
                        SortMode::Tree => {
                            if let Some(cursor) = cursor {
                                stmt.and_where(if query.desc {
                                    Expr::col(Posts::Path).lt(cursor.path)
                                } else {
                                    Expr::col(Posts::Path).gt(cursor.path)
                                });
                            }
                            stmt.order_by(Posts::Path, order.clone())
                                .order_by(Posts::Id, order);
                            if query.limit > 0 {
                                stmt.limit(u64::from(query.limit));
                            }
                        }
                        SortMode::ParentTree => {
                            // Subtrees are expanded unbounded, each in depth-first order.
                            stmt.and_where(Expr::col(Posts::Root).is_in(roots))
                                .order_by(Posts::Root, order)
                                .order_by(Posts::Path, Order::Asc)
                                .order_by(Posts::Id, Order::Asc);
                        }
                    }

                    <$db_type>::build_select(stmt)
                };
                let rows = sqlx::query_as::<_, PostRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?;

                collect_rows(rows)
            }

            async fn update_post_message(
                &self,
                id: i64,
                message: &str,
            ) -> crate::interfaces::Result<Option<crate::domain::Post>> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::{Posts, POST_COLUMNS};
                use crate::storage::sql::rows::PostRow;

                let sql = {
                    let stmt = Query::update()
                        .table(Posts::Table)
                        .value(Posts::Message, message)
                        .value(Posts::IsEdited, true)
                        .and_where(Expr::col(Posts::Id).eq(id))
                        .returning(Query::returning().columns(POST_COLUMNS))
                        .to_owned();
                    <$db_type>::build_update(stmt)
                };
                let row = sqlx::query_as::<_, PostRow>(&sql)
                    .fetch_optional(&self.pool)
                    .await?;

                row.map(crate::domain::Post::try_from).transpose()
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_post_store!(super::postgres::Postgres, "postgres");
impl_post_store!(super::sqlite::Sqlite, "sqlite");
