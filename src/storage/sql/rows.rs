//! Row shapes shared by the SQL backends.
//!
//! `FromRow` is derived generically, so the same structs decode PostgreSQL and
//! SQLite rows. Conversion into domain types parses stored paths and timestamps.

use sqlx::FromRow;

use crate::domain::{Forum, Post, Thread, TreePath, User};
use crate::storage::helpers::parse_timestamp;
use crate::storage::StorageError;

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub nickname: String,
    pub fullname: String,
    pub about: String,
    pub email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            nickname: row.nickname,
            full_name: row.fullname,
            about: row.about,
            email: row.email,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ForumRow {
    pub slug: String,
    pub title: String,
    pub owner: String,
    pub posts: i64,
    pub threads: i64,
}

impl From<ForumRow> for Forum {
    fn from(row: ForumRow) -> Self {
        Forum {
            title: row.title,
            owner: row.owner,
            slug: row.slug,
            post_count: row.posts,
            thread_count: row.threads,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ThreadRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub forum: String,
    pub message: String,
    pub votes: i64,
    pub slug: Option<String>,
    pub created: String,
}

impl TryFrom<ThreadRow> for Thread {
    type Error = StorageError;

    fn try_from(row: ThreadRow) -> Result<Self, Self::Error> {
        Ok(Thread {
            id: row.id,
            title: row.title,
            author: row.author,
            forum: row.forum,
            message: row.message,
            votes: row.votes,
            slug: row.slug,
            created: parse_timestamp(&row.created)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PostRow {
    pub id: i64,
    pub parent: i64,
    pub author: String,
    pub message: String,
    pub is_edited: bool,
    pub forum: String,
    pub thread: i64,
    pub created: String,
    pub path: String,
}

impl TryFrom<PostRow> for Post {
    type Error = StorageError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            id: row.id,
            parent: row.parent,
            author: row.author,
            message: row.message,
            is_edited: row.is_edited,
            forum: row.forum,
            thread: row.thread,
            created: parse_timestamp(&row.created)?,
            path: TreePath::decode(&row.path)?,
        })
    }
}

/// Convert a batch of rows, failing on the first undecodable one.
pub(crate) fn collect_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, StorageError>
where
    T: TryFrom<R, Error = StorageError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// The `path`/`root` pair of a cursor post.
#[derive(Debug, FromRow)]
pub(crate) struct PathRow {
    pub path: String,
    pub root: i64,
}

/// A single `id` column.
#[derive(Debug, FromRow)]
pub(crate) struct IdRow {
    pub id: i64,
}

/// A single `nickname` column.
#[derive(Debug, FromRow)]
pub(crate) struct NicknameRow {
    pub nickname: String,
}

#[derive(Debug, FromRow)]
pub(crate) struct StatusRow {
    pub users: i64,
    pub forums: i64,
    pub threads: i64,
    pub posts: i64,
}
