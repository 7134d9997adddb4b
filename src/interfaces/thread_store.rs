//! Thread storage interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Result;
use crate::domain::{NewThread, Thread, ThreadPage, ThreadUpdate};

#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// Insert a thread and account for it on the owning forum.
    ///
    /// `thread.forum` and `thread.author` must already be canonical. Bumps the
    /// forum's thread count and records the author as a forum member in the
    /// same transaction. Fails with `UniqueViolation` on a taken slug.
    async fn insert_thread(&self, thread: &NewThread, created: DateTime<Utc>) -> Result<Thread>;

    async fn find_thread(&self, id: i64) -> Result<Option<Thread>>;

    async fn find_thread_by_slug(&self, slug: &str) -> Result<Option<Thread>>;

    /// Threads of a forum ordered by creation time.
    async fn forum_threads(&self, forum: &str, page: &ThreadPage) -> Result<Vec<Thread>>;

    /// Merge the non-empty fields of `update`. Returns `None` for unknown ids.
    async fn update_thread(&self, id: i64, update: &ThreadUpdate) -> Result<Option<Thread>>;
}
