//! Post tree storage interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Result;
use crate::domain::{NewPost, Post, PostQuery, Thread};

/// Posts of a thread organized as a forest of reply chains.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Append a batch of posts to `thread`, all stamped with `created`.
    ///
    /// All-or-nothing: ids are assigned in input order, each post's path
    /// extends its parent's, and the first unknown author
    /// (`MissingReference`) or parent outside the thread (`ParentNotFound`)
    /// rolls the whole batch back. Forum post count and membership are
    /// updated in the same transaction.
    async fn append_posts(
        &self,
        thread: &Thread,
        posts: &[NewPost],
        created: DateTime<Utc>,
    ) -> Result<Vec<Post>>;

    async fn find_post(&self, id: i64) -> Result<Option<Post>>;

    /// One page of a thread's posts in the requested order.
    async fn thread_posts(&self, thread_id: i64, query: &PostQuery) -> Result<Vec<Post>>;

    /// Replace the message and mark the post edited. Returns `None` for unknown ids.
    async fn update_post_message(&self, id: i64, message: &str) -> Result<Option<Post>>;
}
