//! Forum storage interface.

use async_trait::async_trait;

use super::Result;
use crate::domain::{Forum, NewForum, User, UserPage};

#[async_trait]
pub trait ForumStore: Send + Sync {
    /// Insert a forum. `forum.owner` must already be the canonical nickname.
    ///
    /// Fails with `UniqueViolation` on a taken slug and `ForeignKeyViolation`
    /// when the owner does not exist.
    async fn insert_forum(&self, forum: &NewForum) -> Result<Forum>;

    async fn find_forum(&self, slug: &str) -> Result<Option<Forum>>;

    /// Users who authored a thread or post in the forum, paged by nickname.
    async fn forum_users(&self, slug: &str, page: &UserPage) -> Result<Vec<User>>;
}
