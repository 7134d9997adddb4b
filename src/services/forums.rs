//! Forum operations.

use tracing::{debug, instrument};

use super::{Created, ForumError, ForumService, Result};
use crate::domain::{Forum, NewForum, Thread, ThreadPage, User, UserPage};
use crate::interfaces::StorageError;

impl ForumService {
    /// Create a forum, or return the one already holding `forum.slug`.
    ///
    /// The owner is resolved ignoring case and stored with its canonical
    /// spelling.
    #[instrument(name = "forum.create", skip_all, fields(slug = %forum.slug))]
    pub async fn create_forum(&self, forum: NewForum) -> Result<Created<Forum>> {
        if forum.slug.is_empty() {
            return Err(ForumError::InvalidInput("forum slug is required".to_string()));
        }
        let owner = self.require_user(&forum.owner).await?;
        let forum = NewForum {
            owner: owner.nickname,
            ..forum
        };

        match self.stores.forums.insert_forum(&forum).await {
            Ok(created) => Ok(Created::New(created)),
            Err(err) if err.is_unique_violation() => {
                debug!("slug taken, fetching existing forum");
                let existing = self.require_forum(&forum.slug).await?;
                Ok(Created::Existing(existing))
            }
            Err(StorageError::ForeignKeyViolation { .. }) => {
                Err(ForumError::not_found("user", &forum.owner))
            }
            Err(err) => Err(ForumError::from_storage(err)),
        }
    }

    #[instrument(name = "forum.get", skip(self))]
    pub async fn get_forum(&self, slug: &str) -> Result<Forum> {
        self.require_forum(slug).await
    }

    /// Users who posted or opened a thread in the forum, paged by nickname.
    #[instrument(name = "forum.users", skip(self))]
    pub async fn forum_users(&self, slug: &str, page: UserPage) -> Result<Vec<User>> {
        let forum = self.require_forum(slug).await?;
        Ok(self.stores.forums.forum_users(&forum.slug, &page).await?)
    }

    /// Threads of the forum by creation time.
    #[instrument(name = "forum.threads", skip(self))]
    pub async fn forum_threads(&self, slug: &str, page: ThreadPage) -> Result<Vec<Thread>> {
        let forum = self.require_forum(slug).await?;
        Ok(self.stores.threads.forum_threads(&forum.slug, &page).await?)
    }
}
