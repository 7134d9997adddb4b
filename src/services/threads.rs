//! Thread operations.

use chrono::Utc;
use tracing::{debug, instrument};

use super::{Created, ForumError, ForumService, Result};
use crate::domain::{NewThread, Thread, ThreadRef, ThreadUpdate};
use crate::interfaces::StorageError;

impl ForumService {
    /// Open a thread in `thread.forum`, or return the one already holding its slug.
    ///
    /// Forum and author are resolved to their canonical keys first; a missing
    /// `created` defaults to now.
    #[instrument(name = "thread.create", skip_all, fields(forum = %thread.forum, slug = ?thread.slug))]
    pub async fn create_thread(&self, thread: NewThread) -> Result<Created<Thread>> {
        let forum = self.require_forum(&thread.forum).await?;
        let author = self.require_user(&thread.author).await?;
        let created = thread.created.unwrap_or_else(Utc::now);
        let thread = NewThread {
            forum: forum.slug,
            author: author.nickname,
            ..thread
        };

        match self.stores.threads.insert_thread(&thread, created).await {
            Ok(created) => Ok(Created::New(created)),
            Err(err) if err.is_unique_violation() => {
                let Some(slug) = thread.normalized_slug() else {
                    return Err(ForumError::Internal(err));
                };
                debug!("slug taken, fetching existing thread");
                let existing = self
                    .stores
                    .threads
                    .find_thread_by_slug(slug)
                    .await?
                    .ok_or_else(|| ForumError::not_found("thread", slug))?;
                Ok(Created::Existing(existing))
            }
            Err(StorageError::ForeignKeyViolation { .. }) => {
                // Forum or author vanished between the lookups and the insert.
                self.require_forum(&thread.forum).await?;
                Err(ForumError::not_found("user", &thread.author))
            }
            Err(err) => Err(ForumError::from_storage(err)),
        }
    }

    /// Look a thread up by id or slug.
    #[instrument(name = "thread.resolve", skip(self))]
    pub async fn resolve_thread(&self, thread: &ThreadRef) -> Result<Thread> {
        let found = match thread {
            ThreadRef::Id(id) => self.stores.threads.find_thread(*id).await?,
            ThreadRef::Slug(slug) => self.stores.threads.find_thread_by_slug(slug).await?,
        };
        found.ok_or_else(|| ForumError::not_found("thread", thread))
    }

    #[instrument(name = "thread.id", skip(self))]
    pub async fn thread_id(&self, slug: &str) -> Result<i64> {
        self.stores
            .threads
            .find_thread_by_slug(slug)
            .await?
            .map(|thread| thread.id)
            .ok_or_else(|| ForumError::not_found("thread", slug))
    }

    #[instrument(name = "thread.info", skip(self))]
    pub async fn thread_info(&self, id: i64) -> Result<Thread> {
        self.stores
            .threads
            .find_thread(id)
            .await?
            .ok_or_else(|| ForumError::not_found("thread", id))
    }

    /// Merge the non-empty `title`/`message` of `update`.
    #[instrument(name = "thread.update", skip(self, update))]
    pub async fn update_thread(&self, thread: &ThreadRef, update: ThreadUpdate) -> Result<Thread> {
        let current = self.resolve_thread(thread).await?;
        self.stores
            .threads
            .update_thread(current.id, &update)
            .await?
            .ok_or_else(|| ForumError::not_found("thread", current.id))
    }
}
