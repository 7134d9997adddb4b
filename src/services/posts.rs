//! Post tree operations.

use chrono::Utc;
use tracing::{debug, instrument};

use super::{ForumError, ForumService, Result};
use crate::domain::{NewPost, Post, PostFull, PostQuery, Related, Relation, ThreadRef};

impl ForumService {
    /// Append a batch of posts to a thread.
    ///
    /// The batch shares one creation time and is all-or-nothing: an unknown
    /// author is `NotFound`, a parent outside the thread is `Conflict`, and in
    /// both cases nothing is stored.
    #[instrument(name = "post.append", skip(self, posts), fields(count = posts.len()))]
    pub async fn append_posts(&self, thread: &ThreadRef, posts: Vec<NewPost>) -> Result<Vec<Post>> {
        let thread = self.resolve_thread(thread).await?;
        let created = self
            .stores
            .posts
            .append_posts(&thread, &posts, Utc::now())
            .await
            .map_err(|err| {
                debug!(error = %err, "batch rejected");
                ForumError::from_storage(err)
            })?;
        Ok(created)
    }

    /// One page of a thread's posts.
    #[instrument(name = "post.list", skip(self))]
    pub async fn thread_posts(&self, thread: &ThreadRef, query: PostQuery) -> Result<Vec<Post>> {
        let thread = self.resolve_thread(thread).await?;
        Ok(self.stores.posts.thread_posts(thread.id, &query).await?)
    }

    /// [`thread_posts`](Self::thread_posts) from raw request parameters.
    /// An unknown `sort` is `InvalidInput`.
    pub async fn query_posts(
        &self,
        thread: &ThreadRef,
        limit: u32,
        since: Option<i64>,
        sort: &str,
        desc: bool,
    ) -> Result<Vec<Post>> {
        let query = PostQuery::from_params(limit, since, sort, desc)?;
        self.thread_posts(thread, query).await
    }

    /// A post with the requested relations expanded. Any failed expansion
    /// fails the whole lookup.
    #[instrument(name = "post.get", skip(self))]
    pub async fn get_post(&self, id: i64, related: &Related) -> Result<PostFull> {
        let post = self.require_post(id).await?;
        let mut full = PostFull {
            author: None,
            forum: None,
            thread: None,
            post,
        };

        for relation in related.iter() {
            match relation {
                Relation::Author => {
                    full.author = Some(self.require_user(&full.post.author).await?);
                }
                Relation::Forum => {
                    full.forum = Some(self.require_forum(&full.post.forum).await?);
                }
                Relation::Thread => {
                    full.thread = Some(self.thread_info(full.post.thread).await?);
                }
            }
        }

        Ok(full)
    }

    /// Replace a post's message.
    ///
    /// An empty or unchanged message is a no-op that returns the stored post
    /// as is; otherwise the post is marked edited.
    #[instrument(name = "post.edit", skip(self, message))]
    pub async fn edit_post(&self, id: i64, message: &str) -> Result<Post> {
        let post = self.require_post(id).await?;
        if message.is_empty() || message == post.message {
            return Ok(post);
        }

        self.stores
            .posts
            .update_post_message(id, message)
            .await?
            .ok_or_else(|| ForumError::not_found("post", id))
    }

    async fn require_post(&self, id: i64) -> Result<Post> {
        self.stores
            .posts
            .find_post(id)
            .await?
            .ok_or_else(|| ForumError::not_found("post", id))
    }
}
