//! Mock storage implementation for testing.
//!
//! A single in-memory store implements every storage trait so that foreign
//! keys, uniqueness and forum counters behave as they do in SQL.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::helpers::truncate_to_millis;
use super::{
    ForumStore, PostStore, Result, ServiceStore, StorageError, ThreadStore, UserStore, VoteStore,
};
use crate::domain::{
    Forum, NewForum, NewPost, NewThread, Post, PostQuery, SortMode, Status, Thread, ThreadPage,
    ThreadUpdate, TreePath, User, UserPage, UserUpdate, Vote,
};

fn unique(constraint: &str) -> StorageError {
    StorageError::UniqueViolation {
        constraint: Some(constraint.to_string()),
    }
}

fn foreign_key(constraint: &str) -> StorageError {
    StorageError::ForeignKeyViolation {
        constraint: Some(constraint.to_string()),
    }
}

fn take_limit<T>(items: impl Iterator<Item = T>, limit: u32) -> Vec<T> {
    if limit == 0 {
        items.collect()
    } else {
        items.take(limit as usize).collect()
    }
}

#[derive(Default)]
struct MockState {
    /// Keyed by lowercased nickname.
    users: BTreeMap<String, User>,
    forums: HashMap<String, Forum>,
    threads: BTreeMap<i64, Thread>,
    posts: BTreeMap<i64, Post>,
    votes: HashMap<(i64, String), i32>,
    /// (forum slug, canonical nickname).
    forum_users: BTreeSet<(String, String)>,
    last_thread_id: i64,
    last_post_id: i64,
}

impl MockState {
    fn user_exact(&self, nickname: &str) -> bool {
        self.users
            .get(&nickname.to_ascii_lowercase())
            .is_some_and(|u| u.nickname == nickname)
    }

    fn email_owner(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }

    fn recount_votes(&mut self, thread_id: i64) {
        let sum: i64 = self
            .votes
            .iter()
            .filter(|((thread, _), _)| *thread == thread_id)
            .map(|(_, voice)| i64::from(*voice))
            .sum();
        if let Some(thread) = self.threads.get_mut(&thread_id) {
            thread.votes = sum;
        }
    }
}

/// In-memory store with the constraint behavior of the SQL schema.
#[derive(Default)]
pub struct MockStore {
    state: RwLock<MockState>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MockStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut state = self.state.write().await;
        let key = user.nickname.to_ascii_lowercase();
        if state.users.contains_key(&key) {
            return Err(unique("users_nickname_lower_idx"));
        }
        if state.email_owner(&user.email).is_some() {
            return Err(unique("users_email_idx"));
        }
        state.users.insert(key, user.clone());
        Ok(())
    }

    async fn find_user(&self, nickname: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&nickname.to_ascii_lowercase()).cloned())
    }

    async fn find_users_by_nickname_or_email(
        &self,
        nickname: &str,
        email: &str,
    ) -> Result<Vec<User>> {
        let state = self.state.read().await;
        let key = nickname.to_ascii_lowercase();
        let mut users: Vec<User> = state
            .users
            .iter()
            .filter(|(k, u)| **k == key || u.email == email)
            .map(|(_, u)| u.clone())
            .collect();
        users.sort_by(|a, b| a.nickname.cmp(&b.nickname));
        Ok(users)
    }

    async fn update_user(&self, nickname: &str, update: &UserUpdate) -> Result<Option<User>> {
        let mut state = self.state.write().await;
        let key = nickname.to_ascii_lowercase();
        if !state.users.contains_key(&key) {
            return Ok(None);
        }
        if !update.email.is_empty() {
            if let Some(owner) = state.email_owner(&update.email) {
                if owner.nickname.to_ascii_lowercase() != key {
                    return Err(unique("users_email_idx"));
                }
            }
        }
        Ok(state.users.get_mut(&key).map(|user| {
            update.apply(user);
            user.clone()
        }))
    }
}

#[async_trait]
impl ForumStore for MockStore {
    async fn insert_forum(&self, forum: &NewForum) -> Result<Forum> {
        let mut state = self.state.write().await;
        if state.forums.contains_key(&forum.slug) {
            return Err(unique("forums_pkey"));
        }
        if !state.user_exact(&forum.owner) {
            return Err(foreign_key("forums_owner_fkey"));
        }
        let stored = Forum {
            title: forum.title.clone(),
            owner: forum.owner.clone(),
            slug: forum.slug.clone(),
            post_count: 0,
            thread_count: 0,
        };
        state.forums.insert(forum.slug.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_forum(&self, slug: &str) -> Result<Option<Forum>> {
        let state = self.state.read().await;
        Ok(state.forums.get(slug).cloned())
    }

    async fn forum_users(&self, slug: &str, page: &UserPage) -> Result<Vec<User>> {
        let state = self.state.read().await;
        let since = page.since.as_deref().map(str::to_ascii_lowercase);

        let mut members: Vec<(String, User)> = state
            .forum_users
            .iter()
            .filter(|(forum, _)| forum == slug)
            .filter_map(|(_, nickname)| {
                let key = nickname.to_ascii_lowercase();
                state.users.get(&key).map(|u| (key, u.clone()))
            })
            .filter(|(key, _)| match &since {
                Some(since) if page.desc => key < since,
                Some(since) => key > since,
                None => true,
            })
            .collect();
        members.sort_by(|a, b| a.0.cmp(&b.0));
        if page.desc {
            members.reverse();
        }

        Ok(take_limit(members.into_iter().map(|(_, u)| u), page.limit))
    }
}

#[async_trait]
impl ThreadStore for MockStore {
    async fn insert_thread(&self, thread: &NewThread, created: DateTime<Utc>) -> Result<Thread> {
        let mut state = self.state.write().await;
        let slug = thread.normalized_slug().map(str::to_string);
        if let Some(slug) = &slug {
            if state.threads.values().any(|t| t.slug.as_ref() == Some(slug)) {
                return Err(unique("threads_slug_key"));
            }
        }
        if !state.user_exact(&thread.author) {
            return Err(foreign_key("threads_author_fkey"));
        }
        let Some(forum) = state.forums.get_mut(&thread.forum) else {
            return Err(foreign_key("threads_forum_fkey"));
        };
        forum.thread_count += 1;

        state.last_thread_id += 1;
        let stored = Thread {
            id: state.last_thread_id,
            title: thread.title.clone(),
            author: thread.author.clone(),
            forum: thread.forum.clone(),
            message: thread.message.clone(),
            votes: 0,
            slug,
            created: truncate_to_millis(created),
        };
        state.threads.insert(stored.id, stored.clone());
        state
            .forum_users
            .insert((thread.forum.clone(), thread.author.clone()));
        Ok(stored)
    }

    async fn find_thread(&self, id: i64) -> Result<Option<Thread>> {
        let state = self.state.read().await;
        Ok(state.threads.get(&id).cloned())
    }

    async fn find_thread_by_slug(&self, slug: &str) -> Result<Option<Thread>> {
        let state = self.state.read().await;
        Ok(state
            .threads
            .values()
            .find(|t| t.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn forum_threads(&self, forum: &str, page: &ThreadPage) -> Result<Vec<Thread>> {
        let state = self.state.read().await;
        let mut threads: Vec<Thread> = state
            .threads
            .values()
            .filter(|t| t.forum == forum)
            .filter(|t| match &page.since {
                Some(since) if page.desc => t.created <= *since,
                Some(since) => t.created >= *since,
                None => true,
            })
            .cloned()
            .collect();
        threads.sort_by_key(|t| (t.created, t.id));
        if page.desc {
            threads.reverse();
        }
        Ok(take_limit(threads.into_iter(), page.limit))
    }

    async fn update_thread(&self, id: i64, update: &ThreadUpdate) -> Result<Option<Thread>> {
        let mut state = self.state.write().await;
        Ok(state.threads.get_mut(&id).map(|thread| {
            update.apply(thread);
            thread.clone()
        }))
    }
}

#[async_trait]
impl PostStore for MockStore {
    async fn append_posts(
        &self,
        thread: &Thread,
        posts: &[NewPost],
        created: DateTime<Utc>,
    ) -> Result<Vec<Post>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let mut state = self.state.write().await;
        if !state.threads.contains_key(&thread.id) {
            return Err(foreign_key("posts_thread_fkey"));
        }
        let created = truncate_to_millis(created);

        // Stage the whole batch; nothing is written unless every post resolves.
        let mut next_id = state.last_post_id;
        let mut staged: Vec<Post> = Vec::with_capacity(posts.len());
        for new_post in posts {
            let author = state
                .users
                .get(&new_post.author.to_ascii_lowercase())
                .map(|u| u.nickname.clone())
                .ok_or_else(|| StorageError::missing("user", &new_post.author))?;

            next_id += 1;
            let path = if new_post.parent == 0 {
                TreePath::root(next_id)
            } else {
                let parent = state
                    .posts
                    .get(&new_post.parent)
                    .or_else(|| staged.iter().find(|p| p.id == new_post.parent))
                    .filter(|p| p.thread == thread.id)
                    .ok_or(StorageError::ParentNotFound {
                        parent: new_post.parent,
                        thread: thread.id,
                    })?;
                parent.path.child(next_id)
            };

            staged.push(Post {
                id: next_id,
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

        state.last_post_id = next_id;
        if let Some(forum) = state.forums.get_mut(&thread.forum) {
            forum.post_count += staged.len() as i64;
        }
        for post in &staged {
            state.posts.insert(post.id, post.clone());
            state
                .forum_users
                .insert((thread.forum.clone(), post.author.clone()));
        }
        Ok(staged)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>> {
        let state = self.state.read().await;
        Ok(state.posts.get(&id).cloned())
    }

    async fn thread_posts(&self, thread_id: i64, query: &PostQuery) -> Result<Vec<Post>> {
        let guard = self.state.read().await;
        let state: &MockState = &guard;
        let in_thread = move || state.posts.values().filter(move |p| p.thread == thread_id);

        let cursor = match (query.sort, query.cursor()) {
            (SortMode::Flat, _) | (_, None) => None,
            (_, Some(since)) => match in_thread().find(|p| p.id == since) {
                Some(post) => Some(post.path.clone()),
                None => return Ok(Vec::new()),
            },
        };

        let posts = match query.sort {
            SortMode::Flat => {
                let mut posts: Vec<&Post> = in_thread()
                    .filter(|p| match query.cursor() {
                        Some(since) if query.desc => p.id < since,
                        Some(since) => p.id > since,
                        None => true,
                    })
                    .collect();
                if query.desc {
                    posts.reverse();
                }
                take_limit(posts.into_iter().cloned(), query.limit)
            }
            SortMode::Tree => {
                let mut posts: Vec<&Post> = in_thread()
                    .filter(|p| match &cursor {
                        Some(since) if query.desc => p.path < *since,
                        Some(since) => p.path > *since,
                        None => true,
                    })
                    .collect();
                posts.sort_by(|a, b| a.path.cmp(&b.path).then(a.id.cmp(&b.id)));
                if query.desc {
                    posts.reverse();
                }
                take_limit(posts.into_iter().cloned(), query.limit)
            }
            SortMode::ParentTree => {
                let since_root = cursor.as_ref().and_then(TreePath::root_id);
                let mut roots: Vec<i64> = in_thread()
                    .filter(|p| p.is_top_level())
                    .map(|p| p.id)
                    .filter(|id| match since_root {
                        Some(since) if query.desc => *id < since,
                        Some(since) => *id > since,
                        None => true,
                    })
                    .collect();
                if query.desc {
                    roots.reverse();
                }
                let roots = take_limit(roots.into_iter(), query.limit);

                let mut posts = Vec::new();
                for root in roots {
                    let mut subtree: Vec<&Post> = in_thread()
                        .filter(|p| p.path.root_id() == Some(root))
                        .collect();
                    subtree.sort_by(|a, b| a.path.cmp(&b.path).then(a.id.cmp(&b.id)));
                    posts.extend(subtree.into_iter().cloned());
                }
                posts
            }
        };

        Ok(posts)
    }

    async fn update_post_message(&self, id: i64, message: &str) -> Result<Option<Post>> {
        let mut state = self.state.write().await;
        Ok(state.posts.get_mut(&id).map(|post| {
            post.message = message.to_string();
            post.is_edited = true;
            post.clone()
        }))
    }
}

#[async_trait]
impl VoteStore for MockStore {
    async fn insert_vote(&self, vote: &Vote) -> Result<()> {
        let mut state = self.state.write().await;
        let key = (vote.thread_id, vote.nickname.clone());
        if state.votes.contains_key(&key) {
            return Err(unique("votes_pkey"));
        }
        if !state.threads.contains_key(&vote.thread_id) {
            return Err(foreign_key("votes_thread_fkey"));
        }
        if !state.user_exact(&vote.nickname) {
            return Err(foreign_key("votes_nickname_fkey"));
        }
        state.votes.insert(key, vote.voice);
        state.recount_votes(vote.thread_id);
        Ok(())
    }

    async fn update_vote(&self, vote: &Vote) -> Result<bool> {
        let mut state = self.state.write().await;
        let key = (vote.thread_id, vote.nickname.clone());
        match state.votes.get_mut(&key) {
            Some(voice) => *voice = vote.voice,
            None => return Ok(false),
        }
        state.recount_votes(vote.thread_id);
        Ok(true)
    }
}

#[async_trait]
impl ServiceStore for MockStore {
    async fn status(&self) -> Result<Status> {
        let state = self.state.read().await;
        Ok(Status {
            users: state.users.len() as i64,
            forums: state.forums.len() as i64,
            threads: state.threads.len() as i64,
            posts: state.posts.len() as i64,
        })
    }

    async fn clear(&self) -> Result<()> {
        let mut state = self.state.write().await;
        // Ids keep increasing across a reset, like SQL sequences.
        *state = MockState {
            last_thread_id: state.last_thread_id,
            last_post_id: state.last_post_id,
            ..MockState::default()
        };
        Ok(())
    }
}
