//! Threads: a titled discussion inside one forum.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored thread. `votes` is the sum of all voices cast on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Slug of the owning forum.
    pub forum: String,
    pub message: String,
    pub votes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub created: DateTime<Utc>,
}

/// Thread creation request. The forum slug comes from the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewThread {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub forum: String,
    pub message: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl NewThread {
    /// Slug to persist: empty slugs are stored as absent so they never collide.
    pub fn normalized_slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|s| !s.is_empty())
    }
}

/// Partial thread update. Empty fields keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadUpdate {
    pub title: String,
    pub message: String,
}

impl ThreadUpdate {
    pub fn apply(&self, thread: &mut Thread) {
        if !self.title.is_empty() {
            thread.title = self.title.clone();
        }
        if !self.message.is_empty() {
            thread.message = self.message.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.message.is_empty()
    }
}

/// Page over a forum's threads ordered by creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadPage {
    /// Maximum number of threads; 0 means unbounded.
    pub limit: u32,
    /// Inclusive creation-time cursor.
    pub since: Option<DateTime<Utc>>,
    pub desc: bool,
}

/// Route-level thread reference: numeric id or slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThreadRef {
    Id(i64),
    Slug(String),
}

impl ThreadRef {
    /// A purely numeric reference is an id; anything else is a slug.
    pub fn parse(slug_or_id: &str) -> Self {
        match slug_or_id.parse::<i64>() {
            Ok(id) => ThreadRef::Id(id),
            Err(_) => ThreadRef::Slug(slug_or_id.to_string()),
        }
    }
}

impl From<i64> for ThreadRef {
    fn from(id: i64) -> Self {
        ThreadRef::Id(id)
    }
}

impl fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadRef::Id(id) => write!(f, "{}", id),
            ThreadRef::Slug(slug) => f.write_str(slug),
        }
    }
}
