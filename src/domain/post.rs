//! Posts and the query shapes used to page through a thread's reply tree.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Forum, Thread, TreePath, User};

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    /// Id of the post replied to; 0 for top-level posts.
    pub parent: i64,
    pub author: String,
    pub message: String,
    #[serde(rename = "isEdited")]
    pub is_edited: bool,
    /// Slug of the forum owning the thread.
    pub forum: String,
    pub thread: i64,
    pub created: DateTime<Utc>,
    /// Materialized path, root ancestor first, this post's id last.
    #[serde(skip)]
    pub path: TreePath,
}

impl Post {
    pub fn is_top_level(&self) -> bool {
        self.parent == 0
    }
}

/// One post of an append batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub parent: i64,
    pub author: String,
    pub message: String,
}

/// Relations that may be expanded alongside a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relation {
    Author,
    Forum,
    Thread,
}

/// Set of relations requested for a post lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Related(BTreeSet<Relation>);

impl Related {
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `user,thread`. Unknown tokens are ignored.
    pub fn parse(list: &str) -> Self {
        let relations = list
            .split(',')
            .filter_map(|token| match token.trim() {
                "user" | "author" => Some(Relation::Author),
                "forum" => Some(Relation::Forum),
                "thread" => Some(Relation::Thread),
                _ => None,
            })
            .collect();
        Self(relations)
    }

    pub fn with(mut self, relation: Relation) -> Self {
        self.0.insert(relation);
        self
    }

    pub fn contains(&self, relation: Relation) -> bool {
        self.0.contains(&relation)
    }

    pub fn iter(&self) -> impl Iterator<Item = Relation> + '_ {
        self.0.iter().copied()
    }
}

/// A post with optionally expanded relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFull {
    pub post: Post,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forum: Option<Forum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
}

/// Ordering used when listing a thread's posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// By id, i.e. creation order.
    #[default]
    Flat,
    /// Depth-first by materialized path.
    Tree,
    /// Depth-first, paginated by top-level post.
    ParentTree,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort mode {0:?}")]
pub struct UnknownSortMode(pub String);

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "flat" => Ok(SortMode::Flat),
            "tree" => Ok(SortMode::Tree),
            "parent_tree" => Ok(SortMode::ParentTree),
            other => Err(UnknownSortMode(other.to_string())),
        }
    }
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Flat => "flat",
            SortMode::Tree => "tree",
            SortMode::ParentTree => "parent_tree",
        }
    }
}

/// Keyset query over one thread's posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Maximum number of posts (top-level posts for `ParentTree`); 0 means unbounded.
    pub limit: u32,
    /// Id of the cursor post; results start strictly after it.
    pub since: Option<i64>,
    pub sort: SortMode,
    pub desc: bool,
}

impl PostQuery {
    pub fn new(sort: SortMode) -> Self {
        Self {
            sort,
            ..Default::default()
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn since(mut self, since: i64) -> Self {
        self.since = Some(since);
        self
    }

    pub fn desc(mut self, desc: bool) -> Self {
        self.desc = desc;
        self
    }

    /// Build a query from raw request parameters.
    pub fn from_params(
        limit: u32,
        since: Option<i64>,
        sort: &str,
        desc: bool,
    ) -> Result<Self, UnknownSortMode> {
        Ok(Self {
            limit,
            since,
            sort: sort.parse()?,
            desc,
        })
    }

    /// Cursor, with non-positive ids treated as absent.
    pub fn cursor(&self) -> Option<i64> {
        self.since.filter(|id| *id > 0)
    }
}
