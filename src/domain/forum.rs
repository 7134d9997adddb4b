//! Forums: the top-level grouping of threads.

use serde::{Deserialize, Serialize};

/// A forum with its denormalized child counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forum {
    pub title: String,
    /// Owner nickname, canonical spelling.
    #[serde(rename = "user")]
    pub owner: String,
    pub slug: String,
    #[serde(rename = "posts", default)]
    pub post_count: i64,
    #[serde(rename = "threads", default)]
    pub thread_count: i64,
}

/// Forum creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewForum {
    pub title: String,
    #[serde(rename = "user")]
    pub owner: String,
    pub slug: String,
}
