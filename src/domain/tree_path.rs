//! Materialized ancestor path of a post.
//!
//! A path is the sequence of post ids from the top-level ancestor down to the
//! post itself. Ordering is lexicographic over the ids with a proper prefix
//! sorting first, which yields depth-first reply order within a thread.
//!
//! SQL backends store paths as fixed-width text so the database's byte order
//! agrees with [`TreePath`]'s `Ord`:
//!
//! ```text
//! [1, 12, 305] -> "0000000000000000001.0000000000000000012.0000000000000000305"
//! ```

use std::fmt;
use std::str::FromStr;

/// Digits per encoded segment. Wide enough for any positive `i64`.
pub const SEGMENT_WIDTH: usize = 19;

/// Separator between encoded segments.
pub const SEGMENT_SEPARATOR: char = '.';

/// Errors from decoding a stored path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreePathError {
    #[error("empty path")]
    Empty,

    #[error("malformed path segment {segment:?}")]
    Segment { segment: String },
}

/// Ordered sequence of post ids from the top-level ancestor to a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreePath(Vec<i64>);

impl TreePath {
    /// Path of a top-level post: just its own id.
    pub fn root(id: i64) -> Self {
        Self(vec![id])
    }

    /// Path of a reply to the post owning `self`.
    pub fn child(&self, id: i64) -> Self {
        let mut ids = Vec::with_capacity(self.0.len() + 1);
        ids.extend_from_slice(&self.0);
        ids.push(id);
        Self(ids)
    }

    /// Id of the top-level ancestor.
    pub fn root_id(&self) -> Option<i64> {
        self.0.first().copied()
    }

    /// Id of the post this path belongs to.
    pub fn leaf_id(&self) -> Option<i64> {
        self.0.last().copied()
    }

    /// Path of the parent post, `None` for top-level posts.
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() < 2 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Number of ancestors including the post itself.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `self` lies inside the subtree rooted at `ancestor`.
    pub fn starts_with(&self, ancestor: &TreePath) -> bool {
        self.0.starts_with(&ancestor.0)
    }

    pub fn ids(&self) -> &[i64] {
        &self.0
    }

    /// Fixed-width text form used as the SQL sort key.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * (SEGMENT_WIDTH + 1));
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(SEGMENT_SEPARATOR);
            }
            out.push_str(&format!("{:0width$}", id, width = SEGMENT_WIDTH));
        }
        out
    }

    /// Inverse of [`TreePath::encode`].
    pub fn decode(encoded: &str) -> Result<Self, TreePathError> {
        if encoded.is_empty() {
            return Err(TreePathError::Empty);
        }
        encoded
            .split(SEGMENT_SEPARATOR)
            .map(|segment| {
                if segment.len() != SEGMENT_WIDTH {
                    return Err(TreePathError::Segment {
                        segment: segment.to_string(),
                    });
                }
                segment
                    .parse::<i64>()
                    .ok()
                    .filter(|id| *id > 0)
                    .ok_or_else(|| TreePathError::Segment {
                        segment: segment.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<Vec<i64>> for TreePath {
    fn from(ids: Vec<i64>) -> Self {
        Self(ids)
    }
}

impl FromStr for TreePath {
    type Err = TreePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
