//! Vote ledger interface.

use async_trait::async_trait;

use super::Result;
use crate::domain::Vote;

/// One vote per (thread, nickname); the thread's `votes` aggregate is kept
/// equal to the sum of its voices.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Record a first vote. Fails with `UniqueViolation` if the user already voted.
    async fn insert_vote(&self, vote: &Vote) -> Result<()>;

    /// Change an existing vote. Returns false if there was none.
    async fn update_vote(&self, vote: &Vote) -> Result<bool>;
}
