//! Whole-store maintenance interface.

use async_trait::async_trait;

use super::Result;
use crate::domain::Status;

#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// Count users, forums, threads and posts.
    async fn status(&self) -> Result<Status>;

    /// Delete every entity in a single transaction.
    async fn clear(&self) -> Result<()>;
}
