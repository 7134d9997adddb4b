//! Forum command/query surface.
//!
//! [`ForumService`] is what a delivery layer (HTTP handlers, an admin tool)
//! calls. It validates references, runs the create-or-fetch conflict handling
//! and turns storage errors into [`ForumError`]s.

mod created;
mod error;
mod forums;
mod posts;
mod status;
mod threads;
mod users;
mod votes;


pub use created::Created;
pub use error::{ForumError, Result};

use crate::domain::{Forum, User};
use crate::storage::Stores;

/// Operations over users, forums, threads, posts and votes.
#[derive(Clone)]
pub struct ForumService {
    stores: Stores,
}

impl ForumService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Resolve a nickname (any case) to the stored user.
    async fn require_user(&self, nickname: &str) -> Result<User> {
        self.stores
            .users
            .find_user(nickname)
            .await?
            .ok_or_else(|| ForumError::not_found("user", nickname))
    }

    async fn require_forum(&self, slug: &str) -> Result<Forum> {
        self.stores
            .forums
            .find_forum(slug)
            .await?
            .ok_or_else(|| ForumError::not_found("forum", slug))
    }
}
