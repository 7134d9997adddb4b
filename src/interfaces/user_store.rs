//! Identity storage interface.

use async_trait::async_trait;

use super::Result;
use crate::domain::{User, UserUpdate};

/// Users keyed by case-insensitive nickname.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user.
    ///
    /// Fails with `UniqueViolation` when the nickname (any case) or the email
    /// is already taken.
    async fn insert_user(&self, user: &User) -> Result<()>;

    /// Look up a user by nickname, ignoring case.
    async fn find_user(&self, nickname: &str) -> Result<Option<User>>;

    /// Every user whose nickname (ignoring case) or email matches.
    async fn find_users_by_nickname_or_email(
        &self,
        nickname: &str,
        email: &str,
    ) -> Result<Vec<User>>;

    /// Merge the non-empty fields of `update` into the stored profile.
    ///
    /// Returns `None` when no such user exists.
    async fn update_user(&self, nickname: &str, update: &UserUpdate) -> Result<Option<User>>;
}
