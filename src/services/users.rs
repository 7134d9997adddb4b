//! Identity operations.

use tracing::{debug, instrument};

use super::{Created, ForumError, ForumService, Result};
use crate::domain::{User, UserUpdate};

impl ForumService {
    /// Register a user.
    ///
    /// When the nickname (any case) or email is taken, every user matching
    /// either one is returned as the conflict state.
    #[instrument(name = "user.create", skip_all, fields(nickname = %user.nickname))]
    pub async fn create_user(&self, user: User) -> Result<Created<User, Vec<User>>> {
        if user.nickname.is_empty() {
            return Err(ForumError::InvalidInput("nickname is required".to_string()));
        }

        match self.stores.users.insert_user(&user).await {
            Ok(()) => Ok(Created::New(user)),
            Err(err) if err.is_unique_violation() => {
                debug!("nickname or email taken");
                let existing = self
                    .stores
                    .users
                    .find_users_by_nickname_or_email(&user.nickname, &user.email)
                    .await?;
                Ok(Created::Existing(existing))
            }
            Err(err) => Err(ForumError::from_storage(err)),
        }
    }

    #[instrument(name = "user.get", skip(self))]
    pub async fn get_user(&self, nickname: &str) -> Result<User> {
        self.require_user(nickname).await
    }

    /// Merge the non-empty profile fields of `update`.
    #[instrument(name = "user.update", skip(self, update))]
    pub async fn update_user(&self, nickname: &str, update: UserUpdate) -> Result<User> {
        match self.stores.users.update_user(nickname, &update).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(ForumError::not_found("user", nickname)),
            Err(err) if err.is_unique_violation() => {
                debug!(email = %update.email, "email taken");
                Err(ForumError::Conflict(format!(
                    "email {} is already registered to another user than {}",
                    update.email, nickname
                )))
            }
            Err(err) => Err(ForumError::from_storage(err)),
        }
    }
}
