//! Vote ledger operations.

use tracing::{debug, instrument};

use super::{ForumError, ForumService, Result};
use crate::domain::{Thread, ThreadRef, Vote};
use crate::interfaces::StorageError;

impl ForumService {
    /// Cast or change `nickname`'s vote on a thread.
    ///
    /// A repeated vote replaces the previous voice. Returns the thread with
    /// its refreshed vote total.
    #[instrument(name = "thread.vote", skip(self))]
    pub async fn vote(&self, thread: &ThreadRef, nickname: &str, voice: i32) -> Result<Thread> {
        if !Vote::is_valid_voice(voice) {
            return Err(ForumError::InvalidInput(format!(
                "voice must be 1 or -1, got {}",
                voice
            )));
        }
        let user = self.require_user(nickname).await?;
        let thread = self.resolve_thread(thread).await?;
        let vote = Vote {
            nickname: user.nickname,
            voice,
            thread_id: thread.id,
        };

        match self.stores.votes.insert_vote(&vote).await {
            Ok(()) => {}
            Err(err) if err.is_unique_violation() => {
                debug!("already voted, updating voice");
                if !self.stores.votes.update_vote(&vote).await? {
                    // The earlier vote disappeared in between; record this one fresh.
                    self.stores
                        .votes
                        .insert_vote(&vote)
                        .await
                        .map_err(ForumError::from_storage)?;
                }
            }
            Err(StorageError::ForeignKeyViolation { .. }) => {
                return Err(ForumError::not_found("thread", thread.id));
            }
            Err(err) => return Err(ForumError::from_storage(err)),
        }

        self.thread_info(thread.id).await
    }
}
