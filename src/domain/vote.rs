//! Thread votes.

use serde::{Deserialize, Serialize};

/// One user's vote on a thread. At most one exists per (thread, nickname).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub nickname: String,
    pub voice: i32,
    #[serde(skip)]
    pub thread_id: i64,
}

impl Vote {
    /// Only up- and down-votes are accepted.
    pub fn is_valid_voice(voice: i32) -> bool {
        voice == 1 || voice == -1
    }
}
