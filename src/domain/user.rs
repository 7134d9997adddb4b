//! Forum members.

use serde::{Deserialize, Serialize};

/// A registered user. `nickname` is unique case-insensitively, `email` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub nickname: String,
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(default)]
    pub about: String,
    pub email: String,
}

/// Partial profile update. Empty fields keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserUpdate {
    #[serde(rename = "fullname")]
    pub full_name: String,
    pub about: String,
    pub email: String,
}

impl UserUpdate {
    /// Overlay the non-empty fields onto `user`.
    pub fn apply(&self, user: &mut User) {
        if !self.full_name.is_empty() {
            user.full_name = self.full_name.clone();
        }
        if !self.about.is_empty() {
            user.about = self.about.clone();
        }
        if !self.email.is_empty() {
            user.email = self.email.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full_name.is_empty() && self.about.is_empty() && self.email.is_empty()
    }
}

/// Keyset page over nicknames, used for forum membership listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPage {
    /// Maximum number of users; 0 means unbounded.
    pub limit: u32,
    /// Exclusive nickname cursor.
    pub since: Option<String>,
    pub desc: bool,
}
