use serde::{Deserialize, Serialize};

/// Point-in-time entity counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "user")]
    pub users: i64,
    #[serde(rename = "forum")]
    pub forums: i64,
    #[serde(rename = "thread")]
    pub threads: i64,
    #[serde(rename = "post")]
    pub posts: i64,
}
