//! Abstract storage interfaces.
//!
//! These traits define the contracts for:
//! - Identity storage (users)
//! - Forum storage and membership
//! - Thread storage
//! - The post tree engine
//! - The vote ledger
//! - Whole-store status and reset

pub mod forum_store;
pub mod post_store;
pub mod service_store;
pub mod storage_error;
pub mod thread_store;
pub mod user_store;
pub mod vote_store;

pub use forum_store::ForumStore;
pub use post_store::PostStore;
pub use service_store::ServiceStore;
pub use storage_error::{Result, StorageError};
pub use thread_store::ThreadStore;
pub use user_store::UserStore;
pub use vote_store::VoteStore;
