//! Domain types shared by the storage backends and the service layer.

pub mod forum;
pub mod post;
pub mod status;
pub mod thread;
pub mod tree_path;
pub mod user;
pub mod vote;

pub use forum::{Forum, NewForum};
pub use post::{NewPost, Post, PostFull, PostQuery, Related, Relation, SortMode, UnknownSortMode};
pub use status::Status;
pub use thread::{NewThread, Thread, ThreadPage, ThreadRef, ThreadUpdate};
pub use tree_path::{TreePath, TreePathError};
pub use user::{User, UserPage, UserUpdate};
pub use vote::Vote;
