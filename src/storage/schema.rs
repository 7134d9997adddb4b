//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.
//! The tables themselves are created by the migrations under `migrations/`.

use sea_query::Iden;

/// Users table schema.
#[derive(Iden, Clone, Copy)]
pub enum Users {
    Table,
    #[iden = "nickname"]
    Nickname,
    #[iden = "fullname"]
    FullName,
    #[iden = "about"]
    About,
    #[iden = "email"]
    Email,
}

/// Forums table schema.
#[derive(Iden, Clone, Copy)]
pub enum Forums {
    Table,
    #[iden = "slug"]
    Slug,
    #[iden = "title"]
    Title,
    #[iden = "owner"]
    Owner,
    #[iden = "posts"]
    Posts,
    #[iden = "threads"]
    Threads,
}

/// Threads table schema.
#[derive(Iden, Clone, Copy)]
pub enum Threads {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "title"]
    Title,
    #[iden = "author"]
    Author,
    #[iden = "forum"]
    Forum,
    #[iden = "message"]
    Message,
    #[iden = "votes"]
    Votes,
    #[iden = "slug"]
    Slug,
    #[iden = "created"]
    Created,
}

/// Posts table schema.
#[derive(Iden, Clone, Copy)]
pub enum Posts {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "parent"]
    Parent,
    #[iden = "author"]
    Author,
    #[iden = "message"]
    Message,
    #[iden = "is_edited"]
    IsEdited,
    #[iden = "forum"]
    Forum,
    #[iden = "thread"]
    Thread,
    #[iden = "created"]
    Created,
    /// Encoded [`TreePath`](crate::domain::TreePath).
    #[iden = "path"]
    Path,
    /// First path element, i.e. the top-level ancestor's id.
    #[iden = "root"]
    Root,
}

/// Votes table schema.
#[derive(Iden, Clone, Copy)]
pub enum Votes {
    Table,
    #[iden = "thread"]
    Thread,
    #[iden = "nickname"]
    Nickname,
    #[iden = "voice"]
    Voice,
}

/// Forum membership join table schema.
#[derive(Iden, Clone, Copy)]
pub enum ForumUsers {
    Table,
    #[iden = "forum"]
    Forum,
    #[iden = "nickname"]
    Nickname,
}

pub const USER_COLUMNS: [Users; 4] = [Users::Nickname, Users::FullName, Users::About, Users::Email];

pub const FORUM_COLUMNS: [Forums; 5] = [
    Forums::Slug,
    Forums::Title,
    Forums::Owner,
    Forums::Posts,
    Forums::Threads,
];

pub const THREAD_COLUMNS: [Threads; 8] = [
    Threads::Id,
    Threads::Title,
    Threads::Author,
    Threads::Forum,
    Threads::Message,
    Threads::Votes,
    Threads::Slug,
    Threads::Created,
];

pub const POST_COLUMNS: [Posts; 9] = [
    Posts::Id,
    Posts::Parent,
    Posts::Author,
    Posts::Message,
    Posts::IsEdited,
    Posts::Forum,
    Posts::Thread,
    Posts::Created,
    Posts::Path,
];

/// Recompute a thread's vote aggregate from the ledger. Used as the value of
/// `threads.votes` in an UPDATE scoped to one thread.
pub const THREAD_VOTES_SUM: &str =
    "(SELECT COALESCE(SUM(votes.voice), 0) FROM votes WHERE votes.thread = threads.id)";

/// Point-in-time entity counts.
pub const STATUS_QUERY: &str = r#"
SELECT
    (SELECT COUNT(*) FROM users) AS users,
    (SELECT COUNT(*) FROM forums) AS forums,
    (SELECT COUNT(*) FROM threads) AS threads,
    (SELECT COUNT(*) FROM posts) AS posts
"#;
