//! Per-backend statement rendering.

/// A SQL backend the forum stores can be generated for.
///
/// Stores build statements once with sea-query and render them through the
/// backend's dialect here, so PostgreSQL and SQLite share every query.
pub trait SqlDatabase: Send + Sync + 'static {
    /// Pool handed to the generated stores.
    type Pool: Clone + Send + Sync;

    /// Name used in log fields.
    const NAME: &'static str;

    fn build_select(stmt: sea_query::SelectStatement) -> String;

    fn build_insert(stmt: sea_query::InsertStatement) -> String;

    fn build_update(stmt: sea_query::UpdateStatement) -> String;

    /// Used by `clear`, which deletes every table in one transaction.
    fn build_delete(stmt: sea_query::DeleteStatement) -> String;
}
