/// Database access layer
///
/// Repository modules with runtime-checked sqlx queries. The store is
/// always authoritative; the cache layer above it is best-effort.
pub mod post_repo;
pub mod report_repo;
pub mod tag_repo;
