/// Business logic layer
///
/// One cached resource controller per resource kind. Both compose the same
/// read-through / invalidate-before-write capability from `quill-cache`
/// instead of inheriting per-resource cache plumbing.
pub mod posts;
pub mod reports;

pub use posts::PostService;
pub use reports::ReportService;
