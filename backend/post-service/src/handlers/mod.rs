/// HTTP request handlers
pub mod posts;
pub mod reports;

pub use posts::*;
pub use reports::*;
