//! Shared domain types passed across crate boundaries.

pub mod session;
pub mod warning;

pub use session::SessionRecord;
pub use warning::SecurityWarning;
