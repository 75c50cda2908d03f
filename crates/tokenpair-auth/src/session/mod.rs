//! Session lifecycle: issuing pairs and rotating them.

pub mod manager;
pub mod rejection;

pub use manager::SessionManager;
pub use rejection::RotationRejection;
