//! # tokenpair-core
//!
//! Core crate for TokenPair. Contains the configuration schemas, the
//! session-store and notifier traits, the shared session/warning types,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other TokenPair crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
