//! # tokenpair-auth
//!
//! Issues and rotates paired access/refresh credentials.
//!
//! ## Modules
//!
//! - `token`: access/refresh token shapes, the wire pair, and the refresh-token codec
//! - `signer`: HMAC-SHA512 signatures over access-token content
//! - `hasher`: client-bound Argon2id digests of refresh tokens for at-rest storage
//! - `session`: the issuance and rotation flows over a transactional session store

pub mod error;
pub mod hasher;
pub mod session;
pub mod signer;
pub mod token;

pub use error::TokenError;
pub use hasher::RefreshTokenHasher;
pub use session::{RotationRejection, SessionManager};
pub use signer::AccessTokenSigner;
pub use token::{AccessToken, RefreshToken, TokenPair};
