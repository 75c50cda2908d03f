//! Token shapes and their transport encoding.

pub mod access;
pub mod codec;
pub mod pair;
pub mod refresh;

pub use access::{AccessToken, AccessTokenHeader, AccessTokenPayload};
pub use pair::TokenPair;
pub use refresh::{RefreshToken, RefreshTokenHeader, RefreshTokenPayload};
