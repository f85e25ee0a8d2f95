//! Authentication for the E-Kalolsavam portal
//!
//! The portal issues a JWT access/refresh pair on login. The access token
//! rides on every API call; the refresh token buys a new access token once
//! the old one expires.

pub mod claims;
pub mod error;
pub mod session;
pub mod tokens;

pub use error::AuthError;
pub use session::{login, logout, status};
pub use tokens::{TokenPair, TokenStore};
