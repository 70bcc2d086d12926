//! Security primitives: password hashing and session token keys.

mod password_hasher;
mod token_keys;

pub use password_hasher::PasswordHasher;
pub use token_keys::{TRACING_TARGET_TOKEN_KEYS, TokenError, TokenKeys};
