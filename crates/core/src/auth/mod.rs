//! Credential handling.
//!
//! Passwords are hashed with Argon2id and only ever stored as PHC strings.

mod password;

pub use password::{PasswordError, hash_password, verify_password};

#[cfg(test)]
mod password_props;
