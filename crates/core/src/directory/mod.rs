//! User registration, lookup and credential checks.

pub mod error;
pub mod service;
pub mod types;

pub use error::DirectoryError;
pub use service::UserDirectory;
pub use types::{AuthToken, Credentials, RegisterInput, User, UserProfile};
