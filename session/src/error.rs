use storage::StorageError;
use thiserror::Error;

/// Failures that can cross the session store's public boundary.
///
/// The store never panics and never leaks internal errors as anything other
/// than these variants. [`AuthError::user_message`] collapses the taxonomy
/// into the two strings the UI is allowed to show.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Expected failure: the email/password pair did not match a directory
    /// entry. Returned, never thrown; no detail on which half was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The credential directory could not be reached or misbehaved.
    #[error("Credential directory error: {0}")]
    Directory(String),

    /// The persistence port failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The session record could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuthError {
    /// The user-facing message for this failure. Anything unexpected is
    /// flattened to a generic string so internals are not disclosed.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Invalid credentials",
            _ => "Network error",
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
