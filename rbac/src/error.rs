//! Error types for the permission model.

use thiserror::Error;

/// Errors that can occur while loading or querying the permission model.
#[derive(Debug, Error)]
pub enum RbacError {
    /// A role name that is not part of the closed role set.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// A resource name that is not part of the closed resource set
    /// and is not the wildcard `*`.
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// An action name that is not part of the closed action set.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The role table configuration is structurally invalid.
    #[error("Role table configuration error: {0}")]
    Config(String),

    /// Failed to parse a role table config file.
    #[error("Role table parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Failed to read a role table config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for permission model operations.
pub type Result<T> = std::result::Result<T, RbacError>;
