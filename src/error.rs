//! Error types for role-access
//!
//! Library errors use `thiserror` so callers can match on the exact
//! condition. Malformed directive lines are never errors; they are skipped
//! by the metadata parser.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Access error: {0}")]
    Access(#[from] AccessError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Role hierarchy contains a cycle through '{role}'")]
    CyclicHierarchy { role: String },
}

/// Errors raised while resolving or dispatching a directive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Strict hierarchies only: the role is not declared anywhere
    #[error("Role not found in hierarchy: {role}")]
    RoleNotFound { role: String },

    /// A directive redirects to a handler the integration layer does not know
    #[error("Action '{action}' redirects to missing action '{target}'")]
    MissingAction { action: String, target: String },

    /// Redirect-only actions cannot be invoked directly
    #[error("Action '{action}' is private (prefix '{prefix}') and can only be reached by redirect")]
    PrivateAction { action: String, prefix: String },

    #[error("Role hierarchy revisits '{role}' while walking ancestors")]
    CyclicHierarchy { role: String },
}

impl AccessError {
    pub fn role_not_found(role: impl Into<String>) -> Self {
        Self::RoleNotFound { role: role.into() }
    }

    pub fn missing_action(action: impl Into<String>, target: impl Into<String>) -> Self {
        Self::MissingAction {
            action: action.into(),
            target: target.into(),
        }
    }

    pub fn private_action(action: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::PrivateAction {
            action: action.into(),
            prefix: prefix.into(),
        }
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for resolution and dispatch
pub type AccessResult<T> = std::result::Result<T, AccessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_constructors() {
        let err = AccessError::role_not_found("ghost");
        assert_eq!(
            err,
            AccessError::RoleNotFound {
                role: "ghost".into()
            }
        );

        let err = AccessError::missing_action("index", "admin_index");
        assert!(err.to_string().contains("admin_index"));

        let err = AccessError::private_action("role_index", "role_");
        assert!(err.to_string().contains("role_index"));
        assert!(err.to_string().contains("role_"));
    }

    #[test]
    fn test_app_error_wraps_sources() {
        let err: AppError = AccessError::role_not_found("ghost").into();
        assert!(matches!(err, AppError::Access(_)));

        let err: AppError = ConfigError::CyclicHierarchy {
            role: "editor".into(),
        }
        .into();
        assert!(err.to_string().contains("editor"));
    }
}
