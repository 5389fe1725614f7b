//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (ROLE_ACCESS__*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::access_control::RoleHierarchy;
use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "role-access.toml",
    ".role-access.toml",
    "~/.config/role-access/config.toml",
    "/etc/role-access/config.toml",
];

/// Environment prefix; `__` separates nested keys
/// (e.g. `ROLE_ACCESS__ACCESS__STRICT_ROLES=true`)
const ENV_PREFIX: &str = "ROLE_ACCESS";

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                debug!(path = %expanded, "Using default configuration file");
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.access.role_field.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "access.role_field".to_string(),
        });
    }

    if config.access.action_prefix.is_empty() {
        return Err(ConfigError::Invalid {
            message: "access.action_prefix must not be empty".to_string(),
        });
    }

    for (action, roles) in &config.overrides {
        for (role, params) in roles {
            if role.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    message: format!("overrides.{} contains an empty role name", action),
                });
            }
            if params.keys().any(|p| p.trim().is_empty()) {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "overrides.{}.{} contains an empty parameter name",
                        action, role
                    ),
                });
            }
        }
    }

    // Compiling surfaces cycles and malformed nodes at load time.
    RoleHierarchy::from_config(&config.hierarchy, config.access.strict_roles)?;

    Ok(())
}
