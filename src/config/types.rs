//! Configuration types for role-access
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use serde::Deserialize;
use std::collections::HashMap;

/// Parameter → value map for one role
pub type RoleParams = HashMap<String, String>;

/// Action → role → parameters
pub type OverrideConfig = HashMap<String, HashMap<String, RoleParams>>;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Dispatch settings
    pub access: AccessConfig,

    /// Role inheritance graph
    pub hierarchy: HierarchyConfig,

    /// Directives registered up front as runtime overrides
    pub overrides: OverrideConfig,

    /// Known actions and their doc text
    pub actions: HashMap<String, ActionConfig>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Dispatch settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Field of the authenticated user record holding the role name
    pub role_field: String,

    /// Prefix marking redirect-only actions
    pub action_prefix: String,

    /// Treat roles missing from the hierarchy as an error
    pub strict_roles: bool,

    /// How `access` and `action` parameters combine when dispatching
    pub redirect_policy: RedirectPolicy,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            role_field: "role".to_string(),
            action_prefix: "role_".to_string(),
            strict_roles: false,
            redirect_policy: RedirectPolicy::Access,
        }
    }
}

/// Precedence between the `access` and `action` parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectPolicy {
    /// Only `access` is consulted; a non-keyword value is a redirect target
    #[default]
    Access,
    /// A resolved `action` redirects; otherwise fall back to `access`
    Redirect,
    /// An `access` deny wins, then `action`, then the rest of `access`
    DenyFirst,
}

/// Role hierarchy, nested or flat
///
/// Nested form, children inherit from their parent:
///
/// ```toml
/// [[hierarchy.tree]]
/// name = "user"
/// children = ["subscriber", { name = "editor", children = [{ name = "admin", alias = "superadmin" }] }]
/// ```
///
/// Flat form, `""` marks a root:
///
/// ```toml
/// [hierarchy]
/// roots = ["guest"]
///
/// [hierarchy.parents]
/// editor = ""
/// author = "editor"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Ordered nested declaration
    pub tree: Vec<RoleNodeConfig>,

    /// Role → direct parent
    pub parents: HashMap<String, String>,

    /// Parent-less roles
    pub roots: Vec<String>,
}

/// One entry of the nested hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RoleNodeConfig {
    /// Bare role name
    Name(String),
    /// Role with an alias or children
    Node {
        name: String,
        #[serde(default)]
        alias: Option<String>,
        #[serde(default)]
        children: Vec<RoleNodeConfig>,
    },
}

/// A known action
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Doc text carrying `@role.*` directive lines
    pub doc: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.access.role_field, "role");
        assert_eq!(config.access.action_prefix, "role_");
        assert!(!config.access.strict_roles);
        assert_eq!(config.access.redirect_policy, RedirectPolicy::Access);
        assert!(config.hierarchy.tree.is_empty());
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_deserialize_redirect_policy() {
        let policy: RedirectPolicy = serde_json::from_str(r#""access""#).unwrap();
        assert_eq!(policy, RedirectPolicy::Access);

        let policy: RedirectPolicy = serde_json::from_str(r#""redirect""#).unwrap();
        assert_eq!(policy, RedirectPolicy::Redirect);

        let policy: RedirectPolicy = serde_json::from_str(r#""deny_first""#).unwrap();
        assert_eq!(policy, RedirectPolicy::DenyFirst);

        assert!(serde_json::from_str::<RedirectPolicy>(r#""sometimes""#).is_err());
    }

    #[test]
    fn test_deserialize_role_node_shapes() {
        let json = r#"["subscriber", {"name": "editor", "children": [{"name": "admin", "alias": "superadmin"}]}]"#;
        let nodes: Vec<RoleNodeConfig> = serde_json::from_str(json).unwrap();

        assert_eq!(nodes[0], RoleNodeConfig::Name("subscriber".to_string()));
        assert_eq!(
            nodes[1],
            RoleNodeConfig::Node {
                name: "editor".to_string(),
                alias: None,
                children: vec![RoleNodeConfig::Node {
                    name: "admin".to_string(),
                    alias: Some("superadmin".to_string()),
                    children: vec![],
                }],
            }
        );
    }
}
