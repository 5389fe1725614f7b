//! Configuration loading tests

use role_access::access_control::{AccessDispatcher, Outcome};
use role_access::config::{LogFormat, RedirectPolicy, RoleNodeConfig, load_config_from_str};
use role_access::error::ConfigError;
use role_access::source::create_action_catalog;

const MINIMAL_CONFIG: &str = r#"
[access]
strict_roles = false
"#;

const FULL_CONFIG: &str = r#"
[access]
role_field = "group"
action_prefix = "private_"
strict_roles = true
redirect_policy = "deny_first"

[[hierarchy.tree]]
name = "user"
children = [
    "subscriber",
    { name = "editor", children = [{ name = "admin", alias = "superadmin" }] },
]

[[hierarchy.tree]]
name = "guest"

[overrides.index.subscriber]
access = "allow"

[overrides.index.editor]
action = "admin_index"

[actions.index]
doc = """
/**
 * Article listing.
 *
 * @role.user deny
 * @role.admin allow
 */
"""

[actions.admin_index]
doc = ""

[actions.private_login]
doc = ""

[logging]
level = "debug"
format = "json"
"#;

#[test]
fn test_minimal_config() {
    let config = load_config_from_str(MINIMAL_CONFIG).unwrap();

    assert_eq!(config.access.role_field, "role");
    assert_eq!(config.access.action_prefix, "role_");
    assert!(!config.access.strict_roles);
    assert_eq!(config.access.redirect_policy, RedirectPolicy::Access);

    assert!(config.hierarchy.tree.is_empty());
    assert!(config.overrides.is_empty());
    assert!(config.actions.is_empty());
}

#[test]
fn test_full_config() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();

    // Access
    assert_eq!(config.access.role_field, "group");
    assert_eq!(config.access.action_prefix, "private_");
    assert!(config.access.strict_roles);
    assert_eq!(config.access.redirect_policy, RedirectPolicy::DenyFirst);

    // Hierarchy
    assert_eq!(config.hierarchy.tree.len(), 2);
    match &config.hierarchy.tree[0] {
        RoleNodeConfig::Node { name, children, .. } => {
            assert_eq!(name, "user");
            assert_eq!(children[0], RoleNodeConfig::Name("subscriber".to_string()));
            assert!(matches!(&children[1], RoleNodeConfig::Node { name, .. } if name == "editor"));
        }
        other => panic!("Expected node, got {:?}", other),
    }

    // Overrides
    assert_eq!(
        config.overrides["index"]["subscriber"].get("access"),
        Some(&"allow".to_string())
    );
    assert_eq!(
        config.overrides["index"]["editor"].get("action"),
        Some(&"admin_index".to_string())
    );

    // Actions
    assert_eq!(config.actions.len(), 3);
    assert!(config.actions["index"].doc.contains("@role.admin allow"));
    assert!(config.actions["admin_index"].doc.is_empty());

    // Logging
    assert_eq!(config.logging.level, "debug");
    assert!(matches!(config.logging.format, LogFormat::Json));
}

#[test]
fn test_full_config_dispatch() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();
    let catalog = create_action_catalog(&config);
    let dispatcher = AccessDispatcher::try_from_config(&config, catalog.clone(), catalog).unwrap();

    // Declared deny on user, inherited
    assert_eq!(dispatcher.dispatch("index", "user").unwrap(), Outcome::Denied);
    // Override beats inherited deny
    assert_eq!(
        dispatcher.dispatch("index", "subscriber").unwrap(),
        Outcome::Allowed
    );
    // Inherited deny outranks the editor's redirect
    assert_eq!(dispatcher.dispatch("index", "editor").unwrap(), Outcome::Denied);
    // Alias resolves through admin's own allow, then editor's redirect
    assert_eq!(
        dispatcher.dispatch("index", "superadmin").unwrap(),
        Outcome::SubstituteAction("admin_index".to_string())
    );
    assert!(dispatcher.dispatch("private_login", "admin").is_err());
    assert!(dispatcher.dispatch("index", "stranger").is_err());
}

#[test]
fn test_flat_hierarchy_config() {
    let config_str = r#"
[hierarchy]
roots = ["guest"]

[hierarchy.parents]
editor = ""
author = "editor"
moderator = "author"
"#;

    let config = load_config_from_str(config_str).unwrap();
    assert_eq!(config.hierarchy.parents.len(), 3);
    assert_eq!(config.hierarchy.roots, vec!["guest".to_string()]);

    let catalog = create_action_catalog(&config);
    let dispatcher = AccessDispatcher::try_from_config(&config, catalog.clone(), catalog).unwrap();
    let path: Vec<String> = dispatcher
        .resolver()
        .role_path("moderator")
        .unwrap()
        .iter()
        .map(|r| r.as_str().to_string())
        .collect();
    assert_eq!(path, vec!["moderator", "author", "editor"]);
}

#[test]
fn test_tree_and_flat_together_rejected() {
    let config_str = r#"
[[hierarchy.tree]]
name = "user"

[hierarchy.parents]
admin = "user"
"#;

    let result = load_config_from_str(config_str);
    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}

#[test]
fn test_cyclic_hierarchy_rejected() {
    let config_str = r#"
[hierarchy.parents]
editor = "admin"
admin = "editor"
"#;

    let result = load_config_from_str(config_str);
    assert!(matches!(result, Err(ConfigError::CyclicHierarchy { .. })));
}

#[test]
fn test_empty_role_field_rejected() {
    let config_str = r#"
[access]
role_field = ""
"#;

    let result = load_config_from_str(config_str);
    assert!(matches!(result, Err(ConfigError::Missing { field }) if field == "access.role_field"));
}

#[test]
fn test_empty_action_prefix_rejected() {
    let config_str = r#"
[access]
action_prefix = ""
"#;

    let result = load_config_from_str(config_str);
    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}

#[test]
fn test_unknown_redirect_policy_rejected() {
    let config_str = r#"
[access]
redirect_policy = "sometimes"
"#;

    let result = load_config_from_str(config_str);
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
#[serial_test::serial]
fn test_env_var_overrides_file() {
    use role_access::config::load_config;
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("test-config.toml");
    let config_content = r#"
[access]
strict_roles = false
redirect_policy = "access"
"#;
    fs::write(&config_path, config_content).unwrap();

    unsafe {
        env::set_var("ROLE_ACCESS__ACCESS__STRICT_ROLES", "true");
        env::set_var("ROLE_ACCESS__ACCESS__REDIRECT_POLICY", "redirect");
    }

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();

    // Environment takes precedence over the file
    assert!(config.access.strict_roles);
    assert_eq!(config.access.redirect_policy, RedirectPolicy::Redirect);

    // Cleanup
    unsafe {
        env::remove_var("ROLE_ACCESS__ACCESS__STRICT_ROLES");
        env::remove_var("ROLE_ACCESS__ACCESS__REDIRECT_POLICY");
    }
}

#[test]
#[serial_test::serial]
fn test_file_values_without_env() {
    use role_access::config::load_config;
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("test-config.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    unsafe {
        env::remove_var("ROLE_ACCESS__ACCESS__STRICT_ROLES");
        env::remove_var("ROLE_ACCESS__ACCESS__REDIRECT_POLICY");
    }

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();
    assert_eq!(config.access.action_prefix, "private_");
    assert_eq!(config.access.redirect_policy, RedirectPolicy::DenyFirst);
}

#[test]
#[serial_test::serial]
fn test_missing_explicit_config_file() {
    use role_access::config::load_config;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let result = load_config(Some(missing.to_str().unwrap()));
    assert!(matches!(result, Err(ConfigError::Load(msg)) if msg.contains("not found")));
}
