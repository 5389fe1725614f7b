//! Collaborator traits
//!
//! Object-safe so a host can hand in `Arc<dyn ...>` implementations that are
//! shared across requests.

use std::collections::HashMap;
use std::sync::Arc;

/// Supplies the raw documentation text attached to an action
pub trait MetadataSource: Send + Sync {
    /// Doc text for `action`, `None` when the action has none
    fn metadata(&self, action: &str) -> Option<String>;
}

/// Answers whether a name identifies an invocable action
pub trait ActionCatalog: Send + Sync {
    fn has_action(&self, action: &str) -> bool;
}

/// Supplies the current caller's role
pub trait RoleSupplier {
    /// Role stored under `field` in the caller's record, `None` when the
    /// caller is not authenticated
    fn role(&self, field: &str) -> Option<String>;
}

/// Shared metadata source
pub type SharedMetadataSource = Arc<dyn MetadataSource>;

/// Shared action catalog
pub type SharedActionCatalog = Arc<dyn ActionCatalog>;

/// A caller whose role is already known
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedRole(pub Option<String>);

impl FixedRole {
    pub fn new(role: impl Into<String>) -> Self {
        Self(Some(role.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl RoleSupplier for FixedRole {
    fn role(&self, _field: &str) -> Option<String> {
        self.0.clone()
    }
}

/// An authenticated user record keyed by field name
impl RoleSupplier for HashMap<String, String> {
    fn role(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_role_ignores_field() {
        assert_eq!(FixedRole::new("admin").role("anything").as_deref(), Some("admin"));
        assert_eq!(FixedRole::anonymous().role("role"), None);
    }

    #[test]
    fn test_user_record_reads_field() {
        let user: HashMap<String, String> = [("group".to_string(), "editor".to_string())]
            .into_iter()
            .collect();
        assert_eq!(user.role("group").as_deref(), Some("editor"));
        assert_eq!(user.role("role"), None);
    }
}
