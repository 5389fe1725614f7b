//! Directive resolver
//!
//! Computes the effective value of one parameter for an (action, role) pair:
//! 1. Parse the action's doc text into a role → directive table
//! 2. Overlay runtime overrides registered for the action
//! 3. A value declared for the role itself wins
//! 4. Otherwise try each ancestor on the role's path in order, until a value
//!    is found or the root is passed

use crate::access_control::hierarchy::RoleHierarchy;
use crate::access_control::metadata::{parse_directives, parse_role_directives};
use crate::access_control::overrides::OverrideTable;
use crate::access_control::types::{Directive, DirectiveTable, RoleName};
use crate::error::{AccessError, AccessResult};
use crate::source::SharedMetadataSource;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Directive resolver
///
/// The hierarchy and metadata source are shared snapshots; the override
/// table belongs to this instance, so each request should get its own
/// resolver.
pub struct DirectiveResolver {
    hierarchy: Arc<RoleHierarchy>,
    metadata: SharedMetadataSource,
    overrides: OverrideTable,
}

impl DirectiveResolver {
    pub fn new(hierarchy: Arc<RoleHierarchy>, metadata: SharedMetadataSource) -> Self {
        Self {
            hierarchy,
            metadata,
            overrides: OverrideTable::new(),
        }
    }

    /// Start from a preloaded override table
    pub fn with_overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.hierarchy
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    pub fn overrides_mut(&mut self) -> &mut OverrideTable {
        &mut self.overrides
    }

    /// Register an access override for one (action, role) pair
    pub fn set_access(&mut self, action: &str, role: &str, access: &str) {
        debug!(action, role, access, "Registering access override");
        self.overrides.set_access(action, role, access);
    }

    /// Register a redirect override for one (action, role) pair
    pub fn set_action(&mut self, action: &str, role: &str, target: &str) {
        debug!(action, role, target, "Registering action override");
        self.overrides.set_action(action, role, target);
    }

    /// Register an override for an arbitrary parameter
    pub fn set_param(&mut self, action: &str, role: &str, param: &str, value: &str) {
        debug!(action, role, param, value, "Registering override");
        self.overrides.set(action, role, param, value);
    }

    /// Ordered role path, the role first and the root last
    pub fn role_path(&self, role: &str) -> AccessResult<Vec<RoleName>> {
        self.hierarchy.resolve_path(role)
    }

    /// Directives declared in the action's doc text only
    pub fn declared(&self, action: &str) -> DirectiveTable {
        match self.metadata.metadata(action) {
            Some(doc) => parse_directives(&doc),
            None => {
                trace!(action, "No metadata for action");
                DirectiveTable::new()
            }
        }
    }

    /// Declared directives with runtime overrides merged in, for every role
    pub fn params(&self, action: &str) -> DirectiveTable {
        let mut table = self.declared(action);
        if let Some(overrides) = self.overrides.for_action(action) {
            for (role, directive) in overrides.iter() {
                table.merge_role(role.clone(), directive);
            }
        }
        table
    }

    /// Merged directive for a single role, without inheritance
    pub fn role_params(&self, action: &str, role: &str) -> Directive {
        let mut directive = self
            .metadata
            .metadata(action)
            .map(|doc| parse_role_directives(&doc, role))
            .unwrap_or_default();
        if let Some(own) = self
            .overrides
            .for_action(action)
            .and_then(|t| t.role(&RoleName::from(role)))
        {
            directive.merge(own);
        }
        directive
    }

    /// Effective value of `param` for `role` on `action`, inherited from the
    /// nearest ancestor that declares it. `None` means nothing applies.
    pub fn resolve(&self, action: &str, role: &str, param: &str) -> AccessResult<Option<String>> {
        if self.hierarchy.is_strict() && !self.hierarchy.contains(role) {
            return Err(AccessError::role_not_found(role));
        }

        let table = self.params(action);
        let path = self.hierarchy.resolve_path(role)?;
        let mut visited = HashSet::new();

        for current in &path {
            if !visited.insert(current) {
                return Err(AccessError::CyclicHierarchy {
                    role: current.to_string(),
                });
            }

            if let Some(value) = table.value(current, param) {
                debug!(
                    action,
                    role,
                    param,
                    value,
                    from = %current,
                    "Resolved directive"
                );
                return Ok(Some(value.to_string()));
            }
            trace!(action, param, role = %current, "No directive, trying parent");
        }

        debug!(action, role, param, "No directive applies");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_control::hierarchy::RoleNode;
    use crate::access_control::types::ACCESS_PARAM;
    use crate::source::StaticActions;

    fn chain() -> Arc<RoleHierarchy> {
        Arc::new(
            RoleHierarchy::new(vec![RoleNode::tree(
                "editor",
                vec![RoleNode::tree(
                    "author",
                    vec![RoleNode::tree("moderator", vec![RoleNode::leaf("admin")])],
                )],
            )])
            .unwrap(),
        )
    }

    fn resolver(doc: &str) -> DirectiveResolver {
        let actions = StaticActions::new().with_action("index", doc);
        DirectiveResolver::new(chain(), Arc::new(actions))
    }

    #[test]
    fn test_direct_declaration() {
        let r = resolver(" * @role.admin allow\n");
        assert_eq!(
            r.resolve("index", "admin", ACCESS_PARAM).unwrap().as_deref(),
            Some("allow")
        );
    }

    #[test]
    fn test_inherits_nearest_ancestor() {
        let r = resolver(" * @role.author deny\n * @role.admin allow\n");
        assert_eq!(
            r.resolve("index", "moderator", ACCESS_PARAM)
                .unwrap()
                .as_deref(),
            Some("deny")
        );
        assert_eq!(
            r.resolve("index", "admin", ACCESS_PARAM).unwrap().as_deref(),
            Some("allow")
        );
        assert_eq!(r.resolve("index", "editor", ACCESS_PARAM).unwrap(), None);
    }

    #[test]
    fn test_override_beats_declaration_for_that_role_only() {
        let mut r = resolver(" * @role.author deny\n * @role.editor deny\n");
        r.set_access("index", "author", "allow");

        assert_eq!(
            r.resolve("index", "author", ACCESS_PARAM).unwrap().as_deref(),
            Some("allow")
        );
        assert_eq!(
            r.resolve("index", "editor", ACCESS_PARAM).unwrap().as_deref(),
            Some("deny")
        );
        // Descendants inherit the overridden value
        assert_eq!(
            r.resolve("index", "admin", ACCESS_PARAM).unwrap().as_deref(),
            Some("allow")
        );
    }

    #[test]
    fn test_override_on_action_without_metadata() {
        let mut r = resolver("");
        r.set_action("missing", "admin", "elsewhere");
        assert_eq!(
            r.resolve("missing", "admin", "action").unwrap().as_deref(),
            Some("elsewhere")
        );
    }

    #[test]
    fn test_params_merge_parameter_wise() {
        let mut r = resolver(" * @role.admin allow\n * @role.admin.action admin_index\n");
        r.set_access("index", "admin", "deny");
        r.set_access("index", "guest", "deny");

        let table = r.params("index");
        assert_eq!(table.value(&"admin".into(), "access"), Some("deny"));
        assert_eq!(table.value(&"admin".into(), "action"), Some("admin_index"));
        assert_eq!(table.value(&"guest".into(), "access"), Some("deny"));

        let admin = r.role_params("index", "Admin");
        assert_eq!(admin.get("access"), Some("deny"));
        assert_eq!(admin.get("action"), Some("admin_index"));
    }

    #[test]
    fn test_public_never_inherits() {
        let r = resolver(" * @role.editor deny\n");
        assert_eq!(r.resolve("index", "public", ACCESS_PARAM).unwrap(), None);
    }

    #[test]
    fn test_strict_rejects_undeclared_even_with_direct_entry() {
        let actions = StaticActions::new().with_action("index", " * @role.ghost allow\n");
        let hierarchy = Arc::new((*chain()).clone().with_strict(true));
        let r = DirectiveResolver::new(hierarchy, Arc::new(actions));

        assert_eq!(
            r.resolve("index", "ghost", ACCESS_PARAM),
            Err(AccessError::role_not_found("ghost"))
        );
        assert_eq!(r.resolve("index", "public", ACCESS_PARAM).unwrap(), None);
    }

    #[test]
    fn test_permissive_undeclared_role_uses_own_entry() {
        let r = resolver(" * @role.ghost allow\n");
        assert_eq!(
            r.resolve("index", "ghost", ACCESS_PARAM).unwrap().as_deref(),
            Some("allow")
        );
        assert_eq!(r.resolve("index", "phantom", ACCESS_PARAM).unwrap(), None);
    }

    #[test]
    fn test_inheritance_follows_reported_path() {
        // x is declared under both a and b; the first declaration wins
        let hierarchy = RoleHierarchy::new(vec![
            RoleNode::tree("a", vec![RoleNode::leaf("x")]),
            RoleNode::tree("b", vec![RoleNode::tree("x", vec![RoleNode::leaf("y")])]),
        ])
        .unwrap();
        let actions = StaticActions::new().with_action("index", " * @role.a allow\n * @role.b deny\n");
        let r = DirectiveResolver::new(Arc::new(hierarchy), Arc::new(actions));

        let path = r.role_path("y").unwrap();
        assert_eq!(
            path.iter().map(|role| role.as_str()).collect::<Vec<_>>(),
            vec!["y", "x", "b"]
        );
        assert_eq!(
            r.resolve("index", "y", ACCESS_PARAM).unwrap().as_deref(),
            Some("deny")
        );
        assert_eq!(
            r.resolve("index", "x", ACCESS_PARAM).unwrap().as_deref(),
            Some("allow")
        );
    }

    #[test]
    fn test_overrides_can_be_cleared() {
        let mut r = resolver(" * @role.author deny\n");
        assert!(r.overrides().is_empty());

        r.set_access("index", "author", "allow");
        assert!(!r.overrides().is_empty());
        assert_eq!(
            r.resolve("index", "author", ACCESS_PARAM).unwrap().as_deref(),
            Some("allow")
        );

        r.overrides_mut().clear();
        assert!(r.overrides().is_empty());
        assert_eq!(
            r.resolve("index", "author", ACCESS_PARAM).unwrap().as_deref(),
            Some("deny")
        );
    }
}
