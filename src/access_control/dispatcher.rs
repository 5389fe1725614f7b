//! Access decision dispatcher
//!
//! Turns the resolved directive for "this caller on this action" into an
//! [`Outcome`] for the integration layer. Redirect-only actions (named with
//! the configured prefix) are rejected before anything is resolved.

use crate::access_control::hierarchy::RoleHierarchy;
use crate::access_control::overrides::OverrideTable;
use crate::access_control::resolver::DirectiveResolver;
use crate::access_control::types::{ACCESS_PARAM, ACTION_PARAM, Outcome, RoleName, Verdict};
use crate::config::{AppConfig, RedirectPolicy};
use crate::error::{AccessError, AccessResult, ConfigError};
use crate::source::{RoleSupplier, SharedActionCatalog, SharedMetadataSource};
use std::sync::Arc;
use tracing::{debug, info};

/// Default prefix of redirect-only actions
pub const DEFAULT_ACTION_PREFIX: &str = "role_";

/// Default field holding the caller's role
pub const DEFAULT_ROLE_FIELD: &str = "role";

/// Access decision dispatcher
pub struct AccessDispatcher {
    resolver: DirectiveResolver,
    actions: SharedActionCatalog,
    action_prefix: String,
    role_field: String,
    policy: RedirectPolicy,
}

impl AccessDispatcher {
    pub fn new(resolver: DirectiveResolver, actions: SharedActionCatalog) -> Self {
        Self {
            resolver,
            actions,
            action_prefix: DEFAULT_ACTION_PREFIX.to_string(),
            role_field: DEFAULT_ROLE_FIELD.to_string(),
            policy: RedirectPolicy::default(),
        }
    }

    /// Wire a dispatcher from configuration.
    ///
    /// `hierarchy` is the compiled snapshot shared between requests; the
    /// configured overrides are copied into this dispatcher's own table.
    pub fn from_config(
        config: &AppConfig,
        hierarchy: Arc<RoleHierarchy>,
        metadata: SharedMetadataSource,
        actions: SharedActionCatalog,
    ) -> Self {
        let resolver = DirectiveResolver::new(hierarchy, metadata)
            .with_overrides(OverrideTable::from_config(&config.overrides));
        Self::new(resolver, actions)
            .with_action_prefix(&config.access.action_prefix)
            .with_role_field(&config.access.role_field)
            .with_policy(config.access.redirect_policy)
    }

    /// Compile the hierarchy from configuration and wire a dispatcher
    pub fn try_from_config(
        config: &AppConfig,
        metadata: SharedMetadataSource,
        actions: SharedActionCatalog,
    ) -> Result<Self, ConfigError> {
        let hierarchy = RoleHierarchy::from_config(&config.hierarchy, config.access.strict_roles)?;
        Ok(Self::from_config(config, Arc::new(hierarchy), metadata, actions))
    }

    pub fn with_action_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.action_prefix = prefix.into();
        self
    }

    pub fn with_role_field(mut self, field: impl Into<String>) -> Self {
        self.role_field = field.into();
        self
    }

    pub fn with_policy(mut self, policy: RedirectPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn resolver(&self) -> &DirectiveResolver {
        &self.resolver
    }

    /// Mutable access, e.g. to register runtime overrides
    pub fn resolver_mut(&mut self) -> &mut DirectiveResolver {
        &mut self.resolver
    }

    pub fn policy(&self) -> RedirectPolicy {
        self.policy
    }

    /// Whether `action` can only be reached through a redirect
    pub fn is_private(&self, action: &str) -> bool {
        !self.action_prefix.is_empty() && action.starts_with(&self.action_prefix)
    }

    /// Role of the current caller, `public` when not authenticated
    pub fn current_role(&self, supplier: &dyn RoleSupplier) -> RoleName {
        supplier
            .role(&self.role_field)
            .filter(|role| !role.is_empty())
            .map(RoleName::from)
            .unwrap_or_else(RoleName::public)
    }

    /// Decide what the current caller gets for `action`
    pub fn dispatch_current(
        &self,
        action: &str,
        supplier: &dyn RoleSupplier,
    ) -> AccessResult<Outcome> {
        let role = self.current_role(supplier);
        self.dispatch(action, role.as_str())
    }

    /// Decide what `role` gets for `action`
    pub fn dispatch(&self, action: &str, role: &str) -> AccessResult<Outcome> {
        if self.is_private(action) {
            info!(action, role, "Rejected direct call to private action");
            return Err(AccessError::private_action(action, &self.action_prefix));
        }

        let outcome = match self.policy {
            RedirectPolicy::Access => self.access_outcome(action, role)?,
            RedirectPolicy::Redirect => match self.resolver.resolve(action, role, ACTION_PARAM)? {
                Some(target) => self.substitute(action, &target)?,
                None => self.access_outcome(action, role)?,
            },
            RedirectPolicy::DenyFirst => {
                let access = self.resolver.resolve(action, role, ACCESS_PARAM)?;
                if access.as_deref().map(Verdict::classify) == Some(Verdict::Deny) {
                    Outcome::Denied
                } else if let Some(target) = self.resolver.resolve(action, role, ACTION_PARAM)? {
                    self.substitute(action, &target)?
                } else {
                    self.verdict_outcome(action, access.as_deref())?
                }
            }
        };

        debug!(action, role, outcome = %outcome, "Dispatched");
        Ok(outcome)
    }

    fn access_outcome(&self, action: &str, role: &str) -> AccessResult<Outcome> {
        let access = self.resolver.resolve(action, role, ACCESS_PARAM)?;
        self.verdict_outcome(action, access.as_deref())
    }

    fn verdict_outcome(&self, action: &str, value: Option<&str>) -> AccessResult<Outcome> {
        match value.map(Verdict::classify) {
            None => Ok(Outcome::NoDirective),
            Some(Verdict::Allow) => Ok(Outcome::Allowed),
            Some(Verdict::Deny) => Ok(Outcome::Denied),
            Some(Verdict::Redirect(target)) => self.substitute(action, target),
        }
    }

    fn substitute(&self, action: &str, target: &str) -> AccessResult<Outcome> {
        if self.actions.has_action(target) {
            Ok(Outcome::SubstituteAction(target.to_string()))
        } else {
            Err(AccessError::missing_action(action, target))
        }
    }
}
