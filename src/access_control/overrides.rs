//! Runtime directive overrides
//!
//! Directives registered in-process for an (action, role) pair. They replace
//! metadata-declared values parameter by parameter and live only as long as
//! the resolver that owns them.

use crate::access_control::types::{ACCESS_PARAM, ACTION_PARAM, DirectiveTable, RoleName};
use crate::config::OverrideConfig;
use std::collections::HashMap;

/// Action → role → parameters
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    actions: HashMap<String, DirectiveTable>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides preloaded from configuration
    pub fn from_config(config: &OverrideConfig) -> Self {
        let mut table = Self::new();
        for (action, roles) in config {
            for (role, params) in roles {
                for (param, value) in params {
                    table.set(action, role.as_str(), param, value);
                }
            }
        }
        table
    }

    pub fn set(
        &mut self,
        action: &str,
        role: impl Into<RoleName>,
        param: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.actions
            .entry(action.to_string())
            .or_default()
            .set(role.into(), param, value);
    }

    /// Override the access verdict (`allow`, `deny` or a redirect target)
    pub fn set_access(&mut self, action: &str, role: impl Into<RoleName>, access: impl Into<String>) {
        self.set(action, role, ACCESS_PARAM, access);
    }

    /// Override the redirect target
    pub fn set_action(&mut self, action: &str, role: impl Into<RoleName>, target: impl Into<String>) {
        self.set(action, role, ACTION_PARAM, target);
    }

    pub fn for_action(&self, action: &str) -> Option<&DirectiveTable> {
        self.actions.get(action)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}
