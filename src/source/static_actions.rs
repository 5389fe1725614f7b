//! In-memory action catalog
//!
//! Serves both as the metadata source and the existence checker for hosts
//! that declare their actions up front (and for the CLI).

use crate::config::ActionConfig;
use crate::source::provider::{ActionCatalog, MetadataSource};
use std::collections::HashMap;

/// Action name → doc text
#[derive(Debug, Clone, Default)]
pub struct StaticActions {
    actions: HashMap<String, String>,
}

impl StaticActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(actions: &HashMap<String, ActionConfig>) -> Self {
        Self {
            actions: actions
                .iter()
                .map(|(name, action)| (name.clone(), action.doc.clone()))
                .collect(),
        }
    }

    /// Builder-style registration
    pub fn with_action(mut self, name: impl Into<String>, doc: impl Into<String>) -> Self {
        self.insert(name, doc);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, doc: impl Into<String>) {
        self.actions.insert(name.into(), doc.into());
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl MetadataSource for StaticActions {
    fn metadata(&self, action: &str) -> Option<String> {
        self.actions
            .get(action)
            .filter(|doc| !doc.is_empty())
            .cloned()
    }
}

impl ActionCatalog for StaticActions {
    fn has_action(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }
}
