//! Inbound collaborators
//!
//! The resolver never talks to a web framework directly. Whatever hosts it
//! supplies three things through these seams: the doc text of an action,
//! whether an action exists, and the role of the current caller.

pub mod provider;
pub mod static_actions;

pub use provider::{
    ActionCatalog, FixedRole, MetadataSource, RoleSupplier, SharedActionCatalog,
    SharedMetadataSource,
};
pub use static_actions::StaticActions;

use crate::config::AppConfig;
use std::sync::Arc;

/// Build the in-memory action catalog described by configuration
pub fn create_action_catalog(config: &AppConfig) -> Arc<StaticActions> {
    Arc::new(StaticActions::from_config(&config.actions))
}
