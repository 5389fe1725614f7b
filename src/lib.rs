//! Role-based action access
//!
//! Decides, for a request-handling action and the caller's role, whether the
//! caller is allowed in, turned away, or sent to a different action.
//!
//! ## Features
//!
//! - **Doc-comment directives**: `@role.<name>[.<param>] <value>` lines in an
//!   action's documentation
//! - **Role inheritance** through a nested or flat role hierarchy
//! - **Runtime overrides** per (action, role) that beat declared directives
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Decision Flow
//!
//! ```text
//! caller role + action → parse directives → merge overrides → walk ancestors → outcome
//! ```
//!
//! The outcome is one of `Allowed`, `Denied`, `SubstituteAction(name)` or
//! `NoDirective`. Enforcing it is left to the host framework.
//!
//! ## Example
//!
//! ```
//! use role_access::access_control::{AccessDispatcher, DirectiveResolver, Outcome, RoleHierarchy, RoleNode};
//! use role_access::source::StaticActions;
//! use std::sync::Arc;
//!
//! let hierarchy = RoleHierarchy::new(vec![RoleNode::tree(
//!     "editor",
//!     vec![RoleNode::tree("author", vec![RoleNode::leaf("moderator")])],
//! )])
//! .unwrap();
//!
//! let actions = Arc::new(
//!     StaticActions::new()
//!         .with_action("index", " * @role.author deny\n * @role.editor allow\n")
//!         .with_action("admin_index", ""),
//! );
//!
//! let resolver = DirectiveResolver::new(Arc::new(hierarchy), actions.clone());
//! let dispatcher = AccessDispatcher::new(resolver, actions);
//!
//! assert_eq!(dispatcher.dispatch("index", "moderator").unwrap(), Outcome::Denied);
//! assert_eq!(dispatcher.dispatch("index", "editor").unwrap(), Outcome::Allowed);
//! ```

pub mod access_control;
pub mod config;
pub mod error;
pub mod source;

// Re-export main types
pub use access_control::{AccessDispatcher, DirectiveResolver, Outcome, RoleHierarchy};
pub use config::{AppConfig, load_config};
pub use error::{AccessError, AppError, ConfigError, Result};
