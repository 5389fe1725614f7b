//! Access control module
//!
//! Resolves, for an action and a caller's role, whether the caller is
//! allowed, denied, or sent to another action.
//!
//! ## Resolution Model
//!
//! Directives are declared in an action's doc text, one per line:
//!
//! ```text
//! * @role.admin allow
//! * @role.user deny
//! * @role.admin.action admin_index
//! ```
//!
//! For a given parameter (default `access`) the effective value is, in
//! order of precedence:
//!
//! 1. **Runtime override** registered for the exact (action, role) pair
//! 2. **Declared directive** for the role in the action's doc text
//! 3. **Inherited value** from the nearest ancestor role that has one
//!
//! The reserved `public` role stands for unauthenticated callers and never
//! inherits. A role missing from the hierarchy is its own root unless the
//! hierarchy is strict, in which case it is an error.
//!
//! ## Example Configuration
//!
//! ```toml
//! [access]
//! action_prefix = "role_"          # redirect-only actions
//! strict_roles = false
//!
//! [[hierarchy.tree]]
//! name = "editor"
//! children = [{ name = "author", children = ["moderator"] }]
//!
//! [overrides.index.guest]
//! access = "deny"
//! ```

pub mod dispatcher;
pub mod hierarchy;
pub mod metadata;
pub mod overrides;
pub mod resolver;
pub mod types;

pub use dispatcher::AccessDispatcher;
pub use hierarchy::{RoleHierarchy, RoleNode};
pub use metadata::{parse_directives, parse_role_directives};
pub use overrides::OverrideTable;
pub use resolver::DirectiveResolver;
pub use types::{
    ACCESS_PARAM, ACTION_PARAM, Directive, DirectiveTable, Outcome, PUBLIC_ROLE, RoleName, Verdict,
};
