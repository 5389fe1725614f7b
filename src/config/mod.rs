//! Configuration module
//!
//! Loads dispatch settings, the role hierarchy, preloaded overrides and the
//! action catalog from TOML files and `ROLE_ACCESS__*` environment variables.

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::*;
