//! Role access CLI
//!
//! Resolves directives and dispatch outcomes against a TOML-declared
//! hierarchy and action catalog.

use clap::{Parser, Subcommand};
use role_access::{
    access_control::{ACCESS_PARAM, AccessDispatcher, RoleHierarchy},
    config::{AppConfig, LogFormat, load_config},
    source::{FixedRole, create_action_catalog},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Role access - resolve action directives for a role
#[derive(Parser, Debug)]
#[command(name = "role-access")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "ROLE_ACCESS_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ROLE_ACCESS_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dispatch an action for a role and print the outcome
    Check {
        #[arg(short, long)]
        action: String,
        /// Caller role; omit for an unauthenticated caller
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Print the effective value of one parameter
    Resolve {
        #[arg(short, long)]
        action: String,
        #[arg(short, long)]
        role: String,
        #[arg(short, long, default_value = ACCESS_PARAM)]
        param: String,
    },
    /// Print a role's path up to its root
    Path {
        #[arg(short, long)]
        role: String,
    },
    /// Print the merged parameter table of an action
    Params {
        #[arg(short, long)]
        action: String,
        /// Restrict to one role (no inheritance)
        #[arg(short, long)]
        role: Option<String>,
    },
}

fn init_logging(config: &AppConfig, cli_level: Option<&str>) {
    let level = cli_level.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load configuration before logging so its level and format apply
    let config = load_config(args.config.as_deref())?;
    init_logging(&config, args.log_level.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        actions = config.actions.len(),
        "Loaded role access configuration"
    );

    let hierarchy = Arc::new(
        RoleHierarchy::from_config(&config.hierarchy, config.access.strict_roles)
            .inspect_err(|e| error!(error = %e, "Failed to compile role hierarchy"))?,
    );
    let catalog = create_action_catalog(&config);
    let dispatcher = AccessDispatcher::from_config(&config, hierarchy, catalog.clone(), catalog);

    let output = match args.command {
        Command::Check { action, role } => {
            let caller = FixedRole(role);
            let role = dispatcher.current_role(&caller);
            let outcome = dispatcher
                .dispatch(&action, role.as_str())
                .inspect_err(|e| error!(error = %e, action, "Dispatch failed"))?;
            json!({ "action": action, "role": role, "result": outcome })
        }
        Command::Resolve {
            action,
            role,
            param,
        } => {
            let value = dispatcher
                .resolver()
                .resolve(&action, &role, &param)
                .inspect_err(|e| error!(error = %e, action, role, "Resolution failed"))?;
            json!({ "action": action, "role": role, "param": param, "value": value })
        }
        Command::Path { role } => {
            let path = dispatcher.resolver().role_path(&role)?;
            json!({ "role": role, "path": path })
        }
        Command::Params { action, role } => match role {
            Some(role) => {
                let params = dispatcher.resolver().role_params(&action, &role);
                json!({ "action": action, "role": role, "params": params })
            }
            None => {
                let params = dispatcher.resolver().params(&action);
                json!({ "action": action, "params": params })
            }
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
