//! Config file commands. These never touch the network.

use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;
use threadline_api::ClientConfig;
use threadline_core::UserRole;

use crate::error::{CommandError, CommandResult, ErrorCode};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a default client.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigView {
    path: Option<PathBuf>,
    base_url: String,
    timeout_secs: u64,
    role: UserRole,
    signed_in: bool,
}

pub fn run(
    config: &ClientConfig,
    path: Option<PathBuf>,
    command: ConfigCommand,
    json: bool,
) -> CommandResult<()> {
    let path = path.or_else(ClientConfig::default_config_path);

    match command {
        ConfigCommand::Show => {
            // The token itself is never printed
            let view = ConfigView {
                path,
                base_url: config.api.base_url.clone(),
                timeout_secs: config.api.timeout_secs,
                role: config.role(),
                signed_in: config.auth.token.is_some(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                if let Some(path) = &view.path {
                    println!("File     {}", path.display());
                }
                println!("API      {}", view.base_url);
                println!("Timeout  {}s", view.timeout_secs);
                println!("Role     {:?}", view.role);
                println!("Token    {}", if view.signed_in { "set" } else { "not set" });
            }
            Ok(())
        }
        ConfigCommand::Init { force } => {
            let path = path.ok_or_else(|| {
                CommandError::new(ErrorCode::Config, "No config directory available")
            })?;
            if path.exists() && !force {
                return Err(CommandError::new(
                    ErrorCode::Config,
                    format!("{} already exists (use --force)", path.display()),
                ));
            }
            ClientConfig::default().save(Some(path.clone()))?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}
