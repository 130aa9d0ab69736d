//! CLI routing and command dispatch.

use crate::core::audit_log;
use crate::core::config;
use crate::core::paths::{self, StorePaths};
use crate::core::store::RecordStore;
use crate::models::config::ConfigFile;
use anyhow::{bail, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

pub mod audit;
pub mod doctor;
pub mod password;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub paths: StorePaths,
    pub config_path: PathBuf,
    pub config: ConfigFile,
    pub config_load_warning: Option<String>,
    pub non_interactive: bool,
}

impl CliContext {
    pub fn store(&self) -> RecordStore {
        RecordStore::new(&self.paths, self.config.store.key_match)
    }

    /// Append an audit line when the policy asks for it. Failures only warn.
    pub fn audit(&self, action: &str, key: &str, outcome: &str, strength: Option<&str>) {
        if !self.config.policy.audit {
            return;
        }
        if let Err(e) = audit_log::log(&self.paths, action, key, outcome, strength) {
            eprintln!("warning: audit log failed: {}", e);
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "passgen",
    version,
    about = "Generate passwords and keep them keyed in a plain text file",
    disable_version_flag = true
)]
pub struct Cli {
    /// Display the version of the CLI
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: (),

    /// List all the passwords in the password file
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Password file (default: $HOME/Desktop/passwords.txt)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Config file (default: $HOME/.config/passgen/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run in non-interactive mode (no prompts, suitable for automation)
    #[arg(long, global = true, env = "PASSGEN_NON_INTERACTIVE")]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config_path = paths::resolve_config(self.config)?;

        // Config errors fall back to defaults; doctor reports them.
        let mut config_load_warning: Option<String> = None;
        let config = match config::load(&config_path) {
            Ok(config) => config,
            Err(e) => {
                let warning = format!("cannot load config: {:#}", e);
                eprintln!("warning: {}", warning);
                config_load_warning = Some(warning);
                ConfigFile::default()
            }
        };

        let paths = StorePaths::resolve(self.store, config.store.path.clone())?;

        let ctx = CliContext {
            paths,
            config_path,
            config,
            config_load_warning,
            non_interactive: self.non_interactive,
        };

        match self.command {
            Some(Commands::Generate(args)) => password::run_generate(&ctx, args),
            Some(Commands::Delete(args)) => password::run_delete(&ctx, args),
            Some(Commands::List(args)) => password::run_list(&ctx, args),
            Some(Commands::Audit { command }) => audit::run(&ctx, command),
            Some(Commands::Doctor(args)) => doctor::run(&ctx, args),
            None if self.list => password::run_list(&ctx, password::ListArgs::default()),
            None => bail!("no command given. Please use the help command to see the list of commands"),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new password based on predefined rules or custom rules
    Generate(password::GenerateArgs),
    /// Delete a password from the password file based on the key provided
    Delete(password::DeleteArgs),
    /// List all the passwords in the password file
    List(password::ListArgs),
    /// View the audit trail
    Audit {
        #[command(subcommand)]
        command: audit::AuditCommand,
    },
    /// Diagnose the password file and configuration (safe, read-only)
    Doctor(doctor::DoctorArgs),
}
