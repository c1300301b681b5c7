//! CLI interface module
//!
//! 一次性维护命令：初始化、重置密码、生成配置文件。

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::config::get_config;
use crate::storage::SeaOrmStorage;
use commands::{config_generate, run_init, run_reset_password};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::AinavError> for CliError {
    fn from(err: crate::errors::AinavError) -> Self {
        use crate::errors::AinavError;
        match err {
            AinavError::Validation(msg) | AinavError::NotFound(msg) => CliError::CommandError(msg),
            other => CliError::StorageError(other.to_string()),
        }
    }
}

async fn open_storage() -> Result<SeaOrmStorage, CliError> {
    let config = get_config();
    SeaOrmStorage::from_config(&config.database)
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))
}

/// Run a CLI command from clap-parsed input
///
/// `serve` 由调用方处理，不会进入这里。
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,

        Commands::Init => {
            let storage = open_storage().await?;
            let result = run_init(&storage).await;
            storage.close().await;
            result
        }

        Commands::ResetPassword {
            username,
            password,
            stdin,
        } => {
            let storage = open_storage().await?;
            let result = run_reset_password(&storage, &username, password, stdin).await;
            storage.close().await;
            result
        }

        Commands::Serve => Err(CliError::CommandError(
            "serve is not a maintenance command".to_string(),
        )),
    }
}
