//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// 版本号附带构建时的 git 提交
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("AINAV_GIT_HASH"),
    ")"
);

/// ainav - AI 服务导航站
#[derive(Parser, Debug)]
#[command(name = "ainav")]
#[command(version = LONG_VERSION)]
#[command(about = "A directory website for AI services", long_about = None)]
pub struct Cli {
    /// Path to config.toml
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Create the default admin, categories and site settings if missing
    Init,

    /// Reset an admin password
    ResetPassword {
        /// Admin username
        #[arg(long, short = 'u', default_value = "admin")]
        username: String,

        /// New password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Read the new password from stdin
        #[arg(long, conflicts_with = "password")]
        stdin: bool,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["ainav"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_reset_password_args() {
        let cli = Cli::try_parse_from([
            "ainav",
            "reset-password",
            "--username",
            "root",
            "--password",
            "secret123",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::ResetPassword {
                username: "root".into(),
                password: Some("secret123".into()),
                stdin: false,
            })
        );
    }

    #[test]
    fn test_password_and_stdin_conflict() {
        let result = Cli::try_parse_from([
            "ainav",
            "reset-password",
            "--password",
            "x",
            "--stdin",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_generate_with_global_config_flag() {
        let cli =
            Cli::try_parse_from(["ainav", "config", "generate", "out.toml", "-c", "my.toml"])
                .unwrap();
        assert_eq!(cli.config.as_deref(), Some("my.toml"));
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate {
                    output_path: Some("out.toml".into()),
                    force: false,
                }
            })
        );
    }
}
