use clap::Parser;
use tracing::info;

use ainav::cli::{Cli, Commands, LONG_VERSION};
use ainav::config::{DEFAULT_CONFIG_PATH, StaticConfig, get_config, init_config_with};
use ainav::runtime::modes::{run_cli, run_server};
use ainav::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    init_config_with(StaticConfig::load_from(config_path));

    match cli.command {
        None | Some(Commands::Serve) => {
            let config = get_config();
            // guard 需存活到进程结束，保证日志落盘
            let _log_guard = init_logging(&config.logging)?;
            info!("ainav {} starting", LONG_VERSION);
            run_server().await
        }
        Some(cmd) => {
            run_cli(cmd).await;
            Ok(())
        }
    }
}
