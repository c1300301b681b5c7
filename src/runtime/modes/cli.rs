//! CLI mode

use crate::cli::Commands;
use crate::interfaces::cli::run_cli_command;

/// 执行维护命令；失败时打印彩色错误并以状态码 1 退出
pub async fn run_cli(cmd: Commands) {
    if let Err(e) = run_cli_command(cmd).await {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }
}
