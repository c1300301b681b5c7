//! 初始化命令

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::bootstrap::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
use crate::services::initialize_system;
use crate::storage::SeaOrmStorage;

pub async fn run_init(storage: &SeaOrmStorage) -> Result<(), CliError> {
    let report = initialize_system(storage).await?;

    if report.admin_created {
        println!(
            "{} {} / {}",
            "Default admin created:".green(),
            DEFAULT_ADMIN_USERNAME.cyan(),
            DEFAULT_ADMIN_PASSWORD.cyan()
        );
        println!(
            "  {}",
            "Change this password with `ainav reset-password`".yellow()
        );
    } else {
        println!("{}", "Admin account already exists, skipped".dimmed());
    }

    if report.categories_created > 0 {
        println!(
            "{} {}",
            "Default categories created:".green(),
            report.categories_created
        );
    } else {
        println!("{}", "Categories already exist, skipped".dimmed());
    }

    if report.settings_created > 0 {
        println!(
            "{} {}",
            "Default site settings created:".green(),
            report.settings_created
        );
    } else {
        println!("{}", "Site settings already exist, skipped".dimmed());
    }

    Ok(())
}
