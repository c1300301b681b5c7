mod config_generate;
mod init;
mod reset_password;

pub use config_generate::config_generate;
pub use init::run_init;
pub use reset_password::run_reset_password;
