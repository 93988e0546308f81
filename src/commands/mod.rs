//! CLI command handlers.

mod config;
mod get;
mod history;

pub use config::run_config_show_command;
pub use get::run_get_command;
pub use history::run_history_command;
