pub mod commands;
pub mod core;
pub mod format;
pub mod output;
pub mod receipt;
mod shell;
pub mod table;

pub use shell::{run_cli, SCRIPT_ENV_VAR};
