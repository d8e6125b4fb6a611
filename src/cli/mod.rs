// CLI module - Command line interface
pub mod args;
pub mod commands;
pub mod exit_codes;
pub mod output;

pub use args::{Args, Command, OutputFormat};
pub use commands::execute_command;
pub use exit_codes::ExitCodes;
pub use output::OutputWriter;
