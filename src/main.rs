// TermBridge - Raw serial console bridge for embedded devices
use clap::Parser;
use std::process::ExitCode;
use termbridge::cli::args::Args;
use termbridge::cli::commands::execute_command;
use termbridge::cli::exit_codes::error_exit_code;

fn main() -> ExitCode {
    let args = Args::parse();

    match execute_command(args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(error_exit_code(&e))
        }
    }
}
