use crate::cli::args::{Args, Command, CommandArgs, ConnectArgs, DataFormat};
use crate::cli::exit_codes::{outcome_exit_code, ExitCodes};
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::session::Session;
use crate::domain::config::{CommandConfig, SessionConfig};
use crate::domain::error::{BridgeError, BridgeResult};
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::serial::{available_ports, SerialClient};
use base64::Engine;

/// Execute CLI command, returning the process exit code
pub fn execute_command(args: Args) -> BridgeResult<u8> {
    let writer = ConsoleWriter::new(args.output);

    if !args.quiet {
        init_logging(args.verbose)?;
    }

    match args.command {
        Command::Connect(connect_args) => execute_connect(&connect_args, &writer),
        Command::Command(command_args) => execute_request(&command_args, &writer),
        Command::List => {
            let ports = available_ports()?;
            writer.write_ports(&ports)?;
            Ok(ExitCodes::SUCCESS)
        }
        Command::Version => {
            writer.write_message(&format!("termbridge {}", env!("CARGO_PKG_VERSION")))?;
            Ok(ExitCodes::SUCCESS)
        }
    }
}

fn execute_connect(args: &ConnectArgs, writer: &ConsoleWriter) -> BridgeResult<u8> {
    let mut session = Session::new(SessionConfig::from(args));
    let report = session.run();
    writer.write_report(&report)?;
    Ok(outcome_exit_code(report.outcome))
}

fn execute_request(args: &CommandArgs, writer: &ConsoleWriter) -> BridgeResult<u8> {
    let request = parse_data(&args.data, args.format)?;
    let config = CommandConfig::from(args);

    let mut client = SerialClient::open(&args.device, args.baud)?;
    let response = client.run_command(&request, &config);
    client.close();

    writer.write_response(&response?, args.format)?;
    Ok(ExitCodes::SUCCESS)
}

/// Decode command-line data in the given format.
pub fn parse_data(data: &str, format: DataFormat) -> Result<Vec<u8>, BridgeError> {
    match format {
        DataFormat::Text => Ok(data.as_bytes().to_vec()),
        DataFormat::Hex => {
            let cleaned = data.replace([' ', '\n'], "");
            hex::decode(cleaned)
                .map_err(|e| BridgeError::InvalidInput(format!("Invalid hex data: {}", e)))
        }
        DataFormat::Base64 => base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| BridgeError::InvalidInput(format!("Invalid base64 data: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_data() {
        assert_eq!(parse_data("AT+GMR", DataFormat::Text).unwrap(), b"AT+GMR");
    }

    #[test]
    fn test_parse_hex_data_ignores_spaces() {
        assert_eq!(parse_data("de ad be ef", DataFormat::Hex).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_parse_invalid_hex_data() {
        let result = parse_data("zz", DataFormat::Hex);
        assert!(matches!(result, Err(BridgeError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_base64_data() {
        assert_eq!(parse_data("T0s=", DataFormat::Base64).unwrap(), b"OK");
    }
}
