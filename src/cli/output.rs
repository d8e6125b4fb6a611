use crate::cli::args::{DataFormat, OutputFormat};
use crate::core::session::SessionReport;
use crate::domain::outcome::SessionOutcome;
use crate::infrastructure::serial::PortInfo;
use base64::Engine;
use std::io;
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_report(&self, report: &SessionReport) -> Result<(), OutputError>;
    fn write_ports(&self, ports: &[PortInfo]) -> Result<(), OutputError>;
    fn write_response(&self, response: &[u8], format: DataFormat) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::BridgeError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Render device bytes in the requested format.
pub fn render_bytes(data: &[u8], format: DataFormat) -> String {
    match format {
        DataFormat::Text => String::from_utf8_lossy(data).into_owned(),
        DataFormat::Hex => hex::encode(data),
        DataFormat::Base64 => base64::engine::general_purpose::STANDARD.encode(data),
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_report(&self, report: &SessionReport) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            OutputFormat::Text | OutputFormat::Table => match report.outcome {
                // The terminal may have been left mid-line by device output
                SessionOutcome::PeerDisconnected => eprintln!("\nSerial device disconnected."),
                _ => {
                    let reason = report
                        .diagnostic
                        .clone()
                        .unwrap_or_else(|| report.outcome.to_string());
                    self.write_error(&reason)?;
                }
            },
        }
        Ok(())
    }

    fn write_ports(&self, ports: &[PortInfo]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                if ports.is_empty() {
                    println!("No serial ports found");
                }
                for port in ports {
                    match &port.description {
                        Some(description) => println!("  {} ({}, {})", port.name, port.kind, description),
                        None => println!("  {} ({})", port.name, port.kind),
                    }
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(ports)?);
            }
            OutputFormat::Table => {
                if !ports.is_empty() {
                    let rows: Vec<PortTableRow> = ports.iter().map(PortTableRow::from).collect();
                    println!("{}", Table::new(rows));
                }
            }
        }
        Ok(())
    }

    fn write_response(&self, response: &[u8], format: DataFormat) -> Result<(), OutputError> {
        let rendered = render_bytes(response, format);
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "response": rendered,
                    "format": format.to_string(),
                    "bytes": response.len(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                println!("{}", rendered);
            }
        }
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "message": message,
                    "level": "info"
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                println!("{}", message);
            }
        }
        Ok(())
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "error": error,
                    "level": "error"
                });
                eprintln!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                eprintln!("Error: {}", error);
            }
        }
        Ok(())
    }
}

/// Table row for serial port listing
#[derive(Tabled)]
struct PortTableRow {
    port: String,
    kind: String,
    description: String,
}

impl From<&PortInfo> for PortTableRow {
    fn from(port: &PortInfo) -> Self {
        Self {
            port: port.name.clone(),
            kind: port.kind.clone(),
            description: port.description.clone().unwrap_or_default(),
        }
    }
}
