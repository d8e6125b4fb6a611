mod mock;

use mock::MockPort;
use std::time::Duration;
use termbridge::infrastructure::serial::SerialClient;
use termbridge::{BridgeError, CommandConfig};

#[test]
fn test_command_appends_carriage_return_and_collects_reply() {
    let mut client = SerialClient::with_port(MockPort::replying(b"OK\r\n"), "mock");

    let config = CommandConfig::default();
    let response = client.run_command(b"AT", &config).unwrap();
    assert_eq!(response, b"OK\r\n");

    let port = client.port();
    assert_eq!(port.written, b"AT\r");
    assert_eq!(port.discards, 1);
    assert_eq!(port.timeout, Some(config.timeout()));
}

#[test]
fn test_command_applies_quiet_timeout() {
    let mut client = SerialClient::with_port(MockPort::replying(b"OK"), "mock");
    let config = CommandConfig {
        timeout_ms: 250,
        ..CommandConfig::default()
    };

    client.run_command(b"AT", &config).unwrap();
    assert_eq!(client.port().timeout, Some(Duration::from_millis(250)));
}

#[test]
fn test_command_without_terminator() {
    let port = MockPort::replying(b"pong");
    let mut client = SerialClient::with_port(port, "mock");
    let config = CommandConfig {
        terminator: false,
        ..CommandConfig::default()
    };

    assert_eq!(client.run_command(b"ping", &config).unwrap(), b"pong");
    assert_eq!(client.port().written, b"ping");
}

#[test]
fn test_stale_input_is_discarded_before_request() {
    let mut port = MockPort::replying(b"fresh");
    port.pending.extend(b"stale".iter().copied());
    let mut client = SerialClient::with_port(port, "mock");

    let response = client.run_command(b"status", &CommandConfig::default()).unwrap();
    assert_eq!(response, b"fresh");
    assert_eq!(client.port().discards, 1);
}

#[test]
fn test_response_is_capped_at_max_bytes() {
    let reply = vec![b'#'; 1000];
    let mut client = SerialClient::with_port(MockPort::replying(&reply), "mock");
    let config = CommandConfig {
        max_bytes: 300,
        ..CommandConfig::default()
    };

    let response = client.run_command(b"dump", &config).unwrap();
    assert_eq!(response.len(), 300);
}

#[test]
fn test_zero_response_limit_is_rejected() {
    let mut client = SerialClient::with_port(MockPort::default(), "mock");
    let config = CommandConfig {
        max_bytes: 0,
        ..CommandConfig::default()
    };

    let result = client.run_command(b"AT", &config);
    assert!(matches!(result, Err(BridgeError::InvalidInput(_))));
    // Rejected before touching the port
    assert!(client.port().written.is_empty());
    assert_eq!(client.port().discards, 0);
}

#[test]
fn test_silent_device_yields_empty_response() {
    let mut client = SerialClient::with_port(MockPort::default(), "mock");
    let response = client.run_command(b"AT", &CommandConfig::default()).unwrap();
    assert!(response.is_empty());
}

#[test]
fn test_raw_primitives() {
    let mut client = SerialClient::with_port(MockPort::replying(b"hi"), "mock");
    assert_eq!(client.path(), "mock");

    assert_eq!(client.write(b"x").unwrap(), 1);
    let mut buf = [0u8; 8];
    assert_eq!(client.read(&mut buf).unwrap(), 2);
    assert_eq!(&buf[..2], b"hi");

    // Timed out read reports zero bytes
    assert_eq!(client.read(&mut buf).unwrap(), 0);
    assert_eq!(client.port().written, b"x");
    client.close();
}
