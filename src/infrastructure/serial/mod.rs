// Serial module - Raw device handles and request/response client
pub mod client;
pub mod device;

pub use client::{available_ports, CommandPort, PortInfo, SerialClient};
pub use device::Device;
