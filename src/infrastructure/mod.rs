// Infrastructure module - Devices, terminals and logging
pub mod logging;
pub mod serial;
pub mod terminal;
