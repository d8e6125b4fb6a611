// Core module - Speed negotiation, bridge loop and session lifecycle
pub mod bridge;
pub mod session;
pub mod speed;

pub use bridge::{translate_outgoing, BridgeLoop, LocalConsole, TrafficCounters};
pub use session::{run_session, BridgeState, Session, SessionReport};
pub use speed::{resolve_speed, SUPPORTED_RATES};
