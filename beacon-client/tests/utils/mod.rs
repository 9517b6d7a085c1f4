pub mod relay_server;
pub mod relay_signaling;

pub use event_helpers::*;
pub use mock_rtc::*;
pub use relay_server::*;
pub use relay_signaling::*;
pub use scripted_signaling::*;
