mod ws;

pub use ws::connect_ws;

use crate::error::ClientError;
use beacon_core::SignalMessage;
use tokio::sync::mpsc;
use tracing::warn;

/// JSON signaling over any text transport. Frames go out on `outbound`
/// and come in on `inbound`; the inbound side ending means the socket closed.
pub struct SignalingChannel {
    outbound: mpsc::UnboundedSender<String>,
    inbound: mpsc::UnboundedReceiver<String>,
}

impl SignalingChannel {
    pub fn new(
        outbound: mpsc::UnboundedSender<String>,
        inbound: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        Self { outbound, inbound }
    }

    pub fn send(&self, message: &SignalMessage) -> Result<(), ClientError> {
        let text = message.encode()?;
        self.outbound
            .send(text)
            .map_err(|_| ClientError::SignalingClosed)
    }

    /// Next well-formed message. Malformed frames are logged and skipped.
    pub async fn recv(&mut self) -> Option<SignalMessage> {
        loop {
            let text = self.inbound.recv().await?;
            match SignalMessage::decode(&text) {
                Ok(message) => return Some(message),
                Err(e) => warn!("Dropping malformed signaling frame: {} ({})", e, text),
            }
        }
    }
}
