use crate::error::ClientError;
use crate::signaling::SignalingChannel;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Open a signaling socket. Dropping the returned channel closes it.
pub async fn connect_ws(url: &str) -> Result<SignalingChannel, ClientError> {
    let (stream, _) = connect_async(url).await?;
    info!("Signaling socket connected: {}", url);

    let (mut sink, mut source) = stream.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let (in_tx, in_rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(text) = out_rx.recv().await {
            if let Err(e) = sink.send(Message::Text(text.into())).await {
                warn!("Signaling send failed: {}", e);
                break;
            }
        }
        let _ = sink.close().await;
        debug!("Signaling writer finished");
    });

    tokio::spawn(async move {
        while let Some(frame) = source.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    if in_tx.send(text.as_str().to_owned()).is_err() {
                        break;
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("Signaling socket error: {}", e);
                    break;
                }
            }
        }
        debug!("Signaling reader finished");
    });

    Ok(SignalingChannel::new(out_tx, in_rx))
}
