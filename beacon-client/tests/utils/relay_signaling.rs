use beacon_client::SignalingChannel;
use beacon_core::PeerId;
use beacon_server::RoomManager;
use tokio::sync::mpsc;

/// A [`SignalingChannel`] wired straight into an in-process relay room.
/// Dropping the channel's sender leaves the room, just as a closed socket.
pub fn relay_channel(rooms: &RoomManager, room: &str, id: &str) -> SignalingChannel {
    let (to_client, from_relay) = mpsc::unbounded_channel();
    let (to_relay, mut from_client) = mpsc::unbounded_channel::<String>();

    let handle = rooms.join(room, PeerId::from(id), to_client);
    tokio::spawn(async move {
        while let Some(text) = from_client.recv().await {
            handle.send(text);
        }
    });

    SignalingChannel::new(to_relay, from_relay)
}
