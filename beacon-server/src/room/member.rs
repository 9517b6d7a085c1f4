use crate::room::RoomCommand;
use beacon_core::{PeerId, RoomId};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Serial of one accepted socket. Lets a room tell a reconnected peer apart
/// from the stale socket it replaced.
pub type ConnectionId = u64;

/// A socket as the room actor sees it.
pub(crate) struct Member {
    pub(crate) peer_id: PeerId,
    pub(crate) connection: ConnectionId,
    outbound: mpsc::UnboundedSender<String>,
}

impl Member {
    pub(crate) fn new(
        peer_id: PeerId,
        connection: ConnectionId,
        outbound: mpsc::UnboundedSender<String>,
    ) -> Self {
        Self {
            peer_id,
            connection,
            outbound,
        }
    }

    pub(crate) fn send(&self, text: String) {
        if self.outbound.send(text).is_err() {
            debug!("Socket of {} already closed, frame dropped", self.peer_id);
        }
    }
}

/// The socket side of a membership. Frames go in through `send`; dropping the
/// handle leaves the room.
pub struct MemberHandle {
    room: RoomId,
    peer_id: PeerId,
    connection: ConnectionId,
    room_tx: mpsc::UnboundedSender<RoomCommand>,
}

impl MemberHandle {
    pub(crate) fn new(
        room: RoomId,
        peer_id: PeerId,
        connection: ConnectionId,
        room_tx: mpsc::UnboundedSender<RoomCommand>,
    ) -> Self {
        Self {
            room,
            peer_id,
            connection,
            room_tx,
        }
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Hand a raw frame to the room for routing.
    pub fn send(&self, raw: impl Into<String>) {
        let cmd = RoomCommand::Message {
            peer_id: self.peer_id.clone(),
            connection: self.connection,
            raw: raw.into(),
        };
        if self.room_tx.send(cmd).is_err() {
            warn!("Room '{}' is gone, dropping frame from {}", self.room, self.peer_id);
        }
    }

    /// Leave the room. Safe to call more than once.
    pub fn leave(&self) {
        let _ = self.room_tx.send(RoomCommand::Leave {
            peer_id: self.peer_id.clone(),
            connection: self.connection,
        });
    }
}

impl Drop for MemberHandle {
    fn drop(&mut self) {
        self.leave();
    }
}
