use crate::room::{ConnectionId, Member};
use beacon_core::PeerId;
use tokio::sync::oneshot;

/// Commands a room actor receives from the sockets of its members.
pub(crate) enum RoomCommand {
    /// A socket connected and wants into the room.
    Join { member: Member },

    /// Raw text frame received from a member's socket.
    Message {
        peer_id: PeerId,
        connection: ConnectionId,
        raw: String,
    },

    /// The member's socket closed. Sent again on drop, so it must be idempotent.
    Leave {
        peer_id: PeerId,
        connection: ConnectionId,
    },

    /// Current membership in arrival order.
    Snapshot { reply: oneshot::Sender<Vec<PeerId>> },
}
