use crate::room::{Member, MemberHandle, Room, RoomCommand, RoomHandle};
use beacon_core::{PeerId, RoomId};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

/// Owns every live room. Rooms are spawned on first join and remove
/// themselves once the last member leaves.
#[derive(Clone, Default)]
pub struct RoomManager {
    rooms: Arc<DashMap<RoomId, RoomHandle>>,
    next_epoch: Arc<AtomicU64>,
    next_connection: Arc<AtomicU64>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a socket to `room`. Frames the room sends to this member are
    /// written to `outbound`; the returned handle feeds frames back in.
    pub fn join(
        &self,
        room: impl Into<RoomId>,
        peer_id: PeerId,
        outbound: mpsc::UnboundedSender<String>,
    ) -> MemberHandle {
        let room = room.into();
        let connection = self.next_connection.fetch_add(1, Ordering::Relaxed);
        let member = Member::new(peer_id.clone(), connection, outbound);

        let entry = self
            .rooms
            .entry(room.clone())
            .or_insert_with(|| self.spawn_room(&room));

        entry.connections.fetch_add(1, Ordering::SeqCst);
        let room_tx = entry.tx.clone();
        if room_tx.send(RoomCommand::Join { member }).is_err() {
            error!("Room '{}' died before {} could join", room, peer_id);
        }
        drop(entry);

        MemberHandle::new(room, peer_id, connection, room_tx)
    }

    /// Members of `room` in arrival order. Empty if the room is not running.
    pub async fn members(&self, room: &str) -> Vec<PeerId> {
        let Some(tx) = self.rooms.get(room).map(|handle| handle.tx.clone()) else {
            return Vec::new();
        };

        let (reply, rx) = oneshot::channel();
        if tx.send(RoomCommand::Snapshot { reply }).is_err() {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn contains_room(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }

    fn spawn_room(&self, name: &RoomId) -> RoomHandle {
        info!("Creating new room: {}", name);

        let (tx, rx) = mpsc::unbounded_channel();
        let connections = Arc::new(AtomicUsize::new(0));
        let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed);

        let room = Room::new(
            name.clone(),
            epoch,
            rx,
            connections.clone(),
            self.rooms.clone(),
        );
        tokio::spawn(room.run());

        RoomHandle {
            tx,
            connections,
            epoch,
        }
    }
}
