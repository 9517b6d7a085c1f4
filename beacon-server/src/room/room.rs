use crate::room::{ConnectionId, Member, RoomCommand};
use beacon_core::{PeerId, RoomId, SignalMessage};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Registry entry for a running room.
pub(crate) struct RoomHandle {
    pub(crate) tx: mpsc::UnboundedSender<RoomCommand>,
    /// Sockets admitted by the manager and not yet removed by the room.
    pub(crate) connections: Arc<AtomicUsize>,
    pub(crate) epoch: u64,
}

pub(crate) struct Room {
    name: RoomId,
    epoch: u64,
    /// Arrival order. Peer lists are built from it.
    members: Vec<Member>,
    command_rx: mpsc::UnboundedReceiver<RoomCommand>,
    connections: Arc<AtomicUsize>,
    registry: Arc<DashMap<RoomId, RoomHandle>>,
}

impl Room {
    pub(crate) fn new(
        name: RoomId,
        epoch: u64,
        command_rx: mpsc::UnboundedReceiver<RoomCommand>,
        connections: Arc<AtomicUsize>,
        registry: Arc<DashMap<RoomId, RoomHandle>>,
    ) -> Self {
        Self {
            name,
            epoch,
            members: Vec::new(),
            command_rx,
            connections,
            registry,
        }
    }

    pub(crate) async fn run(mut self) {
        info!("Room '{}' event loop started", self.name);

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);

            if self.members.is_empty() && self.try_retire() {
                info!("Room '{}' is empty, retiring", self.name);
                break;
            }
        }

        info!("Room '{}' event loop finished", self.name);
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { member } => self.on_connect(member),

            RoomCommand::Message {
                peer_id,
                connection,
                raw,
            } => self.on_message(&peer_id, connection, raw),

            RoomCommand::Leave {
                peer_id,
                connection,
            } => self.on_disconnect(&peer_id, connection),

            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.members.iter().map(|m| m.peer_id.clone()).collect());
            }
        }
    }

    fn on_connect(&mut self, member: Member) {
        if let Some(pos) = self.members.iter().position(|m| m.peer_id == member.peer_id) {
            let evicted = self.members.remove(pos);
            self.connections.fetch_sub(1, Ordering::SeqCst);
            warn!(
                "Peer {} reconnected to room '{}', replacing connection #{}",
                member.peer_id, self.name, evicted.connection
            );
        }

        info!(
            "Peer {} joined room '{}' (connection #{})",
            member.peer_id, self.name, member.connection
        );
        self.members.push(member);
        self.broadcast_peer_list();
    }

    fn on_disconnect(&mut self, peer_id: &PeerId, connection: ConnectionId) {
        let Some(pos) = self
            .members
            .iter()
            .position(|m| m.peer_id == *peer_id && m.connection == connection)
        else {
            debug!("Connection #{} of {} already gone", connection, peer_id);
            return;
        };

        self.members.remove(pos);
        self.connections.fetch_sub(1, Ordering::SeqCst);
        info!("Peer {} left room '{}'", peer_id, self.name);
        self.broadcast_peer_list();
    }

    fn on_message(&mut self, sender: &PeerId, connection: ConnectionId, raw: String) {
        let current = self
            .members
            .iter()
            .any(|m| m.peer_id == *sender && m.connection == connection);
        if !current {
            debug!("Dropping frame from stale connection #{} of {}", connection, sender);
            return;
        }

        // `target` is the only field the relay reads; the rest is opaque.
        let frame: Value = match serde_json::from_str(&raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping malformed frame from {}: {}", sender, e);
                return;
            }
        };

        let Some(fields) = frame.as_object() else {
            warn!("Dropping non-object frame from {}", sender);
            return;
        };

        match fields.get("target") {
            None | Some(Value::Null) => self.broadcast_except(sender, raw),
            Some(Value::String(target)) => self.forward(sender, &PeerId::from(target.as_str()), raw),
            Some(other) => warn!("Dropping frame from {} with bad target {}", sender, other),
        }
    }

    fn forward(&self, sender: &PeerId, target: &PeerId, raw: String) {
        match self.members.iter().find(|m| m.peer_id == *target) {
            Some(member) => {
                debug!("Forwarding {} -> {}", sender, target);
                member.send(raw);
            }
            None => warn!(
                "Target {} not in room '{}', dropping frame from {}",
                target, self.name, sender
            ),
        }
    }

    fn broadcast_except(&self, sender: &PeerId, raw: String) {
        debug!("Broadcasting frame from {} in room '{}'", sender, self.name);
        for member in self.members.iter().filter(|m| m.peer_id != *sender) {
            member.send(raw.clone());
        }
    }

    fn broadcast_peer_list(&self) {
        for member in &self.members {
            let peers = self
                .members
                .iter()
                .filter(|m| m.peer_id != member.peer_id)
                .map(|m| m.peer_id.clone())
                .collect();

            match SignalMessage::peer_list(peers).encode() {
                Ok(text) => member.send(text),
                Err(e) => error!("Failed to encode peer list for {}: {}", member.peer_id, e),
            }
        }
    }

    /// Drops the registry entry if no join is in flight. A join bumps the
    /// counter under the same shard lock, so it either lands here first or
    /// finds no entry and spawns a fresh room.
    fn try_retire(&self) -> bool {
        let epoch = self.epoch;
        let connections = &self.connections;

        self.registry
            .remove_if(&self.name, |_, handle| {
                handle.epoch == epoch && connections.load(Ordering::SeqCst) == 0
            })
            .is_some()
    }
}
