use crate::error::ClientError;
use crate::ice::resolve_ice_servers;
use crate::negotiation::{NegotiationPhase, Negotiator, Role};
use crate::options::{ConnectOptions, signaling_url};
use crate::signaling::{SignalingChannel, connect_ws};
use crate::transport::{
    ChannelId, DataChannel, IceConnectionState, PeerTransport, RtcProvider, TransportError,
    TransportEvent, default_provider,
};
use beacon_core::{IceServerConfig, PeerId, SignalMessage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

mod handle_command_impl;
mod handle_remote_description_impl;
mod handle_signal_impl;
mod handle_transport_event_impl;
mod make_offer_impl;
mod setup_data_channel_impl;

/// What a [`Connection`] reports to its owner.
#[derive(Debug)]
pub enum ConnectionEvent {
    /// Room membership as seen by the relay, without ourselves.
    PeerList(Vec<PeerId>),
    RoleAssigned(Role),
    /// A data channel opened. Its peer is not known until the handshake.
    DataChannel { label: String },
    PeerConnected(PeerId),
    PeerDisconnected(PeerId),
    Message { data: String, peer: PeerId },
    IceStateChanged(IceConnectionState),
    SignalingClosed,
    /// A negotiation step failed. The connection stays usable.
    Error(ClientError),
}

enum Command {
    ConnectToPeer {
        peer: PeerId,
        reply: oneshot::Sender<Result<(), ClientError>>,
    },
    Send {
        text: String,
        reply: oneshot::Sender<Result<usize, ClientError>>,
    },
    SendTo {
        peer: PeerId,
        text: String,
        reply: oneshot::Sender<Result<(), ClientError>>,
    },
    Close {
        reply: oneshot::Sender<()>,
    },
}

/// Read-only mirror of driver state for the handle's getters.
#[derive(Debug, Clone, Default)]
struct ConnectionView {
    role: Option<Role>,
    phase: NegotiationPhase,
    peers: Vec<PeerId>,
    connected: Vec<PeerId>,
}

fn lock_view(view: &Mutex<ConnectionView>) -> MutexGuard<'_, ConnectionView> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A client in one room: one peer connection, any number of data channels
/// keyed by the peer on the other end.
pub struct Connection {
    peer_id: PeerId,
    commands: mpsc::UnboundedSender<Command>,
    events: mpsc::UnboundedReceiver<ConnectionEvent>,
    view: Arc<Mutex<ConnectionView>>,
}

impl Connection {
    /// Join `options.room` on the relay at `options.host`.
    pub async fn connect(options: ConnectOptions) -> Result<Self, ClientError> {
        let rtc = options
            .rtc
            .clone()
            .or_else(default_provider)
            .ok_or(ClientError::RtcUnavailable)?;

        let peer_id = options.peer_id.clone().unwrap_or_default();
        let ice_servers = resolve_ice_servers(&options).await;

        let url = signaling_url(&options.host, options.room.as_str(), &peer_id)?;
        let signaling = connect_ws(url.as_str()).await?;

        Self::establish(peer_id, signaling, rtc, ice_servers, options.channel_label).await
    }

    /// Start a connection over an already open signaling channel.
    pub async fn establish(
        peer_id: PeerId,
        signaling: SignalingChannel,
        rtc: Arc<dyn RtcProvider>,
        ice_servers: Vec<IceServerConfig>,
        channel_label: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let (transport_tx, transport_rx) = mpsc::unbounded_channel();
        let transport = match rtc.create_peer(&ice_servers, transport_tx).await {
            Ok(transport) => transport,
            Err(TransportError::Unsupported) => return Err(ClientError::RtcUnavailable),
            Err(e) => return Err(e.into()),
        };

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let view = Arc::new(Mutex::new(ConnectionView::default()));

        let driver = ConnectionDriver {
            peer_id: peer_id.clone(),
            channel_label: channel_label.into(),
            negotiator: Negotiator::new(),
            transport,
            signaling: Some(signaling),
            transport_rx: Some(transport_rx),
            commands: command_rx,
            events: event_tx,
            view: view.clone(),
            peers: Vec::new(),
            remote: None,
            channels: HashMap::new(),
        };
        tokio::spawn(driver.run());

        Ok(Self {
            peer_id,
            commands: command_tx,
            events: event_rx,
            view,
        })
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    pub fn role(&self) -> Option<Role> {
        lock_view(&self.view).role
    }

    /// `None` until the first peer list arrives.
    pub fn polite(&self) -> Option<bool> {
        self.role().map(Role::is_polite)
    }

    pub fn phase(&self) -> NegotiationPhase {
        lock_view(&self.view).phase
    }

    pub fn peers(&self) -> Vec<PeerId> {
        lock_view(&self.view).peers.clone()
    }

    /// Peers with an open, identified data channel.
    pub fn connected_peers(&self) -> Vec<PeerId> {
        lock_view(&self.view).connected.clone()
    }

    /// Next event, or `None` once the connection is closed and drained.
    pub async fn next_event(&mut self) -> Option<ConnectionEvent> {
        self.events.recv().await
    }

    /// Open a data channel and negotiate with `peer`. Fails with
    /// [`ClientError::RoleUndecided`] before the first peer list.
    pub async fn connect_to_peer(&self, peer: impl Into<PeerId>) -> Result<(), ClientError> {
        let peer = peer.into();
        self.request(|reply| Command::ConnectToPeer { peer, reply })
            .await?
    }

    /// Send to every connected peer. Returns how many were reached.
    pub async fn send(&self, text: impl Into<String>) -> Result<usize, ClientError> {
        let text = text.into();
        self.request(|reply| Command::Send { text, reply }).await?
    }

    pub async fn send_to(
        &self,
        peer: impl Into<PeerId>,
        text: impl Into<String>,
    ) -> Result<(), ClientError> {
        let (peer, text) = (peer.into(), text.into());
        self.request(|reply| Command::SendTo { peer, text, reply })
            .await?
    }

    /// Close channels, the peer connection and the signaling socket.
    pub async fn close(&self) {
        let _ = self.request(|reply| Command::Close { reply }).await;
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ClientError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(command(reply))
            .map_err(|_| ClientError::Closed)?;
        rx.await.map_err(|_| ClientError::Closed)
    }
}

struct ChannelSlot {
    channel: Arc<dyn DataChannel>,
    /// Set by the identity handshake.
    peer: Option<PeerId>,
    open: bool,
}

/// Owns all negotiation state. Signaling, transport events and commands are
/// handled one at a time, so the offer guard and the transport never race.
struct ConnectionDriver {
    peer_id: PeerId,
    channel_label: String,
    negotiator: Negotiator,
    transport: Arc<dyn PeerTransport>,
    signaling: Option<SignalingChannel>,
    transport_rx: Option<mpsc::UnboundedReceiver<TransportEvent>>,
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
    view: Arc<Mutex<ConnectionView>>,
    peers: Vec<PeerId>,
    /// Peer the current negotiation is with.
    remote: Option<PeerId>,
    channels: HashMap<ChannelId, ChannelSlot>,
}

impl ConnectionDriver {
    async fn run(mut self) {
        info!("Connection {} started", self.peer_id);

        loop {
            tokio::select! {
                message = next_signal(&mut self.signaling) => match message {
                    Some(message) => self.handle_signal(message).await,
                    None => {
                        info!("Signaling socket closed");
                        self.signaling = None;
                        self.emit(ConnectionEvent::SignalingClosed);
                    }
                },

                event = next_transport_event(&mut self.transport_rx) => match event {
                    Some(event) => self.handle_transport_event(event).await,
                    None => {
                        debug!("Transport event stream ended");
                        self.transport_rx = None;
                    }
                },

                command = self.commands.recv() => match command {
                    Some(command) => {
                        if self.handle_command(command).await.is_break() {
                            break;
                        }
                    }
                    None => {
                        self.shutdown().await;
                        break;
                    }
                },
            }
        }

        info!("Connection {} finished", self.peer_id);
    }

    fn emit(&self, event: ConnectionEvent) {
        if self.events.send(event).is_err() {
            debug!("Connection handle dropped, event discarded");
        }
    }

    fn emit_error(&self, error: ClientError) {
        warn!("Negotiation error: {}", error);
        self.emit(ConnectionEvent::Error(error));
    }

    fn send_signal(&self, message: SignalMessage) -> Result<(), ClientError> {
        match &self.signaling {
            Some(signaling) => signaling.send(&message),
            None => Err(ClientError::SignalingClosed),
        }
    }

    /// Who outbound negotiation traffic goes to: the current remote, else
    /// the only other member of the room.
    fn reply_target(&self) -> Option<PeerId> {
        self.remote.clone().or_else(|| match self.peers.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        })
    }

    fn sync_view(&self) {
        let mut view = lock_view(&self.view);
        view.role = self.negotiator.role();
        view.phase = self.negotiator.phase();
        view.peers = self.peers.clone();
        view.connected = self.identified_peers();
    }
}

async fn next_signal(signaling: &mut Option<SignalingChannel>) -> Option<SignalMessage> {
    match signaling {
        Some(signaling) => signaling.recv().await,
        None => std::future::pending().await,
    }
}

async fn next_transport_event(
    rx: &mut Option<mpsc::UnboundedReceiver<TransportEvent>>,
) -> Option<TransportEvent> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
