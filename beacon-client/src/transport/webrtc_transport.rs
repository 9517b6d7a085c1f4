use crate::transport::{
    ChannelId, DataChannel, IceConnectionState, PeerTransport, RtcProvider, SignalingState,
    TransportError, TransportEvent, next_channel_id,
};
use async_trait::async_trait;
use beacon_core::{IceCandidate, IceServerConfig, SdpType, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::offer_answer_options::RTCOfferOptions;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::signaling_state::RTCSignalingState;

impl From<webrtc::Error> for TransportError {
    fn from(e: webrtc::Error) -> Self {
        TransportError::Rtc(e.to_string())
    }
}

/// Peer connections backed by the `webrtc` crate.
#[derive(Debug, Clone, Default)]
pub struct WebRtcProvider;

#[async_trait]
impl RtcProvider for WebRtcProvider {
    async fn create_peer(
        &self,
        ice_servers: &[IceServerConfig],
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<Arc<dyn PeerTransport>, TransportError> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let config = RTCConfiguration {
            ice_servers: ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let pc = Arc::new(api.new_peer_connection(config).await?);
        let peer = WebRtcPeer { pc, events };
        peer.wire_callbacks();

        info!("Peer connection created with {} ICE servers", ice_servers.len());
        Ok(Arc::new(peer))
    }
}

struct WebRtcPeer {
    pc: Arc<RTCPeerConnection>,
    events: mpsc::UnboundedSender<TransportEvent>,
}

impl WebRtcPeer {
    fn wire_callbacks(&self) {
        let tx = self.events.clone();
        self.pc.on_negotiation_needed(Box::new(move || {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(TransportEvent::NegotiationNeeded);
            })
        }));

        let tx = self.events.clone();
        self.pc
            .on_ice_candidate(Box::new(move |candidate: Option<RTCIceCandidate>| {
                let tx = tx.clone();
                Box::pin(async move {
                    let Some(candidate) = candidate else { return };
                    match candidate.to_json() {
                        Ok(init) => {
                            let _ = tx.send(TransportEvent::LocalCandidate(IceCandidate {
                                candidate: init.candidate,
                                sdp_mid: init.sdp_mid,
                                sdp_m_line_index: init.sdp_mline_index,
                                username_fragment: init.username_fragment,
                            }));
                        }
                        Err(e) => warn!("Failed to serialize local candidate: {}", e),
                    }
                })
            }));

        let tx = self.events.clone();
        self.pc
            .on_ice_connection_state_change(Box::new(move |state: RTCIceConnectionState| {
                let tx = tx.clone();
                Box::pin(async move {
                    debug!("ICE connection state: {}", state);
                    let _ = tx.send(TransportEvent::IceStateChanged(ice_state(state)));
                })
            }));

        let tx = self.events.clone();
        self.pc
            .on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
                let tx = tx.clone();
                Box::pin(async move {
                    debug!("Remote opened data channel '{}'", dc.label());
                    let channel = Arc::new(WebRtcChannel::new(dc));
                    let _ = tx.send(TransportEvent::DataChannel(channel.clone()));
                    channel.attach(tx);
                })
            }));
    }
}

#[async_trait]
impl PeerTransport for WebRtcPeer {
    async fn create_data_channel(&self, label: &str) -> Result<Arc<dyn DataChannel>, TransportError> {
        let dc = self.pc.create_data_channel(label, None).await?;
        let channel = Arc::new(WebRtcChannel::new(dc));
        channel.attach(self.events.clone());
        Ok(channel)
    }

    async fn create_offer(&self, ice_restart: bool) -> Result<SessionDescription, TransportError> {
        let options = RTCOfferOptions {
            ice_restart,
            voice_activity_detection: false,
        };
        let offer = self.pc.create_offer(Some(options)).await?;
        from_rtc(offer)
    }

    async fn create_answer(&self) -> Result<SessionDescription, TransportError> {
        let answer = self.pc.create_answer(None).await?;
        from_rtc(answer)
    }

    async fn set_local_description(&self, description: SessionDescription) -> Result<(), TransportError> {
        self.pc.set_local_description(to_rtc(description)?).await?;
        Ok(())
    }

    async fn set_remote_description(&self, description: SessionDescription) -> Result<(), TransportError> {
        self.pc.set_remote_description(to_rtc(description)?).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), TransportError> {
        self.pc
            .add_ice_candidate(RTCIceCandidateInit {
                candidate: candidate.candidate,
                sdp_mid: candidate.sdp_mid,
                sdp_mline_index: candidate.sdp_m_line_index,
                username_fragment: candidate.username_fragment,
            })
            .await?;
        Ok(())
    }

    fn signaling_state(&self) -> SignalingState {
        match self.pc.signaling_state() {
            RTCSignalingState::HaveLocalOffer => SignalingState::HaveLocalOffer,
            RTCSignalingState::HaveRemoteOffer => SignalingState::HaveRemoteOffer,
            RTCSignalingState::HaveLocalPranswer => SignalingState::HaveLocalPranswer,
            RTCSignalingState::HaveRemotePranswer => SignalingState::HaveRemotePranswer,
            RTCSignalingState::Closed => SignalingState::Closed,
            _ => SignalingState::Stable,
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.pc.close().await?;
        Ok(())
    }
}

struct WebRtcChannel {
    id: ChannelId,
    inner: Arc<RTCDataChannel>,
}

impl WebRtcChannel {
    fn new(inner: Arc<RTCDataChannel>) -> Self {
        Self {
            id: next_channel_id(),
            inner,
        }
    }

    fn attach(&self, events: mpsc::UnboundedSender<TransportEvent>) {
        let id = self.id;

        let tx = events.clone();
        self.inner.on_open(Box::new(move || {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(TransportEvent::ChannelOpen(id));
            })
        }));

        let tx = events.clone();
        self.inner
            .on_message(Box::new(move |msg: DataChannelMessage| {
                let tx = tx.clone();
                Box::pin(async move {
                    match String::from_utf8(msg.data.to_vec()) {
                        Ok(text) => {
                            let _ = tx.send(TransportEvent::ChannelMessage(id, text));
                        }
                        Err(_) => warn!("Dropping binary frame on channel {}", id),
                    }
                })
            }));

        let tx = events;
        self.inner.on_close(Box::new(move || {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(TransportEvent::ChannelClosed(id));
            })
        }));
    }
}

#[async_trait]
impl DataChannel for WebRtcChannel {
    fn id(&self) -> ChannelId {
        self.id
    }

    fn label(&self) -> String {
        self.inner.label().to_owned()
    }

    async fn send_text(&self, text: &str) -> Result<(), TransportError> {
        self.inner.send_text(text.to_owned()).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.inner.close().await?;
        Ok(())
    }
}

fn ice_state(state: RTCIceConnectionState) -> IceConnectionState {
    match state {
        RTCIceConnectionState::Checking => IceConnectionState::Checking,
        RTCIceConnectionState::Connected => IceConnectionState::Connected,
        RTCIceConnectionState::Completed => IceConnectionState::Completed,
        RTCIceConnectionState::Disconnected => IceConnectionState::Disconnected,
        RTCIceConnectionState::Failed => IceConnectionState::Failed,
        RTCIceConnectionState::Closed => IceConnectionState::Closed,
        _ => IceConnectionState::New,
    }
}

fn to_rtc(description: SessionDescription) -> Result<RTCSessionDescription, TransportError> {
    Ok(match description.sdp_type {
        SdpType::Offer => RTCSessionDescription::offer(description.sdp)?,
        SdpType::Answer => RTCSessionDescription::answer(description.sdp)?,
        SdpType::Pranswer => RTCSessionDescription::pranswer(description.sdp)?,
        SdpType::Rollback => {
            let mut rollback = RTCSessionDescription::default();
            rollback.sdp_type = RTCSdpType::Rollback;
            rollback
        }
    })
}

fn from_rtc(description: RTCSessionDescription) -> Result<SessionDescription, TransportError> {
    let sdp_type = match description.sdp_type {
        RTCSdpType::Offer => SdpType::Offer,
        RTCSdpType::Answer => SdpType::Answer,
        RTCSdpType::Pranswer => SdpType::Pranswer,
        RTCSdpType::Rollback => SdpType::Rollback,
        RTCSdpType::Unspecified => {
            return Err(TransportError::Rtc("unspecified description type".to_owned()));
        }
    };
    Ok(SessionDescription {
        sdp_type,
        sdp: description.sdp,
    })
}
