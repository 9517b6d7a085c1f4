use beacon_client::{ClientError, NegotiationPhase};

use crate::integration::init_tracing;
use crate::utils::*;

#[tokio::test]
async fn nothing_negotiates_before_the_first_peer_list() {
    init_tracing();
    let network = MockNetwork::new();
    let (a, mut script) = scripted_client(&network, "A")
        .await
        .expect("Failed to start scripted client");

    assert_eq!(a.role(), None);
    assert_eq!(a.polite(), None);
    assert_eq!(a.phase(), NegotiationPhase::Idle);
    assert!(matches!(
        a.connect_to_peer("B").await,
        Err(ClientError::RoleUndecided)
    ));
    script.assert_no_description().await;
}
