use oma_dm_client_rs::{
    account::{AuthType, CredentialDescriptor},
    credentials::build_credential,
    error::PacketOutcome,
};

use crate::integration_tests::common::{SERVER_ID, SESSION_ID, build_session};

fn server_cred_b64() -> String {
    let desc = CredentialDescriptor {
        auth_type: Some(AuthType::Basic),
        name: SERVER_ID.to_string(),
        secret: "serversecret".to_string(),
        data: None,
        uri: "./DMAcc/1/AppAuth/1".to_string(),
    };
    build_credential(&desc).expect("BASIC cred should build")
}

#[test]
fn accepts_a_valid_server_credential_in_pkg0() {
    let mut session = build_session(true);
    let pkg0 = format!("{SERVER_ID}\t{SESSION_ID}\tb64\t{}", server_cred_b64());
    session.session_start_on_alert(pkg0.as_bytes()).unwrap();

    let pkt = session.get_next_packet().unwrap();
    assert_eq!(pkt.outcome, PacketOutcome::More);
    let text = String::from_utf8(pkt.data).unwrap();
    assert!(text.contains("ALERT\t1\t1200"), "should open with SERVER_INITIATED: {text}");
}

#[test]
fn rejects_a_forged_server_credential_in_pkg0_without_failing_the_call() {
    let mut session = build_session(true);
    let pkg0 = format!("{SERVER_ID}\t{SESSION_ID}\tb64\tQm9ndXM=");
    session
        .session_start_on_alert(pkg0.as_bytes())
        .expect("a rejected credential is still a valid pkg0");

    let pkt = session.get_next_packet().unwrap();
    assert_eq!(pkt.outcome, PacketOutcome::More);
}

#[test]
fn pkg0_with_wrong_field_count_is_malformed() {
    let mut session = build_session(false);
    assert!(session.session_start_on_alert(b"only-one-field").is_err());
}

#[test]
fn pkg0_for_unknown_server_id_is_an_error() {
    let mut session = build_session(false);
    let pkg0 = format!("no-such-server\t{SESSION_ID}");
    assert!(session.session_start_on_alert(pkg0.as_bytes()).is_err());
}
