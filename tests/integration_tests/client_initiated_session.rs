use oma_dm_client_rs::error::PacketOutcome;

use crate::integration_tests::common::{SERVER_ID, SESSION_ID, build_session};

#[test]
fn drives_a_client_initiated_session_to_completion() {
    let mut session = build_session(false);
    session.session_start(SERVER_ID, SESSION_ID).unwrap();

    let pkt = session.get_next_packet().unwrap();
    assert_eq!(pkt.outcome, PacketOutcome::More);
    let text = String::from_utf8(pkt.data).unwrap();
    assert!(text.contains("ALERT\t1\t1201"), "should open with CLIENT_INITIATED: {text}");
    assert!(text.contains("REPLACE"), "should report DevId: {text}");
    assert!(text.contains("CRED\t"), "unauthenticated client should attach a credential: {text}");

    // Server accepts the credential and has nothing further to ask.
    session.process_reply(b"STATUS\t0\t212\n").unwrap();

    let pkt = session.get_next_packet().unwrap();
    assert_eq!(pkt.outcome, PacketOutcome::End);
}

#[test]
fn second_message_omits_the_credential_once_accepted() {
    let mut session = build_session(false);
    session.session_start(SERVER_ID, SESSION_ID).unwrap();
    session.get_next_packet().unwrap();
    session.process_reply(b"STATUS\t0\t212\nGET\t1\t./DevInfo/DevId\n").unwrap();

    let pkt = session.get_next_packet().unwrap();
    let text = String::from_utf8(pkt.data).unwrap();
    assert!(!text.contains("CRED\t"), "credential should not repeat once accepted: {text}");
    assert!(text.contains("RESULTS"), "GET should have produced Results: {text}");
}

#[test]
fn rejected_credential_is_retried_on_the_next_message() {
    let mut session = build_session(false);
    session.session_start(SERVER_ID, SESSION_ID).unwrap();
    session.get_next_packet().unwrap();

    session.process_reply(b"STATUS\t0\t401\n").unwrap();
    let pkt = session.get_next_packet().unwrap();
    let text = String::from_utf8(pkt.data).unwrap();
    // Still unauthenticated, so the credential is retried.
    assert!(text.contains("CRED\t"), "rejected auth should retry the credential: {text}");
}
