use oma_dm_client_rs::error::PacketOutcome;

use crate::integration_tests::common::{SERVER_ID, SESSION_ID, build_session};

#[test]
fn add_alert_session_abort_ends_the_session_immediately() {
    let mut session = build_session(false);
    session.session_start(SERVER_ID, SESSION_ID).unwrap();
    session.get_next_packet().unwrap();

    session.add_alert("1223");
    let pkt = session.get_next_packet().unwrap();
    assert_eq!(pkt.outcome, PacketOutcome::End);
    let text = String::from_utf8(pkt.data).unwrap();
    assert!(text.contains("1223"));

    assert!(
        session.get_next_packet().is_err(),
        "calling again after End should error"
    );
}

#[test]
fn server_more_data_alert_keeps_the_session_open_with_no_other_work() {
    let mut session = build_session(false);
    session.session_start(SERVER_ID, SESSION_ID).unwrap();
    session.get_next_packet().unwrap();
    session
        .process_reply(b"STATUS\t0\t212\nALERT\t9\t1222\t\n")
        .unwrap();

    let pkt = session.get_next_packet().unwrap();
    assert_eq!(
        pkt.outcome,
        PacketOutcome::More,
        "a bare MORE_DATA alert must not be treated as end-of-session"
    );
}
