use oma_dm_client_rs::error::PacketOutcome;

use crate::integration_tests::common::{SERVER_ID, SESSION_ID, build_session};

#[test]
fn status_against_an_acknowledged_command_resolves_quietly() {
    let mut session = build_session(false);
    session.session_start(SERVER_ID, SESSION_ID).unwrap();
    let pkt = session.get_next_packet().unwrap();
    let text = String::from_utf8(pkt.data).unwrap();
    assert!(text.contains("ALERT\t1\t"), "alert should be cmd_id 1: {text}");

    // CmdRef 1 refers to the Alert we just sent; a plain ack shouldn't
    // generate any further Status in response.
    session
        .process_reply(b"STATUS\t0\t212\nSTATUS\t1\t200\n")
        .unwrap();

    let pkt = session.get_next_packet().unwrap();
    assert_eq!(pkt.outcome, PacketOutcome::End);
}

#[test]
fn status_referencing_an_unknown_cmd_id_surfaces_command_not_allowed() {
    let mut session = build_session(false);
    session.session_start(SERVER_ID, SESSION_ID).unwrap();
    session.get_next_packet().unwrap();

    session
        .process_reply(b"STATUS\t0\t212\nSTATUS\t99\t200\n")
        .unwrap();

    let pkt = session.get_next_packet().unwrap();
    let text = String::from_utf8(pkt.data).unwrap();
    assert!(
        text.contains("STATUS\t1\t99\t405"),
        "an unresolved CmdRef should surface a 405 status: {text}"
    );
}

#[test]
fn status_against_a_still_pending_command_resolves_without_405() {
    let mut session = build_session(false);
    session.session_start(SERVER_ID, SESSION_ID).unwrap();
    session.get_next_packet().unwrap();
    // Two GETs queue four elements (Results+Status per GET) into `pending`
    // before the next message is ever composed; their tentative cmd_ids (3
    // and 4) don't collide with the two already-acknowledged from message 1.
    session
        .process_reply(
            b"STATUS\t0\t212\nGET\t1\t./DevInfo/DevId\nGET\t2\t./DevInfo/DevId\n",
        )
        .unwrap();

    // CmdRef 3 resolves against the still-pending outbound queue, not just
    // the already-sent `acknowledged` one.
    session.process_reply(b"STATUS\t3\t200\n").unwrap();

    let pkt = session.get_next_packet().unwrap();
    let text = String::from_utf8(pkt.data).unwrap();
    assert!(
        !text.contains("405"),
        "a reference to the pending queue should not be treated as unresolved: {text}"
    );
}
