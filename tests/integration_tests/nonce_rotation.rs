use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use oma_dm_client_rs::{
    session::{Session, codec::reference::ReferenceCodec},
    tree::node::Format,
};

use crate::integration_tests::common::{SERVER_ID, SESSION_ID, build_tree};

#[test]
fn dispatch_challenge_persists_the_rotated_nonce_at_the_credentials_own_uri() {
    let tree = build_tree(false);
    let mut session = Session::session_init(tree.clone(), Box::new(ReferenceCodec::new()), 16384);
    session.session_start(SERVER_ID, SESSION_ID).unwrap();
    session.get_next_packet().unwrap();

    let nonce = b"rotated-nonce-bytes";
    let chal = format!("CHAL\t{}\n", BASE64.encode(nonce));
    session.process_reply(chal.as_bytes()).unwrap();

    // The to-server credential in `common::build_tree` is seeded at index 0.
    let stored = tree.get("./DMAcc/1/AppAuth/0/AAuthData").unwrap();
    assert_eq!(stored.format, Format::Bin);
    assert_eq!(stored.data, nonce.to_vec());

    // And definitely not at the old, wrong `AppAuth/AAuthData` location.
    assert!(tree.get("./DMAcc/1/AppAuth/AAuthData").is_err());
}
