use std::sync::Arc;

use oma_dm_client_rs::{
    session::{Session, codec::reference::ReferenceCodec},
    tree::{
        DMTree,
        builtin::{AccountSeed, CredentialSeed, device_info_mo, dm_acc_mo},
    },
};

pub const SERVER_ID: &str = "acme-dm-server";
pub const SESSION_ID: &str = "1";
pub const DEV_ID: &str = "IMEI:490154203237518";

/// Builds a `DMTree` with one `DMAcc` account. `to_client` controls whether
/// the server side also carries a credential (needed for pkg0 verification
/// in the server-initiated flow).
pub fn build_tree(to_client: bool) -> Arc<DMTree> {
    let tree = Arc::new(DMTree::new());
    tree.add_plugin(Box::new(device_info_mo(DEV_ID))).unwrap();
    tree.add_plugin(Box::new(dm_acc_mo(&AccountSeed {
        base_uri: "./DMAcc/1",
        server_id: SERVER_ID,
        server_addr: "https://dm.example.com/server",
        to_server: Some(CredentialSeed {
            auth_level: "CLCRED",
            auth_type: "BASIC",
            name: "device01",
            secret: "s3cr3t",
        }),
        to_client: to_client.then_some(CredentialSeed {
            auth_level: "SRVCRED",
            auth_type: "BASIC",
            name: "acme-dm-server",
            secret: "serversecret",
        }),
    })))
    .unwrap();
    tree
}

pub fn build_session(to_client: bool) -> Session {
    let tree = build_tree(to_client);
    Session::session_init(tree, Box::new(ReferenceCodec::new()), 16384)
}
