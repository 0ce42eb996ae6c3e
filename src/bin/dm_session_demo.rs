// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A scripted two-round-trip OMA-DM session against an in-process
//! [`ReferenceCodec`], exercising Session Core without a real network peer
//! or SyncML parser.

use std::sync::Arc;

use anyhow::{Context, Result};
use oma_dm_client_rs::{
    cfg::{cli::resolve_config_path, config::Config, logger::init_logger},
    error::PacketOutcome,
    session::{Session, codec::reference::ReferenceCodec},
    tree::{
        DMTree,
        builtin::{AccountSeed, CredentialSeed, device_info_mo, dm_acc_mo},
    },
};
use tracing::info;

fn main() -> Result<()> {
    let _guard = init_logger("configs/demo_logger.yaml")?;

    let cfg = resolve_config_path("configs/demo.yaml")
        .and_then(Config::load_from_file)
        .context("failed to resolve or load config")?;

    let tree = Arc::new(DMTree::new());
    tree.add_plugin(Box::new(device_info_mo(&cfg.demo.dev_id)))
        .context("registering DevInfo")?;
    tree.add_plugin(Box::new(dm_acc_mo(&AccountSeed {
        base_uri: "./DMAcc/1",
        server_id: &cfg.demo.server_id,
        server_addr: "https://dm.example.com/server",
        to_server: Some(CredentialSeed {
            auth_level: "CLCRED",
            auth_type: "BASIC",
            name: "device01",
            secret: "s3cr3t",
        }),
        to_client: None,
    })))
    .context("registering DMAcc")?;
    tree.check_mandatory_mo()?;

    let mut session = Session::session_init(
        Arc::clone(&tree),
        Box::new(ReferenceCodec::new()),
        cfg.session.max_msg_size,
    );
    session.session_start(&cfg.demo.server_id, &cfg.demo.session_id)?;

    // Round 1: client init, carries the BASIC credential in its header.
    let pkt = session.get_next_packet()?;
    info!(bytes = %String::from_utf8_lossy(&pkt.data), "outbound message 1");
    assert_eq!(pkt.outcome, PacketOutcome::More);

    // Server accepts the credential and asks for DevId back.
    session.process_reply(b"STATUS\t0\t212\nGET\t1\t./DevInfo/DevId\n")?;

    let pkt = session.get_next_packet()?;
    info!(bytes = %String::from_utf8_lossy(&pkt.data), "outbound message 2");
    assert_eq!(pkt.outcome, PacketOutcome::More);

    // Server acknowledges and has nothing further; session ends.
    session.process_reply(b"STATUS\t1\t200\nSTATUS\t2\t200\n")?;

    let pkt = session.get_next_packet()?;
    info!(bytes = %String::from_utf8_lossy(&pkt.data), "outbound message 3 (final)");
    assert_eq!(pkt.outcome, PacketOutcome::End);

    info!("session complete");
    session.session_close();
    Ok(())
}
