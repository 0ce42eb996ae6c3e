// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Session Core: the multi-round-trip message pipeline, §4.4 of the design.

use std::{collections::VecDeque, sync::Arc};

use tracing::{debug, warn};

use crate::{
    account::{Account, AuthType, get_server_account},
    credentials::{build_credential, meta_for, persist_nonce, verify_credential},
    error::{AuthOutcome, DmError, DmResult, PacketOutcome},
    session::{
        codec::{Codec, CommandDispatcher, CredMeta, MessageHeader},
        element::{OutboundElement, QueuedElement},
        state::{AuthStatus, SessionState, alert_code, status_code},
    },
    tree::{DMTree, acl::Op, node::NodeValue},
};

pub struct OutboundPacket {
    pub data: Vec<u8>,
    pub outcome: PacketOutcome,
}

pub struct Session {
    tree: Arc<DMTree>,
    codec: Option<Box<dyn Codec>>,
    max_msg_size: u32,

    state: SessionState,
    session_id: String,
    server_id: String,
    message_id: u32,

    client_auth: AuthStatus,
    server_auth: AuthStatus,

    pending: VecDeque<OutboundElement>,
    acknowledged: Vec<QueuedElement>,

    account: Option<Account>,
    ui_callback: Option<Box<dyn FnMut(&str) + Send>>,
}

impl Session {
    pub fn session_init(tree: Arc<DMTree>, codec: Box<dyn Codec>, max_msg_size: u32) -> Self {
        Session {
            tree,
            codec: Some(codec),
            max_msg_size,
            state: SessionState::New,
            session_id: String::new(),
            server_id: String::new(),
            message_id: 0,
            client_auth: AuthStatus::NotRequired,
            server_auth: AuthStatus::NotRequired,
            pending: VecDeque::new(),
            acknowledged: Vec::new(),
            account: None,
            ui_callback: None,
        }
    }

    pub fn set_ui_callback(&mut self, cb: impl FnMut(&str) + Send + 'static) {
        self.ui_callback = Some(Box::new(cb));
    }

    pub fn add_mo(&self, mo: Box<dyn crate::tree::mo::ManagedObject>) -> DmResult<()> {
        self.tree.add_plugin(mo)
    }

    pub fn get_uri_list(&self, urn: &str) -> Vec<String> {
        self.tree.list_uri(urn)
    }

    pub fn session_start(&mut self, server_id: &str, session_id: &str) -> DmResult<()> {
        if self.state != SessionState::New {
            return Err(DmError::Usage("session already started".to_string()));
        }
        let account = get_server_account(&self.tree, server_id)?;
        self.client_auth = auth_status_for(&account.to_server_cred);
        self.server_auth = auth_status_for(&account.to_client_cred);
        self.account = Some(account);
        self.server_id = server_id.to_string();
        self.session_id = session_id.to_string();
        self.state = SessionState::ClientInit;
        debug!(server_id, session_id, "session_start: CLIENT_INIT");
        Ok(())
    }

    pub fn session_start_on_alert(&mut self, pkg0: &[u8]) -> DmResult<()> {
        if self.state != SessionState::New {
            return Err(DmError::Usage("session already started".to_string()));
        }
        let decoded = self.codec_mut()?.decode_pkg0(pkg0)?;
        let account = get_server_account(&self.tree, &decoded.server_id)?;
        self.client_auth = auth_status_for(&account.to_server_cred);
        self.server_auth = auth_status_for(&account.to_client_cred);

        if let Some((cred_b64, _meta_type)) = &decoded.cred
            && let Some(desc) = &account.to_client_cred
        {
            let outcome = verify_credential(
                desc.auth_type.unwrap_or(AuthType::Unknown),
                &desc.name,
                &desc.secret,
                desc.data.as_deref(),
                cred_b64,
            )?;
            self.server_auth = match outcome {
                AuthOutcome::Accepted => AuthStatus::Accepted,
                AuthOutcome::Rejected => AuthStatus::Rejected,
            };
        }

        self.server_id = decoded.server_id;
        self.session_id = decoded.session_id;
        self.account = Some(account);
        self.state = SessionState::ServerInit;
        debug!(session_id = %self.session_id, "session_start_on_alert: SERVER_INIT");
        Ok(())
    }

    pub fn add_alert(&mut self, code: &str) {
        self.pending.push_back(OutboundElement::Alert {
            code: code.to_string(),
            items: Vec::new(),
        });
        match code {
            alert_code::SESSION_ABORT => self.state = SessionState::Abort,
            alert_code::MORE_DATA => self.state = SessionState::MoreMsg,
            _ => {},
        }
    }

    pub fn add_generic_alert(&mut self, correlator: &str, item_uri: &str, item_value: &str) {
        self.pending.push_back(OutboundElement::Alert {
            code: alert_code::GENERIC_ALERT.to_string(),
            items: vec![
                correlator.to_string(),
                item_uri.to_string(),
                item_value.to_string(),
            ],
        });
    }

    pub fn get_next_packet(&mut self) -> DmResult<OutboundPacket> {
        match self.state {
            SessionState::New => {
                return Err(DmError::Usage(
                    "call session_start or session_start_on_alert first".to_string(),
                ));
            },
            SessionState::End => {
                return Err(DmError::Usage("session already ended".to_string()));
            },
            SessionState::ClientInit => {
                self.seed_init_elements(alert_code::CLIENT_INITIATED);
                self.state = SessionState::InSession;
            },
            SessionState::ServerInit => {
                self.seed_init_elements(alert_code::SERVER_INITIATED);
                self.state = SessionState::InSession;
            },
            _ => {},
        }

        let was_abort = self.state == SessionState::Abort;
        let more_expected = self.state == SessionState::MoreMsg;
        let had_new_work = self.pending.iter().any(OutboundElement::counts_as_new_work);

        let data = self.compose_message()?;

        let outcome = if was_abort || (!had_new_work && !more_expected) {
            self.state = SessionState::End;
            PacketOutcome::End
        } else {
            if self.state == SessionState::MoreMsg {
                self.state = SessionState::InSession;
            }
            PacketOutcome::More
        };

        Ok(OutboundPacket { data, outcome })
    }

    pub fn process_reply(&mut self, bytes: &[u8]) -> DmResult<()> {
        let mut codec = self
            .codec
            .take()
            .ok_or_else(|| DmError::Internal("codec unavailable".to_string()))?;
        let result = codec.process(bytes, self);
        self.codec = Some(codec);
        result
    }

    pub fn session_close(self) {
        // Dropping `self` releases every owned buffer (queues, account,
        // codec) via ordinary RAII; nothing further to do.
    }

    fn codec_mut(&mut self) -> DmResult<&mut dyn Codec> {
        self.codec
            .as_deref_mut()
            .ok_or_else(|| DmError::Internal("codec unavailable".to_string()))
    }

    fn seed_init_elements(&mut self, alert: &str) {
        self.pending.push_back(OutboundElement::Alert {
            code: alert.to_string(),
            items: Vec::new(),
        });
        if let Ok(dev_id) = self.tree.get("./DevInfo/DevId") {
            self.pending.push_back(OutboundElement::Replace {
                uri: "./DevInfo/DevId".to_string(),
                value: dev_id,
            });
        }
    }

    fn compose_message(&mut self) -> DmResult<Vec<u8>> {
        self.message_id += 1;

        let cred = if !self.client_auth.is_satisfied() {
            match self.account.as_ref().and_then(|a| a.to_server_cred.as_ref()) {
                Some(desc) => {
                    let payload = build_credential(desc)?;
                    let (format, type_) = meta_for(desc.auth_type.unwrap_or(AuthType::Unknown));
                    Some(CredMeta {
                        payload_b64: payload,
                        format,
                        type_,
                    })
                },
                None => None,
            }
        } else {
            None
        };

        let (target, source) = {
            let account = self
                .account
                .as_ref()
                .ok_or_else(|| DmError::Usage("session not started".to_string()))?;
            (account.server_uri.clone(), account.dev_id.clone())
        };
        let session_id = self.session_id.clone();
        let msg_id = self.message_id;

        let header = MessageHeader {
            version: "1.2",
            proto: "DM/1.2",
            session_id: &session_id,
            message_id: msg_id,
            target: &target,
            source: &source,
            cred,
            max_msg_size: self.max_msg_size,
        };

        // Borrowed straight off the field (not through `codec_mut`, which
        // takes `&mut self` and would fight the disjoint `self.pending`
        // access below) so the two borrows stay split.
        let codec = self
            .codec
            .as_mut()
            .ok_or_else(|| DmError::Internal("codec unavailable".to_string()))?;
        codec.start_message(&header)?;

        let mut new_ack = Vec::with_capacity(self.pending.len());
        let mut cmd_id = 1u32;
        for element in self.pending.drain(..) {
            let q = QueuedElement { cmd_id, msg_id, element };
            codec.write_element(&q)?;
            new_ack.push(q);
            cmd_id += 1;
        }
        codec.end_message(true)?;
        let output = codec.take_output();
        self.acknowledged = new_ack;

        Ok(output)
    }

    fn credential_uri_for(&self, direction_is_client: bool) -> Option<String> {
        let account = self.account.as_ref()?;
        let cred = if direction_is_client {
            account.to_server_cred.as_ref()
        } else {
            account.to_client_cred.as_ref()
        };
        cred.map(|c| c.uri.clone())
    }

    /// Resolves an inbound `CmdRef` against `acknowledged` (commands already
    /// sent in a prior message) first, then the current `pending` queue
    /// (commands queued for the next message, numbered as they will be when
    /// composed).
    fn resolve_cmd_ref(&self, cmd_ref: u32) -> bool {
        if self.acknowledged.iter().any(|q| q.cmd_id == cmd_ref) {
            return true;
        }
        self.pending
            .iter()
            .enumerate()
            .any(|(i, _)| cmd_ref == i as u32 + 1)
    }

    fn push_status(&mut self, cmd_ref: u32, code: u16) {
        self.pending.push_back(OutboundElement::Status { cmd_ref, code });
    }

    fn push_results(&mut self, cmd_ref: u32, uri: String, value: NodeValue) {
        self.pending.push_back(OutboundElement::Results { cmd_ref, uri, value });
    }

    fn acl_allows(&self, uri: &str, op: Op) -> bool {
        self.tree
            .get_acl(uri)
            .map(|acl| acl.allows(op, &self.server_id))
            .unwrap_or(false)
    }

    fn status_for_error(err: &DmError) -> u16 {
        match err {
            DmError::NotFound(_) => status_code::NOT_FOUND,
            DmError::NotAllowed(_) => status_code::FORBIDDEN,
            DmError::CommandNotImplemented(_) => 501,
            DmError::OptionalFeatureNotSupported(_) => {
                status_code::OPTIONAL_FEATURE_NOT_SUPPORTED
            },
            _ => status_code::COMMAND_FAILED,
        }
    }
}

impl CommandDispatcher for Session {
    fn dispatch_get(&mut self, cmd_id: u32, uri: &str) {
        if !self.acl_allows(uri, Op::Get) {
            self.push_status(cmd_id, status_code::FORBIDDEN);
            return;
        }
        match self.tree.get(uri) {
            Ok(value) => {
                self.push_results(cmd_id, uri.to_string(), value);
                self.push_status(cmd_id, status_code::OK);
            },
            Err(e) => {
                let code = Self::status_for_error(&e);
                self.push_status(cmd_id, code);
            },
        }
    }

    fn dispatch_replace(&mut self, cmd_id: u32, uri: &str, value: NodeValue) {
        if !self.acl_allows(uri, Op::Replace) {
            self.push_status(cmd_id, status_code::FORBIDDEN);
            return;
        }
        match self.tree.set(uri, value) {
            Ok(()) => self.push_status(cmd_id, status_code::OK),
            Err(e) => {
                let code = Self::status_for_error(&e);
                self.push_status(cmd_id, code);
            },
        }
    }

    fn dispatch_exec(&mut self, cmd_id: u32, uri: &str, cmd_data: Vec<u8>, correlator: Option<String>) {
        if !self.acl_allows(uri, Op::Exec) {
            self.push_status(cmd_id, status_code::FORBIDDEN);
            return;
        }
        match self.tree.exec(uri, &cmd_data, correlator.as_deref()) {
            Ok(()) => self.push_status(cmd_id, status_code::OK),
            Err(e) => {
                let code = Self::status_for_error(&e);
                self.push_status(cmd_id, code);
            },
        }
    }

    fn dispatch_alert(&mut self, cmd_id: u32, code: &str, items: Vec<String>) {
        match code {
            alert_code::MORE_DATA => self.state = SessionState::MoreMsg,
            alert_code::SESSION_ABORT => self.state = SessionState::Abort,
            alert_code::CLIENT_INITIATED | alert_code::SERVER_INITIATED => {},
            _ => {
                if let Some(cb) = &mut self.ui_callback {
                    cb(code);
                }
                debug!(code, ?items, "forwarded alert to UI callback");
            },
        }
        self.push_status(cmd_id, status_code::OK);
    }

    fn dispatch_status(&mut self, cmd_ref: u32, code: u16) {
        if cmd_ref == 0 {
            self.client_auth = match code {
                status_code::OK | status_code::AUTHENTICATION_ACCEPTED => AuthStatus::Accepted,
                status_code::INVALID_CREDENTIALS => AuthStatus::Rejected,
                _ => self.client_auth,
            };
            return;
        }
        if !self.resolve_cmd_ref(cmd_ref) {
            warn!(cmd_ref, "status references an unknown command id");
            self.push_status(cmd_ref, status_code::COMMAND_NOT_ALLOWED);
        }
    }

    fn dispatch_challenge(&mut self, nonce_b64: &str) {
        use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
        let Ok(nonce) = BASE64.decode(nonce_b64) else {
            warn!("received malformed NextNonce, ignoring");
            return;
        };
        if let Some(cred_uri) = self.credential_uri_for(true)
            && let Err(e) = persist_nonce(&self.tree, &cred_uri, &nonce)
        {
            warn!(error = %e, "failed to persist rotated nonce");
        }
    }
}

fn auth_status_for(cred: &Option<crate::account::CredentialDescriptor>) -> AuthStatus {
    match cred {
        None => AuthStatus::NotRequired,
        Some(_) => AuthStatus::Pending,
    }
}
