// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The codec boundary: SyncML XML/WBXML encode/decode is an external
//! collaborator (defining the wire grammar is explicitly out of scope), but
//! the trait it must implement to drive Session Core is part of this crate.

use crate::{error::DmResult, session::element::QueuedElement, tree::node::NodeValue};

pub struct CredMeta {
    pub payload_b64: String,
    pub format: &'static str,
    pub type_: &'static str,
}

pub struct MessageHeader<'a> {
    pub version: &'static str,
    pub proto: &'static str,
    pub session_id: &'a str,
    pub message_id: u32,
    pub target: &'a str,
    pub source: &'a str,
    pub cred: Option<CredMeta>,
    pub max_msg_size: u32,
}

/// The server-initiated trigger payload (SyncML "Package 0").
pub struct Pkg0 {
    pub server_id: String,
    pub session_id: String,
    /// `(base64 payload, meta type string)`, if the trigger carried a
    /// credential to validate against `toClientCred`.
    pub cred: Option<(String, String)>,
}

/// Implemented by Session Core; the codec calls back into this for every
/// command it decodes out of a reply.
pub trait CommandDispatcher {
    fn dispatch_get(&mut self, cmd_id: u32, uri: &str);
    fn dispatch_replace(&mut self, cmd_id: u32, uri: &str, value: NodeValue);
    fn dispatch_exec(&mut self, cmd_id: u32, uri: &str, cmd_data: Vec<u8>, correlator: Option<String>);
    fn dispatch_alert(&mut self, cmd_id: u32, code: &str, items: Vec<String>);
    /// A Status element from the server referencing one of our prior
    /// outbound commands (most importantly: auth status on our `<Cred>`).
    fn dispatch_status(&mut self, cmd_ref: u32, code: u16);
    /// A fresh `<NextNonce>` the server issued for the next DIGEST round.
    fn dispatch_challenge(&mut self, _nonce_b64: &str) {}
}

pub trait Codec: Send {
    fn start_message(&mut self, header: &MessageHeader<'_>) -> DmResult<()>;
    fn write_element(&mut self, el: &QueuedElement) -> DmResult<()>;
    fn end_message(&mut self, final_msg: bool) -> DmResult<()>;
    /// Drains and returns everything composed since the last call.
    fn take_output(&mut self) -> Vec<u8>;
    /// Parses a server reply, invoking `dispatcher` for each command found.
    fn process(&mut self, bytes: &[u8], dispatcher: &mut dyn CommandDispatcher) -> DmResult<()>;
    fn decode_pkg0(&self, bytes: &[u8]) -> DmResult<Pkg0>;
}

pub mod reference {
    //! A fixed-format, line-oriented reference codec. This is not a SyncML
    //! implementation; it exists purely so Session Core's state machine can
    //! be exercised without a real XML/WBXML parser.

    use super::{Codec, CommandDispatcher, MessageHeader, Pkg0};
    use crate::{
        error::{DmError, DmResult},
        session::element::QueuedElement,
        tree::node::{Format, NodeValue},
    };

    #[derive(Default)]
    pub struct ReferenceCodec {
        out: Vec<u8>,
    }

    impl ReferenceCodec {
        pub fn new() -> Self {
            ReferenceCodec::default()
        }

        fn line(&mut self, s: &str) {
            self.out.extend_from_slice(s.as_bytes());
            self.out.push(b'\n');
        }
    }

    impl Codec for ReferenceCodec {
        fn start_message(&mut self, header: &MessageHeader<'_>) -> DmResult<()> {
            self.line(&format!(
                "HDR\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                header.version,
                header.proto,
                header.session_id,
                header.message_id,
                header.target,
                header.source,
                header.max_msg_size,
            ));
            if let Some(cred) = &header.cred {
                self.line(&format!("CRED\t{}\t{}\t{}", cred.format, cred.type_, cred.payload_b64));
            }
            Ok(())
        }

        fn write_element(&mut self, el: &QueuedElement) -> DmResult<()> {
            match &el.element {
                crate::session::element::OutboundElement::Alert { code, items } => {
                    self.line(&format!("ALERT\t{}\t{}\t{}", el.cmd_id, code, items.join(",")));
                },
                crate::session::element::OutboundElement::Replace { uri, value } => {
                    self.line(&format!(
                        "REPLACE\t{}\t{}\t{}\t{}",
                        el.cmd_id,
                        uri,
                        value.format.as_str(),
                        value.as_str()
                    ));
                },
                crate::session::element::OutboundElement::Results { cmd_ref, uri, value } => {
                    self.line(&format!(
                        "RESULTS\t{}\t{}\t{}\t{}\t{}",
                        el.cmd_id,
                        cmd_ref,
                        uri,
                        value.format.as_str(),
                        value.as_str()
                    ));
                },
                crate::session::element::OutboundElement::Status { cmd_ref, code } => {
                    self.line(&format!("STATUS\t{}\t{}\t{}", el.cmd_id, cmd_ref, code));
                },
            }
            Ok(())
        }

        fn end_message(&mut self, final_msg: bool) -> DmResult<()> {
            self.line(&format!("END\t{}", final_msg as u8));
            Ok(())
        }

        fn take_output(&mut self) -> Vec<u8> {
            std::mem::take(&mut self.out)
        }

        fn process(&mut self, bytes: &[u8], dispatcher: &mut dyn CommandDispatcher) -> DmResult<()> {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| DmError::Internal(format!("reply is not utf8: {e}")))?;
            for line in text.lines() {
                let fields: Vec<&str> = line.split('\t').collect();
                match fields.as_slice() {
                    ["GET", cmd_id, uri] => {
                        dispatcher.dispatch_get(parse_u32(cmd_id)?, uri);
                    },
                    ["REPLACE", cmd_id, uri, fmt, data] => {
                        dispatcher.dispatch_replace(
                            parse_u32(cmd_id)?,
                            uri,
                            NodeValue {
                                format: parse_format(fmt),
                                mime_type: String::new(),
                                data: data.as_bytes().to_vec(),
                            },
                        );
                    },
                    ["EXEC", cmd_id, uri, correlator, data] => {
                        let correlator =
                            (!correlator.is_empty()).then(|| correlator.to_string());
                        dispatcher.dispatch_exec(
                            parse_u32(cmd_id)?,
                            uri,
                            data.as_bytes().to_vec(),
                            correlator,
                        );
                    },
                    ["ALERT", cmd_id, code, items] => {
                        let items = if items.is_empty() {
                            Vec::new()
                        } else {
                            items.split(',').map(str::to_string).collect()
                        };
                        dispatcher.dispatch_alert(parse_u32(cmd_id)?, code, items);
                    },
                    ["STATUS", cmd_ref, code] => {
                        dispatcher.dispatch_status(parse_u32(cmd_ref)?, parse_u16(code)?);
                    },
                    ["CHAL", nonce_b64] => {
                        dispatcher.dispatch_challenge(nonce_b64);
                    },
                    ["HDR", ..] | ["END", ..] | [""] => {},
                    _ => {
                        return Err(DmError::Internal(format!("unrecognized reply line: {line}")));
                    },
                }
            }
            Ok(())
        }

        fn decode_pkg0(&self, bytes: &[u8]) -> DmResult<Pkg0> {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| DmError::Internal(format!("pkg0 is not utf8: {e}")))?;
            let fields: Vec<&str> = text.trim().split('\t').collect();
            match fields.as_slice() {
                [server_id, session_id] => Ok(Pkg0 {
                    server_id: server_id.to_string(),
                    session_id: session_id.to_string(),
                    cred: None,
                }),
                [server_id, session_id, cred_type, cred_b64] => Ok(Pkg0 {
                    server_id: server_id.to_string(),
                    session_id: session_id.to_string(),
                    cred: Some((cred_b64.to_string(), cred_type.to_string())),
                }),
                _ => Err(DmError::Internal("malformed pkg0".to_string())),
            }
        }
    }

    fn parse_u32(s: &str) -> DmResult<u32> {
        s.parse()
            .map_err(|_| DmError::Internal(format!("expected u32, got {s}")))
    }

    fn parse_u16(s: &str) -> DmResult<u16> {
        s.parse()
            .map_err(|_| DmError::Internal(format!("expected u16, got {s}")))
    }

    fn parse_format(s: &str) -> Format {
        match s {
            "node" => Format::Node,
            "int" => Format::Int,
            "bool" => Format::Bool,
            "bin" => Format::Bin,
            "null" => Format::Null,
            _ => Format::Chr,
        }
    }
}
