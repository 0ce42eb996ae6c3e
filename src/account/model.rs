// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use serde::{Deserialize, Serialize};

/// Authentication type as carried by `AAuthType`. Only `Basic` and `Digest`
/// are computed by the credential engine; the rest are passthrough metadata
/// for transports that authenticate at a lower layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthType {
    Basic,
    Digest,
    Hmac,
    X509,
    SecurId,
    SafeWord,
    DigiPass,
    HttpBasic,
    HttpDigest,
    Transport,
    Unknown,
}

impl AuthType {
    /// Decodes the `AAuthType` value string (length-then-content match, same
    /// table used to resolve the credential).
    pub fn from_value_str(s: &str) -> AuthType {
        match s {
            "BASIC" => AuthType::Basic,
            "DIGEST" => AuthType::Digest,
            "HMAC" => AuthType::Hmac,
            "X509" => AuthType::X509,
            "SECURID" => AuthType::SecurId,
            "SAFEWORD" => AuthType::SafeWord,
            "DIGIPASS" => AuthType::DigiPass,
            _ => AuthType::Unknown,
        }
    }

    /// Encodes the type as the `<Meta><Type>` string used on the wire.
    pub fn as_meta_str(self) -> &'static str {
        match self {
            AuthType::Basic => "syncml:auth-basic",
            AuthType::Digest => "syncml:auth-md5",
            AuthType::Hmac => "syncml:auth-MAC",
            AuthType::X509 => "syncml:auth-X509",
            AuthType::SecurId => "syncml:auth-securid",
            AuthType::SafeWord => "syncml:auth-safeword",
            AuthType::DigiPass => "syncml:auth-digipass",
            AuthType::HttpBasic
            | AuthType::HttpDigest
            | AuthType::Transport
            | AuthType::Unknown => "",
        }
    }
}

/// A resolved credential: what to authenticate with, in which direction.
#[derive(Debug, Clone, Default)]
pub struct CredentialDescriptor {
    pub auth_type: Option<AuthType>,
    pub name: String,
    pub secret: String,
    /// DIGEST nonce, persisted back to `AAuthData` after rotation.
    pub data: Option<Vec<u8>>,
    /// The `AppAuth/<n>` subtree this credential was read from, e.g.
    /// `./DMAcc/1/AppAuth/0`. A rotated nonce is persisted back to
    /// `{uri}/AAuthData`.
    pub uri: String,
}

impl CredentialDescriptor {
    pub fn is_present(&self) -> bool {
        self.auth_type.is_some()
    }
}

/// A resolved server account: identity plus the two credential directions.
#[derive(Debug, Clone)]
pub struct Account {
    pub dev_id: String,
    pub server_uri: String,
    pub dmtree_uri: String,
    pub to_server_cred: Option<CredentialDescriptor>,
    pub to_client_cred: Option<CredentialDescriptor>,
}
