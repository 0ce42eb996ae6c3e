// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Credential build/verify for BASIC and MD5-DIGEST, the two schemes this
//! core actually computes; everything else is passthrough metadata handled
//! by a lower transport layer.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use md5::{Digest as Md5Digest, Md5};

use crate::{
    account::{AuthType, CredentialDescriptor},
    credentials::nonce::{MIN_NONCE_LEN, fresh_nonce},
    error::{AuthOutcome, DmError, DmResult},
    tree::{
        DMTree,
        node::{Format, NodeValue},
    },
};

/// Persists a rotated DIGEST nonce back to `cred_uri/AAuthData` so the next
/// challenge/response round uses the value the server just issued.
pub fn persist_nonce(tree: &DMTree, cred_uri: &str, nonce: &[u8]) -> DmResult<()> {
    tree.set(
        &format!("{cred_uri}/AAuthData"),
        NodeValue {
            format: Format::Bin,
            mime_type: String::new(),
            data: nonce.to_vec(),
        },
    )
}

/// The `(format, type)` pair carried in the wire `<Meta>` next to a `<Cred>`.
pub fn meta_for(auth_type: AuthType) -> (&'static str, &'static str) {
    ("b64", auth_type.as_meta_str())
}

/// Builds the outbound `<Cred>` payload, base64-encoded.
pub fn build_credential(desc: &CredentialDescriptor) -> DmResult<String> {
    let auth_type = desc
        .auth_type
        .ok_or_else(|| DmError::Internal("no auth type on credential descriptor".to_string()))?;
    match auth_type {
        AuthType::Basic => Ok(BASE64.encode(basic_a(&desc.name, &desc.secret))),
        AuthType::Digest => {
            let nonce = desc
                .data
                .as_deref()
                .ok_or_else(|| DmError::Internal("DIGEST credential has no nonce".to_string()))?;
            Ok(BASE64.encode(digest_payload(&desc.name, &desc.secret, nonce)))
        },
        other => Err(DmError::CommandNotImplemented(format!(
            "core does not compute {other:?} credentials"
        ))),
    }
}

/// Verifies a received credential payload against the locally-known secret.
pub fn verify_credential(
    expected_auth_type: AuthType,
    name: &str,
    secret: &str,
    nonce: Option<&[u8]>,
    received_b64: &str,
) -> DmResult<AuthOutcome> {
    let expected = match expected_auth_type {
        AuthType::Basic => BASE64.encode(basic_a(name, secret)),
        AuthType::Digest => {
            let nonce = nonce
                .ok_or_else(|| DmError::Internal("DIGEST verify requires a nonce".to_string()))?;
            BASE64.encode(digest_payload(name, secret, nonce))
        },
        other => {
            return Err(DmError::CommandNotImplemented(format!(
                "core does not verify {other:?} credentials"
            )));
        },
    };
    Ok(if constant_time_eq(expected.as_bytes(), received_b64.as_bytes()) {
        AuthOutcome::Accepted
    } else {
        AuthOutcome::Rejected
    })
}

/// Generates a fresh challenge for `auth_type`: BASIC needs no nonce, DIGEST
/// draws one from the CSPRNG and returns it so the caller can both send it
/// (`<NextNonce>`) and persist it via [`fill_credentials`](crate::account::fill_credentials)'s
/// `AAuthData` counterpart.
pub fn generate_challenge(auth_type: AuthType) -> DmResult<Option<Vec<u8>>> {
    match auth_type {
        AuthType::Basic => Ok(None),
        AuthType::Digest => Ok(Some(fresh_nonce(MIN_NONCE_LEN))),
        other => Err(DmError::CommandNotImplemented(format!(
            "core does not challenge for {other:?}"
        ))),
    }
}

fn basic_a(name: &str, secret: &str) -> Vec<u8> {
    format!("{name}:{secret}").into_bytes()
}

/// `MD5(MD5(name:secret in b64) : nonce)`, matching the reference digest
/// scheme: `AD = b64(MD5(name:secret))`, payload = `MD5(AD:nonce)`.
fn digest_payload(name: &str, secret: &str, nonce: &[u8]) -> Vec<u8> {
    let ad = BASE64.encode(md5_bytes(&basic_a(name, secret)));
    let mut b = ad.into_bytes();
    b.push(b':');
    b.extend_from_slice(nonce);
    md5_bytes(&b).to_vec()
}

fn md5_bytes(data: &[u8]) -> [u8; 16] {
    let mut hasher = Md5::new();
    hasher.update(data);
    hasher.finalize().into()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
