// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Server account resolution: locating a `DMAcc` subtree by `ServerID` and
//! filling in its credential descriptors, including the IMEI-derived secret
//! fallback (3GPP TS 23.003 Luhn check digit).

use md5::{Digest, Md5};

use crate::{
    account::model::{Account, AuthType, CredentialDescriptor},
    error::{DmError, DmResult},
    tree::{DMTree, URN_DMACC},
};

const AUTH_LEVEL_CLIENT: &str = "CLCRED";
const AUTH_LEVEL_SERVER: &str = "SRVCRED";

pub fn get_server_account(tree: &DMTree, server_id: &str) -> DmResult<Account> {
    let account_uri = tree
        .find_subtree_by_urn(URN_DMACC, "ServerID", server_id)
        .map_err(|_| DmError::CommandFailed(format!("no account for ServerID {server_id}")))?;

    let dev_id = tree.get("./DevInfo/DevId")?.as_str();
    let server_uri = tree.get(&format!("{account_uri}/AppAddr/Addr"))?.as_str();

    let app_auth = format!("{account_uri}/AppAuth");
    let to_server_cred = resolve_direction(tree, &app_auth, AUTH_LEVEL_CLIENT)?;
    let to_client_cred = resolve_direction(tree, &app_auth, AUTH_LEVEL_SERVER)?;

    Ok(Account {
        dev_id,
        server_uri,
        dmtree_uri: account_uri,
        to_server_cred,
        to_client_cred,
    })
}

fn resolve_direction(
    tree: &DMTree,
    app_auth_uri: &str,
    level: &str,
) -> DmResult<Option<CredentialDescriptor>> {
    let cred_uri = match tree.find_subtree(app_auth_uri, "AAuthLevel", level) {
        Ok(uri) => uri,
        Err(DmError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e),
    };
    let mut desc = fill_credentials(tree, &cred_uri)?;
    if level == AUTH_LEVEL_CLIENT {
        apply_imei_fallback(&mut desc)?;
    }
    Ok(Some(desc))
}

/// Reads `AAuthType`/`AAuthName`/`AAuthSecret`/`AAuthData` under `cred_uri`.
/// Each child is individually optional (NOT_FOUND is non-fatal); any other
/// read error aborts resolution.
pub fn fill_credentials(tree: &DMTree, cred_uri: &str) -> DmResult<CredentialDescriptor> {
    let auth_type = match tree.get(&format!("{cred_uri}/AAuthType")) {
        Ok(v) => Some(AuthType::from_value_str(&v.as_str())),
        Err(DmError::NotFound(_)) => None,
        Err(e) => return Err(e),
    };
    let name = match tree.get(&format!("{cred_uri}/AAuthName")) {
        Ok(v) => v.as_str(),
        Err(DmError::NotFound(_)) => String::new(),
        Err(e) => return Err(e),
    };
    let secret = match tree.get(&format!("{cred_uri}/AAuthSecret")) {
        Ok(v) => v.as_str(),
        Err(DmError::NotFound(_)) => String::new(),
        Err(e) => return Err(e),
    };
    let data = match tree.get(&format!("{cred_uri}/AAuthData")) {
        Ok(v) => Some(v.data),
        Err(DmError::NotFound(_)) => None,
        Err(e) => return Err(e),
    };

    Ok(CredentialDescriptor {
        auth_type,
        name,
        secret,
        data,
        uri: cred_uri.to_string(),
    })
}

/// If the client-to-server secret is empty and a name is present, treat the
/// name as an IMEI (14 or 15 digits) and derive the secret as
/// `MD5_hex(imei15)`, computing the Luhn check digit for a 14-digit name.
fn apply_imei_fallback(desc: &mut CredentialDescriptor) -> DmResult<()> {
    if !desc.secret.is_empty() || desc.name.is_empty() {
        return Ok(());
    }
    let imei15 = match desc.name.len() {
        14 => {
            let check = luhn_check_digit(&desc.name)?;
            format!("{}{check}", desc.name)
        },
        15 => desc.name.clone(),
        _ => return Err(DmError::CommandFailed("invalid IMEI".to_string())),
    };
    desc.secret = md5_hex(imei15.as_bytes());
    Ok(())
}

/// Luhn check digit over a 14-digit IMEI, per 3GPP TS 23.003: iterating from
/// the rightmost digit (index 0), double every digit at an even index and
/// subtract 9 if the doubled value exceeds 9, then sum all digits; the check
/// digit is `(10 - sum mod 10) mod 10`.
pub fn luhn_check_digit(digits14: &str) -> DmResult<u8> {
    if digits14.len() != 14 || !digits14.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DmError::CommandFailed(
            "IMEI must be 14 decimal digits".to_string(),
        ));
    }
    let sum: u32 = digits14
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    Ok(((10 - sum % 10) % 10) as u8)
}

pub fn md5_hex(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
