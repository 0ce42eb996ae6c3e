use oma_dm_client_rs::{
    account::{get_server_account, luhn_check_digit},
    tree::{
        DMTree,
        builtin::{AccountSeed, CredentialSeed, device_info_mo, dm_acc_mo},
    },
};

#[test]
fn luhn_check_digit_matches_known_imei_vectors() {
    // 3GPP TS 23.003 Annex B worked example.
    assert_eq!(luhn_check_digit("49015420323751").unwrap(), 8);
    assert_eq!(luhn_check_digit("01234567890123").unwrap(), 7);
}

#[test]
fn luhn_rejects_wrong_length() {
    assert!(luhn_check_digit("123").is_err());
    assert!(luhn_check_digit("").is_err());
}

#[test]
fn luhn_rejects_non_digits() {
    assert!(luhn_check_digit("4901542032375x").is_err());
}

fn build_tree(dev_id: &str, name: &str, secret: &str) -> DMTree {
    let tree = DMTree::new();
    tree.add_plugin(Box::new(device_info_mo(dev_id))).unwrap();
    tree.add_plugin(Box::new(dm_acc_mo(&AccountSeed {
        base_uri: "./DMAcc/1",
        server_id: "srv1",
        server_addr: "https://dm.example.com",
        to_server: Some(CredentialSeed {
            auth_level: "CLCRED",
            auth_type: "BASIC",
            name,
            secret,
        }),
        to_client: None,
    })))
    .unwrap();
    tree
}

#[test]
fn resolves_account_with_explicit_secret() {
    let tree = build_tree("IMEI:490154203237518", "device01", "s3cr3t");
    let account = get_server_account(&tree, "srv1").expect("account should resolve");
    assert_eq!(account.server_uri, "https://dm.example.com");
    let cred = account.to_server_cred.expect("credential should be present");
    assert_eq!(cred.secret, "s3cr3t");
}

#[test]
fn fourteen_digit_name_falls_back_to_imei_derived_secret() {
    let tree = build_tree("dev", "49015420323751", "");
    let account = get_server_account(&tree, "srv1").unwrap();
    let cred = account.to_server_cred.unwrap();
    assert!(!cred.secret.is_empty());
    assert_eq!(cred.secret.len(), 32, "MD5 hex digest is 32 chars");
}

#[test]
fn fifteen_digit_name_hashes_directly() {
    let tree = build_tree("dev", "490154203237518", "");
    let account = get_server_account(&tree, "srv1").unwrap();
    let cred = account.to_server_cred.unwrap();
    assert!(!cred.secret.is_empty());
}

#[test]
fn invalid_length_name_with_no_secret_is_an_error() {
    let tree = build_tree("dev", "12345", "");
    assert!(get_server_account(&tree, "srv1").is_err());
}

#[test]
fn unknown_server_id_is_an_error() {
    let tree = build_tree("dev", "device01", "s3cr3t");
    assert!(get_server_account(&tree, "no-such-server").is_err());
}
