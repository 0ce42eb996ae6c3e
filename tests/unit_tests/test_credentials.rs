use oma_dm_client_rs::{
    account::{AuthType, CredentialDescriptor},
    credentials::{build_credential, generate_challenge, verify_credential},
    error::AuthOutcome,
};

fn basic_desc() -> CredentialDescriptor {
    CredentialDescriptor {
        auth_type: Some(AuthType::Basic),
        name: "device01".to_string(),
        secret: "s3cr3t".to_string(),
        data: None,
        uri: "./DMAcc/1/AppAuth/0".to_string(),
    }
}

fn digest_desc(nonce: Vec<u8>) -> CredentialDescriptor {
    CredentialDescriptor {
        auth_type: Some(AuthType::Digest),
        name: "device01".to_string(),
        secret: "s3cr3t".to_string(),
        data: Some(nonce),
        uri: "./DMAcc/1/AppAuth/0".to_string(),
    }
}

#[test]
fn basic_round_trips_through_verify() {
    let desc = basic_desc();
    let payload = build_credential(&desc).expect("BASIC should build");
    let outcome =
        verify_credential(AuthType::Basic, &desc.name, &desc.secret, None, &payload).unwrap();
    assert_eq!(outcome, AuthOutcome::Accepted);
}

#[test]
fn basic_rejects_wrong_secret() {
    let desc = basic_desc();
    let payload = build_credential(&desc).expect("BASIC should build");
    let outcome =
        verify_credential(AuthType::Basic, &desc.name, "wrong", None, &payload).unwrap();
    assert_eq!(outcome, AuthOutcome::Rejected);
}

#[test]
fn digest_round_trips_through_verify() {
    let nonce = generate_challenge(AuthType::Digest)
        .unwrap()
        .expect("DIGEST draws a nonce");
    let desc = digest_desc(nonce.clone());
    let payload = build_credential(&desc).expect("DIGEST should build");
    let outcome = verify_credential(
        AuthType::Digest,
        &desc.name,
        &desc.secret,
        Some(&nonce),
        &payload,
    )
    .unwrap();
    assert_eq!(outcome, AuthOutcome::Accepted);
}

#[test]
fn digest_rejects_stale_nonce() {
    let nonce_a = generate_challenge(AuthType::Digest).unwrap().unwrap();
    let nonce_b = generate_challenge(AuthType::Digest).unwrap().unwrap();
    assert_ne!(nonce_a, nonce_b, "two draws should not collide");

    let desc = digest_desc(nonce_a);
    let payload = build_credential(&desc).expect("DIGEST should build");

    let outcome = verify_credential(
        AuthType::Digest,
        &desc.name,
        &desc.secret,
        Some(&nonce_b),
        &payload,
    )
    .unwrap();
    assert_eq!(outcome, AuthOutcome::Rejected);
}

#[test]
fn digest_build_requires_a_nonce() {
    let desc = CredentialDescriptor {
        auth_type: Some(AuthType::Digest),
        name: "device01".to_string(),
        secret: "s3cr3t".to_string(),
        data: None,
        uri: "./DMAcc/1/AppAuth/0".to_string(),
    };
    assert!(build_credential(&desc).is_err());
}

#[test]
fn basic_generates_no_challenge() {
    assert_eq!(generate_challenge(AuthType::Basic).unwrap(), None);
}

#[test]
fn x509_is_not_computed_by_the_engine() {
    let desc = CredentialDescriptor {
        auth_type: Some(AuthType::X509),
        name: String::new(),
        secret: String::new(),
        data: None,
        uri: String::new(),
    };
    assert!(build_credential(&desc).is_err());
    assert!(generate_challenge(AuthType::X509).is_err());
}
