use oma_dm_client_rs::tree::acl::{Acl, Op};

#[test]
fn open_acl_allows_everyone_every_op() {
    let acl = Acl::open();
    for op in [Op::Get, Op::Replace, Op::Exec, Op::Add, Op::Delete, Op::Copy] {
        assert!(acl.allows(op, "anyone"));
    }
}

#[test]
fn single_clause_restricts_to_named_principal() {
    let acl = Acl::parse("Replace=acme-dm-server");
    assert!(acl.allows(Op::Replace, "acme-dm-server"));
    assert!(!acl.allows(Op::Replace, "other-server"));
    assert!(!acl.allows(Op::Get, "acme-dm-server"));
}

#[test]
fn plus_separated_principals_are_all_checked() {
    let acl = Acl::parse("Get=alpha+beta&Exec=beta");
    assert!(acl.allows(Op::Get, "alpha"));
    assert!(acl.allows(Op::Get, "beta"));
    assert!(!acl.allows(Op::Get, "gamma"));
    assert!(acl.allows(Op::Exec, "beta"));
    assert!(!acl.allows(Op::Exec, "alpha"));
}

#[test]
fn wildcard_in_one_clause_does_not_leak_to_another() {
    let acl = Acl::parse("Get=*&Replace=acme-dm-server");
    assert!(acl.allows(Op::Get, "anyone"));
    assert!(!acl.allows(Op::Replace, "anyone"));
}

#[test]
fn empty_acl_denies_everything() {
    let acl = Acl::default();
    assert!(!acl.allows(Op::Get, "anyone"));
}
