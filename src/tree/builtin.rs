// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A plain in-memory [`ManagedObject`], the same shape as a static MO node
//! table in a PAL-backed implementation, but holding live values instead of
//! PAL function pointers. Used both as the backing store for the mandatory
//! `DevInfo`/`DMAcc` MOs and as a general-purpose MO for tests and the demo
//! binary.

use dashmap::DashMap;

use crate::{
    error::{DmError, DmResult},
    tree::{
        acl::Acl,
        mo::ManagedObject,
        node::{Format, NodeValue},
    },
};

struct StoredNode {
    value: NodeValue,
    acl: Acl,
    children: Vec<String>,
}

pub struct InMemoryMo {
    base_uri: String,
    urn: String,
    nodes: DashMap<String, StoredNode>,
}

impl InMemoryMo {
    pub fn new(base_uri: impl Into<String>, urn: impl Into<String>) -> Self {
        let base_uri = base_uri.into();
        let nodes = DashMap::new();
        nodes.insert(
            base_uri.clone(),
            StoredNode {
                value: NodeValue::interior(&[]),
                acl: Acl::open(),
                children: Vec::new(),
            },
        );
        InMemoryMo {
            base_uri,
            urn: urn.into(),
            nodes,
        }
    }

    /// Inserts a leaf at `uri` (which must live under `base_uri`), creating
    /// any missing interior ancestors and wiring up child-name lists.
    pub fn put_leaf(&mut self, uri: &str, value: NodeValue, acl: Acl) {
        self.ensure_ancestors(uri);
        self.nodes.insert(
            uri.to_string(),
            StoredNode {
                value,
                acl,
                children: Vec::new(),
            },
        );
    }

    fn ensure_ancestors(&mut self, uri: &str) {
        let leaf = uri.rsplit_once('/').map(|(_, l)| l.to_string());
        let mut path = self.base_uri.clone();
        for segment in uri
            .strip_prefix(&self.base_uri)
            .unwrap_or(uri)
            .trim_start_matches('/')
            .split('/')
        {
            if segment.is_empty() {
                continue;
            }
            let parent = path.clone();
            path = format!("{path}/{segment}");
            if path == uri {
                break;
            }
            self.nodes.entry(path.clone()).or_insert_with(|| StoredNode {
                value: NodeValue::interior(&[]),
                acl: Acl::open(),
                children: Vec::new(),
            });
            if let Some(mut parent_entry) = self.nodes.get_mut(&parent)
                && !parent_entry.children.iter().any(|c| c == segment)
            {
                parent_entry.children.push(segment.to_string());
            }
        }
        if let Some(leaf) = leaf {
            let parent = uri
                .rsplit_once('/')
                .map(|(p, _)| p.to_string())
                .unwrap_or_else(|| self.base_uri.clone());
            if let Some(mut parent_entry) = self.nodes.get_mut(&parent)
                && !parent_entry.children.iter().any(|c| c == leaf)
            {
                parent_entry.children.push(leaf.to_string());
            }
        }
    }
}

/// One credential direction to seed under an `AppAuth/<x>` subtree.
pub struct CredentialSeed<'a> {
    pub auth_level: &'a str,
    pub auth_type: &'a str,
    pub name: &'a str,
    pub secret: &'a str,
}

/// Parameters for [`dm_acc_mo`]: one `DMAcc` account subtree.
pub struct AccountSeed<'a> {
    pub base_uri: &'a str,
    pub server_id: &'a str,
    pub server_addr: &'a str,
    pub to_server: Option<CredentialSeed<'a>>,
    pub to_client: Option<CredentialSeed<'a>>,
}

/// Builds a `DevInfo` MO exposing just `DevId`, which is all Account
/// Resolver and Session Core's init elements read.
pub fn device_info_mo(dev_id: &str) -> InMemoryMo {
    let mut mo = InMemoryMo::new("./DevInfo", crate::tree::URN_DEVINFO);
    mo.put_leaf(
        "./DevInfo/DevId",
        NodeValue::leaf_string(dev_id),
        Acl::open(),
    );
    mo
}

/// Builds a `DMAcc` MO for one server account, wiring `ServerID`, `AppAddr`,
/// and up to two `AppAuth` credential subtrees.
pub fn dm_acc_mo(seed: &AccountSeed<'_>) -> InMemoryMo {
    let base = seed.base_uri;
    let mut mo = InMemoryMo::new(base, crate::tree::URN_DMACC);
    mo.put_leaf(
        &format!("{base}/ServerID"),
        NodeValue::leaf_string(seed.server_id),
        Acl::open(),
    );
    mo.put_leaf(
        &format!("{base}/AppAddr/Addr"),
        NodeValue::leaf_string(seed.server_addr),
        Acl::open(),
    );
    for (idx, cred) in [&seed.to_server, &seed.to_client].into_iter().enumerate() {
        let Some(cred) = cred else { continue };
        let cred_uri = format!("{base}/AppAuth/{idx}");
        mo.put_leaf(
            &format!("{cred_uri}/AAuthLevel"),
            NodeValue::leaf_string(cred.auth_level),
            Acl::open(),
        );
        mo.put_leaf(
            &format!("{cred_uri}/AAuthType"),
            NodeValue::leaf_string(cred.auth_type),
            Acl::open(),
        );
        mo.put_leaf(
            &format!("{cred_uri}/AAuthName"),
            NodeValue::leaf_string(cred.name),
            Acl::open(),
        );
        mo.put_leaf(
            &format!("{cred_uri}/AAuthSecret"),
            NodeValue::leaf_string(cred.secret),
            Acl::open(),
        );
        // Present but empty until a DIGEST challenge rotates it in; `set`
        // requires the node to already exist (see `InMemoryMo::set`).
        mo.put_leaf(
            &format!("{cred_uri}/AAuthData"),
            NodeValue {
                format: Format::Bin,
                mime_type: String::new(),
                data: Vec::new(),
            },
            Acl::open(),
        );
    }
    mo
}

impl ManagedObject for InMemoryMo {
    fn base_uri(&self) -> &str {
        &self.base_uri
    }

    fn urn(&self) -> &str {
        &self.urn
    }

    fn is_node(&self, uri: &str) -> DmResult<bool> {
        self.nodes
            .get(uri)
            .map(|n| n.value.format == Format::Node)
            .ok_or_else(|| DmError::NotFound(uri.to_string()))
    }

    fn get(&self, uri: &str) -> DmResult<NodeValue> {
        self.nodes
            .get(uri)
            .map(|n| n.value.clone())
            .ok_or_else(|| DmError::NotFound(uri.to_string()))
    }

    fn set(&self, uri: &str, value: NodeValue) -> DmResult<()> {
        match self.nodes.get_mut(uri) {
            Some(mut n) => {
                n.value = value;
                Ok(())
            },
            None => Err(DmError::NotFound(uri.to_string())),
        }
    }

    fn get_acl(&self, uri: &str) -> DmResult<Acl> {
        self.nodes
            .get(uri)
            .map(|n| n.acl.clone())
            .ok_or_else(|| DmError::NotFound(uri.to_string()))
    }

    fn children(&self, uri: &str) -> DmResult<Vec<String>> {
        self.nodes
            .get(uri)
            .map(|n| n.children.clone())
            .ok_or_else(|| DmError::NotFound(uri.to_string()))
    }
}
