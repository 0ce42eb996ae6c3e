// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The Device Management Tree: a URI-addressed store dispatching to
//! registered [`ManagedObject`] providers by longest base-URI match.

pub mod acl;
pub mod builtin;
pub mod mo;
pub mod node;

use dashmap::DashMap;

use crate::{
    error::{DmError, DmResult},
    tree::{acl::Acl, mo::ManagedObject, node::NodeValue},
};

pub const URN_DEVINFO: &str = "urn:oma:mo:oma-dm-devinfo:1.0";
pub const URN_DMACC: &str = "urn:oma:mo:oma-dm-dmacc:1.0";

pub struct DMTree {
    providers: DashMap<String, Box<dyn ManagedObject>>,
}

impl Default for DMTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DMTree {
    pub fn new() -> Self {
        DMTree {
            providers: DashMap::new(),
        }
    }

    /// Registers an MO under its own base URI. Fails INTERNAL if another MO
    /// already claims that exact base URI.
    pub fn add_plugin(&self, mo: Box<dyn ManagedObject>) -> DmResult<()> {
        let base = mo.base_uri().to_string();
        if self.providers.contains_key(&base) {
            return Err(DmError::Internal(format!(
                "an MO is already registered at {base}"
            )));
        }
        self.providers.insert(base, mo);
        Ok(())
    }

    /// Finds the provider whose base URI is the longest prefix of `uri`.
    fn resolve(&self, uri: &str) -> DmResult<dashmap::mapref::one::Ref<'_, String, Box<dyn ManagedObject>>> {
        self.providers
            .iter()
            .filter(|entry| {
                let base = entry.key().as_str();
                uri == base || uri.starts_with(&format!("{base}/"))
            })
            .max_by_key(|entry| entry.key().len())
            .map(|entry| entry.key().clone())
            .and_then(|base| self.providers.get(&base))
            .ok_or_else(|| DmError::NotFound(uri.to_string()))
    }

    pub fn get(&self, uri: &str) -> DmResult<NodeValue> {
        self.resolve(uri)?.get(uri)
    }

    pub fn set(&self, uri: &str, value: NodeValue) -> DmResult<()> {
        self.resolve(uri)?.set(uri, value)
    }

    pub fn exec(&self, uri: &str, cmd_data: &[u8], correlator: Option<&str>) -> DmResult<()> {
        self.resolve(uri)?.exec(uri, cmd_data, correlator)
    }

    /// Returns the nearest explicit ACL for `uri`, walking up the ancestor
    /// chain (within the resolved provider's own subtree) when `uri` itself
    /// carries none.
    pub fn get_acl(&self, uri: &str) -> DmResult<Acl> {
        let provider = self.resolve(uri)?;
        let base = provider.base_uri().to_string();
        let mut candidate = uri.to_string();
        loop {
            match provider.get_acl(&candidate) {
                Ok(acl) => return Ok(acl),
                Err(DmError::NotFound(_)) if candidate != base => {
                    candidate = candidate
                        .rsplit_once('/')
                        .map(|(parent, _)| parent.to_string())
                        .unwrap_or_else(|| base.clone());
                },
                Err(e) => return Err(e),
            }
        }
    }

    pub fn children(&self, uri: &str) -> DmResult<Vec<String>> {
        self.resolve(uri)?.children(uri)
    }

    /// Returns the base URI of every registered MO whose URN matches.
    pub fn list_uri(&self, urn: &str) -> Vec<String> {
        self.providers
            .iter()
            .filter(|entry| entry.value().urn() == urn)
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Finds the first child of `root` whose `root/child/child_name` value
    /// equals `child_value`.
    pub fn find_subtree(
        &self,
        root: &str,
        child_name: &str,
        child_value: &str,
    ) -> DmResult<String> {
        for child in self.children(root)? {
            let candidate = format!("{root}/{child}");
            let probe = format!("{candidate}/{child_name}");
            if let Ok(v) = self.get(&probe)
                && v.as_str() == child_value
            {
                return Ok(candidate);
            }
        }
        Err(DmError::NotFound(format!(
            "no child of {root} with {child_name}={child_value}"
        )))
    }

    /// Like [`find_subtree`](Self::find_subtree), but scans the base URIs of
    /// every MO advertising `urn` instead of the children of a fixed root.
    pub fn find_subtree_by_urn(
        &self,
        urn: &str,
        child_name: &str,
        child_value: &str,
    ) -> DmResult<String> {
        for base in self.list_uri(urn) {
            let probe = format!("{base}/{child_name}");
            if let Ok(v) = self.get(&probe)
                && v.as_str() == child_value
            {
                return Ok(base);
            }
        }
        Err(DmError::NotFound(format!(
            "no {urn} account with {child_name}={child_value}"
        )))
    }

    /// Verifies that MOs implementing the mandatory URNs are registered.
    pub fn check_mandatory_mo(&self) -> DmResult<()> {
        for urn in [URN_DEVINFO, URN_DMACC] {
            if self.list_uri(urn).is_empty() {
                return Err(DmError::Usage(format!(
                    "mandatory managed object {urn} is not registered"
                )));
            }
        }
        Ok(())
    }
}
