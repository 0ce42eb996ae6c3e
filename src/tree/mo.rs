// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    error::{DmError, DmResult},
    tree::{acl::Acl, node::NodeValue},
};

/// A Management Object plugin owning every URI under [`ManagedObject::base_uri`].
///
/// This replaces the dynamically-loaded PAL-function-pointer table of a
/// dlopen-based reference implementation with an ordinary trait object:
/// whether the concrete implementation is statically linked or loaded at
/// startup is the caller's business, not the tree's.
pub trait ManagedObject: Send + Sync {
    /// The URI this MO owns, and everything beneath it.
    fn base_uri(&self) -> &str;

    /// The URN this MO identifies as, for `list_uri`/`find_subtree` lookups.
    fn urn(&self) -> &str;

    fn is_node(&self, uri: &str) -> DmResult<bool>;

    fn get(&self, uri: &str) -> DmResult<NodeValue>;

    fn set(&self, uri: &str, value: NodeValue) -> DmResult<()>;

    fn get_acl(&self, uri: &str) -> DmResult<Acl>;

    fn exec(&self, uri: &str, cmd_data: &[u8], correlator: Option<&str>) -> DmResult<()> {
        let _ = (uri, cmd_data, correlator);
        Err(DmError::CommandNotImplemented(format!(
            "{} does not implement Exec",
            self.urn()
        )))
    }

    /// Direct children of `uri` (basenames only).
    fn children(&self, uri: &str) -> DmResult<Vec<String>>;
}
