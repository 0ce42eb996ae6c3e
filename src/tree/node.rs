// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use serde::{Deserialize, Serialize};

/// Wire/storage format tag for a leaf node, mirroring the SyncML `Format`
/// meta values (`node`, `chr`, `int`, `bool`, `bin`, `null`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    Node,
    Chr,
    Int,
    Bool,
    Bin,
    Null,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Node => "node",
            Format::Chr => "chr",
            Format::Int => "int",
            Format::Bool => "bool",
            Format::Bin => "bin",
            Format::Null => "null",
        }
    }
}

/// The materialized contents of a DM tree node: a leaf's bytes, or the
/// child-name listing for an interior node.
#[derive(Debug, Clone)]
pub struct NodeValue {
    pub format: Format,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl NodeValue {
    pub fn leaf_string(s: impl Into<String>) -> Self {
        NodeValue {
            format: Format::Chr,
            mime_type: "text/plain".to_string(),
            data: s.into().into_bytes(),
        }
    }

    pub fn interior(children: &[String]) -> Self {
        NodeValue {
            format: Format::Node,
            mime_type: String::new(),
            data: children.join("/").into_bytes(),
        }
    }

    pub fn as_str(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}
