// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::tree::node::NodeValue;

/// Outbound SyncML element, tagged by kind. The session's emission loop
/// matches on this directly rather than routing through a dynamic dispatch
/// table — there are exactly four shapes the core ever sends.
#[derive(Debug, Clone)]
pub enum OutboundElement {
    Alert {
        code: String,
        items: Vec<String>,
    },
    Replace {
        uri: String,
        value: NodeValue,
    },
    Results {
        cmd_ref: u32,
        uri: String,
        value: NodeValue,
    },
    Status {
        cmd_ref: u32,
        code: u16,
    },
}

impl OutboundElement {
    /// Status elements only acknowledge prior work; they never count toward
    /// the "did this message produce anything new" counter in message
    /// composition.
    pub fn counts_as_new_work(&self) -> bool {
        !matches!(self, OutboundElement::Status { .. })
    }
}

/// An element stamped with the command/message IDs it was emitted under.
#[derive(Debug, Clone)]
pub struct QueuedElement {
    pub cmd_id: u32,
    pub msg_id: u32,
    pub element: OutboundElement,
}
