// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// The session's place in the OMA-DM exchange. `New` precedes either
/// `session_start` or `session_start_on_alert`; neither appears in the
/// wire protocol itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    New,
    ClientInit,
    ServerInit,
    InSession,
    MoreMsg,
    Abort,
    End,
}

/// Authentication status for one direction (client-to-server or
/// server-to-client).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// No credential is configured for this direction; treated as already
    /// satisfied (see DESIGN.md's note on the open question this resolves).
    NotRequired,
    Pending,
    Accepted,
    Rejected,
}

impl AuthStatus {
    pub fn is_satisfied(self) -> bool {
        matches!(self, AuthStatus::NotRequired | AuthStatus::Accepted)
    }
}

/// SyncML Alert codes the session itself interprets.
pub mod alert_code {
    pub const CLIENT_INITIATED: &str = "1201";
    pub const SERVER_INITIATED: &str = "1200";
    pub const MORE_DATA: &str = "1222";
    pub const SESSION_ABORT: &str = "1223";
    pub const GENERIC_ALERT: &str = "1226";
}

/// SyncML status codes the core produces or interprets.
pub mod status_code {
    pub const OK: u16 = 200;
    pub const AUTHENTICATION_ACCEPTED: u16 = 212;
    pub const INVALID_CREDENTIALS: u16 = 401;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
    pub const COMMAND_FAILED: u16 = 500;
    pub const COMMAND_NOT_ALLOWED: u16 = 405;
    pub const OPTIONAL_FEATURE_NOT_SUPPORTED: u16 = 406;
}
