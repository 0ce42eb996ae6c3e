// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

/// Error taxonomy for the DM client core. Each variant maps to an
/// operation-level failure class; SyncML status codes are derived from
/// these at the command-handler boundary, not the other way around.
#[derive(Debug, Error)]
pub enum DmError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("device storage exhausted: {0}")]
    DeviceFull(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not allowed: {0}")]
    NotAllowed(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("command not implemented: {0}")]
    CommandNotImplemented(String),

    #[error("optional feature not supported: {0}")]
    OptionalFeatureNotSupported(String),
}

pub type DmResult<T> = Result<T, DmError>;

/// Outcome of a credential verification. Kept distinct from [`DmError`]
/// because a rejected credential is an ordinary protocol outcome, not a
/// failure of the verifying call itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Accepted,
    Rejected,
}

/// Outcome of draining the session's outbound queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketOutcome {
    /// More packets are expected after the caller processes a reply.
    More,
    /// The session has nothing further to send; it is finished.
    End,
}
