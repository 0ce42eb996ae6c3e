// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Session Core: state machine, message composition, and command dispatch
//! for one OMA-DM management session.

pub mod codec;
pub mod core;
pub mod element;
pub mod state;

pub use codec::{Codec, CommandDispatcher, CredMeta, MessageHeader, Pkg0};
pub use core::{OutboundPacket, Session};
pub use element::{OutboundElement, QueuedElement};
pub use state::{AuthStatus, SessionState};
