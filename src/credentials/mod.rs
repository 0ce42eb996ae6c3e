// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod engine;
pub mod nonce;

pub use engine::{build_credential, generate_challenge, meta_for, persist_nonce, verify_credential};
