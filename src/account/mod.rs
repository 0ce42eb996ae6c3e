// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod model;
pub mod resolver;

pub use model::{Account, AuthType, CredentialDescriptor};
pub use resolver::{fill_credentials, get_server_account, luhn_check_digit};
