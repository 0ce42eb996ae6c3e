// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Parameters that shape how a session is run.
    pub session: SessionConfig,
    /// Bootstrap parameters consumed only by the demo binary; never read by
    /// the library itself.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Runtime knobs that live outside the SyncML wire grammar itself.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SessionConfig {
    #[serde(rename = "UseWbxml", default)]
    /// Whether to request WBXML framing from the codec instead of XML.
    pub use_wbxml: bool,

    #[serde(rename = "MaxMsgSize", default = "default_max_msg_size")]
    /// Advertised `MaxMsgSize` in the outbound header meta.
    pub max_msg_size: u32,
}

fn default_max_msg_size() -> u32 {
    16384
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            use_wbxml: false,
            max_msg_size: default_max_msg_size(),
        }
    }
}

/// Bootstrap parameters for the demo binary only.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct DemoConfig {
    #[serde(rename = "ServerId", default)]
    pub server_id: String,
    #[serde(rename = "SessionId", default)]
    pub session_id: String,
    #[serde(rename = "DevId", default)]
    pub dev_id: String,
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let mut cfg: Config =
            serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants and normalizes derived fields.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(self.session.max_msg_size > 0, "MaxMsgSize must be > 0");
        Ok(())
    }
}
