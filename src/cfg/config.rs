// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Server/transport-facing parameters.
    pub server: ServerConfig,
    /// Session-level parameters negotiated at connect time.
    pub session: SessionConfig,
    /// Implementation/runtime parameters that live outside the wire protocol.
    pub runtime: RuntimeConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(rename = "Address")]
    /// `host:port` of the ensemble member to connect to.
    pub address: String,

    #[serde(rename = "ConnectTimeout", with = "serde_secs")]
    /// Timeout for establishing the TCP connection.
    pub connect_timeout: Duration,

    #[serde(rename = "IoTimeout", with = "serde_secs")]
    /// Timeout applied to each individual socket read/write.
    pub io_timeout: Duration,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SessionConfig {
    #[serde(rename = "SessionTimeoutMillis")]
    /// Requested session timeout, sent verbatim in the connect request.
    pub timeout_millis: i32,

    #[serde(default, rename = "ReadOnly")]
    /// Whether this client may attach to a read-only server.
    pub read_only: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RuntimeConfig {
    #[serde(rename = "PendingQueueWarnThreshold")]
    /// Number of outstanding requests above which the dispatcher logs a
    /// warning (the queue itself is unbounded; this is an observability
    /// knob, not a backpressure limit).
    pub pending_queue_warn_threshold: usize,

    #[serde(rename = "PingInterval", with = "serde_secs")]
    /// Interval between heartbeat pings sent while the connection is idle.
    pub ping_interval: Duration,
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
        ensure!(!self.server.address.is_empty(), "server.Address must not be empty");
        ensure!(
            self.session.timeout_millis > 0,
            "session.SessionTimeoutMillis must be > 0"
        );
        ensure!(
            self.runtime.pending_queue_warn_threshold >= 1,
            "runtime.PendingQueueWarnThreshold must be >= 1"
        );
        if self.runtime.ping_interval.as_millis() as i64
            >= self.session.timeout_millis as i64
        {
            // A ping interval at or above the session timeout defeats the
            // point of the heartbeat; clamp to a third of the timeout.
            self.runtime.ping_interval =
                Duration::from_millis((self.session.timeout_millis as u64) / 3);
        }
        Ok(())
    }
}

/// Serde helpers for representing `Duration` as a number of seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
