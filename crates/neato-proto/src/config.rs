use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::OutlierFilter;

/// Port used by both the control stream and the telemetry datagrams.
pub const DEFAULT_PORT: u16 = 7777;

/// How control-channel connection attempts are repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Pause between attempts, in milliseconds.
    pub interval_ms: u64,
    /// Give up after this many attempts. `None` retries until cancelled.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_attempts: Some(30),
        }
    }
}

impl RetryPolicy {
    /// Retry forever, until the caller cancels.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            ..Self::default()
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Settings for a driver session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Address of the robot.
    pub host: String,
    pub control_port: u16,
    /// Local interface the telemetry socket binds to.
    pub telemetry_bind: String,
    pub telemetry_port: u16,
    /// How long one telemetry poll waits for a datagram, in milliseconds.
    pub telemetry_timeout_ms: u64,
    /// Receive buffer size for one datagram.
    pub max_datagram: usize,
    /// Settling pause between startup commands, in milliseconds.
    pub startup_delay_ms: u64,
    pub retry: RetryPolicy,
    pub filter: OutlierFilter,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            control_port: DEFAULT_PORT,
            telemetry_bind: "0.0.0.0".to_string(),
            telemetry_port: DEFAULT_PORT,
            telemetry_timeout_ms: 20,
            max_datagram: 65536,
            startup_delay_ms: 2000,
            retry: RetryPolicy::default(),
            filter: OutlierFilter::default(),
        }
    }
}

impl DriverConfig {
    /// Default settings for a robot at `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON config. Missing keys take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn control_addr(&self) -> String {
        format!("{}:{}", self.host, self.control_port)
    }

    pub fn telemetry_addr(&self) -> String {
        format!("{}:{}", self.telemetry_bind, self.telemetry_port)
    }

    pub fn telemetry_timeout(&self) -> Duration {
        Duration::from_millis(self.telemetry_timeout_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}
