//! Configuration Management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Socket settings
    #[serde(default)]
    pub transport: TransportConfig,
    /// Consumer and smoothing settings
    #[serde(default)]
    pub view: ViewConfig,
}

/// Wire transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// One datagram carries one or more lines
    #[default]
    Udp,
    /// Persistent connections carrying a newline-delimited stream
    Tcp,
}

impl Protocol {
    /// Bind host used when none is configured
    pub fn default_host(self) -> &'static str {
        match self {
            Protocol::Udp => "0.0.0.0",
            Protocol::Tcp => "localhost",
        }
    }

    /// Bind port used when none is configured
    pub fn default_port(self) -> u16 {
        match self {
            Protocol::Udp => 9000,
            Protocol::Tcp => 8000,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Protocol::Udp => "udp",
            Protocol::Tcp => "tcp",
        })
    }
}

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// udp or tcp
    pub protocol: Protocol,
    /// Bind host
    pub host: String,
    /// Bind port (0 = ephemeral)
    pub port: u16,
    /// Socket read timeout; bounds how long a stop request goes unnoticed (ms)
    pub poll_interval_ms: u64,
    /// Receive buffer for one datagram
    pub max_datagram_bytes: usize,
    /// Read size for stream connections
    pub read_chunk_bytes: usize,
}

impl TransportConfig {
    /// Defaults for `protocol`, including its default host and port
    pub fn for_protocol(protocol: Protocol) -> Self {
        Self {
            protocol,
            host: protocol.default_host().to_string(),
            port: protocol.default_port(),
            poll_interval_ms: 500,
            max_datagram_bytes: 65536,
            read_chunk_bytes: 4096,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// `host:port` as written in logs and errors
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::for_protocol(Protocol::default())
    }
}

/// View configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Smoothing factor in (0, 1]; 1 disables smoothing
    pub alpha: f64,
    /// Half-extent reported before the first data arrives
    pub initial_half_extent: f64,
    /// Track the left hand
    pub show_left: bool,
    /// Track the right hand
    pub show_right: bool,
    /// Emit finger bone segments
    pub show_fingers: bool,
    /// Consumer tick period (ms)
    pub tick_interval_ms: u64,
}

impl ViewConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            initial_half_extent: 0.4,
            show_left: true,
            show_right: true,
            show_fingers: false,
            tick_interval_ms: 16,
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.transport.host.trim().is_empty() {
            return Err(crate::Error::Config("host must not be empty".to_string()));
        }
        if self.transport.poll_interval_ms == 0 {
            return Err(crate::Error::Config("poll_interval_ms must be > 0".to_string()));
        }
        if self.transport.max_datagram_bytes == 0 {
            return Err(crate::Error::Config("max_datagram_bytes must be > 0".to_string()));
        }
        if self.transport.read_chunk_bytes == 0 {
            return Err(crate::Error::Config("read_chunk_bytes must be > 0".to_string()));
        }
        if !(self.view.alpha > 0.0 && self.view.alpha <= 1.0) {
            return Err(crate::Error::Config(format!(
                "alpha must be in (0, 1], got {}", self.view.alpha
            )));
        }
        if !(self.view.initial_half_extent > 0.0) || !self.view.initial_half_extent.is_finite() {
            return Err(crate::Error::Config(format!(
                "initial_half_extent must be positive, got {}", self.view.initial_half_extent
            )));
        }
        if self.view.tick_interval_ms == 0 {
            return Err(crate::Error::Config("tick_interval_ms must be > 0".to_string()));
        }
        if !self.view.show_left && !self.view.show_right {
            return Err(crate::Error::Config(
                "at least one of show_left and show_right must be enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content = self.to_toml()?;

        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".hand_stream").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }
}
