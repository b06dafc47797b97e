//! Command-Line Interface

use super::config::{Config, Protocol, TransportConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Hand Stream - receive and reconstruct live hand-tracking telemetry
#[derive(Parser, Debug)]
#[command(name = "hand-stream")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Listen for a hand stream and track both hands
    Watch(WatchArgs),

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// View or reset configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// How frames leave the view loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EmitFormat {
    /// Throttled summary through the logger
    #[default]
    Log,
    /// One JSON object per frame on stdout
    Json,
}

/// Options for `watch`; each one overrides the config file
#[derive(Args, Debug, Default)]
pub struct WatchArgs {
    /// Transport protocol (switching protocol also switches the default host and port)
    #[arg(long, value_enum)]
    pub protocol: Option<Protocol>,

    /// Bind host
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Track only the left hand
    #[arg(long, conflicts_with = "right_only")]
    pub left_only: bool,

    /// Track only the right hand
    #[arg(long)]
    pub right_only: bool,

    /// Initial half-extent of the view window
    #[arg(long)]
    pub axis_limit: Option<f64>,

    /// Smoothing factor in (0, 1]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Emit finger bone segments
    #[arg(long)]
    pub show_fingers: bool,

    /// Frame output
    #[arg(long, value_enum, default_value_t = EmitFormat::Log)]
    pub emit: EmitFormat,

    /// Run for this many seconds (0 = until Ctrl+C)
    #[arg(short, long, default_value = "0")]
    pub duration: u64,
}

impl WatchArgs {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(protocol) = self.protocol {
            if protocol != config.transport.protocol {
                let previous = &config.transport;
                config.transport = TransportConfig {
                    poll_interval_ms: previous.poll_interval_ms,
                    max_datagram_bytes: previous.max_datagram_bytes,
                    read_chunk_bytes: previous.read_chunk_bytes,
                    ..TransportConfig::for_protocol(protocol)
                };
            }
        }
        if let Some(host) = &self.host {
            config.transport.host = host.clone();
        }
        if let Some(port) = self.port {
            config.transport.port = port;
        }
        if self.left_only {
            config.view.show_left = true;
            config.view.show_right = false;
        }
        if self.right_only {
            config.view.show_left = false;
            config.view.show_right = true;
        }
        if let Some(limit) = self.axis_limit {
            config.view.initial_half_extent = limit;
        }
        if let Some(alpha) = self.alpha {
            config.view.alpha = alpha;
        }
        if self.show_fingers {
            config.view.show_fingers = true;
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
