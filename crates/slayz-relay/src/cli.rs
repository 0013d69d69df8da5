//! Command-line arguments and how they override the config file.

use std::path::PathBuf;

use clap::Parser;
use slayz_config::{SlayzConfig, StoreBackend};

#[derive(Parser, Debug)]
#[command(name = "slayz-relay", about = "Chat and voice signaling server for slayz")]
pub struct Args {
    /// Config file (defaults to the platform config directory).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to listen on (overrides the config file).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory for the JSON record files (overrides the config file).
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Keep all records in memory.
    #[arg(long)]
    pub memory_store: bool,
}

impl Args {
    /// Apply the flags that were given on top of `config`.
    pub fn apply_overrides(&self, config: &mut SlayzConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(data_dir) = &self.data_dir {
            config.store.data_dir = data_dir.clone();
        }
        if self.memory_store {
            config.store.backend = StoreBackend::Memory;
        }
    }
}
