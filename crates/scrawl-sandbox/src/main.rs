//! Windowed sandbox for the immediate-mode 2D draw layer.
//!
//! Opens a window and redraws a small interactive scene every frame through
//! [`scrawl_engine::draw::Draw2d`]. Scene knobs live in a TOML config that
//! can be hot-reloaded; see [`config::SandboxConfig`].

mod app;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use scrawl_engine::device::GpuInit;
use scrawl_engine::logging::{LoggingConfig, init_logging};
use scrawl_engine::window::{Runtime, RuntimeConfig};

use crate::app::SandboxApp;
use crate::config::ConfigWatcher;

/// Interactive sandbox for the scrawl 2D draw layer.
#[derive(Parser, Debug)]
#[command(name = "scrawl-sandbox")]
#[command(about = "Interactive sandbox for the scrawl 2D draw layer")]
#[command(version)]
struct Args {
    /// Log at debug level by default (RUST_LOG still wins)
    #[arg(short, long)]
    verbose: bool,

    /// Reload the config file whenever it changes on disk
    #[arg(short = 'c', long)]
    hotconfig: bool,

    /// Path of the TOML config file
    #[arg(long, default_value = "sandbox.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig { verbose: args.verbose, ..LoggingConfig::default() });

    let watcher = ConfigWatcher::new(args.config, args.hotconfig);
    let app = SandboxApp::new(watcher);

    Runtime::run(
        RuntimeConfig { title: "scrawl sandbox".to_string(), ..RuntimeConfig::default() },
        GpuInit::default(),
        app,
    )
}
