use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Scene knobs read from a TOML file (`sandbox.toml` by default).
///
/// Every key is optional; missing ones take the values in [`Default`], and a
/// missing file means an all-default scene.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Background clear color, linear RGBA.
    pub clear_color: [f32; 4],

    /// Side count of the spinning polygon. Clamped to a sane range at use.
    pub polygon_sides: usize,

    /// Polygon spin rate in radians per second. Negative spins the other way.
    pub spin_speed: f32,

    /// Radius of the pointer-following circle, logical pixels.
    pub circle_radius: f32,

    /// Grid line spacing in logical pixels.
    pub grid_step: f32,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.08, 0.09, 0.11, 1.0],
            polygon_sides: 6,
            spin_speed: 0.9,
            circle_radius: 40.0,
            grid_step: 64.0,
        }
    }
}

impl SandboxConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }
}

/// Loads the config once and, with hot reload on, re-reads it while the
/// sandbox runs.
///
/// Watching is plain mtime polling, one `fs::metadata` call per frame. Plenty
/// for a hand-edited file and needs no platform watcher.
#[derive(Debug)]
pub struct ConfigWatcher {
    path: PathBuf,
    hot_reload: bool,
    last_modified: Option<SystemTime>,
    config: SandboxConfig,
}

impl ConfigWatcher {
    /// Reads the initial config. A missing file is normal and yields the
    /// defaults; a file that does not parse does too, with a warning.
    pub fn new(path: PathBuf, hot_reload: bool) -> Self {
        let last_modified = mtime(&path);
        let config = if path.exists() {
            match SandboxConfig::load(&path) {
                Ok(config) => {
                    log::info!("loaded config from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!("{err:#}; starting from defaults");
                    SandboxConfig::default()
                }
            }
        } else {
            log::info!("no config at {}; starting from defaults", path.display());
            SandboxConfig::default()
        };

        Self { path, hot_reload, last_modified, config }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Re-reads the file when its mtime moved; returns whether the active
    /// config changed. Without hot reload this never does anything.
    pub fn poll(&mut self) -> bool {
        if !self.hot_reload {
            return false;
        }

        let modified = mtime(&self.path);
        if modified == self.last_modified {
            return false;
        }
        self.last_modified = modified;

        match SandboxConfig::load(&self.path) {
            Ok(config) if config != self.config => {
                log::info!("config reloaded from {}", self.path.display());
                self.config = config;
                true
            }
            // Touched but not changed (or deleted mid-edit): keep what we have.
            Ok(_) => false,
            Err(err) => {
                log::warn!("config reload failed, keeping previous: {err:#}");
                false
            }
        }
    }
}

fn mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
