//! Application configuration.
//!
//! The configuration is loaded from a JSON file
//! (`$XDG_CONFIG_HOME/tiletree/config.json` for the daemon).  Every section
//! and field is optional; a minimal `{}` file is valid and everything falls
//! back to the compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "tiling": {
//!     "default_split": "horizontal",
//!     "gap_size": 4,
//!     "gap_multiplier": 2,
//!     "auto_exit_tabbed": true,
//!     "drag_center_layout": "tabbed",
//!     "drop_edge_fraction": 0.3
//!   },
//!   "float_overrides": [
//!     { "wm_class": "pavucontrol", "mode": "float" },
//!     { "wm_class": "firefox", "wm_title": "Picture-in-Picture", "mode": "float" }
//!   ],
//!   "daemon": { "render_debounce_ms": 50 }
//! }
//! ```

use crate::command::Orientation;
use crate::drag::CenterDrop;
use crate::float_rules::FloatOverride;
use crate::tree::TreeSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Layout engine settings.
    #[serde(default)]
    pub tiling: TilingConfig,

    /// Per-application tile/float overrides, in priority order (later
    /// records win ties).
    #[serde(default)]
    pub float_overrides: Vec<FloatOverride>,

    /// Daemon process settings.
    #[serde(default)]
    pub daemon: DaemonConfig,
}

/// Layout engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingConfig {
    /// Split used for new monitors and for stacked/tabbed containers that
    /// auto-exit.
    pub default_split: Orientation,
    /// Gap around each tiled window, in pixels before the multiplier.
    pub gap_size: u32,
    pub gap_multiplier: u32,
    /// Turn a stacked/tabbed container left with one window into a split.
    pub auto_exit_tabbed: bool,
    /// What dropping a dragged window onto the middle of another does.
    pub drag_center_layout: CenterDrop,
    /// Share of a window's width/height that counts as an edge drop zone.
    /// Clamped to `[0.0, 0.5]`.
    pub drop_edge_fraction: f64,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            default_split: Orientation::Horizontal,
            gap_size: 4,
            gap_multiplier: 1,
            auto_exit_tabbed: true,
            drag_center_layout: CenterDrop::Swap,
            drop_edge_fraction: 0.3,
        }
    }
}

impl TilingConfig {
    /// Gap in pixels.
    pub fn gap(&self) -> i32 {
        let gap = self.gap_size.saturating_mul(self.gap_multiplier);
        i32::try_from(gap).unwrap_or(i32::MAX)
    }

    pub fn edge_fraction(&self) -> f64 {
        if self.drop_edge_fraction.is_finite() {
            self.drop_edge_fraction.clamp(0.0, 0.5)
        } else {
            TilingConfig::default().drop_edge_fraction
        }
    }

    /// Settings the layout tree consults.
    pub fn tree_settings(&self) -> TreeSettings {
        TreeSettings {
            default_layout: self.default_split.layout(),
            auto_exit_tabbed: self.auto_exit_tabbed,
            edge_fraction: self.edge_fraction(),
        }
    }
}

/// Daemon process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Quiet period before a burst of layout changes is rendered (ms).
    pub render_debounce_ms: u64,
    /// Unix socket for requests.  Defaults to
    /// `$XDG_RUNTIME_DIR/tiletree.sock`.
    pub socket_path: Option<PathBuf>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            render_debounce_ms: 50,
            socket_path: None,
        }
    }
}

impl DaemonConfig {
    pub fn render_debounce(&self) -> Duration {
        Duration::from_millis(self.render_debounce_ms)
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
