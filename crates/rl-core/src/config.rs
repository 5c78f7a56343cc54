//! Engine configuration.
//!
//! Typically loaded from a TOML file by the application and handed to the
//! engine builder.  Every field has a default, so a partial file (or an
//! empty one) is valid:
//!
//! ```toml
//! tick_duration_ms   = 50
//! route_timeout_secs = 45
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, SimClock};

/// Top-level logistics engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogisticsConfig {
    /// Simulated milliseconds per tick.
    pub tick_duration_ms: u32,

    /// World units per grid cell.  Emitter radii are divided by this to get
    /// a step budget.
    pub cell_size: f32,

    /// A supply route not refreshed for this long is stale.
    pub route_timeout_secs: u64,

    /// Interval between coordinator sweeps.
    pub sweep_interval_secs: u64,

    /// How far (in cardinal steps) the access-point fallback search reaches
    /// when a site has no road on its perimeter.
    pub access_fallback_radius: u32,

    /// Upper bound on cells walked while reconstructing a path.
    pub max_path_len: usize,

    /// Cart speed on a road with multiplier 1.0, in cells per second.
    pub cart_speed_cells_per_sec: f32,

    /// Default matching range for carts, in world units.
    pub default_request_range: f32,
}

impl Default for LogisticsConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms:         100,
            cell_size:                1.0,
            route_timeout_secs:       30,
            sweep_interval_secs:      5,
            access_fallback_radius:   5,
            max_path_len:             10_000,
            cart_speed_cells_per_sec: 5.0,
            default_request_range:    20.0,
        }
    }
}

impl LogisticsConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(src: &str) -> CoreResult<Self> {
        let config: LogisticsConfig =
            toml::from_str(src).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_toml_file(path: &Path) -> CoreResult<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_duration_ms == 0 {
            return Err(CoreError::Config("tick_duration_ms must be > 0".into()));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(CoreError::Config(format!(
                "cell_size must be a positive number, got {}",
                self.cell_size
            )));
        }
        if self.sweep_interval_secs == 0 {
            return Err(CoreError::Config("sweep_interval_secs must be > 0".into()));
        }
        if self.max_path_len == 0 {
            return Err(CoreError::Config("max_path_len must be > 0".into()));
        }
        if !(self.cart_speed_cells_per_sec.is_finite() && self.cart_speed_cells_per_sec > 0.0) {
            return Err(CoreError::Config(format!(
                "cart_speed_cells_per_sec must be a positive number, got {}",
                self.cart_speed_cells_per_sec
            )));
        }
        Ok(())
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_ms)
    }

    /// Matching range in whole road steps for a radius in world units.
    pub fn range_steps(&self, radius: f32) -> u32 {
        (radius / self.cell_size.max(0.01)).floor().max(0.0) as u32
    }
}
