//! Runtime configuration, read from the environment (and an optional `.env`).
//!
//! | Variable                    | Default  |
//! |-----------------------------|----------|
//! | `TOLLGATE_THRESHOLD_M`      | `20`     |
//! | `TOLLGATE_DISTANCE_UNIT_M`  | `100`    |
//! | `TOLLGATE_MODEL_DIR`        | `model`  |
//! | `TOLLGATE_RATE_DIR`         | `sazba`  |
//! | `TOLLGATE_CACHE_DIR`        | `cache`  |

#[doc(hidden)]
pub mod error;

#[doc(inline)]
pub use error::ConfigError;

use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::matcher::DEFAULT_THRESHOLD;
use crate::tariff::DISTANCE_UNIT;

pub const THRESHOLD_VAR: &str = "TOLLGATE_THRESHOLD_M";
pub const DISTANCE_UNIT_VAR: &str = "TOLLGATE_DISTANCE_UNIT_M";
pub const MODEL_DIR_VAR: &str = "TOLLGATE_MODEL_DIR";
pub const RATE_DIR_VAR: &str = "TOLLGATE_RATE_DIR";
pub const CACHE_DIR_VAR: &str = "TOLLGATE_CACHE_DIR";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TollConfig {
    /// Distance (in meters) within which a waypoint matches a road point.
    pub threshold: f64,

    /// Billing granularity, in meters.
    pub distance_unit: f64,

    pub model_dir: PathBuf,
    pub rate_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl Default for TollConfig {
    fn default() -> Self {
        TollConfig {
            threshold: DEFAULT_THRESHOLD,
            distance_unit: DISTANCE_UNIT,
            model_dir: PathBuf::from("model"),
            rate_dir: PathBuf::from("sazba"),
            cache_dir: PathBuf::from("cache"),
        }
    }
}

impl TollConfig {
    /// Reads the configuration from the process environment,
    /// loading a `.env` file first when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        TollConfig::from_vars(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = TollConfig::default();

        let config = TollConfig {
            threshold: number(THRESHOLD_VAR, lookup(THRESHOLD_VAR), defaults.threshold)?,
            distance_unit: number(
                DISTANCE_UNIT_VAR,
                lookup(DISTANCE_UNIT_VAR),
                defaults.distance_unit,
            )?,
            model_dir: lookup(MODEL_DIR_VAR).map_or(defaults.model_dir, PathBuf::from),
            rate_dir: lookup(RATE_DIR_VAR).map_or(defaults.rate_dir, PathBuf::from),
            cache_dir: lookup(CACHE_DIR_VAR).map_or(defaults.cache_dir, PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects non-positive distances, e.g. after CLI overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (var, value) in [
            (THRESHOLD_VAR, self.threshold),
            (DISTANCE_UNIT_VAR, self.distance_unit),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { var, value });
            }
        }

        Ok(())
    }
}

fn number(var: &'static str, raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value: text }),
    }
}
