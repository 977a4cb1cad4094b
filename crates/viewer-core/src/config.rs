//! Viewer configuration: zoom bounds, input thresholds and device scale.
//!
//! Configuration can be created programmatically, loaded from environment
//! variables, or read from a JSON file. Missing values fall back to the
//! defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Tunables for navigation, zoom and input mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Smallest allowed zoom factor
    pub min_zoom: f32,
    /// Largest allowed zoom factor
    pub max_zoom: f32,
    /// Multiplier applied by zoom in / zoom out
    pub zoom_step: f32,
    /// Zoom used at startup and by reset
    pub default_zoom: f32,
    /// Minimum absolute wheel delta that pages
    pub wheel_threshold: f64,
    /// Upper bound for the device pixel ratio used when rasterizing
    pub max_device_scale: f32,
    /// Whether paging starts synchronized
    pub start_synchronized: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.25,
            max_zoom: 4.0,
            zoom_step: 1.1,
            default_zoom: 1.0,
            wheel_threshold: 20.0,
            max_device_scale: 3.0,
            start_synchronized: true,
        }
    }
}

impl ViewerConfig {
    /// Clamps a zoom factor into `[min_zoom, max_zoom]`.
    ///
    /// Works on unvalidated configs too: unusable bounds fall back to the
    /// defaults, inverted bounds are swapped, and NaN maps to the lower bound.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        let (min, max) = self.zoom_bounds();
        if zoom.is_nan() {
            return min;
        }
        zoom.clamp(min, max)
    }

    fn zoom_bounds(&self) -> (f32, f32) {
        let defaults = Self::default();
        let min = positive_or(self.min_zoom, defaults.min_zoom);
        let max = positive_or(self.max_zoom, defaults.max_zoom);
        if min <= max {
            (min, max)
        } else {
            (max, min)
        }
    }

    /// Clamps a raw device pixel ratio into `[1, max_device_scale]`.
    ///
    /// Non-finite or non-positive ratios are treated as 1.
    pub fn device_scale(&self, raw: f32) -> f32 {
        if !raw.is_finite() || raw <= 0.0 {
            return 1.0;
        }
        raw.clamp(1.0, self.max_device_scale.max(1.0))
    }

    /// Loads configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TWINPAGE_MIN_ZOOM` (default: 0.25)
    /// - `TWINPAGE_MAX_ZOOM` (default: 4.0)
    /// - `TWINPAGE_ZOOM_STEP` (default: 1.1)
    /// - `TWINPAGE_DEFAULT_ZOOM` (default: 1.0)
    /// - `TWINPAGE_WHEEL_THRESHOLD` (default: 20)
    /// - `TWINPAGE_MAX_DEVICE_SCALE` (default: 3)
    /// - `TWINPAGE_START_SYNCHRONIZED` (default: true)
    ///
    /// # Errors
    /// Returns an error if any variable holds an unparsable value or the
    /// resulting configuration fails [`validate`](Self::validate).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = env_value("TWINPAGE_MIN_ZOOM")? {
            config.min_zoom = value;
        }
        if let Some(value) = env_value("TWINPAGE_MAX_ZOOM")? {
            config.max_zoom = value;
        }
        if let Some(value) = env_value("TWINPAGE_ZOOM_STEP")? {
            config.zoom_step = value;
        }
        if let Some(value) = env_value("TWINPAGE_DEFAULT_ZOOM")? {
            config.default_zoom = value;
        }
        if let Some(value) = env_value("TWINPAGE_WHEEL_THRESHOLD")? {
            config.wheel_threshold = value;
        }
        if let Some(value) = env_value("TWINPAGE_MAX_DEVICE_SCALE")? {
            config.max_device_scale = value;
        }
        if let Some(value) = env_value("TWINPAGE_START_SYNCHRONIZED")? {
            config.start_synchronized = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file.
    ///
    /// ```json
    /// { "min_zoom": 0.5, "max_zoom": 3.0, "start_synchronized": false }
    /// ```
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that bounds are positive and ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(ConfigError::InvalidValue("min_zoom".to_string()));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            return Err(ConfigError::InvalidValue("max_zoom".to_string()));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ConfigError::InvalidValue("zoom_step".to_string()));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.default_zoom) {
            return Err(ConfigError::InvalidValue("default_zoom".to_string()));
        }
        if !(self.wheel_threshold.is_finite() && self.wheel_threshold >= 0.0) {
            return Err(ConfigError::InvalidValue("wheel_threshold".to_string()));
        }
        if !(self.max_device_scale.is_finite() && self.max_device_scale >= 1.0) {
            return Err(ConfigError::InvalidValue("max_device_scale".to_string()));
        }
        Ok(())
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn env_value<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(None),
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("invalid value for {0}")]
    InvalidValue(String),
}
