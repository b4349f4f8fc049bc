use std::path::Path;

use magic_glass_imgproc::resize::InterpolationMode;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Tunables of the viewer session.
///
/// Every field has a default, so a JSON file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    /// Inclusive `(min, max)` range the lens radius is clamped to.
    pub radius_range: (u32, u32),

    /// Radius used when a session is opened.
    pub default_radius: u32,

    /// Factor applied by one zoom-in step.
    pub zoom_step_in: f64,

    /// Factor applied by one zoom-out step.
    pub zoom_step_out: f64,

    /// Zooming in is allowed while the factor is below this value.
    pub max_zoom: f64,

    /// Zooming out is allowed while the factor is above this value.
    pub min_zoom: f64,

    /// Resampling used when zooming.
    pub interpolation: InterpolationMode,

    /// JPEG quality of the saved histogram chart.
    pub chart_quality: u8,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            radius_range: (60, 100),
            default_radius: 60,
            zoom_step_in: 1.25,
            zoom_step_out: 0.8,
            max_zoom: 3.0,
            min_zoom: 0.333,
            interpolation: InterpolationMode::Nearest,
            chart_quality: 90,
        }
    }
}

impl LensConfig {
    /// Set the radius range.
    pub fn with_radius_range(mut self, min: u32, max: u32) -> Self {
        self.radius_range = (min, max);
        self
    }

    /// Set the radius used on open.
    pub fn with_default_radius(mut self, radius: u32) -> Self {
        self.default_radius = radius;
        self
    }

    /// Set both zoom steps.
    pub fn with_zoom_steps(mut self, step_in: f64, step_out: f64) -> Self {
        self.zoom_step_in = step_in;
        self.zoom_step_out = step_out;
        self
    }

    /// Set the zoom limits.
    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Set the zoom resampling.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set the JPEG quality of the histogram chart.
    pub fn with_chart_quality(mut self, quality: u8) -> Self {
        self.chart_quality = quality;
        self
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, SessionError> {
        let config: LensConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Clamp a radius to [`LensConfig::radius_range`].
    pub fn clamp_radius(&self, radius: u32) -> u32 {
        radius.clamp(self.radius_range.0, self.radius_range.1)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), SessionError> {
        let (min, max) = self.radius_range;
        if min > max {
            return Err(SessionError::InvalidConfig(format!(
                "radius range is empty: {min} > {max}"
            )));
        }

        if !(min..=max).contains(&self.default_radius) {
            return Err(SessionError::InvalidConfig(format!(
                "default radius {} is outside [{min}, {max}]",
                self.default_radius
            )));
        }

        if !(self.zoom_step_in.is_finite() && self.zoom_step_in > 1.0) {
            return Err(SessionError::InvalidConfig(format!(
                "zoom-in step must be greater than 1, got {}",
                self.zoom_step_in
            )));
        }

        if !(self.zoom_step_out.is_finite() && self.zoom_step_out > 0.0 && self.zoom_step_out < 1.0)
        {
            return Err(SessionError::InvalidConfig(format!(
                "zoom-out step must be in (0, 1), got {}",
                self.zoom_step_out
            )));
        }

        if !(self.min_zoom > 0.0 && self.min_zoom <= 1.0 && self.max_zoom >= 1.0)
            || !self.max_zoom.is_finite()
        {
            return Err(SessionError::InvalidConfig(format!(
                "zoom limits must satisfy 0 < min <= 1 <= max, got [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }

        if self.chart_quality == 0 || self.chart_quality > 100 {
            return Err(SessionError::InvalidConfig(format!(
                "chart quality must be in [1, 100], got {}",
                self.chart_quality
            )));
        }

        Ok(())
    }
}
