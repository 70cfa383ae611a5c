//! Field configuration and performance presets.
//!
//! A [`FieldConfig`] carries every value the outside world can tune: how many
//! particles exist, how far connections reach, how fast particles move, which
//! palette they use, and how close the pointer must come to hover.
//!
//! Configurations serialize to JSON so a host page or a launcher can hand one
//! over as a single string:
//!
//! ```ignore
//! let config = FieldConfig::from_json(r#"{ "particle_count": 200, "theme": "sunset" }"#)?;
//! assert_eq!(config.connection_radius, 150.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::theme::ColorTheme;

fn default_particle_count() -> usize {
    100
}

fn default_connection_radius() -> f32 {
    150.0
}

fn default_speed_factor() -> f32 {
    1.0
}

fn default_hover_radius() -> f32 {
    50.0
}

/// Tunable simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Number of particles created on regeneration.
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,
    /// Maximum distance, in pixels, at which two particles connect.
    #[serde(default = "default_connection_radius")]
    pub connection_radius: f32,
    /// Magnitude scale applied to particle velocities.
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f32,
    /// Palette for new particles.
    #[serde(default)]
    pub theme: ColorTheme,
    /// Pointer distance, in pixels, under which a particle counts as hovered.
    #[serde(default = "default_hover_radius")]
    pub hover_radius: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: default_particle_count(),
            connection_radius: default_connection_radius(),
            speed_factor: default_speed_factor(),
            theme: ColorTheme::default(),
            hover_radius: default_hover_radius(),
        }
    }
}

impl FieldConfig {
    /// Set the particle count.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the connection radius in pixels.
    pub fn with_connection_radius(mut self, radius: f32) -> Self {
        self.connection_radius = radius;
        self
    }

    /// Set the speed factor.
    pub fn with_speed_factor(mut self, factor: f32) -> Self {
        self.speed_factor = factor;
        self
    }

    /// Set the color theme.
    pub fn with_theme(mut self, theme: ColorTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the hover radius in pixels.
    pub fn with_hover_radius(mut self, radius: f32) -> Self {
        self.hover_radius = radius;
        self
    }

    /// Overwrite count and connection radius from a preset.
    pub fn with_preset(mut self, preset: PerformancePreset) -> Self {
        self.particle_count = preset.particle_count();
        self.connection_radius = preset.connection_radius();
        self
    }

    /// Check that every numeric field is usable.
    ///
    /// A particle count of zero is valid and yields an empty field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.connection_radius) {
            return Err(ConfigError::InvalidConnectionRadius(self.connection_radius));
        }
        if !is_positive(self.speed_factor) {
            return Err(ConfigError::InvalidSpeedFactor(self.speed_factor));
        }
        if !is_positive(self.hover_radius) {
            return Err(ConfigError::InvalidHoverRadius(self.hover_radius));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Quality levels trading particle count against frame cost.
///
/// The connection pass is quadratic in the particle count, so these pairs are
/// the main performance lever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformancePreset {
    /// 50 particles, 100 px connections.
    Low,
    /// 100 particles, 150 px connections.
    #[default]
    Medium,
    /// 200 particles, 200 px connections.
    High,
}

impl PerformancePreset {
    pub fn particle_count(&self) -> usize {
        match self {
            PerformancePreset::Low => 50,
            PerformancePreset::Medium => 100,
            PerformancePreset::High => 200,
        }
    }

    pub fn connection_radius(&self) -> f32 {
        match self {
            PerformancePreset::Low => 100.0,
            PerformancePreset::Medium => 150.0,
            PerformancePreset::High => 200.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FieldConfig::default();
        assert_eq!(config.particle_count, 100);
        assert_eq!(config.connection_radius, 150.0);
        assert_eq!(config.speed_factor, 1.0);
        assert_eq!(config.theme, ColorTheme::Blue);
        assert_eq!(config.hover_radius, 50.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let low = FieldConfig::default().with_preset(PerformancePreset::Low);
        assert_eq!((low.particle_count, low.connection_radius), (50, 100.0));

        let high = FieldConfig::default().with_preset(PerformancePreset::High);
        assert_eq!((high.particle_count, high.connection_radius), (200, 200.0));

        assert_eq!(PerformancePreset::default(), PerformancePreset::Medium);
    }

    #[test]
    fn test_validation_rejects_bad_numbers() {
        let bad_radius = FieldConfig::default().with_connection_radius(0.0);
        assert!(matches!(bad_radius.validate(), Err(ConfigError::InvalidConnectionRadius(_))));

        let bad_speed = FieldConfig::default().with_speed_factor(f32::NAN);
        assert!(matches!(bad_speed.validate(), Err(ConfigError::InvalidSpeedFactor(_))));

        let bad_hover = FieldConfig::default().with_hover_radius(-5.0);
        assert!(matches!(bad_hover.validate(), Err(ConfigError::InvalidHoverRadius(_))));

        assert!(FieldConfig::default().with_particle_count(0).validate().is_ok());
    }

    #[test]
    fn test_json_partial() {
        let config = FieldConfig::from_json(r#"{ "particle_count": 200, "theme": "sunset" }"#).unwrap();
        assert_eq!(config.particle_count, 200);
        assert_eq!(config.theme, ColorTheme::Sunset);
        assert_eq!(config.connection_radius, 150.0);
    }

    #[test]
    fn test_json_round_trip() {
        let config = FieldConfig::default()
            .with_theme(ColorTheme::Purple)
            .with_speed_factor(2.5);
        let json = config.to_json().unwrap();
        assert_eq!(FieldConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(FieldConfig::from_json("{ not json"), Err(ConfigError::Json(_))));
        assert!(matches!(
            FieldConfig::from_json(r#"{ "speed_factor": -1.0 }"#),
            Err(ConfigError::InvalidSpeedFactor(_))
        ));
    }
}
