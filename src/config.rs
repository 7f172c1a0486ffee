//! Overlay configuration shared by the host and the desktop app.

use std::time::Duration;

use egui::Color32;
use thiserror::Error;

use crate::geometry::GridSpec;

/// Marker class the grid and trail anchor to unless told otherwise.
pub const DEFAULT_TARGET_CLASS: &str = "grid-area";
/// Quiet period for resize and content-size bursts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);
/// Content viewport height outside fullscreen.
pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid cell must be positive, got {width}x{height}")]
    InvalidCell { width: f32, height: f32 },
    #[error("{what} width must be positive, got {value}")]
    InvalidStroke { what: &'static str, value: f32 },
    #[error("target class must not be empty")]
    EmptyTargetClass,
    #[error("viewport height must be positive, got {0}")]
    InvalidViewport(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub grid: GridSpec,
    pub grid_color: Color32,
    pub trail_color: Color32,
    pub trail_width: f32,
    pub highlight_color: Color32,
    pub highlight_width: f32,
    pub target_class: String,
    pub debounce: Duration,
    pub viewport_height: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            // rgba(0, 0, 255, 0.2)
            grid_color: Color32::from_rgba_unmultiplied(0, 0, 255, 51),
            trail_color: Color32::from_rgb(0, 128, 0),
            trail_width: 2.0,
            highlight_color: Color32::from_rgb(255, 0, 0),
            highlight_width: 2.0,
            target_class: DEFAULT_TARGET_CLASS.to_string(),
            debounce: DEFAULT_DEBOUNCE,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl OverlayConfig {
    pub fn with_grid(mut self, cell_width: f32, cell_height: f32) -> Self {
        self.grid = GridSpec {
            cell_width,
            cell_height,
        };
        self
    }

    pub fn with_target_class(mut self, class: impl Into<String>) -> Self {
        self.target_class = class.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_viewport_height(mut self, height: f32) -> Self {
        self.viewport_height = height;
        self
    }

    pub fn with_trail(mut self, color: Color32, width: f32) -> Self {
        self.trail_color = color;
        self.trail_width = width;
        self
    }

    pub fn with_grid_color(mut self, color: Color32) -> Self {
        self.grid_color = color;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridSpec {
            cell_width,
            cell_height,
        } = self.grid;
        // NaN fails these comparisons too
        if !(cell_width > 0.0 && cell_height > 0.0) || !cell_width.is_finite() || !cell_height.is_finite() {
            return Err(ConfigError::InvalidCell {
                width: cell_width,
                height: cell_height,
            });
        }
        if !(self.trail_width > 0.0) {
            return Err(ConfigError::InvalidStroke {
                what: "trail",
                value: self.trail_width,
            });
        }
        if !(self.highlight_width > 0.0) {
            return Err(ConfigError::InvalidStroke {
                what: "highlight",
                value: self.highlight_width,
            });
        }
        if self.target_class.trim().is_empty() {
            return Err(ConfigError::EmptyTargetClass);
        }
        if !(self.viewport_height > 0.0) {
            return Err(ConfigError::InvalidViewport(self.viewport_height));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = OverlayConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.grid, GridSpec::default());
        assert_eq!(config.grid_color.a(), 51);
        assert_eq!(config.target_class, "grid-area");
    }

    #[test]
    fn builders_override_fields() {
        let config = OverlayConfig::default()
            .with_grid(20.0, 5.0)
            .with_target_class("plot")
            .with_debounce(Duration::from_millis(250));
        assert_eq!(config.grid.cell_width, 20.0);
        assert_eq!(config.grid.cell_height, 5.0);
        assert_eq!(config.target_class, "plot");
        assert_eq!(config.debounce, Duration::from_millis(250));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            OverlayConfig::default().with_grid(0.0, 10.0).validate(),
            Err(ConfigError::InvalidCell { .. })
        ));
        assert!(matches!(
            OverlayConfig::default().with_grid(f32::NAN, 10.0).validate(),
            Err(ConfigError::InvalidCell { .. })
        ));
        assert_eq!(
            OverlayConfig::default().with_target_class("  ").validate(),
            Err(ConfigError::EmptyTargetClass)
        );
        assert!(matches!(
            OverlayConfig::default()
                .with_trail(Color32::GREEN, -1.0)
                .validate(),
            Err(ConfigError::InvalidStroke { what: "trail", .. })
        ));
        assert_eq!(
            OverlayConfig::default().with_viewport_height(0.0).validate(),
            Err(ConfigError::InvalidViewport(0.0))
        );
    }
}
