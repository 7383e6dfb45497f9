//! Graph configuration
//!
//! [`GraphConfig`] gathers every styling and axis option for one render. It is
//! built once, validated, and then only read.

use serde::{Deserialize, Serialize};

use super::{Color, GraphError, Result};

/// How measure colors are chosen
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ColorMode {
    /// Cycle through the default color palette
    #[default]
    #[serde(alias = "color")]
    Palette,
    /// Cycle through a fixed list of grays
    Grayscale,
    /// One color per plotted measure, in plot order
    Custom {
        #[serde(default)]
        colors: Vec<Color>,
    },
}

/// Where the legend sits on the main figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendPlacement {
    /// Right of the axes, vertically centered
    #[default]
    OutsideRight,
    /// Inside the axes, top-left corner
    UpperLeft,
}

/// Show/hide toggles; hidden elements are left out of the output entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Visibility {
    pub title: bool,
    pub phase_titles: bool,
    pub x_axis_line: bool,
    pub x_ticks: bool,
    pub x_tick_labels: bool,
    pub x_label: bool,
    pub legend: bool,
    /// Also export a standalone legend image pair
    pub legend_files: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            title: true,
            phase_titles: true,
            x_axis_line: true,
            x_ticks: true,
            x_tick_labels: true,
            x_label: true,
            legend: true,
            legend_files: true,
        }
    }
}

/// Multiple-baseline options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultipleBaseline {
    /// This graph is one tier of a stacked multiple-baseline figure
    pub enabled: bool,
    /// Draw the dashed drop-and-run at each phase change
    pub stair_step: bool,
    /// Horizontal run of the stair-step, in sessions
    pub stair_step_length: f64,
}

impl Default for MultipleBaseline {
    fn default() -> Self {
        Self {
            enabled: false,
            stair_step: false,
            stair_step_length: 3.0,
        }
    }
}

/// Figure size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 500.0,
        }
    }
}

/// Axes placement as fractions of the canvas (origin bottom-left)
///
/// Fixed margins keep the plotting area identical across stacked figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotMargins {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Default for PlotMargins {
    fn default() -> Self {
        Self {
            left: 0.1,
            right: 0.78,
            bottom: 0.32,
            top: 0.88,
        }
    }
}

/// Complete styling and axis configuration for one graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub title: String,
    pub y_label: String,
    pub x_label: String,
    pub y_min: f64,
    pub y_max: f64,
    pub y_tick: f64,
    pub x_tick: f64,
    /// Align stacked graphs on a common x extent; never clips data
    pub fixed_max_x: Option<f64>,
    pub visibility: Visibility,
    pub color_mode: ColorMode,
    pub multiple_baseline: MultipleBaseline,
    pub canvas: CanvasSize,
    pub margins: PlotMargins,
    /// Extra room above `y_max`, as a fraction of the y range
    pub y_headroom: f64,
    pub legend_placement: LegendPlacement,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            title: "Single-Case Design Graph".to_string(),
            y_label: "% correct responses".to_string(),
            x_label: "Sessions".to_string(),
            y_min: 0.0,
            y_max: 100.0,
            y_tick: 10.0,
            x_tick: 1.0,
            fixed_max_x: None,
            visibility: Visibility::default(),
            color_mode: ColorMode::default(),
            multiple_baseline: MultipleBaseline::default(),
            canvas: CanvasSize::default(),
            margins: PlotMargins::default(),
            y_headroom: 0.1,
            legend_placement: LegendPlacement::default(),
        }
    }
}

impl GraphConfig {
    /// Check numeric options; text fields are taken verbatim
    pub fn validate(&self) -> Result<()> {
        let numbers = [
            ("y_min", self.y_min),
            ("y_max", self.y_max),
            ("y_tick", self.y_tick),
            ("x_tick", self.x_tick),
            ("y_headroom", self.y_headroom),
            ("stair_step_length", self.multiple_baseline.stair_step_length),
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
        ];
        if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GraphError::invalid_config(format!("{name} must be finite")));
        }

        if self.y_max <= self.y_min {
            return Err(GraphError::invalid_config(format!(
                "y_max ({}) must be greater than y_min ({})",
                self.y_max, self.y_min
            )));
        }
        if self.y_tick <= 0.0 {
            return Err(GraphError::invalid_config("y_tick must be positive"));
        }
        if self.x_tick <= 0.0 {
            return Err(GraphError::invalid_config("x_tick must be positive"));
        }
        if let Some(max_x) = self.fixed_max_x {
            if !max_x.is_finite() || max_x < 1.0 {
                return Err(GraphError::invalid_config("fixed_max_x must be at least 1"));
            }
        }
        if self.multiple_baseline.stair_step_length < 0.0 {
            return Err(GraphError::invalid_config(
                "stair_step_length must not be negative",
            ));
        }
        if self.y_headroom < 0.0 {
            return Err(GraphError::invalid_config("y_headroom must not be negative"));
        }
        if self.canvas.width <= 0.0 || self.canvas.height <= 0.0 {
            return Err(GraphError::invalid_config("canvas size must be positive"));
        }

        let m = &self.margins;
        let fractions_ok = [m.left, m.right, m.bottom, m.top]
            .iter()
            .all(|v| (0.0..=1.0).contains(v));
        if !fractions_ok || m.left >= m.right || m.bottom >= m.top {
            return Err(GraphError::invalid_config(
                "margins must be fractions with left < right and bottom < top",
            ));
        }
        Ok(())
    }

    /// Horizontal stair-step run, when the extension is active
    pub fn stair_step_length(&self) -> Option<f64> {
        let mb = &self.multiple_baseline;
        (mb.enabled && mb.stair_step && mb.stair_step_length > 0.0).then_some(mb.stair_step_length)
    }

    /// Upper y-axis bound, including headroom for phase titles
    pub fn y_upper(&self) -> f64 {
        self.y_max + (self.y_max - self.y_min) * self.y_headroom
    }

    /// Baseline of phase titles, just above `y_max`
    pub fn phase_title_y(&self) -> f64 {
        self.y_max + (self.y_max - self.y_min) * 0.05
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = GraphConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.y_upper(), 110.0);
        assert_eq!(config.phase_title_y(), 105.0);
    }

    #[test]
    fn test_rejects_inverted_y_range() {
        let config = GraphConfig {
            y_min: 10.0,
            y_max: 10.0,
            ..GraphConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("y_max"));
    }

    #[test]
    fn test_rejects_non_positive_ticks() {
        let config = GraphConfig {
            x_tick: 0.0,
            ..GraphConfig::default()
        };
        assert!(config.validate().is_err());
        let config = GraphConfig {
            y_tick: -5.0,
            ..GraphConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        let config = GraphConfig {
            y_max: f64::INFINITY,
            ..GraphConfig::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("finite"));
    }

    #[test]
    fn test_rejects_bad_margins() {
        let config = GraphConfig {
            margins: PlotMargins {
                left: 0.8,
                right: 0.2,
                ..PlotMargins::default()
            },
            ..GraphConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stair_step_requires_both_flags() {
        let mut config = GraphConfig::default();
        assert_eq!(config.stair_step_length(), None);

        config.multiple_baseline.stair_step = true;
        assert_eq!(config.stair_step_length(), None);

        config.multiple_baseline.enabled = true;
        assert_eq!(config.stair_step_length(), Some(3.0));

        config.multiple_baseline.stair_step_length = 0.0;
        assert_eq!(config.stair_step_length(), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GraphConfig = serde_json::from_str(
            r##"{
                "title": "Tier 1",
                "y_max": 20,
                "visibility": { "x_axis_line": false },
                "color_mode": { "mode": "custom", "colors": ["#000000"] }
            }"##,
        )
        .unwrap();
        assert_eq!(config.title, "Tier 1");
        assert_eq!(config.y_max, 20.0);
        assert_eq!(config.y_tick, 10.0);
        assert!(!config.visibility.x_axis_line);
        assert!(config.visibility.x_ticks);
        assert!(matches!(config.color_mode, ColorMode::Custom { ref colors } if colors.len() == 1));
    }

    #[test]
    fn test_color_mode_aliases() {
        let mode: ColorMode = serde_json::from_str(r#"{"mode":"color"}"#).unwrap();
        assert_eq!(mode, ColorMode::Palette);
        let mode: ColorMode = serde_json::from_str(r#"{"mode":"grayscale"}"#).unwrap();
        assert_eq!(mode, ColorMode::Grayscale);
        let mode: ColorMode = serde_json::from_str(r#"{"mode":"custom"}"#).unwrap();
        assert_eq!(mode, ColorMode::Custom { colors: Vec::new() });
    }

    #[test]
    fn test_legend_placement_names() {
        let placement: LegendPlacement = serde_json::from_str("\"upper-left\"").unwrap();
        assert_eq!(placement, LegendPlacement::UpperLeft);
    }
}
