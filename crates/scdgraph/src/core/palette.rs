//! Color and marker assignment
//!
//! Colors follow the global plot order across every plotted measure, not the
//! position within a phase. Markers depend on the phase and measure index.

use super::{Color, ColorMode, MarkerShape};

/// Default color cycle
pub const DEFAULT_COLORS: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

/// Grayscale substitute, same length as the default cycle
pub const GRAYSCALE_COLORS: [&str; 6] = [
    "#000000", "#555555", "#888888", "#AAAAAA", "#CCCCCC", "#EEEEEE",
];

/// Resolves the color of the n-th plotted measure
#[derive(Debug, Clone)]
pub struct Palette<'a> {
    mode: &'a ColorMode,
}

impl<'a> Palette<'a> {
    pub fn new(mode: &'a ColorMode) -> Self {
        Self { mode }
    }

    /// Color for the measure at `plot_index` in global plot order
    ///
    /// Custom lists that run short fall back to the default cycle.
    pub fn color(&self, plot_index: usize) -> Color {
        match self.mode {
            ColorMode::Palette => default_color(plot_index),
            ColorMode::Grayscale => {
                Color::from_static(GRAYSCALE_COLORS[plot_index % GRAYSCALE_COLORS.len()])
            }
            ColorMode::Custom { colors } => colors
                .get(plot_index)
                .cloned()
                .unwrap_or_else(|| default_color(plot_index)),
        }
    }
}

fn default_color(plot_index: usize) -> Color {
    Color::from_static(DEFAULT_COLORS[plot_index % DEFAULT_COLORS.len()])
}

/// Marker for measure `measure_index` of phase `phase_index`
pub fn marker_for(phase_index: usize, measure_index: usize) -> MarkerShape {
    MarkerShape::CYCLE[(phase_index + measure_index) % MarkerShape::CYCLE.len()]
}
