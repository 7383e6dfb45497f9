//! Core type definitions for graph processing
//!
//! This module contains the fundamental types used throughout scdgraph:
//! measures, phases, colors and marker shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{GraphError, Result};

/// An ordered sequence of optional observations; `None` marks a missing session.
pub type Series = Vec<Option<f64>>;

/// One named series plotted within a phase
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    /// Legend label
    pub name: String,
    /// Observations, one per session
    pub values: Series,
}

impl Measure {
    pub fn new(name: impl Into<String>, values: Series) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Create a measure with no missing values
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().copied().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A contiguous block of sessions sharing a condition label
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub title: String,
    pub measures: Vec<Measure>,
}

impl Phase {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            measures: Vec::new(),
        }
    }

    pub fn with_measures(title: impl Into<String>, measures: Vec<Measure>) -> Self {
        Self {
            title: title.into(),
            measures,
        }
    }

    /// Number of sessions this phase spans on the shared x-axis
    ///
    /// The longest measure wins; a phase without data has length 0.
    pub fn length(&self) -> usize {
        self.measures.iter().map(Measure::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }
}

/// An opaque RGB color, stored as `#rrggbb`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Parse `#rgb` or `#rrggbb` (case-insensitive) into a normalized color
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| GraphError::invalid_color(text))?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GraphError::invalid_color(text));
        }
        let normalized = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            _ => return Err(GraphError::invalid_color(text)),
        };
        Ok(Self(format!("#{}", normalized.to_ascii_lowercase())))
    }

    /// Build a color from a palette constant known to be valid
    pub(crate) fn from_static(hex: &'static str) -> Self {
        Self(hex.to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Color {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Data point marker shapes, cycled per phase and measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    Diamond,
    TriangleUp,
    TriangleDown,
    /// Filled plus sign
    Plus,
}

impl MarkerShape {
    /// Marker cycle in plot order
    pub const CYCLE: [MarkerShape; 6] = [
        MarkerShape::Circle,
        MarkerShape::Square,
        MarkerShape::Diamond,
        MarkerShape::TriangleUp,
        MarkerShape::TriangleDown,
        MarkerShape::Plus,
    ];
}

impl fmt::Display for MarkerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerShape::Circle => write!(f, "circle"),
            MarkerShape::Square => write!(f, "square"),
            MarkerShape::Diamond => write!(f, "diamond"),
            MarkerShape::TriangleUp => write!(f, "triangle-up"),
            MarkerShape::TriangleDown => write!(f, "triangle-down"),
            MarkerShape::Plus => write!(f, "plus"),
        }
    }
}
