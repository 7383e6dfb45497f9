//! Figure model
//!
//! A [`Figure`] is the renderer's output: a flat, ordered list of styled
//! primitives in pixel space, each tagged with the [`ElementRole`] it plays.
//! Elements that are switched off are simply never added, so a hidden part of
//! the graph cannot leak into any export format.

use std::fmt;

use crate::core::{text_width, Color, MarkerShape};

/// What a primitive represents in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    Title,
    PhaseTitle,
    SeriesLine,
    SeriesMarker,
    PhaseBoundary,
    StairStep,
    XAxisLine,
    YAxisLine,
    XTick,
    XTickLabel,
    YTick,
    YTickLabel,
    XLabel,
    YLabel,
    LegendLine,
    LegendMarker,
    LegendText,
}

impl ElementRole {
    /// CSS class used in SVG output
    pub fn class(&self) -> &'static str {
        match self {
            ElementRole::Title => "graph-title",
            ElementRole::PhaseTitle => "phase-title",
            ElementRole::SeriesLine => "series-line",
            ElementRole::SeriesMarker => "series-marker",
            ElementRole::PhaseBoundary => "phase-boundary",
            ElementRole::StairStep => "stair-step",
            ElementRole::XAxisLine => "x-axis-line",
            ElementRole::YAxisLine => "y-axis-line",
            ElementRole::XTick => "x-tick",
            ElementRole::XTickLabel => "x-tick-label",
            ElementRole::YTick => "y-tick",
            ElementRole::YTickLabel => "y-tick-label",
            ElementRole::XLabel => "x-label",
            ElementRole::YLabel => "y-label",
            ElementRole::LegendLine => "legend-line",
            ElementRole::LegendMarker => "legend-marker",
            ElementRole::LegendText => "legend-text",
        }
    }

    /// Legend parts are grouped together in SVG output
    pub fn is_legend(&self) -> bool {
        matches!(
            self,
            ElementRole::LegendLine | ElementRole::LegendMarker | ElementRole::LegendText
        )
    }
}

impl fmt::Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class())
    }
}

/// Line styling
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// Alternating dash and gap lengths in pixels; `None` is solid
    pub dash: Option<Vec<f64>>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f64, dash: Vec<f64>) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// Vertical placement of text relative to its anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    /// Anchor is the alphabetic baseline
    #[default]
    Baseline,
    /// Anchor is the vertical center of the line
    Middle,
    /// Anchor is the top of the line
    Top,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub bold: bool,
    pub anchor: TextAnchor,
    pub align: VerticalAlign,
    /// Read bottom to top (rotated -90 degrees)
    pub vertical: bool,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            bold: false,
            anchor: TextAnchor::Start,
            align: VerticalAlign::Baseline,
            vertical: false,
            color: Color::from_static("#000000"),
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn align(mut self, align: VerticalAlign) -> Self {
        self.align = align;
        self
    }

    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    /// Offset from the anchor point to the alphabetic baseline
    pub fn baseline_shift(&self) -> f64 {
        match self.align {
            VerticalAlign::Baseline => 0.0,
            VerticalAlign::Middle => 0.35 * self.size,
            VerticalAlign::Top => 0.8 * self.size,
        }
    }
}

/// Drawable primitive in pixel coordinates (y grows downwards)
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        from: (f64, f64),
        to: (f64, f64),
        stroke: Stroke,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        stroke: Stroke,
    },
    Marker {
        center: (f64, f64),
        shape: MarkerShape,
        size: f64,
        fill: Color,
    },
    Text {
        position: (f64, f64),
        content: String,
        style: TextStyle,
    },
}

/// A primitive tagged with its role
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub role: ElementRole,
    pub shape: Shape,
    /// Clip to the plotting area
    pub clipped: bool,
}

/// Axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    pub fn around(x: f64, y: f64, half_w: f64, half_h: f64) -> Self {
        Self::new(x - half_w, y - half_h, x + half_w, y + half_h)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn intersect(&self, other: &Bounds) -> Option<Bounds> {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x);
        let max_y = self.max_y.min(other.max_y);
        (min_x <= max_x && min_y <= max_y).then_some(Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    pub fn pad(&self, amount: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }
}

impl Shape {
    /// Approximate painted extent, including stroke width and text metrics
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Shape::Line { from, to, stroke } => {
                Some(Bounds::new(from.0, from.1, to.0, to.1).pad(stroke.width / 2.0))
            }
            Shape::Polyline { points, stroke } => {
                let (first, rest) = points.split_first()?;
                let b = rest.iter().fold(
                    Bounds::new(first.0, first.1, first.0, first.1),
                    |acc, p| acc.union(&Bounds::new(p.0, p.1, p.0, p.1)),
                );
                Some(b.pad(stroke.width / 2.0))
            }
            Shape::Marker { center, size, .. } => {
                Some(Bounds::around(center.0, center.1, size / 2.0, size / 2.0))
            }
            Shape::Text {
                position,
                content,
                style,
            } => {
                if content.is_empty() {
                    return None;
                }
                let width = text_width(content, style.size, style.bold);
                // Along the reading direction
                let (run_start, run_end) = match style.anchor {
                    TextAnchor::Start => (0.0, width),
                    TextAnchor::Middle => (-width / 2.0, width / 2.0),
                    TextAnchor::End => (-width, 0.0),
                };
                let baseline = style.baseline_shift();
                let ascent = 0.8 * style.size;
                let descent = 0.2 * style.size;
                let (x, y) = *position;
                if style.vertical {
                    // Rotated -90 degrees: text runs upwards, glyph tops face left
                    Some(Bounds::new(
                        x - ascent + baseline,
                        y - run_end,
                        x + descent + baseline,
                        y - run_start,
                    ))
                } else {
                    Some(Bounds::new(
                        x + run_start,
                        y + baseline - ascent,
                        x + run_end,
                        y + baseline + descent,
                    ))
                }
            }
        }
    }
}

/// Renderer output: ordered primitives plus the nominal canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub width: f64,
    pub height: f64,
    /// Plotting area that clipped elements are restricted to
    pub plot_area: Option<Bounds>,
    elements: Vec<Element>,
}

impl Figure {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            plot_area: None,
            elements: Vec::new(),
        }
    }

    pub fn with_plot_area(mut self, area: Bounds) -> Self {
        self.plot_area = Some(area);
        self
    }

    pub fn push(&mut self, role: ElementRole, shape: Shape) {
        self.elements.push(Element {
            role,
            shape,
            clipped: false,
        });
    }

    pub fn push_clipped(&mut self, role: ElementRole, shape: Shape) {
        self.elements.push(Element {
            role,
            shape,
            clipped: self.plot_area.is_some(),
        });
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn contains(&self, role: ElementRole) -> bool {
        self.elements.iter().any(|e| e.role == role)
    }

    pub fn count(&self, role: ElementRole) -> usize {
        self.elements.iter().filter(|e| e.role == role).count()
    }

    /// Text content of every element with the given role, in draw order
    pub fn texts(&self, role: ElementRole) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|e| e.role == role)
            .filter_map(|e| match &e.shape {
                Shape::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Union of everything that will actually be painted
    ///
    /// Falls back to the nominal canvas when the figure is empty.
    pub fn content_bounds(&self) -> Bounds {
        self.elements
            .iter()
            .filter_map(|e| {
                let b = e.shape.bounds()?;
                match (e.clipped, &self.plot_area) {
                    (true, Some(area)) => b.intersect(area),
                    _ => Some(b),
                }
            })
            .reduce(|a, b| a.union(&b))
            .unwrap_or(Bounds::new(0.0, 0.0, self.width, self.height))
    }
}
