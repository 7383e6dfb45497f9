//! Figure rendering
//!
//! Turns a [`Graph`] and its [`LayoutResult`] into a [`Figure`] in pixel
//! space. The axes occupy a fixed fraction of the canvas (see
//! [`PlotMargins`](crate::core::PlotMargins)), so stacked tiers of a
//! multiple-baseline design line up exactly.
//!
//! Sizes are given in points and converted at 100 pixels per inch.

use tracing::{debug, info, span, Level};

use super::layout::{AxisBounds, LayoutResult};
use super::scene::{
    Bounds, ElementRole, Figure, Shape, Stroke, TextAnchor, TextStyle, VerticalAlign,
};
use super::Graph;
use crate::core::{
    format_tick, line_height, marker_for, text_width, Color, GraphConfig, GraphError,
    LegendPlacement, MarkerShape, Palette, Result,
};

/// Pixels per typographic point
pub const PT: f64 = 100.0 / 72.0;

/// Depth of the stair-step drop below the x-axis, as a fraction of axes height
const STAIR_DROP: f64 = 0.06;

/// Size of the standalone legend figure
const LEGEND_FIGURE_WIDTH: f64 = 400.0;
const LEGEND_ROW_HEIGHT: f64 = 45.0;
const LEGEND_MIN_HEIGHT: f64 = 100.0;

/// Stroke widths, font sizes and spacing, all in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub font_size: f64,
    pub title_size: f64,
    pub phase_title_size: f64,
    pub series_line_width: f64,
    pub marker_size: f64,
    pub boundary_width: f64,
    pub boundary_dash: Vec<f64>,
    pub stair_step_width: f64,
    pub stair_step_dash: Vec<f64>,
    pub axis_width: f64,
    pub tick_length: f64,
    pub tick_pad: f64,
    pub x_label_pad: f64,
    pub y_label_pad: f64,
    pub title_pad: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0 * PT,
            title_size: 13.0 * PT,
            phase_title_size: 10.0 * PT,
            series_line_width: 2.0 * PT,
            marker_size: 6.0 * PT,
            boundary_width: 1.5 * PT,
            boundary_dash: dashed(1.5),
            stair_step_width: 1.8 * PT,
            stair_step_dash: dashed(1.8),
            axis_width: 0.8 * PT,
            tick_length: 3.5 * PT,
            tick_pad: 3.5 * PT,
            x_label_pad: 4.0 * PT,
            y_label_pad: 4.0 * PT,
            title_pad: 20.0 * PT,
        }
    }
}

/// Standard dash pattern scaled to a line width given in points
fn dashed(width_pt: f64) -> Vec<f64> {
    vec![3.7 * width_pt * PT, 1.6 * width_pt * PT]
}

/// One row of the legend
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub marker: MarkerShape,
}

/// Maps data coordinates onto the axes rectangle
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    bounds: AxisBounds,
}

impl Frame {
    fn new(config: &GraphConfig, bounds: AxisBounds) -> Result<Self> {
        let (w, h) = (config.canvas.width, config.canvas.height);
        let m = &config.margins;
        let frame = Self {
            left: w * m.left,
            right: w * m.right,
            top: h * (1.0 - m.top),
            bottom: h * (1.0 - m.bottom),
            bounds,
        };
        if frame.width() <= 0.0
            || frame.height() <= 0.0
            || bounds.x_max <= bounds.x_min
            || bounds.y_max <= bounds.y_min
        {
            return Err(GraphError::invalid_config("plot area is empty"));
        }
        Ok(frame)
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn height(&self) -> f64 {
        self.bottom - self.top
    }

    fn x(&self, value: f64) -> f64 {
        let b = &self.bounds;
        self.left + (value - b.x_min) / (b.x_max - b.x_min) * self.width()
    }

    fn y(&self, value: f64) -> f64 {
        let b = &self.bounds;
        self.bottom - (value - b.y_min) / (b.y_max - b.y_min) * self.height()
    }

    fn center(&self) -> (f64, f64) {
        ((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    fn area(&self) -> Bounds {
        Bounds::new(self.left, self.top, self.right, self.bottom)
    }
}

/// Where the legend box is anchored
#[derive(Debug, Clone, Copy)]
enum LegendAnchor {
    /// Left edge and vertical center
    CenterLeft(f64, f64),
    /// Top-left corner
    UpperLeft(f64, f64),
    Center(f64, f64),
}

/// Draws graphs into figures
#[derive(Debug, Clone, Default)]
pub struct GraphRenderer {
    style: RenderStyle,
}

impl GraphRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Render the main figure
    pub fn render(&self, graph: &Graph, layout: &LayoutResult) -> Result<Figure> {
        let render_span = span!(
            Level::INFO,
            "render_graph",
            phase_count = graph.phases().len(),
            boundaries = layout.boundaries.len()
        );
        let _enter = render_span.enter();

        let config = graph.config();
        let frame = Frame::new(config, layout.bounds)?;
        let mut figure =
            Figure::new(config.canvas.width, config.canvas.height).with_plot_area(frame.area());

        let label_width = self.draw_y_axis(&mut figure, &frame, layout);
        let x_axis_depth = self.draw_x_axis(&mut figure, &frame, layout, config);
        self.draw_series(&mut figure, &frame, graph, layout)?;
        self.draw_boundaries(&mut figure, &frame, layout);
        if config.visibility.phase_titles {
            self.draw_phase_titles(&mut figure, &frame, graph, layout);
        }
        self.draw_axis_labels(&mut figure, &frame, config, label_width, x_axis_depth);
        if config.visibility.title && !config.title.is_empty() {
            let (cx, _) = frame.center();
            figure.push(
                ElementRole::Title,
                Shape::Text {
                    position: (cx, frame.top - self.style.title_pad),
                    content: config.title.clone(),
                    style: TextStyle::new(self.style.title_size).anchor(TextAnchor::Middle),
                },
            );
        }

        let entries = legend_entries(graph);
        if config.visibility.legend && !entries.is_empty() {
            let anchor = match config.legend_placement {
                LegendPlacement::OutsideRight => {
                    LegendAnchor::CenterLeft(frame.right + 0.02 * frame.width(), frame.center().1)
                }
                LegendPlacement::UpperLeft => {
                    let inset = 0.5 * self.style.font_size;
                    LegendAnchor::UpperLeft(frame.left + inset, frame.top + inset)
                }
            };
            self.draw_legend(&mut figure, &entries, anchor);
        }

        info!(
            elements = figure.elements().len(),
            legend_entries = entries.len(),
            "Graph rendered"
        );
        Ok(figure)
    }

    /// Render the legend on its own, independent of the main figure
    ///
    /// Returns `None` when nothing was plotted.
    pub fn render_legend(&self, graph: &Graph) -> Option<Figure> {
        let entries = legend_entries(graph);
        if entries.is_empty() {
            return None;
        }
        let height = (LEGEND_ROW_HEIGHT * entries.len() as f64).max(LEGEND_MIN_HEIGHT);
        let mut figure = Figure::new(LEGEND_FIGURE_WIDTH, height);
        self.draw_legend(
            &mut figure,
            &entries,
            LegendAnchor::Center(LEGEND_FIGURE_WIDTH / 2.0, height / 2.0),
        );
        debug!(entries = entries.len(), "Legend rendered");
        Some(figure)
    }

    fn axis_stroke(&self) -> Stroke {
        Stroke::solid(black(), self.style.axis_width)
    }

    /// Left spine, y ticks and labels; returns the widest label
    fn draw_y_axis(&self, figure: &mut Figure, frame: &Frame, layout: &LayoutResult) -> f64 {
        let s = &self.style;
        figure.push(
            ElementRole::YAxisLine,
            Shape::Line {
                from: (frame.left, frame.bottom),
                to: (frame.left, frame.top),
                stroke: self.axis_stroke(),
            },
        );

        let mut widest: f64 = 0.0;
        for &tick in &layout.y_ticks {
            let y = frame.y(tick);
            figure.push(
                ElementRole::YTick,
                Shape::Line {
                    from: (frame.left - s.tick_length, y),
                    to: (frame.left, y),
                    stroke: self.axis_stroke(),
                },
            );
            let label = format_tick(tick);
            widest = widest.max(text_width(&label, s.font_size, false));
            figure.push(
                ElementRole::YTickLabel,
                Shape::Text {
                    position: (frame.left - s.tick_length - s.tick_pad, y),
                    content: label,
                    style: TextStyle::new(s.font_size)
                        .anchor(TextAnchor::End)
                        .align(VerticalAlign::Middle),
                },
            );
        }
        widest
    }

    /// Bottom spine, x ticks and labels; returns how far below the axes they reach
    fn draw_x_axis(
        &self,
        figure: &mut Figure,
        frame: &Frame,
        layout: &LayoutResult,
        config: &GraphConfig,
    ) -> f64 {
        let s = &self.style;
        let visibility = &config.visibility;
        if visibility.x_axis_line {
            figure.push(
                ElementRole::XAxisLine,
                Shape::Line {
                    from: (frame.left, frame.bottom),
                    to: (frame.right, frame.bottom),
                    stroke: self.axis_stroke(),
                },
            );
        }

        let mut depth: f64 = 0.0;
        for &tick in &layout.x_ticks {
            let x = frame.x(tick);
            if visibility.x_ticks {
                figure.push(
                    ElementRole::XTick,
                    Shape::Line {
                        from: (x, frame.bottom),
                        to: (x, frame.bottom + s.tick_length),
                        stroke: self.axis_stroke(),
                    },
                );
                depth = depth.max(s.tick_length);
            }
            if visibility.x_tick_labels {
                let top = s.tick_length + s.tick_pad;
                figure.push(
                    ElementRole::XTickLabel,
                    Shape::Text {
                        position: (x, frame.bottom + top),
                        content: format_tick(tick),
                        style: TextStyle::new(s.font_size)
                            .anchor(TextAnchor::Middle)
                            .align(VerticalAlign::Top),
                    },
                );
                depth = depth.max(top + s.font_size);
            }
        }
        depth
    }

    fn draw_series(
        &self,
        figure: &mut Figure,
        frame: &Frame,
        graph: &Graph,
        layout: &LayoutResult,
    ) -> Result<()> {
        let palette = Palette::new(&graph.config().color_mode);
        for (plot_index, plotted) in graph.plotted_measures().enumerate() {
            let placement = layout.phase(plotted.phase_index).ok_or_else(|| {
                GraphError::invalid_config(format!(
                    "layout has no placement for phase {}",
                    plotted.phase_index
                ))
            })?;
            let color = palette.color(plot_index);
            let marker = marker_for(plotted.phase_index, plotted.measure_index);

            let points: Vec<Option<(f64, f64)>> = plotted
                .measure
                .values
                .iter()
                .enumerate()
                .map(|(offset, value)| {
                    value.map(|v| (frame.x(placement.x_at(offset)), frame.y(v)))
                })
                .collect();

            // Missing values split the line into separate runs
            for run in points.split(Option::is_none) {
                let run: Vec<(f64, f64)> = run.iter().flatten().copied().collect();
                if run.len() >= 2 {
                    figure.push_clipped(
                        ElementRole::SeriesLine,
                        Shape::Polyline {
                            points: run,
                            stroke: Stroke::solid(color.clone(), self.style.series_line_width),
                        },
                    );
                }
            }
            for center in points.iter().flatten() {
                figure.push_clipped(
                    ElementRole::SeriesMarker,
                    Shape::Marker {
                        center: *center,
                        shape: marker,
                        size: self.style.marker_size,
                        fill: color.clone(),
                    },
                );
            }

            debug!(
                measure = %plotted.measure.name,
                phase = plotted.phase_index,
                color = %color,
                %marker,
                "Series drawn"
            );
        }
        Ok(())
    }

    fn draw_boundaries(&self, figure: &mut Figure, frame: &Frame, layout: &LayoutResult) {
        let s = &self.style;
        for boundary in &layout.boundaries {
            let x = frame.x(boundary.x);
            figure.push(
                ElementRole::PhaseBoundary,
                Shape::Line {
                    from: (x, frame.bottom),
                    to: (x, frame.top),
                    stroke: Stroke::dashed(black(), s.boundary_width, s.boundary_dash.clone()),
                },
            );

            if let Some(run) = boundary.stair_step {
                let drop_y = frame.bottom + STAIR_DROP * frame.height();
                let stroke =
                    Stroke::dashed(black(), s.stair_step_width, s.stair_step_dash.clone());
                figure.push(
                    ElementRole::StairStep,
                    Shape::Line {
                        from: (x, frame.bottom),
                        to: (x, drop_y),
                        stroke: stroke.clone(),
                    },
                );
                figure.push(
                    ElementRole::StairStep,
                    Shape::Line {
                        from: (x, drop_y),
                        to: (frame.x(boundary.x + run), drop_y),
                        stroke,
                    },
                );
            }
        }
    }

    fn draw_phase_titles(
        &self,
        figure: &mut Figure,
        frame: &Frame,
        graph: &Graph,
        layout: &LayoutResult,
    ) {
        let size = self.style.phase_title_size;
        let y = frame.y(graph.config().phase_title_y());
        for (phase, placement) in graph.phases().iter().zip(&layout.phases) {
            if placement.is_empty() {
                continue;
            }
            // Bottom of the text sits on the title line
            figure.push(
                ElementRole::PhaseTitle,
                Shape::Text {
                    position: (frame.x(placement.start_x as f64), y - 0.2 * size),
                    content: phase.title.clone(),
                    style: TextStyle::new(size).bold(),
                },
            );
        }
    }

    fn draw_axis_labels(
        &self,
        figure: &mut Figure,
        frame: &Frame,
        config: &GraphConfig,
        y_tick_label_width: f64,
        x_axis_depth: f64,
    ) {
        let s = &self.style;
        let (cx, cy) = frame.center();

        if !config.y_label.is_empty() {
            let y_label_x =
                frame.left - s.tick_length - s.tick_pad - y_tick_label_width - s.y_label_pad;
            figure.push(
                ElementRole::YLabel,
                Shape::Text {
                    position: (y_label_x, cy),
                    content: config.y_label.clone(),
                    style: TextStyle::new(s.font_size)
                        .anchor(TextAnchor::Middle)
                        .vertical(),
                },
            );
        }

        if config.visibility.x_label && !config.x_label.is_empty() {
            figure.push(
                ElementRole::XLabel,
                Shape::Text {
                    position: (cx, frame.bottom + x_axis_depth + s.x_label_pad),
                    content: config.x_label.clone(),
                    style: TextStyle::new(s.font_size)
                        .anchor(TextAnchor::Middle)
                        .align(VerticalAlign::Top),
                },
            );
        }
    }

    /// Stacked entries: line sample with a marker in the middle, then the name
    fn draw_legend(&self, figure: &mut Figure, entries: &[LegendEntry], anchor: LegendAnchor) {
        let s = &self.style;
        let font = s.font_size;
        let row = line_height(font);
        let spacing = 0.5 * font;
        let handle = 2.0 * font;
        let text_pad = 0.8 * font;
        let border = 0.4 * font;

        let text_w = entries
            .iter()
            .map(|e| text_width(&e.label, font, false))
            .fold(0.0, f64::max);
        let width = 2.0 * border + handle + text_pad + text_w;
        let count = entries.len() as f64;
        let height = 2.0 * border + count * row + (count - 1.0).max(0.0) * spacing;

        let (x0, y0) = match anchor {
            LegendAnchor::CenterLeft(x, cy) => (x, cy - height / 2.0),
            LegendAnchor::UpperLeft(x, y) => (x, y),
            LegendAnchor::Center(cx, cy) => (cx - width / 2.0, cy - height / 2.0),
        };

        for (i, entry) in entries.iter().enumerate() {
            let cy = y0 + border + i as f64 * (row + spacing) + row / 2.0;
            let hx = x0 + border;
            figure.push(
                ElementRole::LegendLine,
                Shape::Line {
                    from: (hx, cy),
                    to: (hx + handle, cy),
                    stroke: Stroke::solid(entry.color.clone(), s.series_line_width),
                },
            );
            figure.push(
                ElementRole::LegendMarker,
                Shape::Marker {
                    center: (hx + handle / 2.0, cy),
                    shape: entry.marker,
                    size: s.marker_size,
                    fill: entry.color.clone(),
                },
            );
            figure.push(
                ElementRole::LegendText,
                Shape::Text {
                    position: (hx + handle + text_pad, cy),
                    content: entry.label.clone(),
                    style: TextStyle::new(font).align(VerticalAlign::Middle),
                },
            );
        }
    }
}

/// One entry per plotted measure, in plot order
pub fn legend_entries(graph: &Graph) -> Vec<LegendEntry> {
    let palette = Palette::new(&graph.config().color_mode);
    graph
        .plotted_measures()
        .enumerate()
        .map(|(plot_index, plotted)| LegendEntry {
            label: plotted.measure.name.clone(),
            color: palette.color(plot_index),
            marker: marker_for(plotted.phase_index, plotted.measure_index),
        })
        .collect()
}

fn black() -> Color {
    Color::from_static("#000000")
}
