//! SVG output
//!
//! Serializes a [`Figure`] to a standalone SVG document. The viewBox is the
//! painted content plus a small pad, and no background is drawn, so the result
//! is tightly cropped and transparent.

use std::fmt::Write;

use super::scene::{Element, ElementRole, Figure, Shape, Stroke, TextAnchor};
use crate::core::MarkerShape;

/// Font stack used for every text element
pub const FONT_FAMILY: &str = "Calibri, 'DejaVu Sans', Arial, sans-serif";

/// Space kept around the content bounding box, in pixels
pub const TIGHT_PAD: f64 = 10.0;

const CLIP_ID: &str = "plot-area";

#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    pub padding: f64,
    pub font_family: String,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            padding: TIGHT_PAD,
            font_family: FONT_FAMILY.to_string(),
        }
    }
}

/// Open `<g>` wrapper while streaming elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Clip,
    Legend,
}

#[derive(Debug, Clone, Default)]
pub struct SvgWriter {
    options: SvgOptions,
}

impl SvgWriter {
    pub fn new(options: SvgOptions) -> Self {
        Self { options }
    }

    pub fn write(&self, figure: &Figure) -> String {
        let bounds = figure.content_bounds().pad(self.options.padding);
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}" font-family="{}">"#,
            fmt(bounds.width()),
            fmt(bounds.height()),
            fmt(bounds.min_x),
            fmt(bounds.min_y),
            fmt(bounds.width()),
            fmt(bounds.height()),
            escape_xml(&self.options.font_family),
        );
        out.push('\n');

        if let Some(area) = figure.plot_area {
            if figure.elements().iter().any(|e| e.clipped) {
                let _ = writeln!(
                    out,
                    r#"<defs><clipPath id="{CLIP_ID}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
                    fmt(area.min_x),
                    fmt(area.min_y),
                    fmt(area.width()),
                    fmt(area.height()),
                );
            }
        }

        let mut open: Option<Group> = None;
        for element in figure.elements() {
            let wanted = if element.clipped {
                Some(Group::Clip)
            } else if element.role.is_legend() {
                Some(Group::Legend)
            } else {
                None
            };
            // Each legend entry starts with its line sample
            let restart = wanted == Some(Group::Legend) && element.role == ElementRole::LegendLine;
            if open != wanted || restart {
                if open.is_some() {
                    out.push_str("</g>\n");
                }
                match wanted {
                    Some(Group::Clip) => {
                        let _ = writeln!(out, r#"<g clip-path="url(#{CLIP_ID})">"#);
                    }
                    Some(Group::Legend) => out.push_str("<g class=\"legend-entry\">\n"),
                    None => {}
                }
                open = wanted;
            }
            write_element(&mut out, element);
        }
        if open.is_some() {
            out.push_str("</g>\n");
        }

        out.push_str("</svg>\n");
        out
    }
}

/// Serialize with default options
pub fn render_svg(figure: &Figure) -> String {
    SvgWriter::default().write(figure)
}

fn write_element(out: &mut String, element: &Element) {
    let class = element.role.class();
    match &element.shape {
        Shape::Line { from, to, stroke } => {
            let _ = write!(
                out,
                r#"<line class="{class}" x1="{}" y1="{}" x2="{}" y2="{}""#,
                fmt(from.0),
                fmt(from.1),
                fmt(to.0),
                fmt(to.1),
            );
            write_stroke(out, stroke);
            out.push_str("/>\n");
        }
        Shape::Polyline { points, stroke } => {
            let points = points
                .iter()
                .map(|(x, y)| format!("{},{}", fmt(*x), fmt(*y)))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(
                out,
                r#"<polyline class="{class}" points="{points}" fill="none" stroke-linejoin="round""#
            );
            write_stroke(out, stroke);
            out.push_str("/>\n");
        }
        Shape::Marker {
            center,
            shape,
            size,
            fill,
        } => {
            let (cx, cy) = *center;
            let h = size / 2.0;
            match shape {
                MarkerShape::Circle => {
                    let _ = write!(
                        out,
                        r#"<circle class="{class}" cx="{}" cy="{}" r="{}""#,
                        fmt(cx),
                        fmt(cy),
                        fmt(h),
                    );
                }
                MarkerShape::Square => {
                    let _ = write!(
                        out,
                        r#"<rect class="{class}" x="{}" y="{}" width="{}" height="{}""#,
                        fmt(cx - h),
                        fmt(cy - h),
                        fmt(*size),
                        fmt(*size),
                    );
                }
                _ => {
                    let _ = write!(
                        out,
                        r#"<polygon class="{class}" points="{}""#,
                        polygon_points(*shape, cx, cy, h)
                    );
                }
            }
            let _ = write!(out, r#" fill="{fill}"/>"#);
            out.push('\n');
        }
        Shape::Text {
            position,
            content,
            style,
        } => {
            let (x, y) = *position;
            let shift = style.baseline_shift();
            let _ = write!(
                out,
                r#"<text class="{class}" x="{}" y="{}" font-size="{}""#,
                fmt(x),
                fmt(y + shift),
                fmt(style.size),
            );
            if style.bold {
                out.push_str(r#" font-weight="bold""#);
            }
            match style.anchor {
                TextAnchor::Start => {}
                TextAnchor::Middle => out.push_str(r#" text-anchor="middle""#),
                TextAnchor::End => out.push_str(r#" text-anchor="end""#),
            }
            if style.vertical {
                let _ = write!(out, r#" transform="rotate(-90 {} {})""#, fmt(x), fmt(y));
            }
            let _ = writeln!(out, r#" fill="{}">{}</text>"#, style.color, escape_xml(content));
        }
    }
}

fn write_stroke(out: &mut String, stroke: &Stroke) {
    let _ = write!(
        out,
        r#" stroke="{}" stroke-width="{}""#,
        stroke.color,
        fmt(stroke.width)
    );
    if let Some(dash) = &stroke.dash {
        let dash = dash.iter().map(|d| fmt(*d)).collect::<Vec<_>>().join(" ");
        let _ = write!(out, r#" stroke-dasharray="{dash}""#);
    }
}

/// Outline of the polygonal markers, `h` being half the marker size
fn polygon_points(shape: MarkerShape, cx: f64, cy: f64, h: f64) -> String {
    let offsets: Vec<(f64, f64)> = match shape {
        MarkerShape::Diamond => vec![(0.0, -h), (h, 0.0), (0.0, h), (-h, 0.0)],
        MarkerShape::TriangleUp => vec![(0.0, -h), (h, h), (-h, h)],
        MarkerShape::TriangleDown => vec![(-h, -h), (h, -h), (0.0, h)],
        MarkerShape::Plus => {
            let t = h / 3.0;
            vec![
                (-t, -h),
                (t, -h),
                (t, -t),
                (h, -t),
                (h, t),
                (t, t),
                (t, h),
                (-t, h),
                (-t, t),
                (-h, t),
                (-h, -t),
                (-t, -t),
            ]
        }
        MarkerShape::Circle | MarkerShape::Square => {
            vec![(-h, -h), (h, -h), (h, h), (-h, h)]
        }
    };
    offsets
        .iter()
        .map(|(dx, dy)| format!("{},{}", fmt(cx + dx), fmt(cy + dy)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stable attribute number: three decimals at most, no trailing zeros, no `-0`
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }
    let mut s = format!("{:.3}", v);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
