//! Figure export
//!
//! SVG is the writer's output as-is. PNG goes through the same SVG, parsed with
//! `usvg` and rasterized by `resvg` onto a transparent pixmap.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, span, Level};

use super::pipeline::Pipeline;
use super::scene::Figure;
use super::svg::SvgWriter;
use super::Graph;
use crate::core::{GraphError, Result};

/// Raster scale relative to the 100 px/in figure (200 dpi output)
pub const PNG_SCALE: f32 = 2.0;

/// File name suffix of the standalone legend
pub const LEGEND_SUFFIX: &str = "_legend";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Png, ExportFormat::Svg];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Something that turns a figure into file bytes
pub trait Exporter {
    fn format(&self) -> ExportFormat;
    fn export(&self, figure: &Figure) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Default)]
pub struct SvgExporter {
    writer: SvgWriter,
}

impl Exporter for SvgExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Svg
    }

    fn export(&self, figure: &Figure) -> Result<Vec<u8>> {
        Ok(self.writer.write(figure).into_bytes())
    }
}

#[derive(Debug, Clone)]
pub struct PngExporter {
    writer: SvgWriter,
    scale: f32,
}

impl PngExporter {
    pub fn new(scale: f32) -> Self {
        Self {
            writer: SvgWriter::default(),
            scale,
        }
    }
}

impl Default for PngExporter {
    fn default() -> Self {
        Self::new(PNG_SCALE)
    }
}

impl Exporter for PngExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Png
    }

    fn export(&self, figure: &Figure) -> Result<Vec<u8>> {
        svg_to_png(&self.writer.write(figure), self.scale)
    }
}

/// Encode a figure in one format
pub fn export(figure: &Figure, format: ExportFormat) -> Result<Vec<u8>> {
    let export_span = span!(Level::DEBUG, "export_figure", %format);
    let _enter = export_span.enter();

    let bytes = match format {
        ExportFormat::Svg => SvgExporter::default().export(figure)?,
        ExportFormat::Png => PngExporter::default().export(figure)?,
    };
    debug!(bytes = bytes.len(), "Figure exported");
    Ok(bytes)
}

/// Rasterize an SVG document onto a transparent pixmap
pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "DejaVu Sans".to_string();

    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| GraphError::export_error(format!("SVG parse failed: {e}")))?;

    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or_else(|| {
        GraphError::export_error(format!("cannot allocate {width_px}x{height_px} pixmap"))
    })?;

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    pixmap
        .encode_png()
        .map_err(|e| GraphError::export_error(format!("PNG encoding failed: {e}")))
}

/// Download name for a graph title: spaces and path separators become `_`
///
/// # Example
/// ```
/// use scdgraph::graph::{file_name, ExportFormat};
///
/// assert_eq!(file_name("My Graph", "", ExportFormat::Png), "My_Graph.png");
/// assert_eq!(file_name("My Graph", "_legend", ExportFormat::Svg), "My_Graph_legend.svg");
/// ```
pub fn file_name(title: &str, suffix: &str, format: ExportFormat) -> String {
    let stem: String = title
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    format!("{stem}{suffix}.{}", format.extension())
}

/// Which figure an artifact holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Graph,
    Legend,
}

/// One exported file
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub formats: Vec<ExportFormat>,
    /// Also export the legend on its own; requires the graph to allow it
    pub legend_files: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            formats: ExportFormat::ALL.to_vec(),
            legend_files: true,
        }
    }
}

/// Render and encode a graph and, optionally, its legend
pub fn export_graph(graph: &Graph, options: &ExportOptions) -> Result<Vec<ExportArtifact>> {
    export_with(&Pipeline::new(), graph, options)
}

/// [`export_graph`] with a caller-supplied pipeline
pub fn export_with(
    pipeline: &Pipeline,
    graph: &Graph,
    options: &ExportOptions,
) -> Result<Vec<ExportArtifact>> {
    let export_span = span!(
        Level::INFO,
        "export_graph",
        title = %graph.config().title,
        formats = options.formats.len()
    );
    let _enter = export_span.enter();

    let rendered = pipeline.run(graph)?;
    let title = &graph.config().title;

    let mut artifacts = Vec::new();
    for &format in &options.formats {
        artifacts.push(ExportArtifact {
            file_name: file_name(title, "", format),
            format,
            kind: ArtifactKind::Graph,
            bytes: export(&rendered.figure, format)?,
        });
    }

    if options.legend_files && graph.config().visibility.legend_files {
        if let Some(legend) = &rendered.legend {
            for &format in &options.formats {
                artifacts.push(ExportArtifact {
                    file_name: file_name(title, LEGEND_SUFFIX, format),
                    format,
                    kind: ArtifactKind::Legend,
                    bytes: export(legend, format)?,
                });
            }
        }
    }

    info!(artifacts = artifacts.len(), "Graph exported");
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GraphConfig;
    use crate::graph::GraphBuilder;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn graph() -> Graph {
        GraphBuilder::new()
            .config(GraphConfig {
                title: "Reading Fluency".to_string(),
                ..GraphConfig::default()
            })
            .phase("A")
            .measure("Words", "10 12 11")
            .phase("B")
            .measure("Words", "20 25")
            .build()
            .unwrap()
    }

    fn names(artifacts: &[ExportArtifact]) -> Vec<&str> {
        artifacts.iter().map(|a| a.file_name.as_str()).collect()
    }

    #[test]
    fn test_file_name_replaces_separators() {
        assert_eq!(
            file_name("Tier 1/Reading", "", ExportFormat::Svg),
            "Tier_1_Reading.svg"
        );
        assert_eq!(
            file_name("Single-Case Design Graph", LEGEND_SUFFIX, ExportFormat::Png),
            "Single-Case_Design_Graph_legend.png"
        );
    }

    #[test]
    fn test_export_graph_with_legend_files() {
        let artifacts = export_graph(&graph(), &ExportOptions::default()).unwrap();
        assert_eq!(
            names(&artifacts),
            vec![
                "Reading_Fluency.png",
                "Reading_Fluency.svg",
                "Reading_Fluency_legend.png",
                "Reading_Fluency_legend.svg",
            ]
        );
        for artifact in artifacts.iter().filter(|a| a.format == ExportFormat::Png) {
            assert!(artifact.bytes.starts_with(PNG_SIGNATURE));
        }
        for artifact in artifacts.iter().filter(|a| a.format == ExportFormat::Svg) {
            assert!(artifact.bytes.starts_with(b"<svg"));
        }
    }

    #[test]
    fn test_legend_files_can_be_turned_off() {
        let options = ExportOptions {
            formats: vec![ExportFormat::Svg],
            legend_files: false,
        };
        let artifacts = export_graph(&graph(), &options).unwrap();
        assert_eq!(names(&artifacts), vec!["Reading_Fluency.svg"]);

        let mut config = graph().config().clone();
        config.visibility.legend_files = false;
        let graph = graph().with_config(config).unwrap();
        let artifacts = export_graph(&graph, &ExportOptions::default()).unwrap();
        assert!(artifacts.iter().all(|a| a.kind == ArtifactKind::Graph));
    }

    #[test]
    fn test_no_legend_files_without_data() {
        let graph = GraphBuilder::new()
            .phase("A")
            .measure("m", "")
            .build()
            .unwrap();
        let artifacts = export_graph(&graph, &ExportOptions::default()).unwrap();
        assert_eq!(artifacts.len(), 2);
    }

    #[test]
    fn test_svg_to_png_signature() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"><line x1="0" y1="5" x2="10" y2="5" stroke="black"/></svg>"#;
        let bytes = svg_to_png(svg, 1.0).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_bad_svg_is_export_error() {
        let err = svg_to_png("not svg", 1.0).unwrap_err();
        assert!(matches!(err, GraphError::Export { .. }));
    }

    #[test]
    fn test_svg_export_is_deterministic() {
        let a = export_graph(&graph(), &ExportOptions::default()).unwrap();
        let b = export_graph(&graph(), &ExportOptions::default()).unwrap();
        assert_eq!(a[1].bytes, b[1].bytes);
    }
}
