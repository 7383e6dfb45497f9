//! Static A-B example
//!
//! A fixed two-phase graph with baked-in data, handy as a reference figure and
//! for checking that a local setup renders correctly.

use std::path::Path;

use tracing::info;

use super::renderer::{GraphRenderer, RenderStyle, PT};
use super::{Graph, GraphBuilder, Pipeline};
use crate::core::{CanvasSize, GraphConfig, LegendPlacement, PlotMargins, Result};

/// Default output file of the example
pub const EXAMPLE_FILE_NAME: &str = "ab_graph.svg";

pub const BASELINE: [f64; 5] = [40.0, 42.0, 39.0, 41.0, 43.0];
pub const INTERVENTION: [f64; 6] = [55.0, 60.0, 65.0, 68.0, 70.0, 74.0];

pub fn example_config() -> GraphConfig {
    let mut config = GraphConfig {
        title: String::new(),
        y_label: "% correct responses".to_string(),
        x_label: "Sessions".to_string(),
        y_min: 0.0,
        y_max: 100.0,
        y_tick: 10.0,
        x_tick: 1.0,
        y_headroom: 0.0,
        canvas: CanvasSize {
            width: 800.0,
            height: 500.0,
        },
        margins: PlotMargins {
            left: 0.12,
            right: 0.97,
            bottom: 0.13,
            top: 0.97,
        },
        legend_placement: LegendPlacement::UpperLeft,
        ..GraphConfig::default()
    };
    config.visibility.title = false;
    config.visibility.phase_titles = false;
    config.visibility.legend_files = false;
    config
}

/// Longer ticks and label pads, and an even dash on the phase line
pub fn example_style() -> RenderStyle {
    RenderStyle {
        tick_length: 6.0 * PT,
        tick_pad: 6.0 * PT,
        x_label_pad: 12.0 * PT,
        y_label_pad: 20.0 * PT,
        boundary_dash: vec![7.5 * PT, 7.5 * PT],
        ..RenderStyle::default()
    }
}

pub fn example_graph() -> Result<Graph> {
    GraphBuilder::new()
        .config(example_config())
        .phase("Baseline (A)")
        .measure_values("Baseline (A)", BASELINE.iter().copied().map(Some).collect())
        .phase("Intervention (B)")
        .measure_values(
            "Intervention (B)",
            INTERVENTION.iter().copied().map(Some).collect(),
        )
        .build()
}

/// The example figure as SVG text
pub fn render_example_svg() -> Result<String> {
    let graph = example_graph()?;
    Pipeline::with_renderer(GraphRenderer::with_style(example_style())).run_svg(&graph)
}

/// Write the example SVG to `path`
pub fn write_example(path: &Path) -> Result<()> {
    let svg = render_example_svg()?;
    std::fs::write(path, svg)?;
    info!(path = %path.display(), "Example written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ElementRole, PhaseLayoutAlgorithm};

    fn figure() -> crate::graph::Figure {
        let graph = example_graph().unwrap();
        let layout = PhaseLayoutAlgorithm::new().layout(&graph).unwrap();
        GraphRenderer::with_style(example_style())
            .render(&graph, &layout)
            .unwrap()
    }

    #[test]
    fn test_example_layout() {
        let graph = example_graph().unwrap();
        let layout = PhaseLayoutAlgorithm::new().layout(&graph).unwrap();
        assert_eq!(layout.boundaries.len(), 1);
        assert_eq!(layout.boundaries[0].x, 5.5);
        assert_eq!(layout.bounds.x_max, 11.5);
        assert_eq!(layout.bounds.y_max, 100.0);
        assert_eq!(layout.x_ticks.len(), 11);
    }

    #[test]
    fn test_example_figure_content() {
        let figure = figure();
        assert!(!figure.contains(ElementRole::Title));
        assert!(!figure.contains(ElementRole::PhaseTitle));
        assert_eq!(
            figure.texts(ElementRole::LegendText),
            vec!["Baseline (A)", "Intervention (B)"]
        );
        assert_eq!(figure.texts(ElementRole::XLabel), vec!["Sessions"]);
        assert_eq!(figure.count(ElementRole::SeriesMarker), 11);
    }

    #[test]
    fn test_example_svg_colors() {
        let svg = render_example_svg().unwrap();
        assert!(svg.contains("#1f77b4"));
        assert!(svg.contains("#ff7f0e"));
        assert!(svg.contains(r#"class="phase-boundary""#));
    }

    #[test]
    fn test_write_example() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXAMPLE_FILE_NAME);
        write_example(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<svg"));
    }
}
