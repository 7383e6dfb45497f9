//! Render pipeline
//!
//! Wires the layout engine and renderer together so callers can go from a
//! [`Graph`] to finished figures in one call:
//! Graph → Layout → Figure (+ legend figure)

use tracing::{debug, info, span, Level};

use super::layout::{LayoutResult, PhaseLayoutAlgorithm};
use super::renderer::GraphRenderer;
use super::scene::Figure;
use super::svg::render_svg;
use super::Graph;
use crate::core::Result;

/// Everything produced for one graph
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGraph {
    pub layout: LayoutResult,
    pub figure: Figure,
    /// Standalone legend; `None` when nothing was plotted
    pub legend: Option<Figure>,
}

/// Coordinates layout and rendering
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    layout: PhaseLayoutAlgorithm,
    renderer: GraphRenderer,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a renderer with custom styling
    pub fn with_renderer(renderer: GraphRenderer) -> Self {
        Self {
            layout: PhaseLayoutAlgorithm::new(),
            renderer,
        }
    }

    pub fn renderer(&self) -> &GraphRenderer {
        &self.renderer
    }

    /// Lay out and render the main figure and the standalone legend
    pub fn run(&self, graph: &Graph) -> Result<RenderedGraph> {
        let pipeline_span = span!(
            Level::INFO,
            "render_pipeline",
            phase_count = graph.phases().len()
        );
        let _enter = pipeline_span.enter();

        let layout = self.layout.layout(graph)?;
        debug!(x_max = layout.bounds.x_max, "Layout stage done");

        let figure = self.renderer.render(graph, &layout)?;
        let legend = self.renderer.render_legend(graph);

        info!(
            elements = figure.elements().len(),
            has_legend = legend.is_some(),
            "Pipeline completed"
        );
        Ok(RenderedGraph {
            layout,
            figure,
            legend,
        })
    }

    /// Shortcut for the main figure as SVG text
    pub fn run_svg(&self, graph: &Graph) -> Result<String> {
        let rendered = self.run(graph)?;
        Ok(render_svg(&rendered.figure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ElementRole, GraphBuilder};

    #[test]
    fn test_run_produces_both_figures() {
        let graph = GraphBuilder::new()
            .phase("A")
            .measure("m", "1 2 3")
            .build()
            .unwrap();
        let rendered = Pipeline::new().run(&graph).unwrap();
        assert_eq!(rendered.layout.phases.len(), 1);
        assert!(rendered.figure.contains(ElementRole::SeriesLine));
        assert!(rendered.legend.is_some());
    }

    #[test]
    fn test_empty_graph_renders_axes_only() {
        let graph = GraphBuilder::new().build().unwrap();
        let rendered = Pipeline::new().run(&graph).unwrap();
        assert!(rendered.figure.contains(ElementRole::YAxisLine));
        assert!(!rendered.figure.contains(ElementRole::SeriesMarker));
        assert!(!rendered.figure.contains(ElementRole::LegendText));
        assert!(rendered.legend.is_none());
    }

    #[test]
    fn test_run_svg() {
        let graph = GraphBuilder::new()
            .phase("A")
            .measure("m", "1")
            .build()
            .unwrap();
        let svg = Pipeline::new().run_svg(&graph).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
