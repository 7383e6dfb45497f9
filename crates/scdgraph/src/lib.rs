//! scdgraph - Single-case design graphs
//!
//! A library for drawing A-B and multiple-baseline graphs as used in
//! single-case research: phases laid end to end on a shared session axis,
//! dashed phase-change lines, optional stair-steps, and tightly cropped,
//! transparent SVG and PNG output.
//!
//! # Quick Start
//!
//! ```rust
//! use scdgraph::{render, GraphBuilder};
//!
//! let graph = GraphBuilder::new()
//!     .phase("Baseline")
//!     .measure("Correct", "40 42 39 41 43")
//!     .phase("Intervention")
//!     .measure("Correct", "55, 60, x, 68")
//!     .build()
//!     .unwrap();
//!
//! let svg = render(&graph).unwrap();
//! assert!(svg.contains("phase-boundary"));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, run the stages yourself:
//!
//! ```rust
//! use scdgraph::prelude::*;
//!
//! let graph = GraphBuilder::new()
//!     .phase("A")
//!     .measure("m", "1 2 3")
//!     .build()
//!     .unwrap();
//!
//! let layout = PhaseLayoutAlgorithm::new().layout(&graph).unwrap();
//! assert_eq!(layout.phases[0].start_x, 1);
//!
//! let figure = GraphRenderer::new().render(&graph, &layout).unwrap();
//! let png = export(&figure, ExportFormat::Png).unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```

pub mod core;
pub mod graph;
pub mod wasm;

pub use crate::core::*;
pub use graph::{
    export_graph, ExportArtifact, ExportFormat, ExportOptions, Graph, GraphBuilder,
    GraphDocument, Pipeline,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        parse_series, Color, ColorMode, GraphConfig, GraphError, LegendPlacement, Measure,
        Phase, Series,
    };
    pub use crate::graph::{
        export, export_graph, render_svg, ElementRole, ExportFormat, ExportOptions, Figure,
        Graph, GraphBuilder, GraphDocument, GraphRenderer, LayoutResult, PhaseLayoutAlgorithm,
        Pipeline,
    };
}

/// Render a graph to SVG text
///
/// # Example
/// ```rust
/// use scdgraph::{render, GraphBuilder};
///
/// let graph = GraphBuilder::new().phase("A").measure("m", "1 2").build().unwrap();
/// assert!(render(&graph).unwrap().starts_with("<svg"));
/// ```
pub fn render(graph: &Graph) -> Result<String> {
    Pipeline::new().run_svg(graph)
}

/// Parse a JSON graph document and render it to SVG text
///
/// Returns the SVG together with any series diagnostics, formatted as
/// `field: message`.
///
/// # Example
/// ```rust
/// use scdgraph::render_document;
///
/// let (svg, warnings) = render_document(
///     r#"{ "phases": [ { "title": "A", "measures": [ { "data": "1 2 x 4" } ] } ] }"#,
/// ).unwrap();
/// assert!(svg.contains("series-line"));
/// assert!(warnings.is_empty());
/// ```
pub fn render_document(json: &str) -> Result<(String, Vec<String>)> {
    let graph = GraphDocument::from_json(json)?.into_graph()?;
    let svg = render(&graph)?;
    let warnings = graph.diagnostics().iter().map(|d| d.to_string()).collect();
    Ok((svg, warnings))
}
