//! WebAssembly bindings for scdgraph
//!
//! Browser front-ends send a JSON graph document and get back a JSON object
//! with the rendered SVGs:
//!
//! ```json
//! { "svg": "<svg ...>", "legend_svg": "<svg ...>", "warnings": [], "error": null }
//! ```
//!
//! The JSON plumbing is target independent so it can be tested natively; only
//! the `#[wasm_bindgen]` exports are restricted to wasm32.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::graph::{render_svg, GraphDocument, Pipeline};

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

/// Render a JSON graph document
///
/// # Returns
/// * JSON string with fields: svg, legend_svg, warnings, error
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn render_graph_json(document: &str) -> String {
    render_document_json(document)
}

/// The static A-B example as SVG text
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn render_example() -> Result<String, JsValue> {
    crate::graph::example::render_example_svg().map_err(|e| JsValue::from_str(&e.to_string()))
}

/// A starter graph document
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn graph_template() -> String {
    document_template_json()
}

/// Render a document and report the outcome as JSON
///
/// Series problems are reported as warnings and the graph is still drawn;
/// document or configuration errors fill `error` and leave the SVGs empty.
pub fn render_document_json(document: &str) -> String {
    let result = GraphDocument::from_json(document)
        .and_then(GraphDocument::into_graph)
        .and_then(|graph| {
            let rendered = Pipeline::new().run(&graph)?;
            let warnings: Vec<String> = graph.diagnostics().iter().map(|d| d.to_string()).collect();
            Ok((rendered, warnings))
        });

    match result {
        Ok((rendered, warnings)) => serde_json::json!({
            "svg": render_svg(&rendered.figure),
            "legend_svg": rendered.legend.as_ref().map(render_svg),
            "warnings": warnings,
            "error": null
        })
        .to_string(),
        Err(e) => serde_json::json!({
            "svg": "",
            "legend_svg": null,
            "warnings": [],
            "error": e.to_string()
        })
        .to_string(),
    }
}

/// Starter document as pretty JSON
pub fn document_template_json() -> String {
    GraphDocument::template()
        .to_json_pretty()
        .unwrap_or_else(|_| "{}".to_string())
}
