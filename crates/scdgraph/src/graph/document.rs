//! JSON graph documents
//!
//! The document is the serialized form of one graph: every [`GraphConfig`]
//! field at the top level plus a `phases` list. Series data may be given as
//! free text (`"40 42 x 41"`) or as a JSON array with `null` for gaps. In
//! custom color mode a measure may carry its own `color`.
//!
//! ```json
//! {
//!   "title": "Reading Fluency",
//!   "y_max": 120,
//!   "phases": [
//!     { "title": "Baseline", "measures": [{ "name": "WCPM", "data": "40 42 x 41" }] },
//!     { "title": "Intervention", "measures": [{ "name": "WCPM", "data": [55, 60, null] }] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Graph, GraphBuilder};
use crate::core::{Color, ColorMode, GraphConfig, Palette, Result, Series};

/// Series data as written in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesInput {
    /// Free text, parsed with the series grammar
    Text(String),
    /// Already numeric; `null` marks a missing session
    Values(Series),
}

impl Default for SeriesInput {
    fn default() -> Self {
        SeriesInput::Text(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasureDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub data: SeriesInput,
    /// Line and marker color; only used in custom color mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub measures: Vec<MeasureDocument>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(flatten)]
    pub config: GraphConfig,
    #[serde(default)]
    pub phases: Vec<PhaseDocument>,
}

impl GraphDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Starter document: a two-phase A-B design with one measure each
    pub fn template() -> Self {
        let measure = |name: &str, data: &str| MeasureDocument {
            name: Some(name.to_string()),
            data: SeriesInput::Text(data.to_string()),
            color: None,
        };
        Self {
            config: GraphConfig::default(),
            phases: vec![
                PhaseDocument {
                    title: Some("Baseline".to_string()),
                    measures: vec![measure("Correct responses", "40 42 39 41 43")],
                },
                PhaseDocument {
                    title: Some("Intervention".to_string()),
                    measures: vec![measure("Correct responses", "55 60 65 68 70 74")],
                },
            ],
        }
    }

    /// Parse every series and build the graph
    ///
    /// Untitled phases become `Phase N`; unnamed measures become
    /// `Measure M (<phase title>)`. Bad series entries end up in
    /// [`Graph::diagnostics`].
    pub fn into_graph(self) -> Result<Graph> {
        let mut builder = GraphBuilder::new().config(self.config);
        let mut measure_colors: Vec<Vec<Option<Color>>> = Vec::with_capacity(self.phases.len());
        for (i, phase) in self.phases.into_iter().enumerate() {
            let title = non_blank(phase.title).unwrap_or_else(|| format!("Phase {}", i + 1));
            debug!(phase = i, %title, measures = phase.measures.len(), "Reading phase");
            builder = builder.phase(title.clone());
            let mut colors = Vec::with_capacity(phase.measures.len());
            for (j, measure) in phase.measures.into_iter().enumerate() {
                let name = non_blank(measure.name)
                    .unwrap_or_else(|| format!("Measure {} ({})", j + 1, title));
                colors.push(measure.color);
                builder = match measure.data {
                    SeriesInput::Text(text) => builder.measure(name, &text),
                    SeriesInput::Values(values) => builder.measure_values(name, values),
                };
            }
            measure_colors.push(colors);
        }

        let graph = builder.build()?;
        match custom_colors(&graph, &measure_colors) {
            Some(color_mode) => {
                let mut config = graph.config().clone();
                config.color_mode = color_mode;
                graph.with_config(config)
            }
            None => Ok(graph),
        }
    }
}

/// Merge per-measure colors into the custom color list, in plot order
///
/// Measures without a color keep the document-level entry for their slot, or
/// the default palette color when the list is shorter. Returns `None` outside
/// custom mode or when no measure carries a color.
fn custom_colors(graph: &Graph, measure_colors: &[Vec<Option<Color>>]) -> Option<ColorMode> {
    let ColorMode::Custom { colors: listed } = &graph.config().color_mode else {
        return None;
    };
    if measure_colors.iter().flatten().all(Option::is_none) {
        return None;
    }

    let defaults = ColorMode::Palette;
    let fallback = Palette::new(&defaults);
    let colors = graph
        .plotted_measures()
        .enumerate()
        .map(|(plot_index, plotted)| {
            measure_colors
                .get(plotted.phase_index)
                .and_then(|phase| phase.get(plotted.measure_index))
                .cloned()
                .flatten()
                .or_else(|| listed.get(plot_index).cloned())
                .unwrap_or_else(|| fallback.color(plot_index))
        })
        .collect();
    Some(ColorMode::Custom { colors })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
