//! Graph assembly
//!
//! [`GraphBuilder`] collects phases, measures and configuration, parses every
//! series entry, and hands back one immutable [`Graph`]. A rejected entry does
//! not stop the build: the measure is kept with no data and the problem is
//! recorded as a [`Diagnostic`].

use tracing::{debug, info, span, Level};

use crate::core::{
    parse_series_lenient, Diagnostic, GraphConfig, Measure, Phase, Result, Series,
};

/// Immutable input of one render: phases plus configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    phases: Vec<Phase>,
    config: GraphConfig,
    diagnostics: Vec<Diagnostic>,
}

impl Graph {
    /// Create a graph from already-parsed phases
    pub fn new(phases: Vec<Phase>, config: GraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            phases,
            config,
            diagnostics: Vec::new(),
        })
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Problems found while parsing series entries
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Measures that will be drawn, in plot order, with their phase and
    /// measure indices
    pub fn plotted_measures(&self) -> impl Iterator<Item = PlottedMeasure<'_>> {
        self.phases
            .iter()
            .enumerate()
            .flat_map(|(phase_index, phase)| {
                phase
                    .measures
                    .iter()
                    .enumerate()
                    .filter(|(_, measure)| !measure.is_empty())
                    .map(move |(measure_index, measure)| PlottedMeasure {
                        phase_index,
                        measure_index,
                        measure,
                    })
            })
    }

    /// True when at least one measure has data
    pub fn has_data(&self) -> bool {
        self.plotted_measures().next().is_some()
    }

    /// Same phases under a different configuration
    pub fn with_config(&self, config: GraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            phases: self.phases.clone(),
            config,
            diagnostics: self.diagnostics.clone(),
        })
    }
}

/// A measure together with its position in the graph
#[derive(Debug, Clone, Copy)]
pub struct PlottedMeasure<'a> {
    pub phase_index: usize,
    pub measure_index: usize,
    pub measure: &'a Measure,
}

/// Incremental builder for [`Graph`]
///
/// # Example
/// ```
/// use scdgraph::GraphBuilder;
///
/// let graph = GraphBuilder::new()
///     .phase("Baseline")
///     .measure("Correct", "40 42 x 41")
///     .phase("Intervention")
///     .measure("Correct", "55, 60, 65")
///     .build()
///     .unwrap();
///
/// assert_eq!(graph.phases().len(), 2);
/// assert!(graph.diagnostics().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: GraphConfig,
    phases: Vec<Phase>,
    diagnostics: Vec<Diagnostic>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Start a new phase; following measures belong to it
    pub fn phase(mut self, title: impl Into<String>) -> Self {
        self.phases.push(Phase::new(title));
        self
    }

    /// Add a measure from free text to the current phase
    pub fn measure(mut self, name: impl Into<String>, text: &str) -> Self {
        let name = name.into();
        let field = format!("{} / {}", self.current_phase().title, name);
        let (values, diagnostic) = parse_series_lenient(&field, text);
        if let Some(diagnostic) = diagnostic {
            self.diagnostics.push(diagnostic);
        }
        self.current_phase().measures.push(Measure::new(name, values));
        self
    }

    /// Add an already-parsed measure to the current phase
    pub fn measure_values(mut self, name: impl Into<String>, values: Series) -> Self {
        self.current_phase().measures.push(Measure::new(name, values));
        self
    }

    /// Validate the configuration and freeze the graph
    pub fn build(self) -> Result<Graph> {
        let build_span = span!(
            Level::INFO,
            "build_graph",
            phase_count = self.phases.len(),
            diagnostics = self.diagnostics.len()
        );
        let _enter = build_span.enter();

        self.config.validate()?;
        for (index, phase) in self.phases.iter().enumerate() {
            debug!(
                phase = index,
                title = %phase.title,
                measures = phase.measures.len(),
                length = phase.length(),
                "Phase assembled"
            );
        }
        info!(phase_count = self.phases.len(), "Graph built");

        Ok(Graph {
            phases: self.phases,
            config: self.config,
            diagnostics: self.diagnostics,
        })
    }

    fn current_phase(&mut self) -> &mut Phase {
        if self.phases.is_empty() {
            self.phases.push(Phase::new("Phase 1"));
        }
        let last = self.phases.len() - 1;
        &mut self.phases[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GraphError;

    #[test]
    fn test_builder_assembles_phases() {
        let graph = GraphBuilder::new()
            .phase("A")
            .measure("m1", "1 2 3")
            .measure("m2", "4 5")
            .phase("B")
            .measure("m1", "6")
            .build()
            .unwrap();

        assert_eq!(graph.phases().len(), 2);
        assert_eq!(graph.phases()[0].measures.len(), 2);
        assert_eq!(graph.phases()[0].length(), 3);
        assert_eq!(graph.phases()[1].length(), 1);
    }

    #[test]
    fn test_bad_entry_becomes_diagnostic() {
        let graph = GraphBuilder::new()
            .phase("Baseline")
            .measure("Correct", "5 abc 7")
            .build()
            .unwrap();

        let measure = &graph.phases()[0].measures[0];
        assert!(measure.is_empty());
        assert_eq!(graph.diagnostics().len(), 1);
        assert_eq!(graph.diagnostics()[0].field, "Baseline / Correct");
        assert!(graph.diagnostics()[0].message.contains("'abc'"));
        assert!(!graph.has_data());
    }

    #[test]
    fn test_measure_without_phase_creates_one() {
        let graph = GraphBuilder::new().measure("m", "1").build().unwrap();
        assert_eq!(graph.phases()[0].title, "Phase 1");
    }

    #[test]
    fn test_plotted_measures_skip_empty() {
        let graph = GraphBuilder::new()
            .phase("A")
            .measure("empty", "")
            .measure("full", "1 2")
            .phase("B")
            .measure("b", "3")
            .build()
            .unwrap();

        let plotted: Vec<_> = graph
            .plotted_measures()
            .map(|p| (p.phase_index, p.measure_index, p.measure.name.as_str()))
            .collect();
        assert_eq!(plotted, vec![(0, 1, "full"), (1, 0, "b")]);
    }

    #[test]
    fn test_invalid_config_fails_build() {
        let config = GraphConfig {
            y_tick: 0.0,
            ..GraphConfig::default()
        };
        let err = GraphBuilder::new().config(config).build().unwrap_err();
        assert!(matches!(err, GraphError::InvalidConfig { .. }));
    }
}
