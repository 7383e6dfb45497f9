//! Phase layout engine
//!
//! Places phases end to end on one shared session axis: the first phase starts
//! at x = 1 and every phase starts where the previous one ended. Also derives
//! the phase boundaries, the plotted x extent and both axes' bounds and ticks.

use tracing::{debug, info, span, trace, Level};

use super::Graph;
use crate::core::{GraphError, Result};

/// Upper bound on generated ticks per axis
const MAX_TICKS: usize = 1000;

/// Lower x bound of every graph, half a session before the first one
pub const X_AXIS_START: f64 = 0.5;

/// Smallest default upper x bound
const MIN_X_AXIS_END: f64 = 2.5;

/// Where one phase sits on the session axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhasePlacement {
    pub index: usize,
    /// Session number of the first observation
    pub start_x: usize,
    /// Longest measure in the phase; 0 means nothing is drawn for it
    pub length: usize,
}

impl PhasePlacement {
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// x coordinate of the n-th observation of a measure in this phase
    pub fn x_at(&self, offset: usize) -> f64 {
        (self.start_x + offset) as f64
    }
}

/// Dashed phase-change line between two phases
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    /// Phase that ends at this boundary
    pub after_phase: usize,
    pub x: f64,
    /// Horizontal run of the stair-step annotation, when enabled
    pub stair_step: Option<f64>,
}

/// Visible data range of both axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Layout output consumed by the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub phases: Vec<PhasePlacement>,
    pub boundaries: Vec<Boundary>,
    /// Rightmost x used by data or stair-steps, plus half a session
    pub plotted_x_max: f64,
    pub bounds: AxisBounds,
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
}

impl LayoutResult {
    pub fn phase(&self, index: usize) -> Option<&PhasePlacement> {
        self.phases.get(index)
    }
}

/// Session-axis layout for multi-phase graphs
#[derive(Debug, Clone, Copy)]
pub struct PhaseLayoutAlgorithm;

impl PhaseLayoutAlgorithm {
    pub fn new() -> Self {
        Self
    }

    pub fn layout(&self, graph: &Graph) -> Result<LayoutResult> {
        let layout_span = span!(
            Level::INFO,
            "layout_phases",
            phase_count = graph.phases().len()
        );
        let _enter = layout_span.enter();

        let config = graph.config();
        let phases = Self::place_phases(graph);

        let mut plotted_x_max = X_AXIS_START;
        for plotted in graph.plotted_measures() {
            let placement = &phases[plotted.phase_index];
            let last_x = placement.x_at(plotted.measure.len() - 1);
            plotted_x_max = plotted_x_max.max(last_x + 0.5);
        }

        let stair_step = config.stair_step_length();
        let boundaries = Self::boundaries(&phases, stair_step);
        for boundary in &boundaries {
            if let Some(run) = boundary.stair_step {
                plotted_x_max = plotted_x_max.max(boundary.x + run + 0.5);
            }
        }

        let x_max = match config.fixed_max_x {
            Some(fixed) => (fixed + 0.5).max(plotted_x_max),
            None => plotted_x_max.max(MIN_X_AXIS_END),
        };
        let bounds = AxisBounds {
            x_min: X_AXIS_START,
            x_max,
            y_min: config.y_min,
            y_max: config.y_upper(),
        };

        let x_ticks = multiples_within(config.x_tick, bounds.x_min, bounds.x_max)
            .ok_or_else(|| GraphError::invalid_config("x_tick is too small for the x range"))?;
        let y_ticks = steps_from(config.y_min, config.y_max, config.y_tick)
            .ok_or_else(|| GraphError::invalid_config("y_tick is too small for the y range"))?;

        trace!(?x_ticks, ?y_ticks, "Ticks computed");
        info!(
            boundaries = boundaries.len(),
            plotted_x_max,
            x_max,
            "Phase layout completed"
        );

        Ok(LayoutResult {
            phases,
            boundaries,
            plotted_x_max,
            bounds,
            x_ticks,
            y_ticks,
        })
    }

    /// `start_x(0) = 1`, `start_x(i) = start_x(i - 1) + length(i - 1)`
    fn place_phases(graph: &Graph) -> Vec<PhasePlacement> {
        let mut start_x = 1;
        graph
            .phases()
            .iter()
            .enumerate()
            .map(|(index, phase)| {
                let placement = PhasePlacement {
                    index,
                    start_x,
                    length: phase.length(),
                };
                debug!(index, start_x, length = placement.length, "Placed phase");
                start_x += placement.length;
                placement
            })
            .collect()
    }

    /// A boundary follows every non-empty phase that has a non-empty phase
    /// somewhere after it
    fn boundaries(phases: &[PhasePlacement], stair_step: Option<f64>) -> Vec<Boundary> {
        phases
            .iter()
            .enumerate()
            .filter(|(i, placement)| {
                !placement.is_empty() && phases[i + 1..].iter().any(|p| !p.is_empty())
            })
            .map(|(_, placement)| Boundary {
                after_phase: placement.index,
                x: (placement.start_x + placement.length) as f64 - 0.5,
                stair_step,
            })
            .collect()
    }
}

impl Default for PhaseLayoutAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

/// Every multiple of `step` inside `[low, high]`
fn multiples_within(step: f64, low: f64, high: f64) -> Option<Vec<f64>> {
    let first = (low / step - 1e-9).ceil() as i64;
    let last = (high / step + 1e-9).floor() as i64;
    if last < first {
        return Some(Vec::new());
    }
    if (last - first) as usize >= MAX_TICKS {
        return None;
    }
    Some((first..=last).map(|k| k as f64 * step).collect())
}

/// `start, start + step, ...` up to `end` inclusive
fn steps_from(start: f64, end: f64, step: f64) -> Option<Vec<f64>> {
    let count = ((end - start) / step + 1e-9).floor();
    if count >= MAX_TICKS as f64 {
        return None;
    }
    Some((0..=count as usize).map(|k| start + k as f64 * step).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GraphConfig;
    use crate::graph::GraphBuilder;

    fn layout(builder: GraphBuilder) -> LayoutResult {
        PhaseLayoutAlgorithm::new()
            .layout(&builder.build().unwrap())
            .unwrap()
    }

    #[test]
    fn test_phase_length_and_start() {
        let result = layout(
            GraphBuilder::new()
                .phase("A")
                .measure("m1", "1 2 3 4 5")
                .measure("m2", "1 2 3")
                .phase("B")
                .measure("m1", "1 2"),
        );
        assert_eq!(result.phases[0].start_x, 1);
        assert_eq!(result.phases[0].length, 5);
        assert_eq!(result.phases[1].start_x, 6);
        assert_eq!(result.boundaries.len(), 1);
        assert_eq!(result.boundaries[0].x, 5.5);
        assert_eq!(result.plotted_x_max, 7.5);
        assert_eq!(result.bounds.x_max, 7.5);
    }

    #[test]
    fn test_zero_length_phase_is_a_placeholder() {
        let result = layout(
            GraphBuilder::new()
                .phase("A")
                .measure("m", "1 2 3")
                .phase("Empty")
                .measure("m", "")
                .phase("C")
                .measure("m", "4 5"),
        );
        assert_eq!(result.phases[1].start_x, 4);
        assert_eq!(result.phases[1].length, 0);
        assert_eq!(result.phases[2].start_x, 4);
        // Only A draws a boundary; the empty phase adds none of its own
        assert_eq!(result.boundaries.len(), 1);
        assert_eq!(result.boundaries[0].after_phase, 0);
        assert_eq!(result.boundaries[0].x, 3.5);
    }

    #[test]
    fn test_no_boundary_without_following_data() {
        let result = layout(
            GraphBuilder::new()
                .phase("A")
                .measure("m", "1 2")
                .phase("B")
                .measure("m", ""),
        );
        assert!(result.boundaries.is_empty());
    }

    #[test]
    fn test_default_x_axis_minimum() {
        let result = layout(GraphBuilder::new().phase("A").measure("m", "7"));
        assert_eq!(result.plotted_x_max, 1.5);
        assert_eq!(result.bounds.x_max, 2.5);
        assert_eq!(result.x_ticks, vec![1.0, 2.0]);
    }

    #[test]
    fn test_fixed_max_x_never_clips() {
        let config = GraphConfig {
            fixed_max_x: Some(3.0),
            ..GraphConfig::default()
        };
        let result = layout(
            GraphBuilder::new()
                .config(config.clone())
                .phase("A")
                .measure("m", "1 2 3 4 5 6"),
        );
        assert_eq!(result.bounds.x_max, 6.5);

        let config = GraphConfig {
            fixed_max_x: Some(30.0),
            ..config
        };
        let result = layout(
            GraphBuilder::new()
                .config(config)
                .phase("A")
                .measure("m", "1 2 3"),
        );
        assert_eq!(result.bounds.x_max, 30.5);
    }

    #[test]
    fn test_stair_step_extends_extent() {
        let mut config = GraphConfig::default();
        config.multiple_baseline.enabled = true;
        config.multiple_baseline.stair_step = true;
        config.multiple_baseline.stair_step_length = 4.0;
        let result = layout(
            GraphBuilder::new()
                .config(config)
                .phase("A")
                .measure("m", "1 2 3")
                .phase("B")
                .measure("m", "4"),
        );
        assert_eq!(result.boundaries[0].stair_step, Some(4.0));
        // boundary 3.5 + run 4 + 0.5
        assert_eq!(result.plotted_x_max, 8.0);
    }

    #[test]
    fn test_y_axis_ticks_and_headroom() {
        let result = layout(GraphBuilder::new().phase("A").measure("m", "1"));
        assert_eq!(result.bounds.y_min, 0.0);
        assert_eq!(result.bounds.y_max, 110.0);
        assert_eq!(result.y_ticks.len(), 11);
        assert_eq!(result.y_ticks.last(), Some(&100.0));
    }

    #[test]
    fn test_x_ticks_follow_interval() {
        let config = GraphConfig {
            x_tick: 2.0,
            ..GraphConfig::default()
        };
        let result = layout(
            GraphBuilder::new()
                .config(config)
                .phase("A")
                .measure("m", "1 2 3 4 5 6 7"),
        );
        assert_eq!(result.x_ticks, vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_tiny_tick_is_rejected() {
        let config = GraphConfig {
            x_tick: 1e-6,
            ..GraphConfig::default()
        };
        let graph = GraphBuilder::new()
            .config(config)
            .phase("A")
            .measure("m", "1 2")
            .build()
            .unwrap();
        assert!(PhaseLayoutAlgorithm::new().layout(&graph).is_err());
    }

    #[test]
    fn test_empty_graph() {
        let result = layout(GraphBuilder::new());
        assert!(result.phases.is_empty());
        assert!(result.boundaries.is_empty());
        assert_eq!(result.plotted_x_max, 0.5);
        assert_eq!(result.bounds.x_max, 2.5);
    }
}
