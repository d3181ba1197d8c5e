//! Hierarchical layout of a pipeline graph.
//!
//! Resource steps are drawn in one vertical column per resource; aggregators
//! (steps without a resource) get a center lane between the two halves of
//! the resource columns. Rows follow dependency order top to bottom.
//!
//! The whole computation is a pure function of the graph and the config:
//! - depth: longest path from a root
//! - rows: depth refined around aggregators
//! - columns: lane widths and x offsets
//! - position: final x/y per step

pub mod columns;
pub mod config;
pub mod depth;
pub mod position;
pub mod rows;
pub mod style;

pub use config::LayoutConfig;
pub use style::{resource_color, wrap_step_name};

use crate::model::{Graph, Step};
use columns::{group_steps, layout_columns};
use depth::compute_depths;
use log::debug;
use position::node_positions;
use rows::{RowAssignments, assign_rows};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One vertical band holding every step of a resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceColumn {
    /// Normalized resource key, e.g. `app`.
    pub name: String,
    pub display_name: String,
    pub center_x: f64,
    pub start_x: f64,
    pub width: f64,
    pub color: String,
}

/// Band reserved for aggregators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterLane {
    pub center_x: f64,
    pub width: f64,
    pub start_x: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub positions: BTreeMap<String, Position>,
    pub resource_columns: Vec<ResourceColumn>,
    pub center_lane: Option<CenterLane>,
    /// Final row of each step.
    pub rows: BTreeMap<String, usize>,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

/// Compute positions, columns and canvas size for `graph`.
pub fn compute_layout(graph: &Graph, config: &LayoutConfig) -> LayoutResult {
    if graph.steps.is_empty() {
        return LayoutResult {
            positions: BTreeMap::new(),
            resource_columns: Vec::new(),
            center_lane: None,
            rows: BTreeMap::new(),
            canvas_width: config.column_width,
            canvas_height: config.header_height + config.canvas_padding,
        };
    }

    let depths = compute_depths(graph);
    let groups = group_steps(graph);

    let rows = if groups.has_aggregators() {
        debug!(aggregators = groups.aggregators.len(); "laying out with center lane");
        assign_rows(graph, &groups, &depths)
    } else {
        debug!("no aggregators, laying out by depth");
        RowAssignments::from_depths(&groups, &depths)
    };

    let columns = layout_columns(&groups, &rows, config);
    let positions = node_positions(&groups, &rows, &columns, config);

    let max_row = rows.max_row().unwrap_or(0);
    let canvas_height =
        config.header_height + (max_row + 1) as f64 * config.row_height + config.canvas_padding;
    let canvas_width = config
        .column_width
        .max(columns.right_edge + config.canvas_padding);

    let mut all_rows = rows.step_rows;
    all_rows.extend(rows.aggregator_rows);

    LayoutResult {
        positions,
        resource_columns: columns.columns,
        center_lane: columns.center_lane,
        rows: all_rows,
        canvas_width,
        canvas_height,
    }
}

/// Steps by id; the first of several steps sharing an id wins.
pub(crate) fn index_steps(graph: &Graph) -> HashMap<&str, &Step> {
    let mut index = HashMap::with_capacity(graph.steps.len());
    for step in &graph.steps {
        index.entry(step.id.as_str()).or_insert(step);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use pretty_assertions::assert_eq;

    fn step(id: &str, resource: Option<&str>, deps: &[&str]) -> Step {
        let mut s = Step::new(id);
        s.resource = resource.map(str::to_string);
        s.dependencies = Some(deps.iter().map(|d| d.to_string()).collect());
        s
    }

    fn simple_graph() -> Graph {
        build_graph(vec![
            step("step-1", Some("app (Container)"), &[]),
            step("step-2", Some("app (Container)"), &["step-1"]),
            step("step-3", Some("db (Database)"), &["step-1"]),
        ])
    }

    fn aggregator_graph() -> Graph {
        build_graph(vec![
            step("step-1", Some("app (Container)"), &[]),
            step("step-2", Some("db (Database)"), &[]),
            step("agg-1", None, &["step-1", "step-2"]),
        ])
    }

    #[test]
    fn empty_graph() {
        let graph = build_graph(vec![]);
        let config = LayoutConfig::default();
        let layout = compute_layout(&graph, &config);

        assert!(layout.positions.is_empty());
        assert!(layout.resource_columns.is_empty());
        assert_eq!(layout.center_lane, None);
        assert_eq!(layout.canvas_height, 200.0);
    }

    #[test]
    fn every_step_gets_a_position() {
        let graph = simple_graph();
        let layout = compute_layout(&graph, &LayoutConfig::default());

        for s in &graph.steps {
            let pos = layout.positions[&s.id];
            assert!(pos.x > 0.0 && pos.y > 0.0, "{} at {pos:?}", s.id);
        }
        assert_eq!(layout.center_lane, None);
        assert_eq!(layout.resource_columns.len(), 2);
        // Rows 0 and 1.
        assert_eq!(layout.canvas_height, 100.0 + 2.0 * 140.0 + 100.0);
    }

    #[test]
    fn simple_layout_rows_follow_depth() {
        let layout = compute_layout(&simple_graph(), &LayoutConfig::default());
        assert_eq!(
            layout.rows,
            BTreeMap::from([
                ("step-1".to_string(), 0),
                ("step-2".to_string(), 1),
                ("step-3".to_string(), 1),
            ])
        );
        assert!(layout.positions["step-2"].y > layout.positions["step-1"].y);
    }

    #[test]
    fn aggregator_is_placed_in_center_lane() {
        let layout = compute_layout(&aggregator_graph(), &LayoutConfig::default());

        let lane = layout.center_lane.expect("center lane");
        assert!(lane.width > 0.0);
        assert_eq!(layout.positions["agg-1"].x, lane.center_x);
        assert!(layout.positions["agg-1"].y > layout.positions["step-1"].y);
        assert!(layout.positions["agg-1"].y > layout.positions["step-2"].y);

        // app on the left of the lane, db on the right.
        assert!(layout.positions["step-1"].x < lane.start_x);
        assert!(layout.positions["step-2"].x > lane.start_x + lane.width);
    }

    #[test]
    fn config_overrides_apply() {
        let config = LayoutConfig {
            row_height: 50.0,
            header_height: 10.0,
            ..LayoutConfig::default()
        };
        let layout = compute_layout(&simple_graph(), &config);
        assert_eq!(layout.positions["step-2"].y, 60.0);
    }

    #[test]
    fn canvas_is_at_least_column_width_wide() {
        let config = LayoutConfig {
            column_width: 5000.0,
            ..LayoutConfig::default()
        };
        let layout = compute_layout(&simple_graph(), &config);
        assert_eq!(layout.canvas_width, 5000.0);

        let layout = compute_layout(&simple_graph(), &LayoutConfig::default());
        // app (150..330), gap, db (390..570), padding.
        assert_eq!(layout.canvas_width, 670.0);
    }

    #[test]
    fn layout_is_deterministic() {
        let graph = aggregator_graph();
        let config = LayoutConfig::default();
        assert_eq!(compute_layout(&graph, &config), compute_layout(&graph, &config));
    }
}
