//! Resource grouping and horizontal placement of columns and the center lane.

use crate::layout::config::{AGGREGATOR_WIDTH, COLUMN_PADDING, LEFT_MARGIN, LayoutConfig, NODE_WIDTH};
use crate::layout::rows::RowAssignments;
use crate::layout::style::{column_label, resource_color, resource_key};
use crate::layout::{CenterLane, ResourceColumn};
use crate::model::{Graph, Step, StepKind};
use std::collections::BTreeMap;

/// Steps split by kind, with resource steps bucketed by resource key.
#[derive(Debug, Clone, Default)]
pub struct StepGroups<'g> {
    pub aggregators: Vec<&'g Step>,
    /// Resource key -> steps, keys in lexicographic order.
    pub resources: BTreeMap<String, Vec<&'g Step>>,
}

impl<'g> StepGroups<'g> {
    pub fn resource_steps(&self) -> impl Iterator<Item = &'g Step> + '_ {
        self.resources.values().flatten().copied()
    }

    pub fn has_aggregators(&self) -> bool {
        !self.aggregators.is_empty()
    }
}

pub fn group_steps(graph: &Graph) -> StepGroups<'_> {
    let mut groups = StepGroups::default();
    for step in &graph.steps {
        match step.kind() {
            StepKind::Resource(resource) => groups
                .resources
                .entry(resource_key(resource))
                .or_default()
                .push(step),
            StepKind::Aggregator => groups.aggregators.push(step),
        }
    }
    groups
}

/// Horizontal geometry of all lanes.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    pub columns: Vec<ResourceColumn>,
    pub center_lane: Option<CenterLane>,
    /// Right edge of the last lane placed.
    pub right_edge: f64,
}

impl ColumnLayout {
    pub fn column_center(&self, key: &str) -> Option<f64> {
        self.columns.iter().find(|c| c.name == key).map(|c| c.center_x)
    }
}

/// Place resource columns left to right.
///
/// Without aggregators all columns go in one pass. With aggregators the first
/// half (rounded up) goes left of the center lane and the rest to its right.
pub fn layout_columns(
    groups: &StepGroups<'_>,
    rows: &RowAssignments,
    config: &LayoutConfig,
) -> ColumnLayout {
    let keys: Vec<&String> = groups.resources.keys().collect();
    let mut cursor = Cursor {
        x: LEFT_MARGIN,
        config,
        layout: ColumnLayout::default(),
    };

    if !groups.has_aggregators() {
        for key in keys {
            cursor.place_column(key, &groups.resources[key], rows);
        }
        return cursor.finish();
    }

    let split = keys.len().div_ceil(2);
    for key in &keys[..split] {
        cursor.place_column(key, &groups.resources[*key], rows);
    }
    cursor.place_center_lane(center_lane_width(groups, rows, config));
    for key in &keys[split..] {
        cursor.place_column(key, &groups.resources[*key], rows);
    }
    cursor.finish()
}

/// Lane wide enough for the busiest aggregator row.
fn center_lane_width(groups: &StepGroups<'_>, rows: &RowAssignments, config: &LayoutConfig) -> f64 {
    let parallel = max_per_row(&groups.aggregators, rows);
    config
        .min_center_lane_width
        .max((parallel - 1) as f64 * config.aggregator_spacing + AGGREGATOR_WIDTH)
}

/// Largest number of steps sharing one row, at least 1.
pub(crate) fn max_per_row(steps: &[&Step], rows: &RowAssignments) -> usize {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for step in steps {
        *counts.entry(rows.row(&step.id).unwrap_or(0)).or_default() += 1;
    }
    counts.into_values().max().unwrap_or(1).max(1)
}

struct Cursor<'c> {
    x: f64,
    config: &'c LayoutConfig,
    layout: ColumnLayout,
}

impl Cursor<'_> {
    fn place_column(&mut self, key: &str, steps: &[&Step], rows: &RowAssignments) {
        let width = (max_per_row(steps, rows) - 1) as f64 * self.config.node_spacing + NODE_WIDTH;
        let color = resource_color(steps.first().and_then(|s| s.resource.as_deref()));

        self.layout.columns.push(ResourceColumn {
            name: key.to_string(),
            display_name: column_label(key),
            center_x: self.x + width / 2.0,
            start_x: self.x - COLUMN_PADDING,
            width: width + 2.0 * COLUMN_PADDING,
            color: color.to_string(),
        });
        self.advance(width);
    }

    fn place_center_lane(&mut self, width: f64) {
        self.layout.center_lane = Some(CenterLane {
            center_x: self.x + width / 2.0,
            width,
            start_x: self.x,
        });
        self.advance(width);
    }

    fn advance(&mut self, width: f64) {
        self.layout.right_edge = self.x + width;
        self.x += width + self.config.column_gap;
    }

    fn finish(self) -> ColumnLayout {
        self.layout
    }
}
