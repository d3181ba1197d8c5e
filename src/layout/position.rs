use crate::layout::Position;
use crate::layout::columns::{ColumnLayout, StepGroups};
use crate::layout::config::LayoutConfig;
use crate::layout::rows::RowAssignments;
use crate::model::Step;
use std::collections::BTreeMap;

/// Concrete coordinates for every step.
///
/// Steps sharing a row inside one lane are spread evenly around the lane's
/// center; `y` only depends on the row.
pub fn node_positions(
    groups: &StepGroups<'_>,
    rows: &RowAssignments,
    columns: &ColumnLayout,
    config: &LayoutConfig,
) -> BTreeMap<String, Position> {
    let mut positions = BTreeMap::new();

    for (key, steps) in &groups.resources {
        let Some(center_x) = columns.column_center(key) else {
            continue;
        };
        spread(steps, rows, center_x, config.node_spacing, config, &mut positions);
    }

    if let Some(lane) = &columns.center_lane {
        spread(
            &groups.aggregators,
            rows,
            lane.center_x,
            config.aggregator_spacing,
            config,
            &mut positions,
        );
    }

    positions
}

fn spread(
    steps: &[&Step],
    rows: &RowAssignments,
    center_x: f64,
    spacing: f64,
    config: &LayoutConfig,
    positions: &mut BTreeMap<String, Position>,
) {
    let mut by_row: BTreeMap<usize, Vec<&Step>> = BTreeMap::new();
    for step in steps {
        by_row
            .entry(rows.row(&step.id).unwrap_or(0))
            .or_default()
            .push(*step);
    }

    for (row, at_row) in by_row {
        let y = config.header_height + row as f64 * config.row_height;
        let start_x = center_x - (at_row.len() - 1) as f64 * spacing / 2.0;
        for (i, step) in at_row.iter().enumerate() {
            positions.insert(
                step.id.clone(),
                Position {
                    x: start_x + i as f64 * spacing,
                    y,
                },
            );
        }
    }
}
