use serde::{Deserialize, Serialize};

/// Left edge of the first resource column.
pub const LEFT_MARGIN: f64 = 150.0;
/// Width of a single resource-step node.
pub const NODE_WIDTH: f64 = 180.0;
/// Width of a single aggregator node.
pub const AGGREGATOR_WIDTH: f64 = 140.0;
/// Extra band drawn on each side of a resource column.
pub const COLUMN_PADDING: f64 = 20.0;

/// Tunable layout geometry. Every field can be overridden on its own; missing
/// fields in a config file fall back to [`LayoutConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Minimum canvas width reported by the layout.
    pub column_width: f64,
    pub row_height: f64,
    /// Horizontal distance between resource steps sharing a row.
    pub node_spacing: f64,
    pub column_gap: f64,
    /// Horizontal distance between aggregators sharing a row.
    pub aggregator_spacing: f64,
    pub min_center_lane_width: f64,
    pub canvas_padding: f64,
    /// Vertical offset of row 0.
    pub header_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_width: 280.0,
            row_height: 140.0,
            node_spacing: 200.0,
            column_gap: 60.0,
            aggregator_spacing: 120.0,
            min_center_lane_width: 200.0,
            canvas_padding: 100.0,
            header_height: 100.0,
        }
    }
}
