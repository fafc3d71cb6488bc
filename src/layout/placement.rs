//! Node sizing and column placement.

use crate::ir::Node;
use crate::measure::TextMetrics;

use super::types::{Column, ColumnPlacement, LayoutNode};

/// Calculate box sizes from label and type caption.
pub fn calculate_node_sizes(nodes: &[&Node], metrics: &TextMetrics) -> Vec<(f64, f64)> {
    nodes
        .iter()
        .map(|n| metrics.node_size(&n.label, n.entity_type.as_str()))
        .collect()
}

/// Width of a column: the widest box in it, or `min_width` when empty.
pub fn column_width(sizes: &[(f64, f64)], min_width: f64) -> f64 {
    sizes.iter().map(|&(w, _)| w).fold(min_width, f64::max)
}

/// Stacked height of a column. Empty columns take no height.
pub fn column_height(sizes: &[(f64, f64)], node_gap_y: f64) -> f64 {
    if sizes.is_empty() {
        return 0.0;
    }
    let boxes: f64 = sizes.iter().map(|&(_, h)| h).sum();
    boxes + (sizes.len() - 1) as f64 * node_gap_y
}

/// Stack one column's boxes top to bottom, centered vertically within
/// `band_height` starting at `top`. Every box takes the column width.
#[allow(clippy::too_many_arguments)]
pub fn place_column(
    nodes: &[&Node],
    sizes: &[(f64, f64)],
    column: Column,
    x: f64,
    width: f64,
    top: f64,
    band_height: f64,
    node_gap_y: f64,
) -> ColumnPlacement {
    let height = column_height(sizes, node_gap_y);
    let mut y = top + (band_height - height) / 2.0;
    let mut placed = Vec::with_capacity(nodes.len());

    for (node, &(_, h)) in nodes.iter().zip(sizes) {
        placed.push(LayoutNode {
            id: node.id.clone(),
            label: node.label.clone(),
            entity_type: node.entity_type.clone(),
            tracked: node.tracked,
            column,
            x,
            y,
            width,
            height: h,
        });
        y += h + node_gap_y;
    }

    ColumnPlacement {
        nodes: placed,
        width,
    }
}
