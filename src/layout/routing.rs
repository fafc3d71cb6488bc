//! Edge routing between columns.
//!
//! Columns are disjoint in x and boxes within a column never overlap, so a
//! curve from one box's side to another's never passes through a third box.

use super::types::{LayoutEdge, LayoutNode};

/// Edges from every dependency box into the focal box.
pub fn route_dependency_edges(dependencies: &[LayoutNode], focal: &LayoutNode) -> Vec<LayoutEdge> {
    dependencies
        .iter()
        .map(|dep| LayoutEdge {
            from: dep.id.clone(),
            to: focal.id.clone(),
            from_point: dep.right_anchor(),
            to_point: focal.left_anchor(),
        })
        .collect()
}

/// Edges from the focal box into every dependent box.
pub fn route_dependent_edges(focal: &LayoutNode, dependents: &[LayoutNode]) -> Vec<LayoutEdge> {
    dependents
        .iter()
        .map(|dep| LayoutEdge {
            from: focal.id.clone(),
            to: dep.id.clone(),
            from_point: focal.right_anchor(),
            to_point: dep.left_anchor(),
        })
        .collect()
}

/// Horizontal-tangent cubic curve between the two edge endpoints.
pub fn curve_path(edge: &LayoutEdge) -> String {
    let (x1, y1) = edge.from_point;
    let (x2, y2) = edge.to_point;
    let mid_x = (x1 + x2) / 2.0;
    if y1 == y2 {
        format!("M {} {} L {} {}", x1, y1, x2, y2)
    } else {
        format!("M {} {} C {} {}, {} {}, {} {}", x1, y1, mid_x, y1, mid_x, y2, x2, y2)
    }
}
