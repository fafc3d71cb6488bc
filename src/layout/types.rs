//! Data structures for layout computation.

use crate::graph::EntityType;

/// Which of the three diagram columns a box sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Dependencies,
    Focal,
    Dependents,
}

/// A positioned node box.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub label: String,
    pub entity_type: EntityType,
    /// False for dangling references.
    pub tracked: bool,
    pub column: Column,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutNode {
    /// Midpoint of the left edge.
    pub fn left_anchor(&self) -> (f64, f64) {
        (self.x, self.y + self.height / 2.0)
    }

    /// Midpoint of the right edge.
    pub fn right_anchor(&self) -> (f64, f64) {
        (self.x + self.width, self.y + self.height / 2.0)
    }
}

/// A directed edge between two boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub from: String,
    pub to: String,
    pub from_point: (f64, f64),
    pub to_point: (f64, f64),
}

/// A legend swatch for one entity type, anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub entity_type: EntityType,
    pub x: f64,
    pub y: f64,
    pub swatch: f64,
}

/// The complete layout for one focal entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: String,
    pub focal: LayoutNode,
    pub dependencies: Vec<LayoutNode>,
    pub dependents: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    /// One entry per entity type present, in first-seen order.
    pub legend: Vec<LegendEntry>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    /// All boxes, left column first.
    pub fn nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.dependencies
            .iter()
            .chain(std::iter::once(&self.focal))
            .chain(self.dependents.iter())
    }
}

/// Result of the column placement phase.
pub struct ColumnPlacement {
    pub nodes: Vec<LayoutNode>,
    pub width: f64,
}
