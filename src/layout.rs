//! Three-column layout: dependencies on the left, the focal entity in the
//! middle, dependents on the right. Data flows left to right.

mod engine;
mod placement;
mod routing;
mod types;

pub use engine::{LEGEND_LABEL_GAP, LayoutEngine};
pub use routing::curve_path;
pub use types::{Column, Layout, LayoutEdge, LayoutNode, LegendEntry};
