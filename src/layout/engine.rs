//! Layout engine core implementation.

use crate::ir::{FocusIR, Node};
use crate::measure::TextMetrics;

use super::placement::{calculate_node_sizes, column_height, column_width, place_column};
use super::routing::{route_dependency_edges, route_dependent_edges};
use super::types::{Column, Layout, LegendEntry};

/// Horizontal gap between a legend swatch and its caption.
pub const LEGEND_LABEL_GAP: f64 = 6.0;

/// Layout engine configuration and computation.
pub struct LayoutEngine {
    pub(crate) metrics: TextMetrics,
    pub(crate) column_gap: f64,
    pub(crate) node_gap_y: f64,
    pub(crate) margin_x: f64,
    /// Room above the columns for the title and subtitle.
    pub(crate) margin_top: f64,
    /// Room below the columns for the legend.
    pub(crate) margin_bottom: f64,
    pub(crate) legend_swatch: f64,
    pub(crate) legend_spacing: f64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
            column_gap: 120.0,
            node_gap_y: 20.0,
            margin_x: 30.0,
            margin_top: 80.0,
            margin_bottom: 60.0,
            legend_swatch: 12.0,
            legend_spacing: 24.0,
        }
    }
}

impl LayoutEngine {
    pub fn metrics(&self) -> &TextMetrics {
        &self.metrics
    }

    /// Compute the three-column layout around the focal entity.
    pub fn layout(&self, ir: &FocusIR) -> Layout {
        // Phase 1: sizing
        let deps: Vec<&Node> = ir.dependencies.iter().collect();
        let focal: Vec<&Node> = vec![&ir.focal];
        let dependents: Vec<&Node> = ir.dependents.iter().collect();

        let dep_sizes = calculate_node_sizes(&deps, &self.metrics);
        let focal_sizes = calculate_node_sizes(&focal, &self.metrics);
        let dependent_sizes = calculate_node_sizes(&dependents, &self.metrics);

        let min_width = self.metrics.min_node_width;
        let widths = [
            column_width(&dep_sizes, min_width),
            column_width(&focal_sizes, min_width),
            column_width(&dependent_sizes, min_width),
        ];
        let band_height = column_height(&dep_sizes, self.node_gap_y)
            .max(column_height(&focal_sizes, self.node_gap_y))
            .max(column_height(&dependent_sizes, self.node_gap_y));

        // Phase 2: column placement
        let top = self.margin_top;
        let x0 = self.margin_x;
        let x1 = x0 + widths[0] + self.column_gap;
        let x2 = x1 + widths[1] + self.column_gap;

        let left = place_column(
            &deps, &dep_sizes, Column::Dependencies, x0, widths[0], top, band_height, self.node_gap_y,
        );
        let center = place_column(
            &focal, &focal_sizes, Column::Focal, x1, widths[1], top, band_height, self.node_gap_y,
        );
        let right = place_column(
            &dependents, &dependent_sizes, Column::Dependents, x2, widths[2], top, band_height, self.node_gap_y,
        );

        let mut center_nodes = center.nodes;
        let focal_node = center_nodes.remove(0);

        // Phase 3: edge routing
        let mut edges = route_dependency_edges(&left.nodes, &focal_node);
        edges.extend(route_dependent_edges(&focal_node, &right.nodes));

        // Phase 4: canvas and legend
        let types = ir.entity_types();
        let columns_width = left.width + center.width + right.width + self.column_gap * 2.0;
        let width = (columns_width + self.margin_x * 2.0)
            .max(self.title_width(&ir.focal.label))
            .max(self.legend_width(&types));
        let height = top + band_height + self.margin_bottom;

        let legend_y = top + band_height + (self.margin_bottom - self.legend_swatch) / 2.0;
        let mut legend_x = self.margin_x;
        let mut legend = Vec::with_capacity(types.len());
        for entity_type in types {
            legend.push(LegendEntry {
                entity_type: entity_type.clone(),
                x: legend_x,
                y: legend_y,
                swatch: self.legend_swatch,
            });
            legend_x += self.legend_entry_width(entity_type.as_str());
        }

        Layout {
            title: ir.focal.label.clone(),
            focal: focal_node,
            dependencies: left.nodes,
            dependents: right.nodes,
            edges,
            legend,
            width,
            height,
        }
    }

    fn title_width(&self, title: &str) -> f64 {
        self.metrics.text_width(title) * 1.25 + self.margin_x * 2.0
    }

    /// Swatch, gap, caption, trailing spacing.
    fn legend_entry_width(&self, label: &str) -> f64 {
        self.legend_swatch + LEGEND_LABEL_GAP + self.metrics.caption_width(label) + self.legend_spacing
    }

    fn legend_width<T: AsRef<str>>(&self, labels: &[T]) -> f64 {
        let entries: f64 = labels
            .iter()
            .map(|l| self.legend_entry_width(l.as_ref()))
            .sum();
        entries + self.margin_x * 2.0
    }
}
