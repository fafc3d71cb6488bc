use crate::graph::EntityType;
use crate::layout::{Column, LEGEND_LABEL_GAP, Layout, LayoutEdge, LayoutNode, LegendEntry, curve_path};
use std::fmt::{self, Write};

const EDGE_COLOR: &str = "#5f6b7a";
const FOCAL_STROKE: &str = "#1f2933";

/// Box fill for each entity type.
pub fn fill_color(entity_type: &EntityType) -> &'static str {
    match entity_type {
        EntityType::Table => "#4a90d9",
        EntityType::View => "#50b86c",
        EntityType::Incremental => "#8e6cc9",
        EntityType::Operation => "#f5a623",
        EntityType::Assertion => "#d9534f",
        EntityType::Declaration => "#9aa5b1",
        EntityType::Other(_) | EntityType::Unknown => "#cfd8dc",
    }
}

/// Label color with enough contrast against [`fill_color`].
fn text_color(entity_type: &EntityType) -> &'static str {
    match entity_type {
        EntityType::Declaration | EntityType::Other(_) | EntityType::Unknown => "#1f2933",
        _ => "#ffffff",
    }
}

fn column_name(column: Column) -> &'static str {
    match column {
        Column::Dependencies => "dependencies",
        Column::Focal => "focal",
        Column::Dependents => "dependents",
    }
}

#[derive(Default)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn render(&self, layout: &Layout) -> String {
        let mut svg = String::new();
        // fmt::Write into a String never fails.
        let _ = self.write_document(&mut svg, layout);
        svg
    }

    fn write_document(&self, svg: &mut String, layout: &Layout) -> fmt::Result {
        writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            layout.width, layout.height, layout.width, layout.height
        )?;

        writeln!(
            svg,
            r#"<defs>
  <marker id="arrowhead" markerWidth="10" markerHeight="7" refX="10" refY="3.5" orient="auto">
    <polygon points="0 0, 10 3.5, 0 7" fill="{EDGE_COLOR}" />
  </marker>
</defs>"#
        )?;

        writeln!(
            svg,
            r#"<style>
  .title {{ font-family: sans-serif; font-size: 16px; font-weight: bold; fill: #1f2933; }}
  .subtitle {{ font-family: sans-serif; font-size: 12px; fill: #5f6b7a; }}
  .label {{ font-family: monospace; font-size: 13px; }}
  .caption {{ font-family: sans-serif; font-size: 10px; }}
  .legend-text {{ font-family: sans-serif; font-size: 11px; fill: #1f2933; }}
</style>"#
        )?;

        writeln!(
            svg,
            r##"<rect width="{}" height="{}" fill="#ffffff" />"##,
            layout.width, layout.height
        )?;

        self.write_title(svg, layout)?;

        // Edges first so arrowheads sit under node borders.
        for edge in &layout.edges {
            self.write_edge(svg, edge)?;
        }

        for node in layout.nodes() {
            self.write_node(svg, node)?;
        }

        for entry in &layout.legend {
            self.write_legend_entry(svg, entry)?;
        }

        writeln!(svg, "</svg>")
    }

    fn write_title(&self, svg: &mut String, layout: &Layout) -> fmt::Result {
        let x = layout.dependencies.first().map_or(layout.focal.x, |n| n.x);
        writeln!(
            svg,
            r#"<text class="title" x="{}" y="30">{}</text>"#,
            x,
            escape_xml(&layout.title)
        )?;
        writeln!(
            svg,
            r#"<text class="subtitle" x="{}" y="50">{} {} · {} {}</text>"#,
            x,
            layout.dependencies.len(),
            plural(layout.dependencies.len(), "dependency", "dependencies"),
            layout.dependents.len(),
            plural(layout.dependents.len(), "dependent", "dependents"),
        )
    }

    fn write_node(&self, svg: &mut String, node: &LayoutNode) -> fmt::Result {
        let focal = node.column == Column::Focal;
        let (stroke, stroke_width) = match (focal, node.tracked) {
            (true, _) => (FOCAL_STROKE, 3.0),
            (false, true) => ("#ffffff", 1.0),
            (false, false) => (EDGE_COLOR, 1.0),
        };
        // Entities without a record of their own get a dashed border.
        let dash = if node.tracked { "" } else { r#" stroke-dasharray="4 3""# };
        let cx = node.x + node.width / 2.0;
        let label_y = node.y + node.height / 2.0 - 2.0;
        let caption_y = node.y + node.height - 9.0;
        let color = text_color(&node.entity_type);

        writeln!(
            svg,
            r#"<g class="node" data-column="{}" data-type="{}">"#,
            column_name(node.column),
            escape_xml(node.entity_type.as_str())
        )?;
        writeln!(
            svg,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="6" fill="{}" stroke="{}" stroke-width="{}"{} />"#,
            node.x,
            node.y,
            node.width,
            node.height,
            fill_color(&node.entity_type),
            stroke,
            stroke_width,
            dash
        )?;
        writeln!(
            svg,
            r#"  <text class="label" x="{}" y="{}" text-anchor="middle" fill="{}">{}</text>"#,
            cx,
            label_y,
            color,
            escape_xml(&node.label)
        )?;
        writeln!(
            svg,
            r#"  <text class="caption" x="{}" y="{}" text-anchor="middle" fill="{}">{}</text>"#,
            cx,
            caption_y,
            color,
            escape_xml(node.entity_type.as_str())
        )?;
        writeln!(svg, "</g>")
    }

    fn write_edge(&self, svg: &mut String, edge: &LayoutEdge) -> fmt::Result {
        writeln!(
            svg,
            r#"<path class="edge" d="{}" fill="none" stroke="{}" stroke-width="1.5" marker-end="url(#arrowhead)" />"#,
            curve_path(edge),
            EDGE_COLOR
        )
    }

    fn write_legend_entry(&self, svg: &mut String, entry: &LegendEntry) -> fmt::Result {
        writeln!(
            svg,
            r#"<rect class="legend" x="{}" y="{}" width="{}" height="{}" rx="2" fill="{}" />"#,
            entry.x,
            entry.y,
            entry.swatch,
            entry.swatch,
            fill_color(&entry.entity_type)
        )?;
        writeln!(
            svg,
            r#"<text class="legend-text" x="{}" y="{}">{}</text>"#,
            entry.x + entry.swatch + LEGEND_LABEL_GAP,
            entry.y + entry.swatch - 2.0,
            escape_xml(entry.entity_type.as_str())
        )
    }
}

fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 { one } else { many }
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
