pub mod cleanup;
pub mod config;
pub mod graph;
pub mod index;
pub mod ir;
pub mod layout;
pub mod lexer;
pub mod measure;
pub mod parser;
pub mod pattern;
pub mod site;
pub mod svg;
pub mod target;

use wasm_bindgen::prelude::*;

use ir::FocusIR;
use layout::LayoutEngine;
use parser::parse_report;
use svg::SvgRenderer;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Render the diagram of one entity from dependency report text
#[wasm_bindgen(js_name = "reportToSvg")]
pub fn render_report(source: &str, entity: &str) -> Result<String, String> {
    let graph = parse_report(source);
    if !graph.contains(entity) {
        return Err(format!("Entity not found in report: {entity}"));
    }

    let ir = FocusIR::from_graph(&graph, entity);
    let layout = LayoutEngine::default().layout(&ir);
    Ok(SvgRenderer.render(&layout))
}
