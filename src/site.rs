//! Writes one diagram per entity, grouped into per-schema directories.

use crate::graph::Graph;
use crate::index::{self, IndexEntry, IndexError, SCHEMA_DIR_PREFIX};
use crate::ir::FocusIR;
use crate::layout::LayoutEngine;
use crate::pattern::ExcludeSet;
use crate::svg::SvgRenderer;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Directory holding a schema's diagrams: `dependencies_<schema>`.
pub fn schema_dir_name(schema: &str) -> String {
    format!("{SCHEMA_DIR_PREFIX}{schema}")
}

/// Filesystem-safe stem for an entity: `staging.customers` -> `staging_customers`.
pub fn file_stem(name: &str) -> String {
    name.replace(['.', '/', '\\'], "_")
}

/// Where `name`'s diagram lands under `output_dir`.
pub fn diagram_path(output_dir: &Path, schema: &str, name: &str) -> PathBuf {
    output_dir
        .join(schema_dir_name(schema))
        .join(format!("{}.svg", file_stem(name)))
}

pub struct SiteGenerator {
    engine: LayoutEngine,
    renderer: SvgRenderer,
    write_index: bool,
}

impl Default for SiteGenerator {
    fn default() -> Self {
        Self {
            engine: LayoutEngine::default(),
            renderer: SvgRenderer,
            write_index: true,
        }
    }
}

impl SiteGenerator {
    /// Toggle the per-schema `index.html` pages.
    pub fn with_index(mut self, write_index: bool) -> Self {
        self.write_index = write_index;
        self
    }

    /// Render one entity's diagram to a string.
    pub fn render_entity(&self, graph: &Graph, name: &str) -> String {
        let ir = FocusIR::from_graph(graph, name);
        let layout = self.engine.layout(&ir);
        self.renderer.render(&layout)
    }

    /// Render every entity of `schema` into `output_dir/dependencies_<schema>/`.
    /// Returns the number of diagrams written. When two names map to the
    /// same file, the first one in report order keeps it.
    pub fn render_schema(
        &self,
        graph: &Graph,
        schema: &str,
        output_dir: &Path,
    ) -> Result<usize, RenderError> {
        let entities = graph.entities_in_schema(schema);
        if entities.is_empty() {
            debug!(schema, "no entities in schema");
            return Ok(0);
        }

        let schema_dir = output_dir.join(schema_dir_name(schema));
        std::fs::create_dir_all(&schema_dir).map_err(|source| RenderError::Io {
            path: schema_dir.clone(),
            source,
        })?;

        let mut entries = Vec::with_capacity(entities.len());
        let mut owners: HashMap<String, &str> = HashMap::with_capacity(entities.len());
        for name in entities {
            let stem = file_stem(name);
            if let Some(owner) = owners.get(&stem) {
                warn!(entity = name, kept = owner, file = %stem, "file name already taken in schema, skipping");
                continue;
            }
            owners.insert(stem.clone(), name);

            let path = diagram_path(output_dir, schema, name);
            let svg = self.render_entity(graph, name);
            std::fs::write(&path, svg).map_err(|source| RenderError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(entity = name, path = %path.display(), "wrote diagram");
            entries.push(IndexEntry {
                name: name.to_string(),
                file_name: format!("{stem}.svg"),
            });
        }

        if self.write_index {
            index::write_schema_index(&schema_dir, schema, &entries)?;
        }

        info!(schema, diagrams = entries.len(), "rendered schema");
        Ok(entries.len())
    }

    /// Render all schemas not matched by `exclude`, in order of first
    /// appearance. Excluded schemas are absent from the result and get no
    /// directory.
    pub fn render_all_schemas(
        &self,
        graph: &Graph,
        output_dir: &Path,
        exclude: &ExcludeSet,
    ) -> Result<IndexMap<String, usize>, RenderError> {
        let mut results = IndexMap::new();
        for schema in graph.all_schemas() {
            if let Some(pattern) = exclude.matching(schema) {
                info!(schema, pattern = pattern.as_str(), "skipping excluded schema");
                continue;
            }
            let count = self.render_schema(graph, schema, output_dir)?;
            results.insert(schema.to_string(), count);
        }
        Ok(results)
    }
}
