//! HTML index pages linking the rendered diagrams.

use crate::svg::escape_xml;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const INDEX_FILE: &str = "index.html";
pub const SCHEMA_DIR_PREFIX: &str = "dependencies_";

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndexError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One diagram listed on a schema page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub file_name: String,
}

/// A schema directory found under the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaListing {
    pub schema: String,
    pub dir_name: String,
    pub diagrams: Vec<String>,
}

/// Write `index.html` inside a schema directory.
pub fn write_schema_index(
    schema_dir: &Path,
    schema: &str,
    entries: &[IndexEntry],
) -> Result<PathBuf, IndexError> {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>Schema: {}</h1>", escape_xml(schema));
    let _ = writeln!(body, "<p>{} diagrams</p>", entries.len());
    body.push_str("<ul class=\"diagrams\">\n");
    for entry in entries {
        let file = escape_xml(&entry.file_name);
        let _ = writeln!(
            body,
            "  <li><a href=\"{file}\">{}</a><br><img src=\"{file}\" alt=\"{}\" loading=\"lazy\"></li>",
            escape_xml(&entry.name),
            escape_xml(&entry.name),
        );
    }
    body.push_str("</ul>\n");

    let path = schema_dir.join(INDEX_FILE);
    let page = html_page(&format!("Dependencies: {schema}"), &body);
    std::fs::write(&path, page).map_err(IndexError::io(&path))?;
    Ok(path)
}

/// Find `dependencies_*` directories under `output_dir`, sorted by name,
/// each with its SVG files sorted by name.
pub fn discover_schemas(output_dir: &Path) -> Result<Vec<SchemaListing>, IndexError> {
    if !output_dir.is_dir() {
        return Err(IndexError::Configuration(format!(
            "output directory {} does not exist or is not a directory",
            output_dir.display()
        )));
    }

    let mut listings = Vec::new();
    for entry in std::fs::read_dir(output_dir).map_err(IndexError::io(output_dir))? {
        let entry = entry.map_err(IndexError::io(output_dir))?;
        let dir_name = entry.file_name().to_string_lossy().into_owned();
        let Some(schema) = dir_name.strip_prefix(SCHEMA_DIR_PREFIX) else {
            continue;
        };
        if schema.is_empty() || !entry.path().is_dir() {
            continue;
        }

        let mut diagrams = Vec::new();
        let schema_dir = entry.path();
        for file in std::fs::read_dir(&schema_dir).map_err(IndexError::io(&schema_dir))? {
            let file = file.map_err(IndexError::io(&schema_dir))?;
            let name = file.file_name().to_string_lossy().into_owned();
            if name.ends_with(".svg") {
                diagrams.push(name);
            }
        }
        diagrams.sort();

        listings.push(SchemaListing {
            schema: schema.to_string(),
            dir_name,
            diagrams,
        });
    }
    listings.sort_by(|a, b| a.dir_name.cmp(&b.dir_name));
    Ok(listings)
}

/// Write the master `index.html` at the output root.
///
/// Fails with [`IndexError::Configuration`] when no schema directories can
/// be resolved relative to `output_dir`.
pub fn generate_master_index(output_dir: &Path) -> Result<PathBuf, IndexError> {
    let listings = discover_schemas(output_dir)?;
    if listings.is_empty() {
        return Err(IndexError::Configuration(format!(
            "no {SCHEMA_DIR_PREFIX}* directories found in {}",
            output_dir.display()
        )));
    }

    let total: usize = listings.iter().map(|l| l.diagrams.len()).sum();
    let mut body = String::new();
    let _ = writeln!(body, "<h1>Dependency diagrams</h1>");
    let _ = writeln!(body, "<p>{} schemas, {} diagrams</p>", listings.len(), total);

    for listing in &listings {
        let dir = escape_xml(&listing.dir_name);
        let _ = writeln!(
            body,
            "<h2><a href=\"{dir}/{INDEX_FILE}\">{}</a> ({})</h2>",
            escape_xml(&listing.schema),
            listing.diagrams.len()
        );
        body.push_str("<ul>\n");
        for diagram in &listing.diagrams {
            let label = diagram.trim_end_matches(".svg");
            let _ = writeln!(
                body,
                "  <li><a href=\"{dir}/{}\">{}</a></li>",
                escape_xml(diagram),
                escape_xml(label)
            );
        }
        body.push_str("</ul>\n");
    }

    let path = output_dir.join(INDEX_FILE);
    std::fs::write(&path, html_page("Dependency diagrams", &body)).map_err(IndexError::io(&path))?;
    info!(path = %path.display(), schemas = listings.len(), "wrote master index");
    Ok(path)
}

fn html_page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{}</title>
<style>
  body {{ font-family: sans-serif; margin: 2em; color: #1f2933; }}
  ul.diagrams {{ list-style: none; padding: 0; }}
  ul.diagrams li {{ margin-bottom: 2em; }}
  img {{ max-width: 100%; border: 1px solid #e4e7eb; }}
</style>
</head>
<body>
{}</body>
</html>
"#,
        escape_xml(title),
        body
    )
}
