use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dataform_viz::cleanup::cleanup_sqlx_files;
use dataform_viz::config::Config;
use dataform_viz::graph::Graph;
use dataform_viz::index::generate_master_index;
use dataform_viz::parser::parse_file;
use dataform_viz::pattern::ExcludeSet;
use dataform_viz::site::SiteGenerator;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Render a dependency report as per-entity SVG diagrams
#[derive(Parser)]
#[command(name = "dataform-viz")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: dataform-viz.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render diagrams for every schema (or only the given ones)
    Render {
        /// Dependency report (falls back to `report` in the config file)
        report: Option<PathBuf>,

        /// Output root directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only render these schemas
        #[arg(short, long = "schema")]
        schemas: Vec<String>,

        /// Glob pattern of schemas to skip (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Do not write index pages
        #[arg(long)]
        no_index: bool,
    },

    /// Render a single entity's diagram
    Entity {
        report: PathBuf,

        /// Qualified entity name, e.g. staging.customers
        name: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List schemas and their entity counts
    Schemas { report: PathBuf },

    /// Strip *_utils.PROJECT_ID placeholders from .sqlx config blocks
    Cleanup {
        /// Definitions directory
        dir: PathBuf,

        /// Do not write .bak copies
        #[arg(long)]
        no_backup: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = Config::discover(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Commands::Render {
            report,
            output,
            schemas,
            exclude,
            no_index,
        } => {
            let Some(report) = report.or_else(|| config.report.clone()) else {
                bail!("No report given on the command line or in the config file");
            };
            let output = output.unwrap_or_else(|| config.output_dir.clone());
            let mut patterns = config.exclude.clone();
            patterns.extend(exclude);
            render_command(&report, &output, &schemas, &patterns, config.index && !no_index)
        }
        Commands::Entity {
            report,
            name,
            output,
        } => entity_command(&report, &name, output.as_deref()),
        Commands::Schemas { report } => schemas_command(&report),
        Commands::Cleanup { dir, no_backup } => {
            let modified = cleanup_sqlx_files(&dir, !no_backup)
                .with_context(|| format!("Cleanup failed in {}", dir.display()))?;
            println!("Modified {modified} file(s)");
            Ok(())
        }
    }
}

fn load(report: &Path) -> Result<Graph> {
    let graph = parse_file(report).with_context(|| format!("Failed to parse {}", report.display()))?;
    info!(entities = graph.len(), report = %report.display(), "loaded report");
    Ok(graph)
}

fn render_command(
    report: &Path,
    output: &Path,
    schemas: &[String],
    exclude: &[String],
    write_index: bool,
) -> Result<()> {
    let graph = load(report)?;
    let exclude = ExcludeSet::new(exclude)?;
    let site = SiteGenerator::default().with_index(write_index);

    let results = if schemas.is_empty() {
        site.render_all_schemas(&graph, output, &exclude)?
    } else {
        if !exclude.is_empty() {
            warn!("exclude patterns are ignored when schemas are named explicitly");
        }
        let mut results = indexmap::IndexMap::new();
        for schema in schemas {
            let count = site.render_schema(&graph, schema, output)?;
            results.insert(schema.clone(), count);
        }
        results
    };

    for (schema, count) in &results {
        println!("{schema}: {count} diagram(s)");
    }
    let total: usize = results.values().sum();
    println!("Total: {total} diagram(s) in {}", output.display());

    if write_index && total > 0 {
        let index = generate_master_index(output)?;
        println!("Index: {}", index.display());
    }
    Ok(())
}

fn entity_command(report: &Path, name: &str, output: Option<&Path>) -> Result<()> {
    let graph = load(report)?;
    if !graph.contains(name) {
        bail!("Entity {name} not found in {}", report.display());
    }

    let svg = SiteGenerator::default().render_entity(&graph, name);
    match output {
        Some(path) => std::fs::write(path, &svg)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{svg}"),
    }
    Ok(())
}

fn schemas_command(report: &Path) -> Result<()> {
    let graph = load(report)?;
    for schema in graph.all_schemas() {
        println!("{schema}\t{}", graph.entities_in_schema(schema).len());
    }
    Ok(())
}
