use dataform_viz::graph::EntityType;
use dataform_viz::index::{IndexError, generate_master_index};
use dataform_viz::parser::{ParseError, parse_file};
use dataform_viz::pattern::ExcludeSet;
use dataform_viz::site::SiteGenerator;
use dataform_viz::svg::fill_color;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const REPORT: &str = "Table: staging.customers (table)
  Dependencies (1):
    <- source.raw_customers
  Dependents (2):
    -> analytics.customer_summary
    -> reports.customer_report

Table: source.raw_customers (table)
  Dependencies (0):
  Dependents (1):
    -> staging.customers

Table: analytics.customer_summary (view)
  Dependencies (2):
    <- staging.customers
    <- staging.orders
  Dependents (0):

Table: staging.orders (table)
  Dependencies (0):
  Dependents (1):
    -> analytics.customer_summary

Table: reports.customer_report (view)
  Dependencies (1):
    <- staging.customers
  Dependents (0):
";

struct Fixture {
    _tmp: TempDir,
    report: PathBuf,
    output: PathBuf,
}

fn fixture() -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let report = tmp.path().join("test_report.txt");
    std::fs::write(&report, REPORT).unwrap();
    let output = tmp.path().join("output");
    std::fs::create_dir(&output).unwrap();
    Fixture {
        report,
        output,
        _tmp: tmp,
    }
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn declared_counts_match_parsed_lists() {
    let f = fixture();
    let graph = parse_file(&f.report).unwrap();

    let mut declared = Vec::new();
    for line in REPORT.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("Dependencies (").or_else(|| line.strip_prefix("Dependents (")) {
            declared.push(rest.trim_end_matches("):").parse::<usize>().unwrap());
        }
    }
    let parsed: Vec<usize> = graph
        .entities()
        .flat_map(|(_, n)| [n.dependencies.len(), n.dependents.len()])
        .collect();
    assert_eq!(parsed, declared);
}

#[test]
fn missing_report_is_not_found() {
    let f = fixture();
    let err = parse_file(f.output.join("nonexistent.txt")).unwrap_err();
    assert!(matches!(err, ParseError::NotFound(_)));
}

#[test]
fn empty_report_is_empty_graph() {
    let f = fixture();
    let empty = f.output.join("empty.txt");
    std::fs::write(&empty, "").unwrap();
    assert!(parse_file(&empty).unwrap().is_empty());
}

#[test]
fn render_schema_writes_named_files() {
    let f = fixture();
    let graph = parse_file(&f.report).unwrap();

    let written = SiteGenerator::default()
        .render_schema(&graph, "staging", &f.output)
        .unwrap();
    assert_eq!(written, 2);

    let dir = f.output.join("dependencies_staging");
    assert!(dir.join("staging_customers.svg").exists());
    assert!(dir.join("staging_orders.svg").exists());
    assert!(dir.join("index.html").exists());

    let svgs: HashSet<String> = std::fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".svg"))
        .collect();
    assert_eq!(svgs.len(), 2);
}

#[test]
fn customers_diagram_structure() {
    let f = fixture();
    let graph = parse_file(&f.report).unwrap();
    SiteGenerator::default()
        .render_schema(&graph, "staging", &f.output)
        .unwrap();

    let svg = read(f.output.join("dependencies_staging/staging_customers.svg"));
    assert!(svg.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    assert!(svg.contains("</svg>"));

    assert_eq!(count(&svg, r#"data-column="dependencies""#), 1);
    assert_eq!(count(&svg, r#"data-column="focal""#), 1);
    assert_eq!(count(&svg, r#"data-column="dependents""#), 2);
    assert_eq!(count(&svg, "<path class=\"edge\""), 3);
    assert_eq!(count(&svg, r#"marker-end="url(#arrowhead)""#), 3);

    for name in [
        "source.raw_customers",
        "analytics.customer_summary",
        "reports.customer_report",
    ] {
        assert!(svg.contains(name), "missing {name}");
    }

    let fills: HashSet<&str> = svg
        .lines()
        .filter(|l| l.trim_start().starts_with("<rect x="))
        .filter_map(|l| l.split("fill=\"").nth(1)?.split('"').next())
        .collect();
    assert!(fills.len() >= 2);
    assert!(fills.contains(fill_color(&EntityType::Table)));
    assert!(fills.contains(fill_color(&EntityType::View)));
}

#[test]
fn zero_dependency_entity_has_empty_left_column() {
    let f = fixture();
    let graph = parse_file(&f.report).unwrap();
    SiteGenerator::default()
        .render_schema(&graph, "source", &f.output)
        .unwrap();

    let svg = read(f.output.join("dependencies_source/source_raw_customers.svg"));
    assert!(svg.contains("raw_customers"));
    assert_eq!(count(&svg, r#"data-column="dependencies""#), 0);
    assert_eq!(count(&svg, r#"data-column="dependents""#), 1);
}

#[test]
fn zero_dependent_entity_renders() {
    let f = fixture();
    let graph = parse_file(&f.report).unwrap();
    SiteGenerator::default()
        .render_schema(&graph, "analytics", &f.output)
        .unwrap();

    let svg = read(f.output.join("dependencies_analytics/analytics_customer_summary.svg"));
    assert!(svg.contains("customer_summary"));
    assert_eq!(count(&svg, r#"data-column="dependents""#), 0);
    assert_eq!(count(&svg, r#"data-column="dependencies""#), 2);
}

#[test]
fn render_all_schemas_counts() {
    let f = fixture();
    let graph = parse_file(&f.report).unwrap();
    let results = SiteGenerator::default()
        .render_all_schemas(&graph, &f.output, &ExcludeSet::default())
        .unwrap();

    let as_vec: Vec<(&str, usize)> = results.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    assert_eq!(
        as_vec,
        vec![("staging", 2), ("source", 1), ("analytics", 1), ("reports", 1)]
    );
}

#[test]
fn exclude_patterns_skip_schemas_entirely() {
    let f = fixture();
    let graph = parse_file(&f.report).unwrap();
    let exclude = ExcludeSet::new(&["source*", "reports*"]).unwrap();
    let results = SiteGenerator::default()
        .render_all_schemas(&graph, &f.output, &exclude)
        .unwrap();

    let keys: Vec<&str> = results.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["staging", "analytics"]);
    assert!(!f.output.join("dependencies_source").exists());
    assert!(!f.output.join("dependencies_reports").exists());
}

#[test]
fn rendering_twice_is_identical() {
    let f = fixture();
    let graph = parse_file(&f.report).unwrap();
    let site = SiteGenerator::default();
    assert_eq!(
        site.render_entity(&graph, "staging.customers"),
        site.render_entity(&graph, "staging.customers")
    );
}

#[test]
fn master_index_links_all_schemas() {
    let f = fixture();
    let graph = parse_file(&f.report).unwrap();
    SiteGenerator::default()
        .render_all_schemas(&graph, &f.output, &ExcludeSet::default())
        .unwrap();

    let index = generate_master_index(&f.output).unwrap();
    assert_eq!(index, f.output.join("index.html"));
    let html = read(&index);
    for link in [
        "dependencies_staging/staging_customers.svg",
        "dependencies_staging/staging_orders.svg",
        "dependencies_source/source_raw_customers.svg",
        "dependencies_analytics/analytics_customer_summary.svg",
        "dependencies_reports/reports_customer_report.svg",
    ] {
        assert!(html.contains(link), "missing {link}");
    }
}

#[test]
fn master_index_without_rendered_schemas_is_configuration_error() {
    let f = fixture();
    let err = generate_master_index(&f.output).unwrap_err();
    assert!(matches!(err, IndexError::Configuration(_)));
}
