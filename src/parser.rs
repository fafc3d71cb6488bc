use crate::graph::{EntityType, Graph, NodeRecord};
use crate::lexer::{Lexer, Line};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Report not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Dependencies,
    Dependents,
}

/// Single-pass parser over the report lines.
///
/// Declared section counts are informational only and are never checked
/// against the arrow lines that follow.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    graph: Graph,
    current: Option<(String, NodeRecord)>,
    section: Section,
    skipped: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            graph: Graph::new(),
            current: None,
            section: Section::None,
            skipped: 0,
        }
    }

    pub fn parse(mut self) -> Graph {
        while let Some(line) = self.lexer.next_line() {
            match line {
                Line::Table { name, typ } => {
                    self.finish_current();
                    self.current = Some((name.to_string(), NodeRecord::new(EntityType::from_str(typ))));
                    self.section = Section::None;
                }
                Line::MalformedTable(text) => {
                    self.finish_current();
                    self.section = Section::None;
                    self.skip(text);
                }
                Line::DependenciesHeader(_) => self.section = Section::Dependencies,
                Line::DependentsHeader(_) => self.section = Section::Dependents,
                Line::Upstream(name) => self.push_edge(Section::Dependencies, name),
                Line::Downstream(name) => self.push_edge(Section::Dependents, name),
                Line::Blank => {}
                Line::Unrecognized(text) => self.skip(text),
            }
        }
        self.finish_current();

        if self.skipped > 0 {
            debug!(skipped = self.skipped, "ignored unrecognized report lines");
        }
        debug!(entities = self.graph.len(), "parsed dependency report");
        self.graph
    }

    fn push_edge(&mut self, expected: Section, name: &str) {
        if self.section != expected || self.current.is_none() {
            return self.skip(name);
        }
        let Some((_, record)) = self.current.as_mut() else {
            return;
        };
        match expected {
            Section::Dependencies => record.dependencies.push(name.to_string()),
            Section::Dependents => record.dependents.push(name.to_string()),
            Section::None => {}
        }
    }

    fn skip(&mut self, text: &str) {
        debug!(line = self.lexer.line_no(), text, "skipping line");
        self.skipped += 1;
    }

    fn finish_current(&mut self) {
        if let Some((name, record)) = self.current.take() {
            self.graph.insert(name, record);
        }
    }
}

pub fn parse_report(input: &str) -> Graph {
    Parser::new(input).parse()
}

/// Read and parse a report file. A missing file is [`ParseError::NotFound`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Graph, ParseError> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ParseError::NotFound(path.to_path_buf())
        } else {
            ParseError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    Ok(parse_report(&input))
}
