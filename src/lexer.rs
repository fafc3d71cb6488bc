//! Line-level tokenizer for dependency reports.
//!
//! The report is line oriented, so each line maps to exactly one token.
//! Lines that match nothing become [`Line::Unrecognized`]; the parser skips
//! them so that annotations added by newer report producers don't break us.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// `Table: <name> (<type>)`
    Table { name: &'a str, typ: &'a str },
    /// A `Table:` line whose name could not be read. Still ends the
    /// previous block.
    MalformedTable(&'a str),
    /// `Dependencies (<n>):`
    DependenciesHeader(Option<usize>),
    /// `Dependents (<m>):`
    DependentsHeader(Option<usize>),
    /// `<- <name>`
    Upstream(&'a str),
    /// `-> <name>`
    Downstream(&'a str),
    Blank,
    Unrecognized(&'a str),
}

pub struct Lexer<'a> {
    lines: std::str::Lines<'a>,
    line_no: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Self {
            lines: input.lines(),
            line_no: 0,
        }
    }

    /// 1-based number of the line most recently returned.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    pub fn next_line(&mut self) -> Option<Line<'a>> {
        let raw = self.lines.next()?;
        self.line_no += 1;
        Some(classify(raw))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}

pub fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }

    if let Some(rest) = line.strip_prefix("Table:") {
        return read_table_header(rest.trim()).unwrap_or(Line::MalformedTable(line));
    }
    if let Some(rest) = line.strip_prefix("Dependencies") {
        return read_count(rest).map_or(Line::Unrecognized(line), Line::DependenciesHeader);
    }
    if let Some(rest) = line.strip_prefix("Dependents") {
        return read_count(rest).map_or(Line::Unrecognized(line), Line::DependentsHeader);
    }
    if let Some(name) = line.strip_prefix("<-") {
        return read_name(name).map_or(Line::Unrecognized(line), Line::Upstream);
    }
    if let Some(name) = line.strip_prefix("->") {
        return read_name(name).map_or(Line::Unrecognized(line), Line::Downstream);
    }

    Line::Unrecognized(line)
}

/// `<name> (<type>)`; the type suffix is optional.
fn read_table_header(rest: &str) -> Option<Line<'_>> {
    if rest.is_empty() {
        return None;
    }
    match rest.strip_suffix(')').and_then(|s| s.rsplit_once('(')) {
        Some((name, typ)) if !name.trim().is_empty() => Some(Line::Table {
            name: name.trim(),
            typ: typ.trim(),
        }),
        Some(_) => None,
        None => Some(Line::Table { name: rest, typ: "" }),
    }
}

/// ` (<n>):` after a section keyword. `Some(None)` means the header carried
/// no parsable count, which is still a header.
fn read_count(rest: &str) -> Option<Option<usize>> {
    let rest = rest.trim().strip_suffix(':')?.trim();
    if rest.is_empty() {
        return Some(None);
    }
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.trim().parse().ok())
}

fn read_name(rest: &str) -> Option<&str> {
    let name = rest.trim();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_header() {
        assert_eq!(
            classify("Table: staging.customers (table)"),
            Line::Table {
                name: "staging.customers",
                typ: "table"
            }
        );
        assert_eq!(
            classify("Table: staging.customers"),
            Line::Table {
                name: "staging.customers",
                typ: ""
            }
        );
    }

    #[test]
    fn test_table_name_with_parens() {
        assert_eq!(
            classify("Table: ops.run(daily) (operation)"),
            Line::Table {
                name: "ops.run(daily)",
                typ: "operation"
            }
        );
    }

    #[test]
    fn test_section_headers() {
        assert_eq!(classify("  Dependencies (3):"), Line::DependenciesHeader(Some(3)));
        assert_eq!(classify("  Dependents (0):"), Line::DependentsHeader(Some(0)));
        assert_eq!(classify("  Dependents:"), Line::DependentsHeader(None));
        assert_eq!(classify("  Dependents (many):"), Line::DependentsHeader(None));
    }

    #[test]
    fn test_arrows() {
        assert_eq!(classify("    <- source.raw"), Line::Upstream("source.raw"));
        assert_eq!(classify("    -> analytics.x"), Line::Downstream("analytics.x"));
        assert_eq!(classify("    ->"), Line::Unrecognized("->"));
    }

    #[test]
    fn test_blank_and_unknown() {
        assert_eq!(classify("   "), Line::Blank);
        assert_eq!(classify("  Tags: nightly"), Line::Unrecognized("Tags: nightly"));
    }

    #[test]
    fn test_malformed_table_header() {
        assert_eq!(classify("Table:"), Line::MalformedTable("Table:"));
        assert_eq!(classify("Table:  (view)"), Line::MalformedTable("Table:  (view)"));
    }

    #[test]
    fn test_leading_bom_is_stripped() {
        let mut lexer = Lexer::new("\u{feff}Table: a.x (table)\n");
        assert_eq!(
            lexer.next_line(),
            Some(Line::Table {
                name: "a.x",
                typ: "table"
            })
        );
    }

    #[test]
    fn test_line_numbers() {
        let mut lexer = Lexer::new("Table: a.b (view)\n\n  Dependents (0):\n");
        assert!(matches!(lexer.next_line(), Some(Line::Table { .. })));
        assert_eq!(lexer.next_line(), Some(Line::Blank));
        assert_eq!(lexer.next_line(), Some(Line::DependentsHeader(Some(0))));
        assert_eq!(lexer.line_no(), 3);
        assert_eq!(lexer.next_line(), None);
    }
}
