//! Strip `<prefix>_utils.PROJECT_ID` placeholders from the `config { ... }`
//! block of `.sqlx` definition files.
//!
//! Lines are classified by a small state machine before anything is
//! rewritten, so SQL outside the config block is never touched even when
//! it mentions the same placeholder.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const PLACEHOLDER: &str = r"`?(?:\$\{\s*\w+_utils\.PROJECT_ID\s*\}|\w+_utils\.PROJECT_ID)`?";

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| compile(PLACEHOLDER));

/// `key: <placeholder>` with an optional trailing comma.
static PROPERTY_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r#"\s*[\w"']+\s*:\s*{PLACEHOLDER}\s*,?"#)));

/// Placeholder left over inside a larger value, with one adjacent comma.
static BARE_RE: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"{PLACEHOLDER}\s*,?\s*")));

static CONFIG_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^\s*config\s*\{"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static cleanup pattern is valid")
}

#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Config,
    Sql,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    InConfig { depth: usize },
}

/// Classify every line as part of the config block or not. The opening
/// `config {` line and every line up to the one that balances its braces
/// count as config.
pub fn classify_lines(content: &str) -> Vec<LineClass> {
    let mut state = State::Outside;
    content
        .lines()
        .map(|line| {
            let (class, next) = match state {
                State::Outside if CONFIG_OPEN_RE.is_match(line) => {
                    (LineClass::Config, advance(0, line))
                }
                State::Outside => (LineClass::Sql, State::Outside),
                State::InConfig { depth } => (LineClass::Config, advance(depth, line)),
            };
            state = next;
            class
        })
        .collect()
}

fn advance(depth: usize, line: &str) -> State {
    let (opens, closes) = count_braces(line);
    match (depth + opens).checked_sub(closes) {
        Some(d) if d > 0 => State::InConfig { depth: d },
        _ => State::Outside,
    }
}

/// Count `{` and `}` outside `"..."`, `'...'` and backtick strings.
/// A backslash escapes the next character inside quotes.
fn count_braces(line: &str) -> (usize, usize) {
    let (mut opens, mut closes) = (0, 0);
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(_), '\\') => {
                chars.next();
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'' | '`') => quote = Some(c),
            (None, '{') => opens += 1,
            (None, '}') => closes += 1,
            (None, _) => {}
        }
    }
    (opens, closes)
}

/// Rewrite one config line. `None` means the line should be dropped.
fn rewrite_config_line(line: &str) -> Option<String> {
    if !PLACEHOLDER_RE.is_match(line) {
        return Some(line.to_string());
    }
    let without_props = PROPERTY_RE.replace_all(line, "");
    let cleaned = BARE_RE.replace_all(&without_props, "");
    if cleaned.trim().is_empty() {
        None
    } else {
        Some(cleaned.into_owned())
    }
}

/// Clean one file's content. Returns the new content, which equals the
/// input when nothing needed changing.
pub fn clean_content(content: &str) -> String {
    let classes = classify_lines(content);
    let mut out: Vec<String> = Vec::with_capacity(classes.len());
    let mut blank_run = 0;

    for (line, class) in content.lines().zip(classes) {
        let line = match class {
            LineClass::Sql => line.to_string(),
            LineClass::Config => match rewrite_config_line(line) {
                Some(l) => l,
                None => continue,
            },
        };
        let line = line.trim_end().to_string();

        if line.is_empty() {
            blank_run += 1;
            if blank_run > 2 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push(line);
    }

    let mut cleaned = out.join("\n");
    if content.ends_with('\n') {
        cleaned.push('\n');
    }
    cleaned
}

fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".bak");
    PathBuf::from(os)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CleanupError + '_ {
    move |source| CleanupError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Clean every `.sqlx` file under `dir`. Returns how many files changed.
/// A missing directory is not an error and yields 0.
pub fn cleanup_sqlx_files(dir: impl AsRef<Path>, backup: bool) -> Result<usize, CleanupError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "cleanup directory not found");
        return Ok(0);
    }

    let mut modified = 0;
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "sqlx") {
            continue;
        }

        let original = std::fs::read_to_string(path).map_err(io_error(path))?;
        let cleaned = clean_content(&original);
        if cleaned == original {
            debug!(path = %path.display(), "no changes");
            continue;
        }

        if backup {
            let bak = backup_path(path);
            std::fs::write(&bak, &original).map_err(io_error(&bak))?;
        }
        std::fs::write(path, cleaned).map_err(io_error(path))?;
        info!(path = %path.display(), "cleaned");
        modified += 1;
    }

    Ok(modified)
}
