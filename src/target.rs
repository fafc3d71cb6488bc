use serde::Deserialize;

/// Where an action writes its output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Target {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            database: None,
            schema: Some(schema.into()),
            name: Some(name.into()),
        }
    }
}

/// Display name `schema.name` for a target. The database is ignored and
/// missing parts render empty; no target at all yields `UNKNOWN`.
pub fn normalize_name(target: Option<&Target>) -> String {
    match target {
        None => "UNKNOWN".to_string(),
        Some(t) => format!(
            "{}.{}",
            t.schema.as_deref().unwrap_or_default(),
            t.name.as_deref().unwrap_or_default()
        ),
    }
}
