//! Stub file parsing (YAML/JSON/JSONC) and loading by glob pattern.

use crate::config::error::ConfigError;
use crate::config::stub::StubDefinition;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// Stub file format, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
    Jsonc,
    Unknown,
}

impl FileFormat {
    pub fn from_path(path: &str) -> Self {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "yaml" | "yml" => FileFormat::Yaml,
            "json" => FileFormat::Json,
            "jsonc" => FileFormat::Jsonc,
            _ => FileFormat::Unknown,
        }
    }
}

/// Remove `//` line comments and `/* */` block comments outside of strings.
pub fn strip_json_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                // Keep the newline so line numbers in parse errors still line up
                for n in chars.by_ref() {
                    if n == '\n' || n == '\r' {
                        out.push(n);
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Parse content in the format implied by `path`.
pub fn parse_config<T: DeserializeOwned>(content: &str, path: &str) -> Result<T, ConfigError> {
    match FileFormat::from_path(path) {
        FileFormat::Yaml => Ok(serde_yaml::from_str(content)?),
        FileFormat::Json => Ok(serde_json::from_str(content)?),
        FileFormat::Jsonc => Ok(serde_json::from_str(&strip_json_comments(content))?),
        FileFormat::Unknown => Err(ConfigError::UnknownFileType(path.to_string())),
    }
}

/// Load stubs from every file matching `pattern`, in path order.
pub async fn load_stubs(pattern: &str) -> Result<Vec<StubDefinition>, ConfigError> {
    let mut paths = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
    paths.sort();

    let mut stubs = Vec::new();
    for path in paths {
        let path_str = path.display().to_string();
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path_str.clone(),
                source,
            })?;

        let mut parsed: Vec<StubDefinition> = parse_config(&content, &path_str)?;
        debug!(path = %path_str, count = parsed.len(), "Loaded stub file");
        stubs.append(&mut parsed);
    }

    Ok(stubs)
}
