//! Stylesheet compiler seam and the bundled import inliner.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure reading or compiling a stylesheet.
#[derive(Debug, Error)]
pub enum StylesheetError {
    #[error("no stylesheet source for {0:?}")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("@import {0:?} not found in search paths")]
    ImportNotFound(String),

    #[error("@import cycle through {0}")]
    ImportCycle(PathBuf),

    #[error("compile task failed: {0}")]
    Task(String),
}

/// Turns stylesheet source into CSS.
pub trait StylesheetCompiler: Send + Sync {
    fn compile(&self, source: &str, include_paths: &[PathBuf]) -> Result<String, StylesheetError>;
}

/// Minimal compiler: inlines `@import` directives found in the include paths
/// and passes every other line through unchanged.
///
/// Imports of `.css` files and `url(...)` imports are left for the browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportInliner;

impl StylesheetCompiler for ImportInliner {
    fn compile(&self, source: &str, include_paths: &[PathBuf]) -> Result<String, StylesheetError> {
        let mut out = String::with_capacity(source.len());
        let mut stack = Vec::new();
        inline(source, include_paths, &mut stack, &mut out)?;
        Ok(out)
    }
}

fn inline(
    source: &str,
    include_paths: &[PathBuf],
    stack: &mut Vec<PathBuf>,
    out: &mut String,
) -> Result<(), StylesheetError> {
    for line in source.lines() {
        match import_target(line) {
            Some(name) => {
                let path = locate(&name, include_paths)
                    .ok_or_else(|| StylesheetError::ImportNotFound(name.clone()))?;
                if stack.contains(&path) {
                    return Err(StylesheetError::ImportCycle(path));
                }
                let nested = fs::read_to_string(&path).map_err(|source| StylesheetError::Read {
                    path: path.clone(),
                    source,
                })?;
                stack.push(path);
                inline(&nested, include_paths, stack, out)?;
                stack.pop();
            }
            None => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    Ok(())
}

/// The import name of an inlinable `@import` line.
fn import_target(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix("@import")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = rest
        .trim()
        .trim_end_matches(';')
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');

    if name.is_empty() || name.ends_with(".css") || name.starts_with("url(") || name.contains("://") {
        return None;
    }
    Some(name.to_string())
}

fn locate(name: &str, include_paths: &[PathBuf]) -> Option<PathBuf> {
    let candidates = [
        PathBuf::from(name),
        PathBuf::from(format!("{name}.styl")),
        Path::new(name).join("index.styl"),
    ];
    include_paths
        .iter()
        .flat_map(|dir| candidates.iter().map(move |c| dir.join(c)))
        .find(|path| path.is_file())
}
