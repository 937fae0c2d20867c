//! Path matching logic.
//!
//! # Responsibilities
//! - Match fixed paths, path prefixes and path suffixes
//! - Resolve static folder and file mappings to filesystem paths
//!
//! # Design Decisions
//! - Matching is on the raw URI path, never the query string
//! - Path matching is case-sensitive
//! - Static resolution ranks candidates explicitly instead of relying on
//!   registration order: exact file keys first, then the longest folder key

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches one path exactly.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    path: String,
}

impl ExactMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Matcher for ExactMatcher {
    fn matches(&self, path: &str) -> bool {
        path == self.path
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The part of `path` after the prefix, if it matches.
    pub fn remainder<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.prefix.as_str())
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Matches the request path suffix (file extension routes).
#[derive(Debug, Clone)]
pub struct PathSuffixMatcher {
    suffix: String,
}

impl PathSuffixMatcher {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl Matcher for PathSuffixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.ends_with(&self.suffix)
    }
}

/// Matches `{prefix}{segment}/...` where segment is one non-empty path segment.
#[derive(Debug, Clone)]
pub struct SegmentMatcher {
    prefix: String,
}

impl SegmentMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for SegmentMatcher {
    fn matches(&self, path: &str) -> bool {
        path.strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.split_once('/'))
            .map(|(segment, _)| !segment.is_empty())
            .unwrap_or(false)
    }
}

/// Error resolving a static mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("path {0:?} escapes its mapped folder")]
    PathEscape(String),
}

/// Resolves configured folder and file keys to filesystem paths.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    /// `{root}{key}` → file, exact match.
    files: Vec<(String, PathBuf)>,
    /// `{root}{key}/` → folder, most specific first.
    folders: Vec<(PathPrefixMatcher, usize, PathBuf)>,
}

impl StaticResolver {
    pub fn new<'a>(
        root: &str,
        folders: impl IntoIterator<Item = (&'a String, &'a PathBuf)>,
        files: impl IntoIterator<Item = (&'a String, &'a PathBuf)>,
    ) -> Self {
        let files = files
            .into_iter()
            .map(|(key, path)| (format!("{root}{key}"), path.clone()))
            .collect();

        let mut folders: Vec<(String, PathBuf)> = folders
            .into_iter()
            .map(|(key, path)| (format!("{root}{key}"), path.clone()))
            .collect();
        // Longest key first; equal lengths in descending key order.
        folders.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| b.cmp(a)));

        let folders = folders
            .into_iter()
            .map(|(mount, path)| {
                let len = mount.len();
                (PathPrefixMatcher::new(format!("{mount}/")), len, path)
            })
            .collect();

        Self { files, folders }
    }

    /// Map a request path to a file on disk.
    ///
    /// Returns `Ok(None)` when no key covers the path.
    pub fn resolve(&self, path: &str) -> Result<Option<PathBuf>, ResolveError> {
        if let Some((_, file)) = self.files.iter().find(|(mount, _)| mount == path) {
            return Ok(Some(file.clone()));
        }

        for (matcher, mount_len, folder) in &self.folders {
            if !matcher.matches(path) {
                continue;
            }
            let remainder = &path[*mount_len..];
            let decoded = percent_decode_str(remainder).decode_utf8_lossy();
            return join_within(folder, &decoded)
                .map(Some)
                .ok_or_else(|| ResolveError::PathEscape(path.to_string()));
        }

        Ok(None)
    }
}

/// Join a URL remainder onto a folder, refusing parent-directory segments.
fn join_within(folder: &Path, remainder: &str) -> Option<PathBuf> {
    let mut joined = folder.to_path_buf();
    for segment in remainder.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') => return None,
            s => joined.push(s),
        }
    }
    Some(joined)
}
