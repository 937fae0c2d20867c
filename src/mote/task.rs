//! A template precompilation target: enumerate, partition, emit, write.

use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::MoteTarget;
use crate::mote::compiler::{compile_partial, compile_template, namespace_decl, partial_name};

/// Failure building a template bundle.
#[derive(Debug, Error)]
pub enum MoteError {
    #[error("invalid partial pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to list {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Compiles one [`MoteTarget`].
pub struct MoteTask {
    target: MoteTarget,
    partial: Regex,
}

impl MoteTask {
    pub fn new(target: MoteTarget) -> Result<Self, MoteError> {
        let partial = Regex::new(&target.partial_pattern).map_err(|source| MoteError::Pattern {
            pattern: target.partial_pattern.clone(),
            source,
        })?;
        Ok(Self { target, partial })
    }

    /// Every source file of the target, sorted, extension-filtered.
    pub fn sources(&self) -> Result<Vec<PathBuf>, MoteError> {
        let mut files = Vec::new();
        for src in &self.target.src {
            for entry in WalkDir::new(src).sort_by_file_name() {
                let entry = entry.map_err(|source| MoteError::Walk {
                    path: src.clone(),
                    source,
                })?;
                if entry.file_type().is_file() && self.wanted(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        }
        files.dedup();
        Ok(files)
    }

    fn wanted(&self, path: &Path) -> bool {
        if self.target.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.target
                    .extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.') == ext)
            })
            .unwrap_or(false)
    }

    fn is_partial(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| self.partial.is_match(name))
            .unwrap_or(false)
    }

    fn template_name(&self, path: &Path) -> String {
        let name = slash_path(path);
        match &self.target.strip_prefix {
            Some(prefix) => name
                .strip_prefix(prefix.as_str())
                .map(|rest| rest.trim_start_matches('/').to_string())
                .unwrap_or(name),
            None => name,
        }
    }

    /// Build the JavaScript bundle.
    pub fn build(&self) -> Result<String, MoteError> {
        let (partials, templates): (Vec<PathBuf>, Vec<PathBuf>) = self
            .sources()?
            .into_iter()
            .partition(|path| self.is_partial(path));

        let mut output = vec![namespace_decl(&self.target.namespace)];

        for path in &partials {
            let source = read(path)?;
            output.push(compile_partial(&partial_name(&slash_path(path)), &source));
        }
        for path in &templates {
            let source = read(path)?;
            output.push(compile_template(
                &self.target.namespace,
                &self.template_name(path),
                &source,
            ));
        }

        tracing::debug!(
            partials = partials.len(),
            templates = templates.len(),
            "Compiled templates"
        );
        Ok(output.join("\n\n"))
    }

    /// Build the bundle and write it to the target's destination.
    pub fn run(&self) -> Result<PathBuf, MoteError> {
        let bundle = self.build()?;
        let dest = &self.target.dest;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| MoteError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(dest, bundle).map_err(|source| MoteError::Write {
            path: dest.clone(),
            source,
        })?;

        tracing::info!("File '{}' created.", dest.display());
        Ok(dest.clone())
    }
}

fn read(path: &Path) -> Result<String, MoteError> {
    fs::read_to_string(path).map_err(|source| MoteError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::CurDir => None,
            Component::RootDir => Some(String::new()),
            c => Some(c.as_os_str().to_string_lossy().into_owned()),
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(src: &Path, dest: &Path) -> MoteTarget {
        MoteTarget {
            src: vec![src.to_path_buf()],
            dest: dest.to_path_buf(),
            namespace: "JST".to_string(),
            partial_pattern: "^_".to_string(),
            extensions: vec!["mote".to_string()],
            strip_prefix: Some(format!("{}/", slash_path(src))),
        }
    }

    #[test]
    fn test_build_orders_partials_first() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("templates");
        fs::create_dir_all(src.join("list")).unwrap();
        fs::write(src.join("page.mote"), "{{> header}}\n<p>{{body}}</p>").unwrap();
        fs::write(src.join("list/item.mote"), "<li>\"{{name}}\"</li>").unwrap();
        fs::write(src.join("_header.mote"), "<h1>{{title}}</h1>").unwrap();
        fs::write(src.join("notes.txt"), "ignored").unwrap();

        let task = MoteTask::new(target(&src, &dir.path().join("out.js"))).unwrap();
        let bundle = task.build().unwrap();

        let expected = [
            "this['JST'] = this['JST'] || {};",
            "mote.compilePartial('header', \"<h1>{{title}}</h1>\");",
            "this['JST']['list/item.mote'] = mote.compile(\"<li>\\\"{{name}}\\\"</li>\");",
            "this['JST']['page.mote'] = mote.compile(\"{{> header}}\\n<p>{{body}}</p>\");",
        ]
        .join("\n\n");
        assert_eq!(bundle, expected);
    }

    #[test]
    fn test_run_writes_dest() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("templates");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.mote"), "A").unwrap();

        let dest = dir.path().join("dist/js/templates.js");
        let written = MoteTask::new(target(&src, &dest)).unwrap().run().unwrap();

        assert_eq!(written, dest);
        let content = fs::read_to_string(&dest).unwrap();
        assert!(content.ends_with("this['JST']['a.mote'] = mote.compile(\"A\");"));
    }

    #[test]
    fn test_empty_source_still_declares_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("empty");
        fs::create_dir_all(&src).unwrap();

        let bundle = MoteTask::new(target(&src, &dir.path().join("o.js")))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(bundle, "this['JST'] = this['JST'] || {};");
    }

    #[test]
    fn test_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let task = MoteTask::new(target(&dir.path().join("nope"), &dir.path().join("o.js"))).unwrap();
        assert!(matches!(task.build(), Err(MoteError::Walk { .. })));
    }

    #[test]
    fn test_bad_partial_pattern() {
        let mut t = target(Path::new("x"), Path::new("y"));
        t.partial_pattern = "(".to_string();
        assert!(matches!(MoteTask::new(t), Err(MoteError::Pattern { .. })));
    }
}
